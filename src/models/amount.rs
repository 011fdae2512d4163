use rust_decimal::Decimal;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::fmt;
use std::str::FromStr;

/// Préfixe du message d'erreur serde d'un montant illisible, suivi du texte reçu
pub(crate) const MALFORMED_AMOUNT: &str = "montant invalide : ";

/// Valeur numérique exacte, avec le texte tel que reçu en entrée.
///
/// Les quantités sont réémises telles quelles dans le XML ; les montants
/// passent par l'arrondi monétaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    value: Decimal,
    text: String,
}

impl Amount {
    /// Lit un décimal, notation scientifique acceptée ; `None` si illisible
    /// ou hors de la capacité d'un `Decimal` (plus de 28 chiffres significatifs)
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()?;
        Some(Self {
            value,
            text: text.to_string(),
        })
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Texte d'origine (ex. "2", "2.0", "10.005")
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

struct AmountVisitor;

impl AmountVisitor {
    fn read<E: de::Error>(text: &str) -> Result<Amount, E> {
        Amount::parse(text).ok_or_else(|| E::custom(format!("{MALFORMED_AMOUNT}{}", text.trim())))
    }
}

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("un nombre ou une chaîne numérique")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Self::read(&v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Self::read(&v.to_string())
    }

    // `{:?}` garde la forme courte d'un flottant JSON : 2.0 → "2.0", 10.005 → "10.005"
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Self::read(&format!("{v:?}"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Self::read(v)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
