use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

use super::amount::Amount;
use super::de::optional_text;
use super::error::{Error, Result};

pub const DEFAULT_TAX_SCHEME_ID: &str = "01";
pub const DEFAULT_TAX_NAME: &str = "IVA";
pub const DEFAULT_ITEM: &str = "ITEM";

fn default_tax_scheme_id() -> String {
    DEFAULT_TAX_SCHEME_ID.to_string()
}

fn default_tax_name() -> String {
    DEFAULT_TAX_NAME.to_string()
}

fn default_item() -> String {
    DEFAULT_ITEM.to_string()
}

fn zero_percent() -> Amount {
    Amount::from(Decimal::ZERO)
}

/// Quantité ou quantité de base avec son code d'unité (UN/ECE rec 20)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub value: Amount,
    pub unit_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Price {
    pub amount: Amount,
    #[serde(default, rename = "baseQty", deserialize_with = "base_quantity")]
    pub base_quantity: Option<Quantity>,
}

/// `baseQty` absent, nul ou vide : pas de quantité de base
fn base_quantity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Quantity>, D::Error> {
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(map) if !map.is_empty() => Quantity::deserialize(Value::Object(map))
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Impôt de ligne ; un pourcentage nul n'émet aucun bloc fiscal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineTax {
    #[serde(default = "zero_percent")]
    pub percent: Amount,
    #[serde(rename = "schemeID", default = "default_tax_scheme_id")]
    pub scheme_id: String,
    #[serde(default = "default_tax_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(rename = "qty")]
    pub quantity: Quantity,
    pub price: Price,
    #[serde(default)]
    pub tax: Option<LineTax>,
    #[serde(default = "default_item")]
    pub description: String,
    #[serde(default = "default_item")]
    pub item_code: String,
}

/// Base et impôt d'une ligne en précision complète
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub base: Decimal,
    /// Absent si le pourcentage est nul
    pub tax: Option<Decimal>,
}

impl InvoiceLine {
    /// Identifiant émis : explicite, sinon position à partir de 1
    pub fn sequence_id(&self, position: usize) -> String {
        self.id.clone().unwrap_or_else(|| position.to_string())
    }

    /// Pourcentage d'impôt, zéro si absent
    pub fn tax_percent(&self) -> Decimal {
        self.tax
            .as_ref()
            .map(|t| t.percent.value())
            .unwrap_or(Decimal::ZERO)
    }

    /// Base HT = quantité × prix unitaire, impôt = base × pourcentage / 100,
    /// sans arrondi. Un dépassement de capacité est signalé sur `path`.
    pub fn amounts(&self, path: &str) -> Result<LineAmounts> {
        let base = self
            .quantity
            .value
            .value()
            .checked_mul(self.price.amount.value())
            .ok_or_else(|| Error::overflow(path))?;

        let percent = self.tax_percent();
        let tax = if percent > Decimal::ZERO {
            let tax = base
                .checked_mul(percent)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(|| Error::overflow(path))?;
            Some(tax)
        } else {
            None
        };

        Ok(LineAmounts { base, tax })
    }
}

impl fmt::Display for InvoiceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} × {} @{}%",
            self.quantity.value,
            self.quantity.unit_code,
            self.price.amount,
            self.tax_percent(),
        )
    }
}
