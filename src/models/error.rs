use serde::Serialize;
use serde_path_to_error::Segment;
use thiserror::Error;

use super::amount::MALFORMED_AMOUNT;

/// Erreurs de génération des documents
#[derive(Debug, Error)]
pub enum Error {
    /// Champ obligatoire absent, avant toute production de document
    #[error("champ obligatoire manquant : {path}")]
    MissingField { path: String },

    /// Quantité, prix ou pourcentage non décimal
    #[error("montant invalide pour {path} : {value:?}")]
    MalformedAmount { path: String, value: String },

    /// Produit ou somme hors de la capacité décimale (28 chiffres significatifs)
    #[error("montant hors limites pour {path}")]
    AmountOverflow { path: String },

    #[error("date invalide pour {path} : {value:?} (attendu AAAA-MM-JJ)")]
    MalformedDate { path: String, value: String },

    #[error("JSON invalide : {0}")]
    Json(#[from] serde_json::Error),

    #[error("erreur d'écriture XML : {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document non UTF-8 : {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Échec de persistance, propagé tel quel
    #[error("erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration invalide : {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn missing(path: impl Into<String>) -> Self {
        Error::MissingField { path: path.into() }
    }

    pub fn malformed(path: impl Into<String>, value: impl Into<String>) -> Self {
        Error::MalformedAmount {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn overflow(path: impl Into<String>) -> Self {
        Error::AmountOverflow { path: path.into() }
    }

    /// Vrai pour les erreurs de validation de l'entrée (réponse 400)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingField { .. }
                | Error::MalformedAmount { .. }
                | Error::AmountOverflow { .. }
                | Error::MalformedDate { .. }
                | Error::Json(_)
        )
    }

    /// Conversion en erreur de champ pour les réponses HTTP
    pub fn to_field_error(&self) -> FieldError {
        match self {
            Error::MissingField { path }
            | Error::MalformedAmount { path, .. }
            | Error::AmountOverflow { path }
            | Error::MalformedDate { path, .. } => FieldError::new(path.clone(), self.to_string()),
            _ => FieldError::new("_form", self.to_string()),
        }
    }
}

/// Erreur de désérialisation d'une facture : le chemin serde devient le chemin
/// `invoice.…` du champ fautif. Un type inattendu (dont `null`) compte comme absent.
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let mut path = String::from("invoice");
        for segment in err.path().iter() {
            match segment {
                Segment::Seq { index } => path.push_str(&format!("[{index}]")),
                Segment::Map { key } => path.push_str(&format!(".{key}")),
                Segment::Enum { variant } => path.push_str(&format!(".{variant}")),
                Segment::Unknown => {}
            }
        }

        let message = err.inner().to_string();
        if let Some(field) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            return Error::missing(format!("{path}.{field}"));
        }
        if let Some(value) = message.strip_prefix(MALFORMED_AMOUNT) {
            return Error::malformed(path, value);
        }
        tracing::debug!(%path, %message, "champ de type inattendu");
        Error::missing(path)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Erreur de validation d'un champ
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Réponse d'erreur de validation
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub success: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResponse {
    pub fn with_errors(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_keeps_path() {
        let err = Error::missing("invoice.lines[2].qty.value");
        let field = err.to_field_error();
        assert_eq!(field.field, "invoice.lines[2].qty.value");
        assert!(field.message.contains("invoice.lines[2].qty.value"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_io_error_is_not_validation() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disque plein"));
        assert!(!err.is_validation());
        assert_eq!(err.to_field_error().field, "_form");
    }
}
