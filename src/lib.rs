//! Bibliothèque de génération de factures électroniques UBL 2.1 (Colombie) et RIPS

pub mod logging;
pub mod models;
pub mod rips;
pub mod ubl;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use models::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

/// Configuration du serveur de génération
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Répertoire où conserver une copie de chaque facture générée
    #[serde(default)]
    pub xml_storage: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            xml_storage: None,
        }
    }
}

impl ServerConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Charge la configuration ; fichier absent = valeurs par défaut
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "configuration absente, valeurs par défaut");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
