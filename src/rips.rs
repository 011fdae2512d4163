//! Générateur RIPS minimal (stub de tests)
//!
//! Ne lève jamais d'erreur : toute entrée mal formée produit un document
//! avec `count="0"`.

use serde_json::Value;

pub const VERSION: &str = "rips-test-0.1.0";

pub fn version() -> &'static str {
    VERSION
}

/// Nombre d'usagers déclarés, zéro si la structure ne correspond pas
pub fn count_usuarios(claims: &Value) -> usize {
    claims
        .get("usuarios")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// Génère le XML RIPS pour un enregistrement déjà décodé
pub fn generate(claims: &Value) -> String {
    let count = count_usuarios(claims);
    tracing::debug!(count, "document RIPS généré");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<RIPS>
  <Version>{version}</Version>
  <Usuarios count="{count}"/>
</RIPS>
"#,
        version = VERSION,
        count = count,
    )
}

/// Variante sur texte brut ; un JSON illisible vaut zéro usager
pub fn generate_from_str(input: &str) -> String {
    match serde_json::from_str::<Value>(input) {
        Ok(claims) => generate(&claims),
        Err(e) => {
            tracing::warn!(error = %e, "entrée RIPS illisible, count=0");
            generate(&Value::Null)
        }
    }
}
