use serde::Deserialize;

use super::de::text;

/// Identifiant fiscal (NIT) avec son schéma
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyId {
    #[serde(deserialize_with = "text")]
    pub value: String,
    #[serde(rename = "schemeID")]
    pub scheme_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub department: String,
    pub city: String,
    pub country_code: String,
}

/// Émetteur ou acquéreur ; les deux ont la même forme
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub registration_name: String,
    #[serde(rename = "companyID")]
    pub company_id: CompanyId,
    pub address: Address,
}
