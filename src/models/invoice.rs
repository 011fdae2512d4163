use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::de::text;
use super::error::{Error, Result};
use super::line::{InvoiceLine, LineAmounts};
use super::party::Party;

pub const DEFAULT_INVOICE_TYPE_CODE: &str = "01";
pub const DEFAULT_CURRENCY: &str = "COP";

const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_invoice_type_code() -> String {
    DEFAULT_INVOICE_TYPE_CODE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Facture validée, prête pour le générateur UBL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(deserialize_with = "text")]
    pub id: String,
    /// AAAA-MM-JJ, contrôlée par `validate`
    pub issue_date: String,
    #[serde(default)]
    pub issue_time: Option<String>,
    #[serde(default = "default_invoice_type_code")]
    pub invoice_type_code: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub supplier: Party,
    pub customer: Party,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
}

/// Totaux de la facture en précision complète ; l'arrondi n'intervient qu'à l'émission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
    /// Montants de chaque ligne, dans l'ordre des lignes
    pub lines: Vec<LineAmounts>,
}

impl Totals {
    pub fn has_tax(&self) -> bool {
        self.tax_total > Decimal::ZERO
    }
}

impl InvoiceRecord {
    /// Décode et valide un document JSON brut
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Phase de validation : tout champ requis absent est signalé avec son chemin
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut unknown = |path: serde_ignored::Path| {
            tracing::warn!(field = %format!("invoice.{path}"), "champ inconnu ignoré");
        };
        let deserializer = serde_ignored::Deserializer::new(value, &mut unknown);
        let mut record: Self = serde_path_to_error::deserialize(deserializer)?;

        record.issue_date = record.issue_date.trim().to_string();
        record.issue_time = record.issue_time.filter(|t| !t.is_empty());
        record.validate()?;
        Ok(record)
    }

    /// Contrôles hors du schéma JSON : date d'émission et capacité des montants
    pub fn validate(&self) -> Result<()> {
        self.parsed_issue_date()?;
        self.totals()?;
        Ok(())
    }

    pub fn parsed_issue_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.issue_date.trim(), ISSUE_DATE_FORMAT).map_err(|_| {
            Error::MalformedDate {
                path: "invoice.issueDate".to_string(),
                value: self.issue_date.clone(),
            }
        })
    }

    /// Agrège sous-total, impôt et total sur toutes les lignes, sans dépassement
    pub fn totals(&self) -> Result<Totals> {
        let mut totals = Totals::default();

        for (index, line) in self.lines.iter().enumerate() {
            let path = format!("invoice.lines[{index}]");
            let amounts = line.amounts(&path)?;

            totals.subtotal = totals
                .subtotal
                .checked_add(amounts.base)
                .ok_or_else(|| Error::overflow(path.as_str()))?;
            if let Some(tax) = amounts.tax {
                totals.tax_total = totals
                    .tax_total
                    .checked_add(tax)
                    .ok_or_else(|| Error::overflow(path.as_str()))?;
            }
            totals.lines.push(amounts);
        }

        totals.grand_total = totals
            .subtotal
            .checked_add(totals.tax_total)
            .ok_or_else(|| Error::overflow("invoice"))?;
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn party() -> Value {
        json!({
            "registrationName": "Droguería La 80",
            "companyID": { "value": "800111222", "schemeID": "31" },
            "address": { "department": "Antioquia", "city": "Medellín", "countryCode": "CO" }
        })
    }

    fn invoice(lines: Value) -> Value {
        json!({
            "id": "SETP990000001",
            "issueDate": "2024-05-02",
            "supplier": party(),
            "customer": party(),
            "lines": lines
        })
    }

    fn line(qty: &str, amount: &str) -> Value {
        json!({ "qty": { "value": qty, "unitCode": "EA" }, "price": { "amount": amount } })
    }

    #[test]
    fn test_defaults() {
        let record = InvoiceRecord::from_json(&invoice(json!([]))).unwrap();
        assert_eq!(record.invoice_type_code, "01");
        assert_eq!(record.currency, "COP");
        assert_eq!(record.issue_time, None);
        assert_eq!(
            record.parsed_issue_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert_eq!(record.totals().unwrap(), Totals::default());
    }

    #[test]
    fn test_empty_issue_time_is_absent() {
        let mut value = invoice(json!([]));
        value["issueTime"] = json!("");
        assert_eq!(InvoiceRecord::from_json(&value).unwrap().issue_time, None);
    }

    #[test]
    fn test_totals_in_full_precision() {
        let record = InvoiceRecord::from_json(&invoice(json!([
            { "qty": { "value": 3, "unitCode": "EA" }, "price": { "amount": "0.335" }, "tax": { "percent": 19 } },
            { "qty": { "value": 1, "unitCode": "EA" }, "price": { "amount": "0.335" }, "tax": { "percent": 19 } },
            { "qty": { "value": 0, "unitCode": "EA" }, "price": { "amount": 99 } }
        ])))
        .unwrap();
        let totals = record.totals().unwrap();
        assert_eq!(totals.subtotal, dec!(1.34));
        assert_eq!(totals.tax_total, dec!(0.2546));
        assert_eq!(totals.grand_total, dec!(1.5946));
        assert_eq!(totals.lines.len(), 3);
        assert_eq!(totals.lines[2].tax, None);
        assert!(totals.has_tax());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut value = invoice(json!([]));
        value["notes"] = json!("entregar en portería");
        assert!(InvoiceRecord::from_json(&value).is_ok());
    }

    #[test]
    fn test_numeric_id() {
        let mut value = invoice(json!([]));
        value["id"] = json!(990000001);
        assert_eq!(InvoiceRecord::from_json(&value).unwrap().id, "990000001");
    }

    #[test]
    fn test_missing_id() {
        let mut value = invoice(json!([]));
        value.as_object_mut().unwrap().remove("id");
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.id"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_missing_customer() {
        let mut value = invoice(json!([]));
        value.as_object_mut().unwrap().remove("customer");
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.customer"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_missing_country_code() {
        let mut value = invoice(json!([]));
        value["customer"]["address"]
            .as_object_mut()
            .unwrap()
            .remove("countryCode");
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.customer.address.countryCode"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_null_supplier_is_missing() {
        let mut value = invoice(json!([]));
        value["supplier"] = Value::Null;
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.supplier"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_missing_line_quantity() {
        let value = invoice(json!([
            { "qty": { "value": 1, "unitCode": "EA" }, "price": { "amount": 1 } },
            { "price": { "amount": 1 } }
        ]));
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.lines[1].qty"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_missing_price_amount() {
        let value = invoice(json!([{ "qty": { "value": 1, "unitCode": "EA" }, "price": {} }]));
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MissingField { path } => assert_eq!(path, "invoice.lines[0].price.amount"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_malformed_percent() {
        let value = invoice(json!([{
            "qty": { "value": 1, "unitCode": "EA" },
            "price": { "amount": 10 },
            "tax": { "percent": "diecinueve" }
        }]));
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MalformedAmount { path, value } => {
                assert_eq!(path, "invoice.lines[0].tax.percent");
                assert_eq!(value, "diecinueve");
            }
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_sum() {
        let value = invoice(json!([
            line("50000000000000", "1000000000000000"),
            line("50000000000000", "1000000000000000")
        ]));
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::AmountOverflow { path } => assert_eq!(path, "invoice.lines[1]"),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_invalid_issue_date() {
        let mut value = invoice(json!([]));
        value["issueDate"] = json!("02/05/2024");
        match InvoiceRecord::from_json(&value).unwrap_err() {
            Error::MalformedDate { path, value } => {
                assert_eq!(path, "invoice.issueDate");
                assert_eq!(value, "02/05/2024");
            }
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            InvoiceRecord::from_json_str("{ pas du json").unwrap_err(),
            Error::Json(_)
        ));
    }
}
