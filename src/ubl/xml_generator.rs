//! Générateur XML UBL 2.1 (facture, profil Colombie)
//!
//! Construit l'arbre du document à partir d'une facture validée puis le
//! sérialise. Les montants sont agrégés en précision complète et arrondis
//! uniquement au moment de leur émission.

use rust_decimal::Decimal;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::element::{Aggregate, Basic, Cac, Cbc, Ext};
use super::money::{money, round_fixed, MONEY_DECIMALS};
use super::serialize::{to_xml_string, NamespaceTable};
use crate::models::error::Result;
use crate::models::invoice::{InvoiceRecord, Totals};
use crate::models::line::{InvoiceLine, LineAmounts, LineTax};
use crate::models::party::Party;

/// Version du générateur, hors contenu du document
pub const VERSION: &str = "fel-test-0.1.0";

pub const CUSTOMIZATION_ID: &str = "2.1:CO";
/// 1 = pruebas, 2 = producción
pub const PROFILE_EXECUTION_ID: &str = "2";

/// Schéma fiscal du récapitulatif global (IVA)
const DOCUMENT_TAX_SCHEME_ID: &str = "01";
const DOCUMENT_TAX_SCHEME_NAME: &str = "IVA";

pub fn version() -> &'static str {
    VERSION
}

/// Génère le XML UBL d'une facture validée.
///
/// Les montants sont recalculés avec contrôle de capacité : un enregistrement
/// construit sans passer par `InvoiceRecord::from_json` ne peut pas faire paniquer.
pub fn build(record: &InvoiceRecord) -> Result<String> {
    let totals = record.totals()?;
    tracing::debug!(
        invoice = %record.id,
        lines = record.lines.len(),
        subtotal = %totals.subtotal,
        tax_total = %totals.tax_total,
        grand_total = %totals.grand_total,
        "totaux calculés"
    );

    let root = build_tree(record, &totals);
    to_xml_string(&root, &NamespaceTable::ubl_invoice())
}

/// Décode puis génère ; aucune sortie partielle en cas d'erreur
pub fn generate(invoice: &Value) -> Result<String> {
    let record = InvoiceRecord::from_json(invoice)?;
    build(&record)
}

/// Génère le XML et l'écrit dans `path`.
///
/// Le fichier n'est ouvert qu'une fois le document construit : une facture
/// invalide ne crée ni ne modifie la cible.
pub fn generate_to_file(invoice: &Value, path: impl AsRef<Path>) -> Result<PathBuf> {
    let xml = generate(invoice)?;
    write_document(&xml, path)
}

/// Écrit un document déjà généré ; le fichier est vidé et fermé avant le retour
pub fn write_document(xml: &str, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(xml.as_bytes())?;
    out.flush()?;

    tracing::info!(path = %path.display(), bytes = xml.len(), "facture UBL écrite");
    Ok(path.to_path_buf())
}

/// Arbre complet du document ; `totals` vient de `InvoiceRecord::totals`
pub fn build_tree(record: &InvoiceRecord, totals: &Totals) -> Aggregate {
    let mut root = Aggregate::invoice()
        .child(Ext::UblExtensions)
        .basic(Cbc::CustomizationId, CUSTOMIZATION_ID)
        .basic(Cbc::ProfileExecutionId, PROFILE_EXECUTION_ID)
        .basic(Cbc::Id, record.id.as_str())
        .basic(Cbc::IssueDate, record.issue_date.as_str());

    if let Some(ref issue_time) = record.issue_time {
        root.push(Basic::new(Cbc::IssueTime, issue_time.as_str()));
    }

    root = root
        .basic(Cbc::InvoiceTypeCode, record.invoice_type_code.as_str())
        .basic(Cbc::DocumentCurrencyCode, record.currency.as_str())
        .child(Aggregate::new(Cac::AccountingSupplierParty).child(party_xml(&record.supplier)))
        .child(Aggregate::new(Cac::AccountingCustomerParty).child(party_xml(&record.customer)));

    if totals.has_tax() {
        root.push(document_tax_total_xml(totals));
    }

    root.push(monetary_total_xml(totals));

    for (index, (line, amounts)) in record.lines.iter().zip(&totals.lines).enumerate() {
        root.push(line_xml(line, amounts, index + 1));
    }

    root
}

/// Bloc `cac:Party`, identique pour l'émetteur et l'acquéreur
fn party_xml(party: &Party) -> Aggregate {
    let address = &party.address;

    Aggregate::new(Cac::Party)
        .child(Aggregate::new(Cac::PartyName).basic(Cbc::Name, party.registration_name.as_str()))
        .child(
            Aggregate::new(Cac::PartyIdentification).child(
                Basic::new(Cbc::Id, party.company_id.value.as_str())
                    .attr("schemeID", party.company_id.scheme_id.as_str()),
            ),
        )
        .child(
            Aggregate::new(Cac::PostalAddress)
                .basic(Cbc::Department, address.department.as_str())
                .basic(Cbc::CityName, address.city.as_str())
                .basic(Cbc::CountrySubentity, address.department.as_str())
                .child(
                    Aggregate::new(Cac::Country)
                        .basic(Cbc::IdentificationCode, address.country_code.as_str()),
                ),
        )
}

/// Récapitulatif fiscal global, émis seulement si l'impôt total est positif
fn document_tax_total_xml(totals: &Totals) -> Aggregate {
    Aggregate::new(Cac::TaxTotal)
        .basic(Cbc::TaxAmount, money(totals.tax_total))
        .child(
            Aggregate::new(Cac::TaxSubtotal)
                .basic(Cbc::TaxableAmount, money(totals.subtotal))
                .basic(Cbc::TaxAmount, money(totals.tax_total))
                .child(
                    Aggregate::new(Cac::TaxCategory).child(
                        Aggregate::new(Cac::TaxScheme)
                            .basic(Cbc::Id, DOCUMENT_TAX_SCHEME_ID)
                            .basic(Cbc::Name, DOCUMENT_TAX_SCHEME_NAME),
                    ),
                ),
        )
}

fn monetary_total_xml(totals: &Totals) -> Aggregate {
    Aggregate::new(Cac::LegalMonetaryTotal)
        .basic(Cbc::LineExtensionAmount, money(totals.subtotal))
        .basic(Cbc::TaxExclusiveAmount, money(totals.subtotal))
        .basic(Cbc::TaxInclusiveAmount, money(totals.grand_total))
        .basic(Cbc::PayableAmount, money(totals.grand_total))
}

/// Ligne : id, quantité, montant HT, [impôt], article, prix
fn line_xml(line: &InvoiceLine, amounts: &LineAmounts, position: usize) -> Aggregate {
    let base = amounts.base;

    let mut xml = Aggregate::new(Cac::InvoiceLine)
        .basic(Cbc::Id, line.sequence_id(position))
        .child(
            Basic::new(Cbc::InvoicedQuantity, line.quantity.value.as_str())
                .attr("unitCode", line.quantity.unit_code.as_str()),
        )
        .basic(Cbc::LineExtensionAmount, money(base));

    if let (Some(line_tax), Some(tax)) = (amounts.tax, line.tax.as_ref()) {
        xml.push(line_tax_total_xml(tax, base, line_tax));
    }

    let mut price = Aggregate::new(Cac::Price).basic(Cbc::PriceAmount, money(line.price.amount.value()));
    if let Some(ref base_quantity) = line.price.base_quantity {
        price.push(
            Basic::new(Cbc::BaseQuantity, base_quantity.value.as_str())
                .attr("unitCode", base_quantity.unit_code.as_str()),
        );
    }

    xml.child(
        Aggregate::new(Cac::Item)
            .basic(Cbc::Description, line.description.as_str())
            .child(
                Aggregate::new(Cac::SellersItemIdentification)
                    .basic(Cbc::Id, line.item_code.as_str()),
            ),
    )
    .child(price)
}

fn line_tax_total_xml(tax: &LineTax, base: Decimal, line_tax: Decimal) -> Aggregate {
    Aggregate::new(Cac::TaxTotal)
        .basic(Cbc::TaxAmount, money(line_tax))
        .child(
            Aggregate::new(Cac::TaxSubtotal)
                .basic(Cbc::TaxableAmount, money(base))
                .basic(Cbc::TaxAmount, money(line_tax))
                .child(
                    Aggregate::new(Cac::TaxCategory)
                        .basic(
                            Cbc::Percent,
                            round_fixed(tax.percent.value(), MONEY_DECIMALS).to_string(),
                        )
                        .child(
                            Aggregate::new(Cac::TaxScheme)
                                .basic(Cbc::Id, tax.scheme_id.as_str())
                                .basic(Cbc::Name, tax.name.as_str()),
                        ),
                ),
        )
}
