//! Arbre d'éléments UBL typé.
//!
//! Chaque balise appartient à l'un des quatre espaces de noms du document.
//! Les composants de base (`cbc`) portent du texte et des attributs, les
//! agrégats (`cac`) et la racine portent des enfants, les extensions (`ext`)
//! sont vides : une combinaison invalide ne compile pas.

/// Espaces de noms UBL 2.1 utilisés par la facture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Espace par défaut du document `Invoice`
    Invoice,
    Cbc,
    Cac,
    Ext,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Invoice,
        Namespace::Cbc,
        Namespace::Cac,
        Namespace::Ext,
    ];

    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Invoice => "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2",
            Namespace::Cbc => {
                "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2"
            }
            Namespace::Cac => {
                "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
            }
            Namespace::Ext => {
                "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2"
            }
        }
    }
}

/// Composants de base (`cbc:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cbc {
    CustomizationId,
    ProfileExecutionId,
    Id,
    IssueDate,
    IssueTime,
    InvoiceTypeCode,
    DocumentCurrencyCode,
    Name,
    Department,
    CityName,
    CountrySubentity,
    IdentificationCode,
    TaxAmount,
    TaxableAmount,
    Percent,
    LineExtensionAmount,
    TaxExclusiveAmount,
    TaxInclusiveAmount,
    PayableAmount,
    InvoicedQuantity,
    Description,
    PriceAmount,
    BaseQuantity,
}

impl Cbc {
    pub fn local_name(self) -> &'static str {
        match self {
            Cbc::CustomizationId => "CustomizationID",
            Cbc::ProfileExecutionId => "ProfileExecutionID",
            Cbc::Id => "ID",
            Cbc::IssueDate => "IssueDate",
            Cbc::IssueTime => "IssueTime",
            Cbc::InvoiceTypeCode => "InvoiceTypeCode",
            Cbc::DocumentCurrencyCode => "DocumentCurrencyCode",
            Cbc::Name => "Name",
            Cbc::Department => "Department",
            Cbc::CityName => "CityName",
            Cbc::CountrySubentity => "CountrySubentity",
            Cbc::IdentificationCode => "IdentificationCode",
            Cbc::TaxAmount => "TaxAmount",
            Cbc::TaxableAmount => "TaxableAmount",
            Cbc::Percent => "Percent",
            Cbc::LineExtensionAmount => "LineExtensionAmount",
            Cbc::TaxExclusiveAmount => "TaxExclusiveAmount",
            Cbc::TaxInclusiveAmount => "TaxInclusiveAmount",
            Cbc::PayableAmount => "PayableAmount",
            Cbc::InvoicedQuantity => "InvoicedQuantity",
            Cbc::Description => "Description",
            Cbc::PriceAmount => "PriceAmount",
            Cbc::BaseQuantity => "BaseQuantity",
        }
    }
}

/// Composants agrégés (`cac:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cac {
    AccountingSupplierParty,
    AccountingCustomerParty,
    Party,
    PartyName,
    PartyIdentification,
    PostalAddress,
    Country,
    TaxTotal,
    TaxSubtotal,
    TaxCategory,
    TaxScheme,
    LegalMonetaryTotal,
    InvoiceLine,
    Item,
    SellersItemIdentification,
    Price,
}

impl Cac {
    pub fn local_name(self) -> &'static str {
        match self {
            Cac::AccountingSupplierParty => "AccountingSupplierParty",
            Cac::AccountingCustomerParty => "AccountingCustomerParty",
            Cac::Party => "Party",
            Cac::PartyName => "PartyName",
            Cac::PartyIdentification => "PartyIdentification",
            Cac::PostalAddress => "PostalAddress",
            Cac::Country => "Country",
            Cac::TaxTotal => "TaxTotal",
            Cac::TaxSubtotal => "TaxSubtotal",
            Cac::TaxCategory => "TaxCategory",
            Cac::TaxScheme => "TaxScheme",
            Cac::LegalMonetaryTotal => "LegalMonetaryTotal",
            Cac::InvoiceLine => "InvoiceLine",
            Cac::Item => "Item",
            Cac::SellersItemIdentification => "SellersItemIdentification",
            Cac::Price => "Price",
        }
    }
}

/// Composants d'extension (`ext:`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ext {
    UblExtensions,
}

impl Ext {
    pub fn local_name(self) -> &'static str {
        match self {
            Ext::UblExtensions => "UBLExtensions",
        }
    }
}

/// Balise d'un agrégat : la racine ou un composant `cac`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateTag {
    Invoice,
    Cac(Cac),
}

impl AggregateTag {
    pub fn namespace(self) -> Namespace {
        match self {
            AggregateTag::Invoice => Namespace::Invoice,
            AggregateTag::Cac(_) => Namespace::Cac,
        }
    }

    pub fn local_name(self) -> &'static str {
        match self {
            AggregateTag::Invoice => "Invoice",
            AggregateTag::Cac(tag) => tag.local_name(),
        }
    }
}

/// Élément texte `cbc`, attributs posés après le texte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basic {
    tag: Cbc,
    text: String,
    attributes: Vec<(&'static str, String)>,
}

impl Basic {
    pub fn new(tag: Cbc, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }
}

/// Élément à enfants ordonnés
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    tag: AggregateTag,
    children: Vec<Node>,
}

impl Aggregate {
    pub fn new(tag: Cac) -> Self {
        Self {
            tag: AggregateTag::Cac(tag),
            children: Vec::new(),
        }
    }

    /// Racine `Invoice`
    pub fn invoice() -> Self {
        Self {
            tag: AggregateTag::Invoice,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    pub fn basic(self, tag: Cbc, text: impl Into<String>) -> Self {
        self.child(Basic::new(tag, text))
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn tag(&self) -> AggregateTag {
        self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Premier agrégat enfant de balise `tag`
    pub fn aggregate(&self, tag: Cac) -> Option<&Aggregate> {
        self.aggregates(tag).next()
    }

    pub fn aggregates(&self, tag: Cac) -> impl Iterator<Item = &Aggregate> + '_ {
        self.children.iter().filter_map(move |node| match node {
            Node::Aggregate(a) if a.tag == AggregateTag::Cac(tag) => Some(a),
            _ => None,
        })
    }

    /// Premier élément texte enfant de balise `tag`
    pub fn basic_child(&self, tag: Cbc) -> Option<&Basic> {
        self.children.iter().find_map(|node| match node {
            Node::Basic(b) if b.tag == tag => Some(b),
            _ => None,
        })
    }

    /// Structure de l'arbre sans les valeurs
    pub fn shape(&self) -> Shape {
        Shape {
            name: self.tag.local_name(),
            attributes: Vec::new(),
            children: self.children.iter().map(Node::shape).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Aggregate(Aggregate),
    Basic(Basic),
    Extension(Ext),
}

impl Node {
    pub fn local_name(&self) -> &'static str {
        match self {
            Node::Aggregate(a) => a.tag.local_name(),
            Node::Basic(b) => b.tag.local_name(),
            Node::Extension(e) => e.local_name(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self {
            Node::Aggregate(a) => a.tag.namespace(),
            Node::Basic(_) => Namespace::Cbc,
            Node::Extension(_) => Namespace::Ext,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Node::Aggregate(a) => a.shape(),
            Node::Basic(b) => Shape {
                name: b.tag.local_name(),
                attributes: b.attributes.iter().map(|(n, _)| *n).collect(),
                children: Vec::new(),
            },
            Node::Extension(e) => Shape {
                name: e.local_name(),
                attributes: Vec::new(),
                children: Vec::new(),
            },
        }
    }
}

impl From<Aggregate> for Node {
    fn from(value: Aggregate) -> Self {
        Node::Aggregate(value)
    }
}

impl From<Basic> for Node {
    fn from(value: Basic) -> Self {
        Node::Basic(value)
    }
}

impl From<Ext> for Node {
    fn from(value: Ext) -> Self {
        Node::Extension(value)
    }
}

/// Forme d'un sous-arbre : balises, noms d'attributs et ordre des enfants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub attributes: Vec<&'static str>,
    pub children: Vec<Shape>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let price = Aggregate::new(Cac::Price)
            .basic(Cbc::PriceAmount, "10.01")
            .child(Basic::new(Cbc::BaseQuantity, "12").attr("unitCode", "EA"));

        let names: Vec<_> = price.children().iter().map(Node::local_name).collect();
        assert_eq!(names, vec!["PriceAmount", "BaseQuantity"]);
        assert_eq!(
            price.basic_child(Cbc::BaseQuantity).unwrap().attribute("unitCode"),
            Some("EA")
        );
    }

    #[test]
    fn test_shape_ignores_values() {
        let a = Aggregate::new(Cac::PartyIdentification)
            .child(Basic::new(Cbc::Id, "900123456").attr("schemeID", "31"));
        let b = Aggregate::new(Cac::PartyIdentification)
            .child(Basic::new(Cbc::Id, "1020304050").attr("schemeID", "13"));
        assert_eq!(a.shape(), b.shape());
        assert_ne!(a, b);
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(Node::from(Ext::UblExtensions).namespace(), Namespace::Ext);
        assert_eq!(Node::from(Aggregate::invoice()).namespace(), Namespace::Invoice);
        assert_eq!(Node::from(Basic::new(Cbc::Id, "1")).namespace(), Namespace::Cbc);
        assert!(Namespace::Invoice.uri().ends_with(":Invoice-2"));
    }
}
