//! Sérialisation de l'arbre UBL en XML indenté.
//!
//! Les préfixes sont fournis par une table explicite passée à l'appel ;
//! aucun enregistrement global d'espace de noms.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::element::{Aggregate, Namespace, Node};
use crate::models::error::Result;

/// Indentation du document produit
pub const INDENT: usize = 2;

/// Préfixes des espaces de noms ; la racine utilise l'espace par défaut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    cbc: &'static str,
    cac: &'static str,
    ext: &'static str,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::ubl_invoice()
    }
}

impl NamespaceTable {
    /// Préfixes conventionnels UBL 2.1
    pub fn ubl_invoice() -> Self {
        Self {
            cbc: "cbc",
            cac: "cac",
            ext: "ext",
        }
    }

    /// Préfixe d'un espace de noms, `None` pour l'espace par défaut
    pub fn prefix(&self, namespace: Namespace) -> Option<&'static str> {
        match namespace {
            Namespace::Invoice => None,
            Namespace::Cbc => Some(self.cbc),
            Namespace::Cac => Some(self.cac),
            Namespace::Ext => Some(self.ext),
        }
    }

    pub fn qualified_name(&self, namespace: Namespace, local_name: &str) -> String {
        match self.prefix(namespace) {
            Some(prefix) => format!("{prefix}:{local_name}"),
            None => local_name.to_string(),
        }
    }

    /// Attributs `xmlns` déclarés sur la racine, dans l'ordre de la table
    pub fn declarations(&self) -> Vec<(String, &'static str)> {
        Namespace::ALL
            .iter()
            .map(|&ns| {
                let name = match self.prefix(ns) {
                    Some(prefix) => format!("xmlns:{prefix}"),
                    None => "xmlns".to_string(),
                };
                (name, ns.uri())
            })
            .collect()
    }
}

/// Sérialise `root` avec déclaration XML, en UTF-8 indenté de 2 espaces
pub fn to_xml_string(root: &Aggregate, table: &NamespaceTable) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let name = table.qualified_name(root.tag().namespace(), root.tag().local_name());
    let mut start = BytesStart::new(name.as_str());
    for (attr, uri) in table.declarations() {
        start.push_attribute((attr.as_str(), uri));
    }
    write_children(&mut writer, start, &name, root.children(), table)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

fn write_children<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    name: &str,
    children: &[Node],
    table: &NamespaceTable,
) -> Result<()> {
    if children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in children {
        write_node(writer, child, table)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node, table: &NamespaceTable) -> Result<()> {
    let name = table.qualified_name(node.namespace(), node.local_name());
    let mut start = BytesStart::new(name.as_str());

    match node {
        Node::Aggregate(aggregate) => {
            write_children(writer, start, &name, aggregate.children(), table)?;
        }
        Node::Basic(basic) => {
            for (attr, value) in basic.attributes() {
                start.push_attribute((*attr, value.as_str()));
            }
            if basic.text().is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(basic.text())))?;
                writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
        Node::Extension(_) => {
            writer.write_event(Event::Empty(start))?;
        }
    }
    Ok(())
}
