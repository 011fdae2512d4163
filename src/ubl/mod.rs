//! Module de génération UBL 2.1
//!
//! Ce module fournit la génération de factures électroniques UBL 2.1
//! (profil Colombie, sans signature numérique) avec :
//! - un arbre d'éléments typé par espace de noms
//! - l'arrondi monétaire décimal
//! - la sérialisation XML indentée

pub mod element;
pub mod money;
pub mod serialize;
mod xml_generator;

pub use serialize::NamespaceTable;
pub use xml_generator::{build, build_tree, generate, generate_to_file, version, write_document, VERSION};
