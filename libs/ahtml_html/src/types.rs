//! Serializable element descriptions, as found in the JSON files that
//! can extend the built-in database (see `meta::read_meta_db`).

//! The attribute typing follows the html / html-sys crates,
//! <https://github.com/yoshuawuyts/html>

use kstring::KString;
use serde::{Deserialize, Serialize};

/// An attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: KString,
    #[serde(default)]
    pub description: KString,
    pub ty: AttributeType,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Bool,
    KString,
    Integer,
    Float,
    Identifier(KString),
    Enumerable(Vec<KString>),
}

fn default_true() -> bool {
    true
}

/// One element as given in a JSON extension file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag_name: KString,
    #[serde(default = "default_true")]
    pub has_global_attributes: bool,
    #[serde(default = "default_true")]
    pub has_closing_tag: bool,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}
