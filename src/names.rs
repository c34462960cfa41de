//! Mapping between prop names as used in Rust code ("internal") and
//! as HTML attribute names ("external").
//!
//! A leading `_` is dropped in the external form (`_type` is `type`),
//! `__` becomes `:` and `_` becomes `-`.

use kstring::KString;
use crate::error::{StructuralError, StructuralErrorKind};

/// Rust keywords, strict and reserved. An external name that maps to
/// one of these gets a leading underscore internally.
const KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break",
    "const", "continue", "crate", "do", "dyn", "else", "enum", "extern",
    "false", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

/// Prefixes of undeclared names that are accepted anyway, as text.
pub const PASS_THROUGH_PREFIXES: &[&str] = &["data_", "aria_"];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.binary_search(&name).is_ok()
}

pub fn is_identifier(name: &str) -> bool {
    let mut cs = name.chars();
    match cs.next() {
        Some(c) if c.is_alphabetic() || c == '_' =>
            cs.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false
    }
}

pub fn is_pass_through(internal_name: &str) -> bool {
    PASS_THROUGH_PREFIXES.iter().any(|p| internal_name.starts_with(p))
}

pub fn to_html(name: &str) -> KString {
    let name = name.strip_prefix('_').unwrap_or(name);
    if !name.contains('_') {
        return KString::from_ref(name)
    }
    KString::from_string(name.replace("__", ":").replace('_', "-"))
}

/// Accepts both forms; fails if the result is not an identifier.
pub fn to_internal(name: &str) -> Result<KString, StructuralError> {
    let s = if name.contains(&['-', ':'][..]) {
        name.replace('-', "_").replace(':', "__")
    } else {
        name.to_string()
    };
    if !is_identifier(&s) {
        return Err(StructuralErrorKind::InvalidName { name: name.into() }.into())
    }
    if is_keyword(&s) {
        Ok(KString::from_string(format!("_{s}")))
    } else {
        Ok(KString::from_string(s))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_keywords_sorted() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort();
        assert_eq!(sorted, KEYWORDS);
    }

    #[test]
    fn t_to_html() {
        assert_eq!(to_html("_type").as_str(), "type");
        assert_eq!(to_html("foo_bar").as_str(), "foo-bar");
        assert_eq!(to_html("xml__lang").as_str(), "xml:lang");
        assert_eq!(to_html("data_todo_id").as_str(), "data-todo-id");
        assert_eq!(to_html("id").as_str(), "id");
    }

    #[test]
    fn t_to_internal() {
        let internal = |s: &str| to_internal(s).unwrap().as_str().to_string();
        assert_eq!(internal("type"), "_type");
        assert_eq!(internal("foo-bar"), "foo_bar");
        assert_eq!(internal("xml:lang"), "xml__lang");
        assert_eq!(internal("foo_bar"), "foo_bar");
        assert_eq!(internal("_for"), "_for");
        assert!(to_internal("").is_err());
        assert!(to_internal("1st").is_err());
        assert!(matches!(to_internal("a b").unwrap_err().kind(),
                         StructuralErrorKind::InvalidName { .. }));
    }

    #[test]
    fn t_round_trip() {
        for name in ["href", "foo_bar", "xml__lang", "data_x1", "_type", "_for",
                     "a__b_c", "foo___bar", "aria_label", "x2"] {
            assert_eq!(to_internal(&to_html(name)).unwrap().as_str(), name, "{name}");
        }
    }

    #[test]
    fn t_pass_through() {
        assert!(is_pass_through("data_id"));
        assert!(is_pass_through("aria_hidden"));
        assert!(!is_pass_through("data"));
        assert!(!is_pass_through("metadata_x"));
    }
}
