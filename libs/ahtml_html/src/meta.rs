//! Indexed element and attribute data, used to derive the prop types
//! of HTML tag components and to serialize them.

use std::{collections::{HashMap, HashSet}, path::Path};
use anyhow::{anyhow, Result, Context};
use kstring::KString;
use crate::{types::{AttributeType, ElementSpec}, myfrom::MyFrom,
            env::{get_env_bool, opt_get_env}};

// =============================================================================
// Attributes database

// https://developer.mozilla.org/en-US/docs/Web/HTML/Global_attributes
// Global attributes are attributes common to all HTML elements; they can be used on all elements, though they may have no effect on some elements.
// data-* and aria-* are handled as pass-through prefixes by the prop
// types, not listed here.

const GLOBAL_ATTRIBUTE_NAMES: &[&str] = &[
    "accesskey",
    "autocapitalize",
    "autofocus",
    "class",
    "contenteditable",
    "dir",
    "draggable",
    "enterkeyhint",
    "exportparts", // Experimental
    "hidden",
    "id",
    "inert",
    "inputmode",
    "is",
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "nonce",
    "part",
    "popover",
    "role",
    "slot",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
    "virtualkeyboardpolicy",
];

// Subset of the above that are boolean attributes.
const GLOBAL_BOOL_ATTRIBUTE_NAMES: &[&str] = &[
    "autofocus", "hidden", "inert", "itemscope",
];

const EVENT_HANDLER_ATTRIBUTE_NAMES: &[&str] = &[
    "onabort", "onautocomplete", "onautocompleteerror", "onblur", "oncancel", "oncanplay", "oncanplaythrough", "onchange", "onclick", "onclose", "oncontextmenu", "oncuechange", "ondblclick", "ondrag", "ondragend", "ondragenter", "ondragleave", "ondragover", "ondragstart", "ondrop", "ondurationchange", "onemptied", "onended", "onerror", "onfocus", "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onload", "onloadeddata", "onloadedmetadata", "onloadstart", "onmousedown", "onmouseenter", "onmouseleave", "onmousemove", "onmouseout", "onmouseover", "onmouseup", "onmousewheel", "onpause", "onplay", "onplaying", "onprogress", "onratechange", "onreset", "onresize", "onscroll", "onseeked", "onseeking", "onselect", "onshow", "onsort", "onstalled", "onsubmit", "onsuspend", "ontimeupdate", "ontoggle", "onvolumechange", "onwaiting"
];

// =============================================================================
// Built-in element table

// Kept in static syntax so that it lives in the binary; converted to
// the indexed (HashMap based) representation via MyFrom at start.

enum StaticAttributeType<'t> {
    Bool,
    KString,
    Integer,
    Float,
    Identifier(&'t str),
    Enumerable(&'t [&'t str]),
}

struct StaticElementMeta<'t> {
    tag_name: &'t str,
    has_closing_tag: bool,
    attributes: &'t [(&'t str, StaticAttributeType<'t>)],
}

use StaticAttributeType::{Bool, Integer, Float, Identifier, Enumerable};
use StaticAttributeType::KString as Text;

const fn elt<'t>(
    tag_name: &'t str,
    attributes: &'t [(&'t str, StaticAttributeType<'t>)]
) -> StaticElementMeta<'t> {
    StaticElementMeta { tag_name, has_closing_tag: true, attributes }
}

const fn void<'t>(
    tag_name: &'t str,
    attributes: &'t [(&'t str, StaticAttributeType<'t>)]
) -> StaticElementMeta<'t> {
    StaticElementMeta { tag_name, has_closing_tag: false, attributes }
}

const INPUT_TYPES: &[&str] = &[
    "text", "button", "checkbox", "color", "date", "datetime-local", "email",
    "file", "hidden", "image", "month", "number", "password", "radio", "range",
    "reset", "search", "submit", "tel", "time", "url", "week",
];

const CELL_ATTRIBUTES: &[(&str, StaticAttributeType)] = &[
    ("colspan", Integer), ("rowspan", Integer), ("headers", Text),
];

const STATIC_ELEMENTS: &[StaticElementMeta] = &[
    elt("html", &[("xmlns", Text)]),
    elt("head", &[]),
    elt("title", &[]),
    void("meta", &[("charset", Text), ("name", Text), ("content", Text),
                   ("http-equiv", Text)]),
    void("link", &[("rel", Text), ("href", Text), ("type", Text), ("media", Text),
                   ("sizes", Text), ("crossorigin", Enumerable(&["anonymous", "use-credentials"]))]),
    elt("style", &[("type", Text), ("media", Text)]),
    elt("script", &[("src", Text), ("type", Text), ("async", Bool), ("defer", Bool),
                    ("integrity", Text), ("nomodule", Bool)]),
    elt("noscript", &[]),
    elt("body", &[]),
    elt("header", &[]),
    elt("footer", &[]),
    elt("main", &[]),
    elt("nav", &[]),
    elt("section", &[]),
    elt("article", &[]),
    elt("aside", &[]),
    elt("div", &[]),
    elt("span", &[]),
    elt("p", &[]),
    elt("pre", &[]),
    elt("code", &[]),
    elt("em", &[]),
    elt("strong", &[]),
    elt("small", &[]),
    elt("blockquote", &[("cite", Text)]),
    elt("h1", &[]),
    elt("h2", &[]),
    elt("h3", &[]),
    elt("h4", &[]),
    elt("h5", &[]),
    elt("h6", &[]),
    elt("a", &[("href", Text), ("target", Text), ("rel", Text), ("download", Text),
               ("hreflang", Text), ("type", Text)]),
    elt("ul", &[]),
    elt("ol", &[("reversed", Bool), ("start", Integer),
                ("type", Enumerable(&["1", "a", "A", "i", "I"]))]),
    elt("li", &[("value", Integer)]),
    elt("dl", &[]),
    elt("dt", &[]),
    elt("dd", &[]),
    void("br", &[]),
    void("hr", &[]),
    void("img", &[("src", Text), ("alt", Text), ("width", Integer), ("height", Integer),
                  ("srcset", Text), ("sizes", Text),
                  ("loading", Enumerable(&["eager", "lazy"]))]),
    elt("form", &[("action", Text), ("method", Enumerable(&["get", "post", "dialog"])),
                  ("enctype", Text), ("target", Text), ("novalidate", Bool),
                  ("autocomplete", Enumerable(&["on", "off"]))]),
    elt("label", &[("for", Identifier("id"))]),
    void("input", &[("type", Enumerable(INPUT_TYPES)), ("name", Text), ("value", Text),
                    ("checked", Bool), ("disabled", Bool), ("readonly", Bool),
                    ("required", Bool), ("multiple", Bool), ("placeholder", Text),
                    ("autocomplete", Text), ("min", Text), ("max", Text),
                    ("step", Float), ("size", Integer), ("maxlength", Integer),
                    ("pattern", Text), ("form", Identifier("id"))]),
    elt("button", &[("type", Enumerable(&["submit", "reset", "button"])),
                    ("name", Text), ("value", Text), ("disabled", Bool),
                    ("form", Identifier("id"))]),
    elt("textarea", &[("name", Text), ("rows", Integer), ("cols", Integer),
                      ("disabled", Bool), ("readonly", Bool), ("required", Bool),
                      ("placeholder", Text), ("maxlength", Integer)]),
    elt("select", &[("name", Text), ("multiple", Bool), ("disabled", Bool),
                    ("required", Bool), ("size", Integer)]),
    elt("option", &[("value", Text), ("selected", Bool), ("disabled", Bool),
                    ("label", Text)]),
    elt("table", &[]),
    elt("caption", &[]),
    elt("thead", &[]),
    elt("tbody", &[]),
    elt("tfoot", &[]),
    elt("tr", &[]),
    elt("th", CELL_ATTRIBUTES),
    elt("td", CELL_ATTRIBUTES),
];

// =============================================================================
// Indexed representation

#[derive(Debug)]
pub struct Attribute {
    // pub name: KString, -- already known as key in HashMap
    pub description: KString,
    pub ty: AttributeType,
}

#[derive(Debug)]
pub struct ElementMeta {
    pub tag_name: KString,
    pub has_global_attributes: bool,
    pub has_closing_tag: bool,
    pub attributes: HashMap<KString, Attribute>,
}

impl PartialEq for ElementMeta {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.tag_name == other.tag_name
    }
}

impl Eq for ElementMeta {}

impl ElementMeta {
    /// Attribute names sorted, for stable iteration.
    pub fn attribute_names(&self) -> Vec<&KString> {
        let mut names: Vec<&KString> = self.attributes.keys().collect();
        names.sort();
        names
    }
}

impl<'t> MyFrom<&StaticAttributeType<'t>> for AttributeType {
    fn myfrom(s: &StaticAttributeType<'t>) -> Self {
        match s {
            StaticAttributeType::Bool => AttributeType::Bool,
            StaticAttributeType::KString => AttributeType::KString,
            StaticAttributeType::Integer => AttributeType::Integer,
            StaticAttributeType::Float => AttributeType::Float,
            StaticAttributeType::Identifier(v) =>
                AttributeType::Identifier(KString::from_ref(v)),
            StaticAttributeType::Enumerable(vs) =>
                AttributeType::Enumerable(vs.iter().map(KString::myfrom).collect()),
        }
    }
}

impl<'t> MyFrom<&StaticElementMeta<'t>> for ElementMeta {
    fn myfrom(s: &StaticElementMeta<'t>) -> Self {
        ElementMeta {
            tag_name: KString::from_ref(s.tag_name),
            has_global_attributes: true,
            has_closing_tag: s.has_closing_tag,
            attributes: s.attributes.iter().map(|(name, ty)| {
                (KString::from_ref(name),
                 Attribute { description: KString::from_static(""),
                             ty: AttributeType::myfrom(ty) })
            }).collect(),
        }
    }
}

impl MyFrom<ElementSpec> for ElementMeta {
    fn myfrom(s: ElementSpec) -> Self {
        ElementMeta {
            tag_name: s.tag_name,
            has_global_attributes: s.has_global_attributes,
            has_closing_tag: s.has_closing_tag,
            attributes: s.attributes.into_iter().map(|att| {
                (att.name, Attribute { description: att.description, ty: att.ty })
            }).collect(),
        }
    }
}

#[derive(Debug)]
pub struct MetaDb {
    /// Global and event handler attributes, valid on all elements
    /// with `has_global_attributes`.
    pub global_attributes: HashMap<KString, AttributeType>,
    pub elementmeta: HashMap<KString, ElementMeta>,
}

impl MetaDb {
    pub fn builtin() -> MetaDb {
        let bools: HashSet<&str> = GLOBAL_BOOL_ATTRIBUTE_NAMES.iter().copied().collect();
        let mut global_attributes = HashMap::new();
        for n in GLOBAL_ATTRIBUTE_NAMES {
            let ty = if bools.contains(n) { AttributeType::Bool } else { AttributeType::KString };
            global_attributes.insert(KString::from_static(*n), ty);
        }
        for n in EVENT_HANDLER_ATTRIBUTE_NAMES {
            global_attributes.insert(KString::from_static(*n), AttributeType::KString);
        }
        MetaDb {
            global_attributes,
            elementmeta: STATIC_ELEMENTS.iter().map(|s| {
                (KString::from_ref(s.tag_name), ElementMeta::myfrom(s))
            }).collect()
        }
    }

    pub fn element(&self, tag_name: &str) -> Option<&ElementMeta> {
        self.elementmeta.get(tag_name)
    }

    /// Add or replace elements from a JSON array of `ElementSpec`s.
    /// Returns the number of elements read.
    pub fn extend_from_json_str(&mut self, json: &str) -> Result<usize> {
        let specs: Vec<ElementSpec> = serde_json::from_str(json)?;
        let n = specs.len();
        for spec in specs {
            if spec.tag_name.is_empty() {
                anyhow::bail!("element spec with empty tag_name")
            }
            let meta = ElementMeta::myfrom(spec);
            self.elementmeta.insert(meta.tag_name.clone(), meta);
        }
        Ok(n)
    }

    pub fn extend_from_json_path(&mut self, path: &Path) -> Result<usize> {
        (|| -> Result<usize> {
            let s = std::fs::read_to_string(path)?;
            self.extend_from_json_str(&s)
        })().with_context(|| anyhow!("reading element specs from {path:?}"))
    }
}

pub fn read_meta_db() -> Result<MetaDb> {
    let debug = get_env_bool("HTML_META_DEBUG")?;
    let mut metadb = MetaDb::builtin();
    if let Some(path) = opt_get_env::<String>("HTML_META_DB_JSON_PATH")? {
        let n = metadb.extend_from_json_path(Path::new(&path))?;
        if debug { eprintln!("meta db: built-in plus {n} element(s) from {path:?}") };
    } else {
        if debug { eprintln!("meta db: built-in only") };
    }
    Ok(metadb)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_builtin() {
        let db = MetaDb::builtin();
        let ul = db.element("ul").unwrap();
        assert!(ul.has_closing_tag);
        let input = db.element("input").unwrap();
        assert!(!input.has_closing_tag);
        assert_eq!(input.attributes.get("checked").unwrap().ty, AttributeType::Bool);
        assert!(matches!(input.attributes.get("type").unwrap().ty,
                         AttributeType::Enumerable(_)));
        assert_eq!(db.global_attributes.get("hidden"), Some(&AttributeType::Bool));
        assert_eq!(db.global_attributes.get("class"), Some(&AttributeType::KString));
        assert_eq!(db.global_attributes.get("onclick"), Some(&AttributeType::KString));
        assert!(db.element("blink").is_none());
    }

    #[test]
    fn t_no_duplicate_tags() {
        let db = MetaDb::builtin();
        assert_eq!(db.elementmeta.len(), STATIC_ELEMENTS.len());
    }

    #[test]
    fn t_extend_from_json() -> Result<()> {
        let mut db = MetaDb::builtin();
        let n = db.extend_from_json_str(r#"[
            {"tag_name": "todo-item",
             "attributes": [{"name": "done", "ty": "Bool"},
                            {"name": "priority",
                             "ty": {"Enumerable": ["low", "high"]}}]},
            {"tag_name": "spacer", "has_closing_tag": false}
        ]"#)?;
        assert_eq!(n, 2);
        let item = db.element("todo-item").unwrap();
        assert!(item.has_closing_tag);
        assert!(item.has_global_attributes);
        assert_eq!(item.attribute_names().iter().map(|n| n.as_str()).collect::<Vec<_>>(),
                   vec!["done", "priority"]);
        assert!(!db.element("spacer").unwrap().has_closing_tag);
        assert!(db.extend_from_json_str(r#"[{"tag_name": ""}]"#).is_err());
        assert!(db.extend_from_json_str(r#"{"tag_name": "x"}"#).is_err());
        let e = db.extend_from_json_path(Path::new("/nonexistent/elements.json")).unwrap_err();
        assert!(e.to_string().contains("/nonexistent/elements.json"));
        Ok(())
    }
}
