//! Components for the HTML elements known to the meta db.
//!
//! The prop types of a tag are derived from its attributes (plus the
//! global ones); stored props are printed as attributes, in the order
//! they were first set.

use std::{collections::HashMap, sync::{Arc, Mutex}};
use anyhow::{anyhow, bail, Result};
use kstring::KString;
use lazy_static::lazy_static;
use ahtml_html::{meta::ElementMeta,
                 print::{push_end_tag, push_start_tag, AttValue},
                 metadb,
                 types::AttributeType};
use crate::{class::ComponentClass,
            component::{Acc, Base, Component, Walk},
            context::Context,
            names::to_html,
            proptype::PropType,
            value::Value};

pub use crate::node::raw;

pub fn prop_type(ty: &AttributeType) -> PropType {
    match ty {
        AttributeType::Bool => PropType::Bool,
        AttributeType::Enumerable(vs) =>
            PropType::choices(vs.iter().map(Value::from).collect::<Vec<Value>>()),
        AttributeType::Integer => PropType::union([PropType::Int, PropType::Str]),
        AttributeType::Float => PropType::union([PropType::Float, PropType::Int, PropType::Str]),
        AttributeType::KString | AttributeType::Identifier(_) => PropType::Str,
    }
}

/// `class` also takes a list of names.
fn attribute_prop_type(name: &str, ty: &AttributeType) -> PropType {
    if name == "class" {
        PropType::union([PropType::Str, PropType::list(PropType::Str)])
    } else {
        prop_type(ty)
    }
}

fn define_tag_class(meta: &ElementMeta) -> Result<Arc<ComponentClass>> {
    let mut builder = ComponentClass::builder(&meta.tag_name);
    if meta.has_global_attributes {
        let mut names: Vec<_> = metadb()?.global_attributes.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (name, ty) in names {
            builder = builder.prop(name, attribute_prop_type(name, ty));
        }
    }
    for name in meta.attribute_names() {
        builder = builder.prop(name, attribute_prop_type(name, &meta.attributes[name].ty));
    }
    Ok(builder.define()?)
}

lazy_static! {
    static ref TAG_CLASSES: Mutex<HashMap<KString, Arc<ComponentClass>>> =
        Mutex::new(HashMap::new());
}

/// The component class for `tag_name`, created on first use.
pub fn tag_class(tag_name: &str) -> Result<(Arc<ComponentClass>, &'static ElementMeta)> {
    let meta = metadb()?.element(tag_name).ok_or_else(
        || anyhow!("unknown HTML element {tag_name:?}"))?;
    let mut classes = TAG_CLASSES.lock().map_err(|_| anyhow!("tag class cache poisoned"))?;
    if let Some(class) = classes.get(tag_name) {
        return Ok((class.clone(), meta))
    }
    let class = define_tag_class(meta)?;
    classes.insert(meta.tag_name.clone(), class.clone());
    Ok((class, meta))
}

/// An HTML element.
#[derive(Debug, Clone)]
pub struct Tag {
    base: Base,
    meta: &'static ElementMeta,
}

impl Tag {
    pub fn new(tag_name: &str) -> Result<Tag> {
        let (class, meta) = tag_class(tag_name)?;
        Ok(Tag { base: Base::new(&class), meta })
    }

    pub fn meta(&self) -> &'static ElementMeta {
        self.meta
    }

    /// The stored props as attributes: `true` gives the bare name,
    /// `false` and `None` nothing, lists their items separated by
    /// spaces.
    pub fn attributes(&self) -> Result<Vec<(KString, Option<String>)>> {
        let mut atts = Vec::new();
        for (name, value) in self.base.props() {
            let value = match value {
                Value::None | Value::Bool(false) => continue,
                Value::Bool(true) => None,
                Value::Str(s) => Some(s.to_string()),
                Value::Int(_) | Value::Float(_) => Some(value.to_string()),
                Value::List(vs) => Some(vs.iter().map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string()
                }).collect::<Vec<_>>().join(" ")),
                Value::Map(_) | Value::Func(_) | Value::Object(_) =>
                    bail!("<{}>: can't print {} value for attribute {:?}",
                          self.base.tag(), value.type_name(), to_html(name).as_str()),
            };
            atts.push((to_html(name), value));
        }
        Ok(atts)
    }
}

impl Component for Tag {
    fn base(&self) -> &Base {
        &self.base
    }
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn to_list(&self, acc: &mut Acc, ctx: &Context, walk: Walk<'_>) -> Result<()> {
        if !self.meta.has_closing_tag && !self.base.children().is_empty() {
            bail!("<{}> is a void element, it can't have children", self.base.tag())
        }
        let atts = self.attributes()?;
        push_start_tag(acc.string_mut(), self.meta, atts.iter().map(|(name, value)| {
            (name.as_str(), match value {
                Some(v) => AttValue::Text(v),
                None => AttValue::Present
            })
        }));
        walk.run(acc, ctx)?;
        push_end_tag(acc.string_mut(), self.meta);
        Ok(())
    }
}

crate::impl_into_node!(Tag);

macro_rules! def_tags {
    { $($fname:ident)* } => {
        $(
            pub fn $fname() -> Result<Tag> {
                Tag::new(stringify!($fname))
            }
        )*
    }
}

def_tags! {
    html head title meta link style script noscript body
    header footer main nav section article aside
    div span p pre code em strong small blockquote
    h1 h2 h3 h4 h5 h6
    a ul ol li dl dt dd br hr img
    form label input button textarea select option
    table caption thead tbody tfoot tr th td
}

/// `<input type="text">`
pub fn input_text() -> Result<Tag> {
    Ok(input()?.with_prop("type", "text")?)
}
