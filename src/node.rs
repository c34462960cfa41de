//! The things a component tree is made of.

use std::{fmt, rc::Rc};
use anyhow::Result;
use kstring::KString;
use crate::{component::{render_node_to_string, Component},
            context::Context,
            value::Value};

#[derive(Clone)]
pub enum Node {
    /// Renders nothing.
    None,
    /// Text, escaped when rendered.
    Text(KString),
    /// Preserialized HTML, output verbatim.
    Raw(KString),
    Component(Rc<dyn Component>),
    Fragment(Vec<Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::None
    }
}

/// Unescaped text.
pub fn raw(s: impl Into<KString>) -> Node {
    Node::Raw(s.into())
}

pub fn text(s: impl Into<KString>) -> Node {
    Node::Text(s.into())
}

impl Node {
    pub fn is_none(&self) -> bool {
        matches!(self, Node::None)
    }

    /// Append to `out`, with fragments flattened and `None`s dropped.
    pub fn flatten_into(self, out: &mut Vec<Node>) {
        match self {
            Node::None => (),
            Node::Fragment(nodes) => for node in nodes {
                node.flatten_into(out)
            },
            node => out.push(node)
        }
    }

    pub fn flattened(self) -> Vec<Node> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    /// Render outside of any context.
    pub fn to_html_string(&self) -> Result<String> {
        render_node_to_string(self, &Context::default())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::None => f.write_str("None"),
            Node::Text(s) => write!(f, "Text({:?})", s.as_str()),
            Node::Raw(s) => write!(f, "Raw({:?})", s.as_str()),
            Node::Component(c) => write!(f, "Component(<{}>)", c.base().tag()),
            Node::Fragment(nodes) => f.debug_list().entries(nodes).finish(),
        }
    }
}

/// `From<$t> for Node` for a component type.
#[macro_export]
macro_rules! impl_into_node {
    ($t:ty) => {
        impl From<$t> for $crate::node::Node {
            fn from(c: $t) -> Self {
                $crate::node::Node::Component(std::rc::Rc::new(c))
            }
        }
    }
}

impl From<Rc<dyn Component>> for Node {
    fn from(c: Rc<dyn Component>) -> Self { Node::Component(c) }
}

impl From<()> for Node {
    fn from(_: ()) -> Self { Node::None }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self { Node::Text(KString::from_ref(s)) }
}

impl From<String> for Node {
    fn from(s: String) -> Self { Node::Text(KString::from_string(s)) }
}

impl From<KString> for Node {
    fn from(s: KString) -> Self { Node::Text(s) }
}

impl From<&KString> for Node {
    fn from(s: &KString) -> Self { Node::Text(s.clone()) }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self { Node::Text(KString::from_string(i.to_string())) }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self { Node::Text(KString::from_string(i.to_string())) }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self { Node::Text(KString::from_string(x.to_string())) }
}

/// `false` is the "render nothing" idiom.
impl From<bool> for Node {
    fn from(b: bool) -> Self {
        if b { Node::Text(KString::from_static("true")) } else { Node::None }
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Node::None
        }
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(vs: Vec<T>) -> Self {
        Node::Fragment(vs.into_iter().map(Into::into).collect())
    }
}

impl From<&[Node]> for Node {
    fn from(vs: &[Node]) -> Self {
        Node::Fragment(vs.to_vec())
    }
}

/// Prop values as children: lists become fragments, `None` and
/// `false` nothing, everything else its text form.
impl From<&Value> for Node {
    fn from(v: &Value) -> Self {
        match v {
            Value::None => Node::None,
            Value::Bool(b) => (*b).into(),
            Value::Str(s) => Node::Text(s.clone()),
            Value::List(vs) => Node::Fragment(vs.iter().map(Node::from).collect()),
            _ => Node::Text(KString::from_string(v.to_string())),
        }
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self { Node::from(&v) }
}
