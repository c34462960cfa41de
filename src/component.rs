//! Component instances and the render walk.
//!
//! Rendering a tree is a depth first walk: each component's `render`
//! result is rendered in turn, into an `Acc` of string parts. When a
//! child component is done, all of its ancestors (nearest first) get
//! to see it via `postrender_child_element` (unless a component in
//! between hides it via `hides_from`); that's how collectors find the
//! content they hoist. Parts can be deferred until the whole
//! walk has completed.

use std::{fmt, rc::Rc, sync::Arc};
use anyhow::Result;
use kstring::KString;
use ahtml_html::print::push_escaped;
use crate::{class::ComponentClass,
            context::Context,
            error::{PropError, StructuralError, StructuralErrorKind},
            names::to_internal,
            node::Node,
            proptypes::PropTypes,
            trace,
            value::{FromValue, Value}};

/// The state common to all components: props and children.
#[derive(Clone)]
pub struct Base {
    class: Arc<ComponentClass>,
    // in the order they were first set
    props: Vec<(KString, Value)>,
    children: Vec<Node>,
}

impl Base {
    pub fn new(class: &Arc<ComponentClass>) -> Base {
        Base {
            class: class.clone(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    pub fn tag(&self) -> &KString {
        self.class.name()
    }

    pub fn proptypes(&self) -> &PropTypes {
        self.class.proptypes()
    }

    /// The internal name, if allowed on this component.
    fn resolve(&self, name: &str) -> Result<KString, PropError> {
        let name = to_internal(name).map_err(|_| StructuralErrorKind::InvalidPropName {
            tag: self.tag().clone(),
            name: name.into()
        })?;
        if !self.proptypes().allow(&name) {
            return Err(StructuralErrorKind::UnknownProp {
                tag: self.tag().clone(),
                name
            }.into())
        }
        Ok(name)
    }

    fn stored(&self, name: &str) -> Option<&Value> {
        self.props.iter().find(|(n, _)| n.as_str() == name).map(|(_, v)| v)
    }

    pub fn set_prop(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PropError> {
        let name = self.resolve(name)?;
        let value = self.proptypes().validate(&name, value.into())?;
        match self.props.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.props.push((name, value))
        }
        Ok(())
    }

    /// `None` unsets the prop.
    pub fn set_prop_or_unset(&mut self, name: &str, value: Option<Value>)
                             -> Result<(), PropError> {
        match value {
            Some(value) => self.set_prop(name, value),
            None => self.unset_prop(name)
        }
    }

    /// Remove a stored value; reads fall back to the default again.
    pub fn unset_prop(&mut self, name: &str) -> Result<(), PropError> {
        let name = self.resolve(name)?;
        self.props.retain(|(n, _)| *n != name);
        Ok(())
    }

    pub fn set_props<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        props: impl IntoIterator<Item = (K, V)>
    ) -> Result<(), PropError> {
        for (name, value) in props {
            self.set_prop(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// The stored value, else the class default.
    pub fn prop(&self, name: &str) -> Result<&Value, PropError> {
        let name = self.resolve(name)?;
        self.stored(&name)
            .or_else(|| self.proptypes().default(&name))
            .ok_or_else(|| StructuralErrorKind::NotDefined { name }.into())
    }

    /// Like `prop`, but `fallback` instead of failing for props
    /// without a value. Unknown props are still an error.
    pub fn prop_or<'s>(&'s self, name: &str, fallback: &'s Value)
                       -> Result<&'s Value, PropError> {
        match self.prop(name) {
            Err(PropError::Structural(e))
                if matches!(e.kind(), StructuralErrorKind::NotDefined { .. }) => Ok(fallback),
            r => r
        }
    }

    /// Whether reading `name` gives a value.
    pub fn has_prop(&self, name: &str) -> bool {
        self.prop(name).is_ok()
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, PropError> {
        let value = self.prop(name)?;
        T::from_value(value).ok_or_else(|| StructuralErrorKind::UnexpectedType {
            tag: self.tag().clone(),
            name: KString::from_ref(name),
            expected: T::EXPECTED,
            type_name: value.type_name(),
            value: value.to_string(),
        }.into())
    }

    /// The stored props (without defaults).
    pub fn props(&self) -> &[(KString, Value)] {
        &self.props
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn append(&mut self, child: impl Into<Node>) {
        child.into().flatten_into(&mut self.children);
    }

    pub fn prepend(&mut self, child: impl Into<Node>) {
        let nodes = child.into().flattened();
        self.children.splice(0..0, nodes);
    }

    pub fn check_required(&self) -> Result<(), StructuralError> {
        for name in self.proptypes().required_names() {
            if self.stored(name).is_none() && self.proptypes().default(name).is_none() {
                return Err(StructuralErrorKind::MissingRequiredProp {
                    tag: self.tag().clone(),
                    name: name.clone()
                }.into())
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Base")
            .field("class", self.class.name())
            .field("props", &self.props)
            .field("children", &self.children)
            .finish()
    }
}


pub trait Component {
    fn base(&self) -> &Base;
    fn base_mut(&mut self) -> &mut Base;

    /// What this component consists of. By default, the result of the
    /// class's render function, or else the children.
    fn render(&self, ctx: &Context) -> Result<Node> {
        let base = self.base();
        match base.class().render_fn() {
            Some(f) => f(base, ctx),
            None => Ok(Node::Fragment(base.children().to_vec()))
        }
    }

    /// The result of the named collection hook, if this component has
    /// one.
    fn collection_hook(&self, name: &str, ctx: &Context) -> Option<Result<Node>> {
        let base = self.base();
        base.class().hook(name).map(|f| f(base, ctx))
    }

    /// Called for every component below this one, after it has been
    /// rendered, with the result of its `render`.
    fn postrender_child_element(
        &self, _child: &Rc<dyn Component>, _rendered: &Node, _ctx: &Context
    ) -> Result<()> {
        Ok(())
    }

    /// Whether `ancestor`, enclosing this component, is not to be
    /// told about `child`, a component below this one.
    fn hides_from(&self, _child: &Rc<dyn Component>, _ancestor: &dyn Component) -> bool {
        false
    }

    /// Append this component's output to `acc`. `walk` does the
    /// rendering proper; overriding implementations add output around
    /// it, or change the context.
    fn to_list(&self, acc: &mut Acc, ctx: &Context, walk: Walk<'_>) -> Result<()> {
        walk.run(acc, ctx)
    }

    fn with_prop(mut self, name: &str, value: impl Into<Value>) -> Result<Self, PropError>
    where Self: Sized
    {
        self.base_mut().set_prop(name, value)?;
        Ok(self)
    }

    fn with_props<K: AsRef<str>, V: Into<Value>>(
        mut self,
        props: impl IntoIterator<Item = (K, V)>
    ) -> Result<Self, PropError>
    where Self: Sized
    {
        self.base_mut().set_props(props)?;
        Ok(self)
    }

    fn child(mut self, child: impl Into<Node>) -> Self
    where Self: Sized
    {
        self.base_mut().append(child);
        self
    }

    fn children<N: Into<Node>>(mut self, children: impl IntoIterator<Item = N>) -> Self
    where Self: Sized
    {
        for child in children {
            self.base_mut().append(child);
        }
        self
    }

    fn into_node(self) -> Node
    where Self: Sized + 'static
    {
        Node::Component(Rc::new(self))
    }

    fn to_html_string(&self) -> Result<String>
    where Self: Sized
    {
        render_to_string(self, &Context::default())
    }
}


/// The accumulator of output parts.
pub struct Acc {
    parts: Vec<Part>,
    current: String,
}

enum Part {
    Str(String),
    Deferred(Box<dyn FnOnce() -> Result<String>>),
}

impl Default for Acc {
    fn default() -> Self {
        Acc::new()
    }
}

impl Acc {
    pub fn new() -> Acc {
        Acc { parts: Vec::new(), current: String::new() }
    }

    /// The string to append to.
    pub fn string_mut(&mut self) -> &mut String {
        &mut self.current
    }

    pub fn push_str(&mut self, s: &str) {
        self.current.push_str(s);
    }

    pub fn push_escaped(&mut self, s: &str) {
        push_escaped(&mut self.current, s);
    }

    /// `f` is called by `finish`, i.e. after the walk is complete.
    pub fn push_deferred(&mut self, f: impl FnOnce() -> Result<String> + 'static) {
        if !self.current.is_empty() {
            self.parts.push(Part::Str(std::mem::take(&mut self.current)));
        }
        self.parts.push(Part::Deferred(Box::new(f)));
    }

    pub fn finish(self) -> Result<String> {
        let mut out = String::new();
        for part in self.parts {
            match part {
                Part::Str(s) => out.push_str(&s),
                Part::Deferred(f) => out.push_str(&f()?),
            }
        }
        out.push_str(&self.current);
        Ok(out)
    }
}


/// The chain of components enclosing the one being rendered.
pub struct Observers<'a> {
    node: &'a dyn Component,
    parent: Option<&'a Observers<'a>>,
}

/// Rendering of one component, handed to its `to_list`.
pub struct Walk<'a> {
    node: &'a dyn Component,
    observers: Option<&'a Observers<'a>>,
    rendered: &'a mut Option<Node>,
}

impl<'a> Walk<'a> {
    pub fn node(&self) -> &'a dyn Component {
        self.node
    }

    /// Check the required props, call `render` and render the result,
    /// with this component added to the observers.
    pub fn run(self, acc: &mut Acc, ctx: &Context) -> Result<()> {
        let node = self.node;
        let base = node.base();
        base.check_required()?;
        trace!("render <{}>", base.tag());
        let rendered = node.render(ctx)?;
        let observers = Observers { node, parent: self.observers };
        render_node(&rendered, acc, ctx, Some(&observers))?;
        *self.rendered = Some(rendered);
        Ok(())
    }
}

/// Whether one of the observers from `nearest` up to (excluding)
/// `ancestor` hides `child` from it.
fn is_hidden(
    child: &Rc<dyn Component>, ancestor: &Observers<'_>, nearest: Option<&Observers<'_>>
) -> bool {
    let mut o = nearest;
    while let Some(obs) = o {
        if std::ptr::eq(obs, ancestor) {
            return false
        }
        if obs.node.hides_from(child, ancestor.node) {
            return true
        }
        o = obs.parent;
    }
    false
}

/// Render `node` into `acc`, reporting components to `observers`.
pub fn render_node(
    node: &Node, acc: &mut Acc, ctx: &Context, observers: Option<&Observers<'_>>
) -> Result<()> {
    match node {
        Node::None => (),
        Node::Text(s) => acc.push_escaped(s),
        Node::Raw(s) => acc.push_str(s),
        Node::Fragment(nodes) => for node in nodes {
            render_node(node, acc, ctx, observers)?;
        },
        Node::Component(c) => {
            let mut rendered = None;
            c.to_list(acc, ctx, Walk { node: &**c, observers, rendered: &mut rendered })?;
            if let Some(rendered) = &rendered {
                let mut o = observers;
                while let Some(obs) = o {
                    if !is_hidden(c, obs, observers) {
                        obs.node.postrender_child_element(c, rendered, ctx)?;
                    }
                    o = obs.parent;
                }
            }
        }
    }
    Ok(())
}

pub fn render_to_string(root: &dyn Component, ctx: &Context) -> Result<String> {
    let mut acc = Acc::new();
    let mut rendered = None;
    root.to_list(&mut acc, ctx, Walk { node: root, observers: None, rendered: &mut rendered })?;
    acc.finish()
}

pub fn render_node_to_string(node: &Node, ctx: &Context) -> Result<String> {
    let mut acc = Acc::new();
    render_node(node, &mut acc, ctx, None)?;
    acc.finish()
}


/// A component fully described by its class.
#[derive(Debug, Clone)]
pub struct Element {
    base: Base,
}

impl Element {
    pub fn new(class: &Arc<ComponentClass>) -> Element {
        Element { base: Base::new(class) }
    }
}

impl Component for Element {
    fn base(&self) -> &Base {
        &self.base
    }
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

crate::impl_into_node!(Element);


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use super::*;
    use crate::{node::raw, proptype::PropType};

    fn todo_form() -> Arc<ComponentClass> {
        ComponentClass::builder("TodoForm")
            .prop_default("add_url", PropType::union([PropType::Callable, PropType::Str]),
                          "/todo/add")
            .choices("type", vec!["todo", "thing"])
            .prop("disabled", PropType::Bool)
            .define().unwrap()
    }

    #[test]
    fn t_props() {
        let class = todo_form();
        let mut form = Element::new(&class);
        assert_eq!(form.base().prop("type").unwrap(), &Value::from("todo"));
        assert_eq!(form.base().prop("add_url").unwrap(), &Value::from("/todo/add"));
        assert!(form.base().has_prop("type"));
        assert!(!form.base().has_prop("disabled"));

        form.base_mut().set_prop("type", "thing").unwrap();
        form.base_mut().set_prop("disabled", "").unwrap();
        assert_eq!(form.base().prop("_type").unwrap(), &Value::from("thing"));
        assert_eq!(form.base().get::<bool>("disabled").unwrap(), true);
        assert_eq!(form.base().props().len(), 2);

        form.base_mut().unset_prop("type").unwrap();
        assert_eq!(form.base().prop("type").unwrap(), &Value::from("todo"));
        form.base_mut().set_prop_or_unset("disabled", None).unwrap();
        assert!(form.base().props().is_empty());
    }

    #[test]
    fn t_prop_errors() {
        let class = todo_form();
        let mut form = Element::new(&class);
        let e = form.base_mut().set_prop("colour", "red").unwrap_err();
        assert_eq!(e.to_string(), "<TodoForm> has no prop named \"colour\"");
        let e = form.base().prop("colour").unwrap_err();
        assert!(matches!(e.structural(), Some(StructuralErrorKind::UnknownProp { .. })));

        let e = form.base_mut().set_prop("type", "stuff").unwrap_err();
        assert!(e.validation().is_some());

        let e = form.base().prop("disabled").unwrap_err();
        assert_eq!(e.to_string(), "disabled is not defined");
        assert_eq!(form.base().prop_or("disabled", &Value::Bool(false)).unwrap(),
                   &Value::Bool(false));
        assert!(form.base().prop_or("colour", &Value::None).is_err());

        let e = form.base().get::<i64>("type").unwrap_err();
        assert!(matches!(e.structural(), Some(StructuralErrorKind::UnexpectedType { .. })));

        let e = form.base_mut().set_prop("a b", "x").unwrap_err();
        assert_eq!(e.to_string(), "<TodoForm>: \"a b\" is not a valid prop name");
        assert!(matches!(e.structural(), Some(StructuralErrorKind::InvalidPropName { .. })));

        // data- props are text
        form.base_mut().set_prop("data-id", "7").unwrap();
        assert!(form.base_mut().set_prop("data-id", 7).is_err());
        assert_eq!(form.base().prop("data_id").unwrap(), &Value::from("7"));
    }

    #[test]
    fn t_children() {
        let class = ComponentClass::builder("Box").define().unwrap();
        let mut b = Element::new(&class);
        b.base_mut().append("b");
        b.base_mut().append(vec![Node::from("c"), Node::None, false.into(),
                                 Node::from(vec!["d"])]);
        b.base_mut().append(Option::<&str>::None);
        b.base_mut().prepend(vec!["a0", "a1"]);
        b.base_mut().prepend(false);
        assert_eq!(b.base().children().len(), 5);
        assert_eq!(b.to_html_string().unwrap(), "a0a1bcd");
        let b = b.children(["e", "f"]).children(vec![Some("g"), None]);
        assert_eq!(b.to_html_string().unwrap(), "a0a1bcdefg");
    }

    #[test]
    fn t_render_escapes_text() {
        let class = ComponentClass::builder("Box").define().unwrap();
        let b = Element::new(&class).child("Tom & <Jerry>").child(raw("<br>"));
        assert_eq!(b.to_html_string().unwrap(), "Tom &amp; &lt;Jerry&gt;<br>");
    }

    #[test]
    fn t_required() {
        let class = ComponentClass::builder("Todo")
            .required("todo", PropType::Str)
            .render(|base, _| Ok(Node::from(base.prop("todo")?)))
            .define().unwrap();
        let e = Element::new(&class).to_html_string().unwrap_err();
        assert_eq!(e.to_string(), "<Todo> is missing required prop \"todo\"");
        let t = Element::new(&class).with_prop("todo", "1-1").unwrap();
        assert_eq!(t.to_html_string().unwrap(), "1-1");
    }

    #[test]
    fn t_render_error_propagates() {
        let failing = ComponentClass::builder("Failing")
            .render(|_, _| anyhow::bail!("no luck"))
            .define().unwrap();
        let outer = ComponentClass::builder("Outer").define().unwrap();
        let tree = Element::new(&outer).child("a").child(Element::new(&failing));
        assert_eq!(tree.to_html_string().unwrap_err().to_string(), "no luck");
    }

    struct Recorder {
        base: Base,
        seen: RefCell<Vec<String>>,
    }

    impl Component for Recorder {
        fn base(&self) -> &Base {
            &self.base
        }
        fn base_mut(&mut self) -> &mut Base {
            &mut self.base
        }
        fn postrender_child_element(
            &self, child: &Rc<dyn Component>, rendered: &Node, _ctx: &Context
        ) -> Result<()> {
            self.seen.borrow_mut().push(format!("{}:{}", child.base().tag(),
                                                rendered.to_html_string()?));
            Ok(())
        }
    }

    #[test]
    fn t_postrender_sees_all_descendants() {
        let leaf = ComponentClass::builder("Leaf")
            .render(|_, _| Ok(Node::from("x")))
            .define().unwrap();
        let mid = ComponentClass::builder("Mid").define().unwrap();
        let root = ComponentClass::builder("Root").define().unwrap();
        let recorder = Recorder {
            base: Base::new(&root),
            seen: RefCell::new(Vec::new()),
        }.child(Element::new(&mid).child(Element::new(&leaf)))
            .child(Element::new(&leaf));
        assert_eq!(recorder.to_html_string().unwrap(), "xx");
        // post-order
        assert_eq!(*recorder.seen.borrow(), vec!["Leaf:x", "Mid:x", "Leaf:x"]);
    }

    #[test]
    fn t_deferred() {
        let mut acc = Acc::new();
        acc.push_str("a");
        let late = Rc::new(RefCell::new(String::new()));
        let late2 = late.clone();
        acc.push_deferred(move || Ok(late2.borrow().clone()));
        acc.push_escaped("<c>");
        *late.borrow_mut() = "b".into();
        assert_eq!(acc.finish().unwrap(), "ab&lt;c&gt;");
    }
}
