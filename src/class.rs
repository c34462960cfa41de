//! Component classes: the immutable type descriptor shared by all
//! instances of a component.

use std::{fmt, sync::Arc};
use anyhow::Result;
use kstring::KString;
use crate::{component::Base,
            context::Context,
            error::ConfigurationError,
            node::Node,
            proptype::PropType,
            proptypes::{PropSpec, PropTypes},
            value::Value};

pub type RenderFn = Arc<dyn Fn(&Base, &Context) -> Result<Node> + Send + Sync>;

pub struct ComponentClass {
    name: KString,
    parents: Vec<Arc<ComponentClass>>,
    proptypes: PropTypes,
    render: Option<RenderFn>,
    hooks: Vec<(KString, RenderFn)>,
}

impl ComponentClass {
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder {
            name: KString::from_ref(name),
            parents: Vec::new(),
            prop_sources: Vec::new(),
            excludes: Vec::new(),
            specs: Vec::new(),
            render: None,
            hooks: Vec::new(),
        }
    }

    pub fn name(&self) -> &KString {
        &self.name
    }

    pub fn parents(&self) -> &[Arc<ComponentClass>] {
        &self.parents
    }

    pub fn proptypes(&self) -> &PropTypes {
        &self.proptypes
    }

    /// Whether `self` is `other` or inherits from it.
    pub fn is_a(&self, other: &Arc<ComponentClass>) -> bool {
        std::ptr::eq(self, &**other)
            || self.parents.iter().any(|p| p.is_a(other))
    }

    /// The own render function, or the first one found in the parents
    /// (depth first, in the order given).
    pub fn render_fn(&self) -> Option<&RenderFn> {
        self.render.as_ref()
            .or_else(|| self.parents.iter().find_map(|p| p.render_fn()))
    }

    /// Named collection hook, looked up like `render_fn`.
    pub fn hook(&self, name: &str) -> Option<&RenderFn> {
        self.hooks.iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, f)| f)
            .or_else(|| self.parents.iter().find_map(|p| p.hook(name)))
    }

    pub fn has_hook(&self, name: &str) -> bool {
        self.hook(name).is_some()
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("name", &self.name)
            .field("parents", &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("proptypes", &self.proptypes)
            .field("render", &self.render.is_some())
            .field("hooks", &self.hooks.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

/// Collects the declarations of a class; `define` composes and checks
/// them.
pub struct ClassBuilder {
    name: KString,
    parents: Vec<Arc<ComponentClass>>,
    // inherit prop types only
    prop_sources: Vec<Arc<ComponentClass>>,
    excludes: Vec<KString>,
    specs: Vec<PropSpec>,
    render: Option<RenderFn>,
    hooks: Vec<(KString, RenderFn)>,
}

impl ClassBuilder {
    /// Inherit props, render function and hooks; instances are `is_a`
    /// the parent. Later parents' prop declarations override earlier
    /// ones.
    pub fn extends(mut self, parent: &Arc<ComponentClass>) -> Self {
        self.parents.push(parent.clone());
        self
    }

    /// Inherit the prop declarations of `class` but nothing else (for
    /// wrapping components). Applied after the `extends` parents.
    pub fn props_from(mut self, class: &Arc<ComponentClass>) -> Self {
        self.prop_sources.push(class.clone());
        self
    }

    fn spec(mut self, name: &str, ty: Option<(PropType, bool)>, default: Option<Value>) -> Self {
        self.specs.push(PropSpec { name: KString::from_ref(name), ty, default });
        self
    }

    pub fn prop(self, name: &str, ty: PropType) -> Self {
        self.spec(name, Some((ty, false)), None)
    }

    pub fn prop_default(self, name: &str, ty: PropType, default: impl Into<Value>) -> Self {
        self.spec(name, Some((ty, false)), Some(default.into()))
    }

    pub fn required(self, name: &str, ty: PropType) -> Self {
        self.spec(name, Some((ty, true)), None)
    }

    /// Only change the default of an inherited prop (not possible for
    /// choice props).
    pub fn default(self, name: &str, default: impl Into<Value>) -> Self {
        self.spec(name, None, Some(default.into()))
    }

    /// A choice prop; defaults to the first of the `choices`.
    pub fn choices(self, name: &str, choices: impl Into<Value>) -> Self {
        self.spec(name, Some((PropType::choices(choices), false)), None)
    }

    /// Remove an inherited prop.
    pub fn exclude(mut self, name: &str) -> Self {
        self.excludes.push(KString::from_ref(name));
        self
    }

    pub fn render(
        mut self,
        f: impl Fn(&Base, &Context) -> Result<Node> + Send + Sync + 'static
    ) -> Self {
        self.render = Some(Arc::new(f));
        self
    }

    /// A collection hook, e.g. `render_css`, picked up by collectors of
    /// the corresponding kind.
    pub fn hook(
        mut self,
        name: &str,
        f: impl Fn(&Base, &Context) -> Result<Node> + Send + Sync + 'static
    ) -> Self {
        self.hooks.push((KString::from_ref(name), Arc::new(f)));
        self
    }

    pub fn define(self) -> Result<Arc<ComponentClass>, ConfigurationError> {
        let parent_proptypes: Vec<&PropTypes> =
            self.parents.iter().chain(&self.prop_sources)
            .map(|c| c.proptypes())
            .collect();
        let proptypes = PropTypes::compose(
            &self.name, &parent_proptypes, &self.excludes, &self.specs)?;
        Ok(Arc::new(ComponentClass {
            name: self.name,
            parents: self.parents,
            proptypes,
            render: self.render,
            hooks: self.hooks,
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationErrorKind;

    #[test]
    fn t_is_a() {
        let a = ComponentClass::builder("A").define().unwrap();
        let b = ComponentClass::builder("B").extends(&a).define().unwrap();
        let c = ComponentClass::builder("C").extends(&b).define().unwrap();
        let d = ComponentClass::builder("D").props_from(&a).define().unwrap();
        assert!(c.is_a(&a));
        assert!(c.is_a(&c));
        assert!(!a.is_a(&c));
        assert!(!d.is_a(&a));
    }

    #[test]
    fn t_inherit_render_and_hooks() {
        let a = ComponentClass::builder("A")
            .render(|_, _| Ok(Node::from("a")))
            .hook("render_css", |_, _| Ok(Node::from("x")))
            .define().unwrap();
        let b = ComponentClass::builder("B").extends(&a).define().unwrap();
        assert!(b.render_fn().is_some());
        assert!(b.has_hook("render_css"));
        assert!(!b.has_hook("render_js"));
        let d = ComponentClass::builder("D").props_from(&a).define().unwrap();
        assert!(d.render_fn().is_none());
    }

    #[test]
    fn t_define_errors() {
        let e = ComponentClass::builder("Bad")
            .prop_default("count", PropType::Int, "x")
            .define().unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::InvalidDefault { .. }));
        let e = ComponentClass::builder("Bad")
            .choices("position", Vec::<Value>::new())
            .define().unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::MissingChoices { .. }));
        let e = ComponentClass::builder("P")
            .prop_default("pos", PropType::choices(vec!["a", "b"]), "zzz")
            .define().unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::ChoiceDefault { .. }));
        let base = ComponentClass::builder("Base")
            .choices("pos", vec!["a", "b"])
            .define().unwrap();
        let e = ComponentClass::builder("S")
            .extends(&base)
            .default("pos", "b")
            .define().unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::ChoiceDefault { .. }));
    }

    #[test]
    fn t_props_from_with_exclude() {
        let app = ComponentClass::builder("TodoApp")
            .required("todos", PropType::list(PropType::Any))
            .choices("type", vec!["todo", "thing"])
            .define().unwrap();
        let hoc = ComponentClass::builder("thingify(TodoApp)")
            .props_from(&app)
            .exclude("type")
            .define().unwrap();
        assert!(hoc.proptypes().allow("todos"));
        assert!(!hoc.proptypes().allow("_type"));
        assert!(hoc.proptypes().is_required("todos"));
    }
}
