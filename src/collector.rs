//! Collectors: components that gather content from the components
//! below them and output it once, before or after their own children.
//!
//! Content is collected from instances of the kind's marker class
//! (whose children are output, the marker itself renders nothing) and
//! from the kind's collection hook on any component (e.g.
//! `render_css`). Output happens via a deferred part, i.e. after the
//! walk has completed, so content from later siblings is included.

use std::{cell::RefCell, rc::Rc, str::FromStr, sync::Arc};
use anyhow::{anyhow, Result};
use kstring::KString;
use lazy_static::lazy_static;
use strum::{AsRefStr, EnumString};
use ahtml_html::{metadb, print::{push_end_tag, push_start_tag, AttValue}};
use crate::{class::ComponentClass,
            component::{render_node, Acc, Base, Component, Element, Walk},
            context::Context,
            error::ConfigurationError,
            node::Node,
            proptype::PropType,
            trace,
            value::Value,
            warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum RenderPosition {
    #[strum(serialize = "before")]
    Before,
    #[strum(serialize = "after")]
    After,
}

/// The element the collected content is wrapped in, with the default
/// for its `type` attribute.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub tag_name: KString,
    pub default_type: KString,
}

/// What a collector class collects and how it outputs it.
#[derive(Debug)]
pub struct CollectorKind {
    class: Arc<ComponentClass>,
    collect: Arc<ComponentClass>,
    hook: Option<KString>,
    envelope: Option<Envelope>,
}

impl CollectorKind {
    /// `parent`, if given, is the kind whose class the new class
    /// extends. With an `envelope`, the class gets a `type` prop.
    pub fn define(
        name: &str,
        parent: Option<&CollectorKind>,
        hook: Option<&str>,
        envelope: Option<Envelope>,
    ) -> Result<CollectorKind, ConfigurationError> {
        let mut builder = ComponentClass::builder(name);
        builder = match parent {
            Some(parent) => builder.extends(&parent.class),
            None => builder.choices(
                "render_position",
                vec![Value::None, "before".into(), "after".into()]),
        };
        if let Some(envelope) = &envelope {
            builder = builder.prop_default("type", PropType::Str, &envelope.default_type);
        }
        let class = builder.define()?;
        let collect = ComponentClass::builder(&format!("{name}.Collect"))
            .render(|_, _| Ok(Node::None))
            .define()?;
        Ok(CollectorKind {
            class,
            collect,
            hook: hook.map(KString::from_ref),
            envelope,
        })
    }

    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    /// The marker class.
    pub fn collect_class(&self) -> &Arc<ComponentClass> {
        &self.collect
    }

    pub fn hook(&self) -> Option<&str> {
        self.hook.as_deref()
    }
}

fn builtin_kind(
    name: &str, parent: Option<&CollectorKind>, hook: Option<&str>,
    envelope: Option<(&str, &str)>
) -> Arc<CollectorKind> {
    let envelope = envelope.map(|(tag_name, default_type)| Envelope {
        tag_name: KString::from_ref(tag_name),
        default_type: KString::from_ref(default_type),
    });
    Arc::new(CollectorKind::define(name, parent, hook, envelope)
             .expect("built-in collector classes are valid"))
}

lazy_static! {
    pub static ref COLLECTOR: Arc<CollectorKind> =
        builtin_kind("Collector", None, None, None);
    pub static ref CSS_COLLECTOR: Arc<CollectorKind> =
        builtin_kind("CSSCollector", Some(&**COLLECTOR), Some("render_css"),
                     Some(("style", "text/css")));
    pub static ref JS_COLLECTOR: Arc<CollectorKind> =
        builtin_kind("JSCollector", Some(&**COLLECTOR), Some("render_js"),
                     Some(("script", "text/javascript")));
}

/// A marker for the collector `kind`: its children are collected.
pub fn collect(kind: &CollectorKind) -> Element {
    Element::new(kind.collect_class())
}

/// Output the collected entries: the children of components, other
/// nodes as they are. Wrapped in the envelope, if any.
fn render_collected_entries(
    entries: &[Node], kind: &CollectorKind, ty: Option<&str>, ctx: &Context
) -> Result<String> {
    let mut acc = Acc::new();
    for entry in entries {
        match entry {
            Node::Component(c) => for child in c.base().children() {
                render_node(child, &mut acc, ctx, None)?;
            },
            _ => render_node(entry, &mut acc, ctx, None)?,
        }
    }
    let inner = acc.finish()?;
    match &kind.envelope {
        None => Ok(inner),
        Some(envelope) => {
            let meta = metadb()?.element(&envelope.tag_name).ok_or_else(
                || anyhow!("unknown element {:?} for the envelope of {}",
                           envelope.tag_name, kind.class.name()))?;
            let mut out = String::new();
            push_start_tag(&mut out, meta, ty.map(|t| ("type", AttValue::Text(t))));
            out.push_str(&inner);
            push_end_tag(&mut out, meta);
            Ok(out)
        }
    }
}

/// Instances are for one render only, the collected content is never
/// cleared.
#[derive(Debug)]
pub struct Collector {
    base: Base,
    kind: Arc<CollectorKind>,
    collected: Rc<RefCell<Vec<Node>>>,
}

impl Collector {
    pub fn new(kind: &Arc<CollectorKind>) -> Collector {
        Collector {
            base: Base::new(kind.class()),
            kind: kind.clone(),
            collected: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn plain() -> Collector {
        Collector::new(&COLLECTOR)
    }

    pub fn css() -> Collector {
        Collector::new(&CSS_COLLECTOR)
    }

    pub fn js() -> Collector {
        Collector::new(&JS_COLLECTOR)
    }

    pub fn kind(&self) -> &Arc<CollectorKind> {
        &self.kind
    }

    /// A marker instance for this collector's kind.
    pub fn collect(&self) -> Element {
        collect(&self.kind)
    }

    pub fn render_position(&self) -> Result<Option<RenderPosition>> {
        match self.base.prop("render_position")? {
            Value::None => Ok(None),
            v => {
                let s = v.as_str().ok_or_else(|| anyhow!("invalid render_position {v}"))?;
                Ok(Some(RenderPosition::from_str(s)?))
            }
        }
    }

    pub fn collected(&self) -> Vec<Node> {
        self.collected.borrow().clone()
    }

    fn envelope_type(&self) -> Result<Option<KString>> {
        if self.kind.envelope.is_none() {
            return Ok(None)
        }
        Ok(self.base.prop("type")?.as_kstring().cloned())
    }

    /// The collected content as a string; can be called any number of
    /// times once the walk is done.
    pub fn render_collected(&self, ctx: &Context) -> Result<String> {
        render_collected_entries(&self.collected.borrow(), &self.kind,
                                 self.envelope_type()?.as_deref(), ctx)
    }

    fn push_collected(&self, acc: &mut Acc, ctx: &Context) -> Result<()> {
        let collected = self.collected.clone();
        let kind = self.kind.clone();
        let ty = self.envelope_type()?;
        let ctx = ctx.clone();
        acc.push_deferred(move || {
            trace!("<{}>: splicing {} collected item(s)",
                   kind.class.name(), collected.borrow().len());
            render_collected_entries(&collected.borrow(), &kind, ty.as_deref(), &ctx)
        });
        Ok(())
    }
}

impl Component for Collector {
    fn base(&self) -> &Base {
        &self.base
    }
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn render(&self, _ctx: &Context) -> Result<Node> {
        Ok(Node::Fragment(self.base.children().to_vec()))
    }

    fn postrender_child_element(
        &self, child: &Rc<dyn Component>, _rendered: &Node, ctx: &Context
    ) -> Result<()> {
        if let Some(hook) = &self.kind.hook {
            if let Some(content) = child.collection_hook(hook, ctx) {
                let content = content?;
                self.collected.borrow_mut().push(content);
            }
        }
        if child.base().class().is_a(&self.kind.collect) {
            self.collected.borrow_mut().push(Node::Component(child.clone()));
        }
        Ok(())
    }

    /// What a positioned collector collects is output by it, enclosing
    /// collectors of the same kind don't get it again.
    fn hides_from(&self, child: &Rc<dyn Component>, ancestor: &dyn Component) -> bool {
        matches!(self.render_position(), Ok(Some(_)))
            && ancestor.base().class().is_a(self.kind.class())
            && (child.base().class().is_a(&self.kind.collect)
                || self.kind.hook.as_deref().map_or(false, |h| child.base().class().has_hook(h)))
    }

    fn to_list(&self, acc: &mut Acc, ctx: &Context, walk: Walk<'_>) -> Result<()> {
        let position = self.render_position()?;
        if position == Some(RenderPosition::Before) {
            self.push_collected(acc, ctx)?;
        }
        walk.run(acc, ctx)?;
        match position {
            Some(RenderPosition::After) => self.push_collected(acc, ctx)?,
            Some(RenderPosition::Before) => (),
            None => {
                let n = self.collected.borrow().len();
                if n > 0 {
                    warn!("<{}> without render_position collected {} item(s), \
                           only an enclosing collector can output them",
                          self.base.tag(), n);
                }
            }
        }
        Ok(())
    }
}

crate::impl_into_node!(Collector);
