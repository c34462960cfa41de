//! Values made available to a whole subtree.

use std::{rc::Rc, sync::Arc};
use anyhow::Result;
use kstring::KString;
use lazy_static::lazy_static;
use crate::{class::ComponentClass,
            component::{Acc, Base, Component, Walk},
            error::{PropError, StructuralErrorKind},
            names::to_internal,
            value::{FromValue, Value}};

struct Frame {
    class: Arc<ComponentClass>,
    props: Vec<(KString, Value)>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.props.iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
            .or_else(|| self.class.proptypes().default(name))
    }
}

/// The props of all enclosing context components, nearest first.
/// Cheap to clone.
#[derive(Clone, Default)]
pub struct Context {
    top: Option<Rc<Frame>>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// A context with the props of `base` in front.
    pub fn with_frame(&self, base: &Base) -> Context {
        Context {
            top: Some(Rc::new(Frame {
                class: base.class().clone(),
                props: base.props().to_vec(),
                parent: self.top.clone(),
            }))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::successors(self.top.as_deref(), |f| f.parent.as_deref())
    }

    /// Whether some enclosing context provides a value for `name`.
    pub fn has_prop(&self, name: &str) -> bool {
        self.prop(name).is_ok()
    }

    /// The value from the nearest context that has one. Fails with
    /// `UnknownProp` if no context declares `name`, `NotDefined` if
    /// none has a value for it.
    pub fn prop(&self, name: &str) -> Result<Value, PropError> {
        let name = to_internal(name)?;
        let mut declared = false;
        for frame in self.frames() {
            if frame.class.proptypes().allow(&name) {
                declared = true;
                if let Some(v) = frame.lookup(&name) {
                    return Ok(v.clone())
                }
            }
        }
        if declared {
            Err(StructuralErrorKind::NotDefined { name }.into())
        } else {
            let tag = match self.frames().next() {
                Some(frame) => frame.class.name().clone(),
                None => KString::from_static("Context")
            };
            Err(StructuralErrorKind::UnknownProp { tag, name }.into())
        }
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, PropError> {
        let value = self.prop(name)?;
        T::from_value(&value).ok_or_else(|| StructuralErrorKind::UnexpectedType {
            tag: KString::from_static("Context"),
            name: KString::from_ref(name),
            expected: T::EXPECTED,
            type_name: value.type_name(),
            value: value.to_string(),
        }.into())
    }
}

lazy_static! {
    /// Root class of context components; extend it to declare the
    /// props a context carries.
    pub static ref BASE_CONTEXT: Arc<ComponentClass> =
        ComponentClass::builder("BaseContext").define()
        .expect("a class without props can't be invalid");
}

/// A component that passes its props down to its subtree via the
/// `Context`, and renders its children.
#[derive(Debug, Clone)]
pub struct BaseContext {
    base: Base,
}

impl BaseContext {
    pub fn new(class: &Arc<ComponentClass>) -> BaseContext {
        BaseContext { base: Base::new(class) }
    }
}

impl Component for BaseContext {
    fn base(&self) -> &Base {
        &self.base
    }
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn to_list(&self, acc: &mut Acc, ctx: &Context, walk: Walk<'_>) -> Result<()> {
        walk.run(acc, &ctx.with_frame(&self.base))
    }
}

crate::impl_into_node!(BaseContext);
