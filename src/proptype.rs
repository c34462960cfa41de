//! The shapes a prop's values can be declared with.

use std::{any::Any, fmt::{self, Debug, Display}};
use itertools::Itertools;
use crate::value::{short_type_name, Object, Value};

#[derive(Clone)]
pub enum PropType {
    Any,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    Callable,
    /// A host object of one particular Rust type.
    Object { name: &'static str, check: fn(&Object) -> bool },
    List(Box<PropType>),
    Map(Box<PropType>, Box<PropType>),
    Union(Vec<PropType>),
    /// One of the values in the given `Value::List`. Checked for
    /// being a non-empty list when the owning class is defined.
    Choices(Value),
}

/// The type of props that are allowed without being declared.
pub static TEXT: PropType = PropType::Str;

fn is_type<T: Any>(o: &Object) -> bool {
    o.is::<T>()
}

impl PropType {
    pub fn object<T: Any>() -> PropType {
        PropType::Object { name: short_type_name::<T>(), check: is_type::<T> }
    }

    pub fn list(item: PropType) -> PropType {
        PropType::List(Box::new(item))
    }

    pub fn map(key: PropType, value: PropType) -> PropType {
        PropType::Map(Box::new(key), Box::new(value))
    }

    pub fn union(tys: impl IntoIterator<Item = PropType>) -> PropType {
        PropType::Union(tys.into_iter().collect())
    }

    /// `ty` or `None`.
    pub fn optional(ty: PropType) -> PropType {
        PropType::Union(vec![ty, PropType::NoneType])
    }

    pub fn choices(values: impl Into<Value>) -> PropType {
        PropType::Choices(values.into())
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, PropType::Choices(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, PropType::Bool)
    }

    /// The choices if this is a proper choice type.
    pub fn choice_list(&self) -> Option<&[Value]> {
        match self {
            PropType::Choices(vs) => vs.as_list(),
            _ => None
        }
    }

    pub fn matches(&self, v: &Value) -> bool {
        match self {
            PropType::Any => true,
            PropType::NoneType => v.is_none(),
            PropType::Bool => matches!(v, Value::Bool(_)),
            PropType::Int => matches!(v, Value::Int(_)),
            PropType::Float => matches!(v, Value::Float(_)),
            PropType::Str => matches!(v, Value::Str(_)),
            PropType::Callable => v.is_callable(),
            PropType::Object { check, .. } => match v {
                Value::Object(o) => check(o),
                _ => false
            },
            PropType::List(item) => match v {
                Value::List(vs) => vs.iter().all(|v| item.matches(v)),
                _ => false
            },
            PropType::Map(kt, vt) => match v {
                Value::Map(kvs) => kvs.iter().all(|(k, v)| kt.matches(k) && vt.matches(v)),
                _ => false
            },
            PropType::Union(tys) => tys.iter().any(|t| t.matches(v)),
            PropType::Choices(_) => match self.choice_list() {
                Some(vs) => vs.contains(v),
                None => false
            },
        }
    }
}

impl Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropType::Any => f.write_str("any"),
            PropType::NoneType => f.write_str("None"),
            PropType::Bool => f.write_str("bool"),
            PropType::Int => f.write_str("int"),
            PropType::Float => f.write_str("float"),
            PropType::Str => f.write_str("str"),
            PropType::Callable => f.write_str("callable"),
            PropType::Object { name, .. } => f.write_str(name),
            PropType::List(item) => write!(f, "list[{item}]"),
            PropType::Map(k, v) => write!(f, "map[{k}, {v}]"),
            PropType::Union(tys) => write!(f, "{}", tys.iter().join(" | ")),
            PropType::Choices(vs) => write!(f, "one of {vs}"),
        }
    }
}

impl Debug for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropType({self})")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct TodoObject;

    #[test]
    fn t_matches() {
        assert!(PropType::Int.matches(&Value::from(3)));
        assert!(!PropType::Int.matches(&Value::from(3.0)));
        assert!(!PropType::Float.matches(&Value::from(3)));
        assert!(PropType::optional(PropType::Str).matches(&Value::None));
        assert!(PropType::optional(PropType::Str).matches(&Value::from("a")));
        assert!(!PropType::optional(PropType::Str).matches(&Value::from(1)));

        let todos = PropType::list(PropType::object::<TodoObject>());
        assert!(todos.matches(&Value::List(vec![])));
        assert!(todos.matches(&Value::List(vec![Value::object(TodoObject)])));
        assert!(!todos.matches(&Value::List(vec![Value::object(TodoObject), "x".into()])));
        assert!(!todos.matches(&Value::object(TodoObject)));

        let m = PropType::map(PropType::Str, PropType::Int);
        assert!(m.matches(&Value::Map(vec![("a".into(), 1.into())])));
        assert!(!m.matches(&Value::Map(vec![("a".into(), "b".into())])));

        let url = PropType::union([PropType::Callable, PropType::Str]);
        assert!(url.matches(&Value::func(|_| Ok(Value::None))));
        assert!(url.matches(&Value::from("/add")));
    }

    #[test]
    fn t_choices() {
        let c = PropType::choices(vec!["todo", "thing"]);
        assert!(c.is_choice());
        assert!(c.matches(&Value::from("thing")));
        assert!(!c.matches(&Value::from("Thing")));
        assert!(!PropType::choices("todo").matches(&Value::from("todo")));
        assert_eq!(PropType::choices("todo").choice_list(), None);
    }

    #[test]
    fn t_display() {
        assert_eq!(PropType::list(PropType::object::<TodoObject>()).to_string(),
                   "list[TodoObject]");
        assert_eq!(PropType::optional(PropType::Int).to_string(), "int | None");
        assert_eq!(PropType::choices(vec!["a", "b"]).to_string(), r#"one of ["a", "b"]"#);
        assert_eq!(PropType::map(PropType::Str, PropType::Any).to_string(), "map[str, any]");
    }
}
