//! Runtime values of props.

use std::{any::Any, fmt::{self, Debug, Display}, sync::Arc};
use anyhow::{bail, Result};
use itertools::Itertools;
use kstring::KString;

pub type Func = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A host object, compared by identity.
#[derive(Clone)]
pub struct Object {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Object {
            type_name: short_type_name::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }
}

/// The last path segment of the type name, with generics kept.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full
    }
}

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(KString),
    List(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    Func(Func),
    Object(Object),
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

impl Value {
    pub fn func(f: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static) -> Value {
        Value::Func(Arc::new(f))
    }

    pub fn object<T: Any + Send + Sync>(value: T) -> Value {
        Value::Object(Object::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Func(_) => "callable",
            Value::Object(o) => o.type_name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None
        }
    }

    /// Ints are accepted, too.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None
        }
    }

    pub fn as_kstring(&self) -> Option<&KString> {
        match self {
            Value::Str(s) => Some(s),
            _ => None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None
        }
    }

    /// Look up a key in a `Map`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn as_object<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(o) => o.downcast_ref(),
            _ => None
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Func(_))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Value::Func(f) => f(args),
            _ => bail!("{} `{}` is not callable", self.type_name(), self)
        }
    }

    /// How the value appears inside of lists and maps: strings quoted.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s.as_str()),
            _ => self.to_string()
        }
    }

    pub fn from_json(v: serde_json::Value) -> Value {
        use serde_json::Value as J;
        match v {
            J::Null => Value::None,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => Value::Str(KString::from_string(s)),
            J::Array(vs) => Value::List(vs.into_iter().map(Value::from_json).collect()),
            J::Object(m) => Value::Map(
                m.into_iter()
                    .map(|(k, v)| (Value::Str(KString::from_string(k)), Value::from_json(v)))
                    .collect()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(&a.value, &b.value),
            _ => false
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(l) => write!(f, "[{}]", l.iter().map(Value::repr).join(", ")),
            Value::Map(m) => write!(f, "{{{}}}", m.iter().map(
                |(k, v)| format!("{}: {}", k.repr(), v.repr())).join(", ")),
            Value::Func(_) => f.write_str("<callable>"),
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}: {})", self.type_name(), self.repr())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self { Value::None }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i.into()) }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self { Value::Int(i.into()) }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(KString::from_ref(s)) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(KString::from_string(s)) }
}

impl From<KString> for Value {
    fn from(s: KString) -> Self { Value::Str(s) }
}

impl From<&KString> for Value {
    fn from(s: &KString) -> Self { Value::Str(s.clone()) }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self { v.clone() }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vs: Vec<T>) -> Self {
        Value::List(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::None
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self { Value::from_json(v) }
}


/// Typed extraction, used by `Base::get`.
pub trait FromValue: Sized {
    /// For error messages.
    const EXPECTED: &'static str;
    fn from_value(v: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";
    fn from_value(v: &Value) -> Option<Self> { Some(v.clone()) }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";
    fn from_value(v: &Value) -> Option<Self> { v.as_bool() }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";
    fn from_value(v: &Value) -> Option<Self> { v.as_int() }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";
    fn from_value(v: &Value) -> Option<Self> { v.as_float() }
}

impl FromValue for KString {
    const EXPECTED: &'static str = "str";
    fn from_value(v: &Value) -> Option<Self> { v.as_kstring().cloned() }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";
    fn from_value(v: &Value) -> Option<Self> { v.as_str().map(String::from) }
}

impl FromValue for Vec<Value> {
    const EXPECTED: &'static str = "list";
    fn from_value(v: &Value) -> Option<Self> { v.as_list().map(<[Value]>::to_vec) }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = "optional value";
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::None => Some(None),
            _ => T::from_value(v).map(Some)
        }
    }
}
