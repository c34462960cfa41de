//! The composed, validated set of prop declarations of a component
//! class.

use std::collections::HashMap;
use kstring::KString;
use crate::{error::{ConfigurationError, ConfigurationErrorKind, ValidationError,
                    ValidationErrorKind},
            names::{is_pass_through, to_html, to_internal},
            proptype::{PropType, TEXT},
            value::Value};

/// One prop as it takes effect on a class.
#[derive(Debug, Clone)]
pub struct PropDecl {
    pub name: KString,
    pub ty: PropType,
    pub required: bool,
    pub default: Option<Value>,
}

/// A declaration as given for one class, before composition. Either
/// part can be missing: a default alone overrides the default of an
/// inherited prop and keeps its type.
#[derive(Debug, Clone)]
pub struct PropSpec {
    pub name: KString,
    /// The type and whether the prop is required.
    pub ty: Option<(PropType, bool)>,
    pub default: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct PropTypes {
    owner: KString,
    decls: Vec<PropDecl>,
    index: HashMap<KString, usize>,
}

fn capitalize(s: &str) -> String {
    let mut cs = s.chars();
    match cs.next() {
        Some(c) => c.to_uppercase().chain(cs.flat_map(char::to_lowercase)).collect(),
        None => String::new()
    }
}

impl PropTypes {
    pub fn empty(owner: &str) -> PropTypes {
        PropTypes {
            owner: KString::from_ref(owner),
            decls: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Merge the `parents` (in order, later ones override earlier
    /// ones), remove `excludes` from that inherited set, then apply
    /// `own`. Each field of a declaration is inherited separately, so
    /// a redeclared type keeps the inherited default and vice versa.
    /// The result is checked with `validate_types`.
    pub fn compose(
        owner: &str,
        parents: &[&PropTypes],
        excludes: &[KString],
        own: &[PropSpec],
    ) -> Result<PropTypes, ConfigurationError> {
        let mut pt = PropTypes::empty(owner);
        let internal = |name: &str| to_internal(name).map_err(
            |_| ConfigurationErrorKind::InvalidPropName {
                owner: pt.owner.clone(),
                name: name.into()
            });

        let mut inherited: Vec<PropDecl> = Vec::new();
        for parent in parents {
            for decl in &parent.decls {
                match inherited.iter_mut().find(|d| d.name == decl.name) {
                    Some(d) => {
                        d.ty = decl.ty.clone();
                        d.required = decl.required;
                        if decl.default.is_some() {
                            d.default = decl.default.clone();
                        }
                    }
                    None => inherited.push(decl.clone())
                }
            }
        }
        let excludes = excludes.iter()
            .map(|n| internal(n))
            .collect::<Result<Vec<_>, _>>()?;
        inherited.retain(|d| !excludes.contains(&d.name));

        for spec in own {
            let name = internal(&spec.name)?;
            let pos = inherited.iter().position(|d| d.name == name);
            match (pos, &spec.ty) {
                (Some(i), _) => {
                    let d = &mut inherited[i];
                    if let Some((ty, required)) = &spec.ty {
                        if ty.is_choice() {
                            d.default = None;
                        }
                        d.ty = ty.clone();
                        d.required = *required;
                    }
                    if spec.default.is_some() {
                        d.default = spec.default.clone();
                    }
                }
                (None, Some((ty, required))) => inherited.push(PropDecl {
                    name,
                    ty: ty.clone(),
                    required: *required,
                    default: spec.default.clone(),
                }),
                (None, None) => return Err(ConfigurationErrorKind::UndeclaredDefault {
                    owner: pt.owner.clone(),
                    name
                }.into())
            }
        }

        pt.index = inherited.iter().enumerate().map(|(i, d)| (d.name.clone(), i)).collect();
        pt.decls = inherited;
        pt.validate_types()?;
        Ok(pt)
    }

    pub fn owner(&self) -> &KString {
        &self.owner
    }

    pub fn decl(&self, name: &str) -> Option<&PropDecl> {
        self.index.get(name).map(|i| &self.decls[*i])
    }

    pub fn decls(&self) -> &[PropDecl] {
        &self.decls
    }

    /// In declaration order, inherited ones first.
    pub fn declared_names(&self) -> impl Iterator<Item = &KString> {
        self.decls.iter().map(|d| &d.name)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &KString> {
        self.decls.iter().filter(|d| d.required).map(|d| &d.name)
    }

    /// `name` is in internal form.
    pub fn allow(&self, name: &str) -> bool {
        self.index.contains_key(name) || is_pass_through(name)
    }

    /// Undeclared names are text.
    pub fn ty(&self, name: &str) -> &PropType {
        match self.decl(name) {
            Some(d) => &d.ty,
            None => &TEXT
        }
    }

    pub fn is_choice(&self, name: &str) -> bool {
        self.ty(name).is_choice()
    }

    pub fn is_bool(&self, name: &str) -> bool {
        self.ty(name).is_bool()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.decl(name).map(|d| d.required).unwrap_or(false)
    }

    /// The first choice for choice props, otherwise the declared
    /// default, if any.
    pub fn default(&self, name: &str) -> Option<&Value> {
        let decl = self.decl(name)?;
        match decl.ty.choice_list() {
            Some(choices) => choices.first(),
            None => decl.default.as_ref()
        }
    }

    /// Check `value` for the prop `name`, returning the value to
    /// store. Bool props normalise the accepted spellings to
    /// `Value::Bool`.
    pub fn validate(&self, name: &str, value: Value) -> Result<Value, ValidationError> {
        let ty = self.ty(name);
        let owner = || self.owner.clone();
        let name_ = || KString::from_ref(name);

        if let PropType::Choices(choices) = ty {
            if ty.matches(&value) {
                return Ok(value)
            }
            return Err(ValidationErrorKind::InvalidChoice {
                owner: owner(),
                name: name_(),
                type_name: value.type_name(),
                value: value.to_string(),
                choices: choices.to_string(),
            }.into())
        }

        if ty.is_bool() {
            // html5 allows the empty string or the attribute name for
            // true
            match &value {
                Value::Bool(b) => return Ok(Value::Bool(*b)),
                Value::Str(s) if s.is_empty() || s.as_str() == name
                    || s.as_str() == to_html(name).as_str() =>
                    return Ok(Value::Bool(true)),
                _ => ()
            }
            match capitalize(&value.to_string()).as_str() {
                "True" => return Ok(Value::Bool(true)),
                "False" => return Ok(Value::Bool(false)),
                _ => ()
            }
            return Err(ValidationErrorKind::InvalidBool {
                owner: owner(),
                name: name_(),
                type_name: value.type_name(),
                value: value.to_string(),
            }.into())
        }

        if ty.matches(&value) {
            Ok(value)
        } else {
            Err(ValidationErrorKind::InvalidType {
                owner: owner(),
                name: name_(),
                expected: ty.to_string(),
                type_name: value.type_name(),
                value: value.to_string(),
            }.into())
        }
    }

    /// Class definition time check: choice props need a non-empty
    /// list of choices and can't have a default, other defaults must
    /// be valid values for their props. Stores the normalised
    /// defaults.
    pub fn validate_types(&mut self) -> Result<(), ConfigurationError> {
        for i in 0..self.decls.len() {
            let decl = &self.decls[i];
            if decl.ty.is_choice() {
                match decl.ty.choice_list() {
                    Some(choices) if !choices.is_empty() => (),
                    _ => return Err(ConfigurationErrorKind::MissingChoices {
                        owner: self.owner.clone(),
                        name: decl.name.clone(),
                    }.into())
                }
                if decl.default.is_some() {
                    return Err(ConfigurationErrorKind::ChoiceDefault {
                        owner: self.owner.clone(),
                        name: decl.name.clone(),
                    }.into())
                }
                continue
            }
            if let Some(default) = decl.default.clone() {
                let name = decl.name.clone();
                let type_name = default.type_name();
                let value = default.to_string();
                let normalised = self.validate(&name, default).map_err(
                    |_| ConfigurationErrorKind::InvalidDefault {
                        owner: self.owner.clone(),
                        name,
                        type_name,
                        value,
                    })?;
                self.decls[i].default = Some(normalised);
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str, ty: PropType) -> PropSpec {
        PropSpec { name: KString::from_ref(name), ty: Some((ty, false)), default: None }
    }

    fn required(name: &str, ty: PropType) -> PropSpec {
        PropSpec { name: KString::from_ref(name), ty: Some((ty, true)), default: None }
    }

    fn with_default(name: &str, ty: PropType, default: impl Into<Value>) -> PropSpec {
        PropSpec { name: KString::from_ref(name), ty: Some((ty, false)),
                   default: Some(default.into()) }
    }

    fn form() -> PropTypes {
        PropTypes::compose("Form", &[], &[], &[
            ty("disabled", PropType::Bool),
            ty("type", PropType::choices(vec!["todo", "thing"])),
            with_default("title", PropType::Str, "Todo"),
            required("count", PropType::Int),
        ]).unwrap()
    }

    #[test]
    fn t_allow_and_names() {
        let pt = form();
        assert!(pt.allow("disabled"));
        assert!(pt.allow("_type"));
        assert!(!pt.allow("type"));
        assert!(pt.allow("data_anything"));
        assert!(pt.allow("aria_label"));
        assert!(!pt.allow("colour"));
        assert_eq!(pt.declared_names().map(|n| n.as_str()).collect::<Vec<_>>(),
                   vec!["disabled", "_type", "title", "count"]);
        assert_eq!(pt.required_names().map(|n| n.as_str()).collect::<Vec<_>>(),
                   vec!["count"]);
        assert!(pt.ty("data_x").matches(&Value::from("x")));
        assert!(!pt.ty("data_x").matches(&Value::from(1)));
    }

    #[test]
    fn t_validate_bool() {
        let pt = form();
        let t = Value::Bool(true);
        let f = Value::Bool(false);
        for v in [Value::from(""), "disabled".into(), true.into(), "true".into(),
                  "TRUE".into(), "True".into()] {
            assert_eq!(pt.validate("disabled", v).unwrap(), t);
        }
        for v in [Value::from(false), "False".into(), "false".into(), "fALSE".into()] {
            assert_eq!(pt.validate("disabled", v).unwrap(), f);
        }
        for v in [Value::from("yes"), 1.into(), Value::None, "disabledx".into()] {
            let e = pt.validate("disabled", v).unwrap_err();
            assert!(matches!(e.kind(), ValidationErrorKind::InvalidBool { .. }));
        }
    }

    #[test]
    fn t_validate_choice() {
        let pt = form();
        assert!(pt.is_choice("_type"));
        assert_eq!(pt.default("_type"), Some(&Value::from("todo")));
        assert_eq!(pt.validate("_type", "thing".into()).unwrap(), Value::from("thing"));
        let e = pt.validate("_type", "stuff".into()).unwrap_err();
        assert_eq!(e.to_string(), "<Form>._type: str `stuff` is not a valid choice, \
                                   expected one of [\"todo\", \"thing\"]");
    }

    #[test]
    fn t_validate_type() {
        let pt = form();
        assert_eq!(pt.validate("count", 2.into()).unwrap(), Value::Int(2));
        let e = pt.validate("count", "2".into()).unwrap_err();
        assert_eq!(e.to_string(), "<Form>.count: str `2` is not a valid value, expected int");
        assert_eq!(pt.default("count"), None);
        assert_eq!(pt.default("title"), Some(&Value::from("Todo")));
        assert_eq!(pt.default("nope"), None);
    }

    #[test]
    fn t_validate_types() {
        let e = PropTypes::compose("Bad", &[], &[], &[
            ty("position", PropType::choices(Value::List(vec![]))),
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::MissingChoices { .. }));

        let e = PropTypes::compose("Bad", &[], &[], &[
            ty("position", PropType::choices("before")),
        ]).unwrap_err();
        assert_eq!(e.to_string(), "<Bad> must have a list of values for prop `position`");

        let e = PropTypes::compose("Bad", &[], &[], &[
            with_default("count", PropType::Int, "three"),
        ]).unwrap_err();
        assert_eq!(e.to_string(), "<Bad>.count: str `three` is not a valid default value");

        let e = PropTypes::compose("Bad", &[], &[], &[
            ty("a b", PropType::Int),
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::InvalidPropName { .. }));

        // normalised
        let pt = PropTypes::compose("Ok", &[], &[], &[
            with_default("hidden", PropType::Bool, ""),
        ]).unwrap();
        assert_eq!(pt.default("hidden"), Some(&Value::Bool(true)));
    }

    #[test]
    fn t_inheritance() {
        let a = PropTypes::compose("A", &[], &[], &[
            with_default("x", PropType::Int, 1),
            ty("y", PropType::Str),
        ]).unwrap();
        let b = PropTypes::compose("B", &[], &[], &[
            ty("x", PropType::union([PropType::Int, PropType::Str])),
        ]).unwrap();
        // later parents override, defaults inherited separately
        let c = PropTypes::compose("C", &[&a, &b], &[], &[]).unwrap();
        assert_eq!(c.ty("x").to_string(), "int | str");
        assert_eq!(c.default("x"), Some(&Value::Int(1)));
        let c = PropTypes::compose("C", &[&b, &a], &[], &[]).unwrap();
        assert_eq!(c.ty("x").to_string(), "int");

        // own overrides
        let d = PropTypes::compose("D", &[&a], &[], &[
            PropSpec { name: KString::from_static("x"), ty: None, default: Some(5.into()) },
            required("y", PropType::Str),
        ]).unwrap();
        assert_eq!(d.default("x"), Some(&Value::Int(5)));
        assert!(d.is_required("y"));
        assert!(!a.is_required("y"));

        // overriding the default with an invalid one
        let e = PropTypes::compose("E", &[&a], &[], &[
            PropSpec { name: KString::from_static("x"), ty: None, default: Some("5".into()) },
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::InvalidDefault { .. }));

        // a default for nothing
        let e = PropTypes::compose("E", &[&a], &[], &[
            PropSpec { name: KString::from_static("z"), ty: None, default: Some(5.into()) },
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::UndeclaredDefault { .. }));
    }

    #[test]
    fn t_choice_default() {
        let e = PropTypes::compose("P", &[], &[], &[
            with_default("pos", PropType::choices(vec!["a", "b"]), "zzz"),
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::ChoiceDefault { .. }));
        // even a valid choice
        let e = PropTypes::compose("P", &[], &[], &[
            with_default("pos", PropType::choices(vec!["a", "b"]), "b"),
        ]).unwrap_err();
        assert_eq!(e.to_string(), "<P>.pos: choice props default to their first choice, \
                                   a default value can't be given");

        // overriding the default of an inherited choice prop
        let base = PropTypes::compose("Base", &[], &[], &[
            ty("pos", PropType::choices(vec!["a", "b"])),
        ]).unwrap();
        let e = PropTypes::compose("S", &[&base], &[], &[
            PropSpec { name: KString::from_static("pos"), ty: None, default: Some("b".into()) },
        ]).unwrap_err();
        assert!(matches!(e.kind(), ConfigurationErrorKind::ChoiceDefault { .. }));

        // redeclaring an inherited prop as a choice drops its default
        let a = PropTypes::compose("A", &[], &[], &[
            with_default("pos", PropType::Str, "x"),
        ]).unwrap();
        let c = PropTypes::compose("C", &[&a], &[], &[
            ty("pos", PropType::choices(vec!["a", "b"])),
        ]).unwrap();
        assert_eq!(c.default("pos"), Some(&Value::from("a")));
    }

    #[test]
    fn t_exclude() {
        let a = PropTypes::compose("A", &[], &[], &[
            required("todos", PropType::list(PropType::Any)),
            ty("type", PropType::choices(vec!["todo", "thing"])),
        ]).unwrap();
        let hoc = PropTypes::compose("Hoc", &[&a], &[KString::from_static("type")], &[]).unwrap();
        assert!(!hoc.allow("_type"));
        assert!(hoc.allow("todos"));
        let hoc = PropTypes::compose("Hoc", &[&a], &[KString::from_static("todos")], &[]).unwrap();
        assert!(!hoc.allow("todos"));
        assert_eq!(hoc.required_names().count(), 0);
        // redeclared after exclusion
        let re = PropTypes::compose("Re", &[&a], &[KString::from_static("todos")], &[
            ty("todos", PropType::Int)
        ]).unwrap();
        assert!(!re.is_required("todos"));
    }
}
