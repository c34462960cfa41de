//! Error types for class definition and prop access. Rendering
//! itself uses `anyhow`.

use kstring::KString;
use crate::def_boxed_thiserror;

def_boxed_thiserror!(ConfigurationError, pub enum ConfigurationErrorKind {
    #[error("<{owner}> must have a list of values for prop `{name}`")]
    MissingChoices { owner: KString, name: KString },
    #[error("<{owner}>.{name}: {type_name} `{value}` is not a valid default value")]
    InvalidDefault { owner: KString, name: KString, type_name: &'static str, value: String },
    #[error("<{owner}>.{name}: choice props default to their first choice, \
             a default value can't be given")]
    ChoiceDefault { owner: KString, name: KString },
    #[error("<{owner}>.{name}: default value given for a prop without a type")]
    UndeclaredDefault { owner: KString, name: KString },
    #[error("<{owner}>: {name:?} is not a valid prop name")]
    InvalidPropName { owner: KString, name: String },
});

def_boxed_thiserror!(StructuralError, pub enum StructuralErrorKind {
    #[error("<{tag}> has no prop named \"{name}\"")]
    UnknownProp { tag: KString, name: KString },
    #[error("{name:?} is not a valid prop name")]
    InvalidName { name: String },
    #[error("<{tag}>: {name:?} is not a valid prop name")]
    InvalidPropName { tag: KString, name: String },
    #[error("<{tag}> is missing required prop \"{name}\"")]
    MissingRequiredProp { tag: KString, name: KString },
    #[error("{name} is not defined")]
    NotDefined { name: KString },
    #[error("<{tag}>.{name}: expected {expected}, got {type_name} `{value}`")]
    UnexpectedType { tag: KString, name: KString, expected: &'static str,
                     type_name: &'static str, value: String },
});

def_boxed_thiserror!(ValidationError, pub enum ValidationErrorKind {
    #[error("<{owner}>.{name}: {type_name} `{value}` is not a valid choice, \
             expected one of {choices}")]
    InvalidChoice { owner: KString, name: KString, type_name: &'static str, value: String,
                    choices: String },
    #[error("<{owner}>.{name}: {type_name} `{value}` is not a valid value, \
             expected a bool, \"\" or {name:?}")]
    InvalidBool { owner: KString, name: KString, type_name: &'static str, value: String },
    #[error("<{owner}>.{name}: {type_name} `{value}` is not a valid value, expected {expected}")]
    InvalidType { owner: KString, name: KString, expected: String, type_name: &'static str,
                  value: String },
});

impl ValidationError {
    /// The name of the prop that failed validation.
    pub fn prop_name(&self) -> &KString {
        match self.kind() {
            ValidationErrorKind::InvalidChoice { name, .. } => name,
            ValidationErrorKind::InvalidBool { name, .. } => name,
            ValidationErrorKind::InvalidType { name, .. } => name,
        }
    }
}

/// What can go wrong when setting or reading a prop.
#[derive(thiserror::Error, Debug)]
pub enum PropError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<StructuralErrorKind> for PropError {
    fn from(kind: StructuralErrorKind) -> Self {
        PropError::Structural(kind.into())
    }
}

impl From<ValidationErrorKind> for PropError {
    fn from(kind: ValidationErrorKind) -> Self {
        PropError::Validation(kind.into())
    }
}

impl PropError {
    pub fn structural(&self) -> Option<&StructuralErrorKind> {
        match self {
            PropError::Structural(e) => Some(e.kind()),
            PropError::Validation(_) => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationErrorKind> {
        match self {
            PropError::Structural(_) => None,
            PropError::Validation(e) => Some(e.kind()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_messages() {
        let e = PropError::from(StructuralErrorKind::UnknownProp {
            tag: KString::from_static("TodoForm"),
            name: KString::from_static("colour"),
        });
        assert_eq!(e.to_string(), "<TodoForm> has no prop named \"colour\"");
        assert!(matches!(e.structural(), Some(StructuralErrorKind::UnknownProp { .. })));
        assert!(e.validation().is_none());

        let e = ConfigurationError::from(ConfigurationErrorKind::MissingChoices {
            owner: KString::from_static("Todo"),
            name: KString::from_static("type"),
        });
        assert_eq!(e.to_string(), "<Todo> must have a list of values for prop `type`");

        let e = ValidationError::from(ValidationErrorKind::InvalidType {
            owner: KString::from_static("Todo"),
            name: KString::from_static("count"),
            expected: "int".into(),
            type_name: "str",
            value: "three".into(),
        });
        assert_eq!(e.prop_name().as_str(), "count");
        assert_eq!(e.to_string(),
                   "<Todo>.count: str `three` is not a valid value, expected int");
    }
}
