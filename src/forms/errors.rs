use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// A single validation failure attached to one form field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Ensure this value has at most {max} characters (it has {length}).")]
    MaxLength { max: usize, length: usize },

    #[error("A user with that email already exists.")]
    Unique,

    #[error("The two password fields didn't match.")]
    PasswordMismatch,

    #[error("This password is too short. It must contain at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("This password is too long. It must contain at most {max} characters.")]
    PasswordTooLong { max: usize },

    #[error("The password is too similar to the {label}.")]
    PasswordTooSimilar { label: &'static str },

    #[error("This password is too common.")]
    PasswordTooCommon,

    #[error("This password is entirely numeric.")]
    PasswordEntirelyNumeric,
}

impl FieldError {
    /// Stable machine-readable identifier, safe for clients to match on.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::InvalidEmail => "invalid",
            FieldError::MaxLength { .. } => "max_length",
            FieldError::Unique => "unique",
            FieldError::PasswordMismatch => "password_mismatch",
            FieldError::PasswordTooShort { .. } => "password_too_short",
            FieldError::PasswordTooLong { .. } => "password_too_long",
            FieldError::PasswordTooSimilar { .. } => "password_too_similar",
            FieldError::PasswordTooCommon => "password_too_common",
            FieldError::PasswordEntirelyNumeric => "password_entirely_numeric",
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub field: &'static str,
    pub messages: Vec<FieldError>,
}

/// Every field-level error of a bound form, in the order fields were checked.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<FieldErrors>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        match self.0.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.messages.push(error),
            None => self.0.push(FieldErrors {
                field,
                messages: vec![error],
            }),
        }
    }

    pub fn extend(&mut self, field: &'static str, errors: impl IntoIterator<Item = FieldError>) {
        for error in errors {
            self.add(field, error);
        }
    }

    pub fn single(field: &'static str, error: FieldError) -> Self {
        let mut errors = Self::default();
        errors.add(field, error);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[FieldError]> {
        self.0
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.messages.as_slice())
    }

    pub fn contains(&self, field: &str, error: &FieldError) -> bool {
        self.get(field).is_some_and(|errors| errors.contains(error))
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|entry| entry.field)
    }

    /// Turns an accumulated error set into the outcome of a validation pass.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.0 {
            for message in &entry.messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {message}", entry.field)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Raised when a form declaration does not line up with the entity and base form.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormConfigError {
    #[error("Field `{0}` is neither defined on the user entity nor supplied by the base form.")]
    UnknownField(&'static str),

    #[error("Field `{0}` is declared more than once.")]
    DuplicateField(&'static str),

    #[error("Field `{0}` must be declared: it is required to create a user.")]
    MissingField(&'static str),

    #[error("Password policy minimum length {min} exceeds its maximum length {max}.")]
    InvalidPasswordPolicy { min: usize, max: usize },
}
