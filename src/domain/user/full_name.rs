use std::fmt::{self, Display, Formatter};

use unicode_segmentation::UnicodeSegmentation;

use crate::forms::FieldError;

pub const FULL_NAME_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Returns a trimmed `FullName` if all conditions are met.
    pub fn parse(s: String) -> Result<Self, FieldError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(FieldError::Required);
        }

        let length = trimmed.graphemes(true).count();
        if length > FULL_NAME_MAX_LENGTH {
            return Err(FieldError::MaxLength {
                max: FULL_NAME_MAX_LENGTH,
                length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for FullName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
