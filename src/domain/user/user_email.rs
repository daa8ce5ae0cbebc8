use std::fmt::{self, Display, Formatter};

use validator::ValidateEmail;

use crate::forms::FieldError;

/// Longest address the `users.email` column accepts (RFC 5321 path limit).
pub const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEmail(String);

impl UserEmail {
    /// Returns a normalized `UserEmail`: trimmed, with the domain part lower-cased.
    pub fn parse(s: String) -> Result<Self, FieldError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(FieldError::Required);
        }

        let normalized = normalize(trimmed);

        let length = normalized.chars().count();
        if length > EMAIL_MAX_LENGTH {
            return Err(FieldError::MaxLength {
                max: EMAIL_MAX_LENGTH,
                length,
            });
        }

        if !normalized.as_str().validate_email() {
            return Err(FieldError::InvalidEmail);
        }

        Ok(UserEmail(normalized))
    }

    /// Part before the `@`, used by the password similarity check.
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

fn normalize(address: &str) -> String {
    match address.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => address.to_string(),
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
