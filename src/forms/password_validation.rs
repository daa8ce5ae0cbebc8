use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{CustomUser, FullName, UserEmail};
use crate::forms::FieldError;

/// Tunable parts of the password policy, read from the `password_policy` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    pub fn validators(&self) -> [PasswordValidator; 5] {
        [
            PasswordValidator::UserAttributeSimilarity,
            PasswordValidator::MinimumLength(self.min_length),
            PasswordValidator::MaximumLength(self.max_length),
            PasswordValidator::CommonPassword,
            PasswordValidator::Numeric,
        ]
    }
}

/// The cleaned user values a password is compared against. A field that
/// failed its own validation is `None` and is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserAttributes<'a> {
    pub email: Option<&'a UserEmail>,
    pub full_name: Option<&'a FullName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordValidator {
    UserAttributeSimilarity,
    MinimumLength(usize),
    MaximumLength(usize),
    CommonPassword,
    Numeric,
}

impl PasswordValidator {
    pub fn validate(&self, password: &str, user: &UserAttributes<'_>) -> Result<(), FieldError> {
        match *self {
            PasswordValidator::UserAttributeSimilarity => check_similarity(password, user),
            PasswordValidator::MinimumLength(min) => {
                if password.graphemes(true).count() < min {
                    return Err(FieldError::PasswordTooShort { min });
                }
                Ok(())
            }
            PasswordValidator::MaximumLength(max) => {
                if password.graphemes(true).count() > max {
                    return Err(FieldError::PasswordTooLong { max });
                }
                Ok(())
            }
            PasswordValidator::CommonPassword => {
                let candidate = password.trim().to_lowercase();
                if COMMON_PASSWORDS.contains(&candidate.as_str()) {
                    return Err(FieldError::PasswordTooCommon);
                }
                Ok(())
            }
            PasswordValidator::Numeric => {
                if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
                    return Err(FieldError::PasswordEntirelyNumeric);
                }
                Ok(())
            }
        }
    }

    pub fn help_text(&self) -> String {
        match self {
            PasswordValidator::UserAttributeSimilarity => {
                "Your password can't be too similar to your other personal information.".into()
            }
            PasswordValidator::MinimumLength(min) => {
                format!("Your password must contain at least {min} characters.")
            }
            PasswordValidator::MaximumLength(max) => {
                format!("Your password must contain at most {max} characters.")
            }
            PasswordValidator::CommonPassword => {
                "Your password can't be a commonly used password.".into()
            }
            PasswordValidator::Numeric => "Your password can't be entirely numeric.".into(),
        }
    }
}

/// Runs every validator of the policy and collects all violations.
pub fn validate_password(
    password: &str,
    user: &UserAttributes<'_>,
    policy: &PasswordPolicy,
) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = policy
        .validators()
        .iter()
        .filter_map(|validator| validator.validate(password, user).err())
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn password_validators_help_texts(policy: &PasswordPolicy) -> Vec<String> {
    policy
        .validators()
        .iter()
        .map(PasswordValidator::help_text)
        .collect()
}

// Fragments shorter than this match far too many passwords to be meaningful.
const MIN_SIMILARITY_LENGTH: usize = 3;

fn check_similarity(password: &str, user: &UserAttributes<'_>) -> Result<(), FieldError> {
    let password = password.to_lowercase();

    if let Some(email) = user.email {
        let candidates = [email.as_ref(), email.local_part()];
        if overlaps(&password, candidates) {
            return Err(FieldError::PasswordTooSimilar {
                label: CustomUser::EMAIL.label,
            });
        }
    }

    if let Some(full_name) = user.full_name {
        let candidates = std::iter::once(full_name.as_ref()).chain(full_name.words());
        if overlaps(&password, candidates) {
            return Err(FieldError::PasswordTooSimilar {
                label: CustomUser::FULL_NAME.label,
            });
        }
    }

    Ok(())
}

fn overlaps<'a>(password: &str, candidates: impl IntoIterator<Item = &'a str>) -> bool {
    let password_is_long_enough = password.graphemes(true).count() >= MIN_SIMILARITY_LENGTH;

    candidates
        .into_iter()
        .map(str::to_lowercase)
        .filter(|candidate| candidate.graphemes(true).count() >= MIN_SIMILARITY_LENGTH)
        .any(|candidate| {
            password.contains(&candidate) || (password_is_long_enough && candidate.contains(password))
        })
}

const COMMON_PASSWORDS: &[&str] = &[
    "000000", "111111", "112233", "121212", "123123", "123321", "1234", "12345", "123456",
    "1234567", "12345678", "123456789", "1234567890", "123qwe", "1q2w3e", "1q2w3e4r",
    "1q2w3e4r5t", "654321", "666666", "696969", "7777777", "987654321", "aaaaaa", "abc123",
    "abcd1234", "access", "admin", "admin123", "administrator", "asdfgh", "asdfghjkl",
    "azerty", "baseball", "batman", "charlie", "changeme", "computer", "daniel", "dragon",
    "football", "freedom", "hello", "hello123", "hunter2", "iloveyou", "jennifer", "jordan",
    "killer", "letmein", "login", "lovely", "master", "michael", "monkey", "mustang",
    "passw0rd", "password", "password1", "password12", "password123", "princess", "qazwsx",
    "qwerty", "qwerty123", "qwertyuiop", "secret", "shadow", "starwars", "sunshine",
    "superman", "trustno1", "welcome", "welcome1", "whatever", "zaq12wsx", "zxcvbnm",
];
