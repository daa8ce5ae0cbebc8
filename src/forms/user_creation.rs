use std::fmt::{self, Debug, Formatter};

use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sqlx::PgPool;

use crate::domain::{CustomUser, FieldKind, FullName, NewUser, UserEmail, UserPassword};
use crate::forms::password_validation::{
    PasswordPolicy, UserAttributes, password_validators_help_texts, validate_password,
};
use crate::forms::{FieldError, FormData, FormErrors};
use crate::repository::{self, InsertUserError};
use crate::{authentication, telemetry, utils};

pub const PASSWORD1: &str = "password1";
pub const PASSWORD2: &str = "password2";

/// What a view layer needs to render one input of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub help_text: Vec<String>,
}

#[derive(thiserror::Error)]
pub enum SaveError {
    #[error("The submitted form is invalid.")]
    Invalid(FormErrors),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl Debug for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

/// Account creation shared by every registration form: cleans the declared
/// entity fields, confirms the password against the policy, and stores the user.
#[derive(Debug, Clone, Default)]
pub struct UserCreationForm {
    policy: PasswordPolicy,
}

impl UserCreationForm {
    pub const PASSWORD_FIELDS: [&'static str; 2] = [PASSWORD1, PASSWORD2];

    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Whether `field` is contributed by this form rather than by the entity.
    pub fn supplies(field: &str) -> bool {
        Self::PASSWORD_FIELDS.contains(&field)
    }

    pub fn describe_field(&self, name: &str) -> Option<FieldDescriptor> {
        if let Some(field) = CustomUser::field(name) {
            return Some(FieldDescriptor {
                name: field.name,
                label: capitalize(field.label),
                kind: field.kind,
                required: field.required,
                max_length: field.max_length,
                help_text: Vec::new(),
            });
        }

        match name {
            PASSWORD1 => Some(FieldDescriptor {
                name: PASSWORD1,
                label: "Password".into(),
                kind: FieldKind::Password,
                required: true,
                max_length: None,
                help_text: password_validators_help_texts(&self.policy),
            }),
            PASSWORD2 => Some(FieldDescriptor {
                name: PASSWORD2,
                label: "Password confirmation".into(),
                kind: FieldKind::Password,
                required: true,
                max_length: None,
                help_text: vec!["Enter the same password as before, for verification.".into()],
            }),
            _ => None,
        }
    }

    /// Validates `data` for the given fields without touching the database.
    pub fn clean(&self, fields: &[&'static str], data: &FormData) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::default();
        let mut email = None;
        let mut full_name = None;
        let mut password1 = None;
        let mut password2 = None;

        for &field in fields {
            let value = data.get(field);
            match field {
                f if f == CustomUser::EMAIL.name => {
                    email = clean_entity_field(field, value, UserEmail::parse, &mut errors);
                }
                f if f == CustomUser::FULL_NAME.name => {
                    full_name = clean_entity_field(field, value, FullName::parse, &mut errors);
                }
                PASSWORD1 => password1 = clean_password_field(field, value, &mut errors),
                PASSWORD2 => password2 = clean_password_field(field, value, &mut errors),
                _ => {}
            }
        }

        if let (Some(password1), Some(password2)) = (&password1, &password2) {
            if password1.expose_secret() != password2.expose_secret() {
                errors.add(PASSWORD2, FieldError::PasswordMismatch);
            } else {
                let user = UserAttributes {
                    email: email.as_ref(),
                    full_name: full_name.as_ref(),
                };
                if let Err(violations) =
                    validate_password(password2.expose_secret(), &user, &self.policy)
                {
                    errors.extend(PASSWORD2, violations);
                }
            }
        }

        errors.into_result()?;
        match (email, full_name, password2) {
            (Some(email), Some(full_name), Some(password)) => Ok(NewUser {
                email,
                full_name,
                password: UserPassword::new(password),
            }),
            // `fields` left out a field needed to create a user.
            _ => Err(FormErrors::default()),
        }
    }

    #[tracing::instrument(skip_all, fields(user_email = %user.email))]
    pub async fn validate_unique(&self, user: &NewUser, pool: &PgPool) -> Result<(), SaveError> {
        if repository::email_exists(&user.email, pool).await? {
            return Err(SaveError::Invalid(FormErrors::single(
                CustomUser::EMAIL.name,
                FieldError::Unique,
            )));
        }
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(user_email = %user.email))]
    pub async fn save(&self, user: NewUser, pool: &PgPool) -> Result<CustomUser, SaveError> {
        let NewUser {
            email,
            full_name,
            password,
        } = user;

        let password_hash = telemetry::spawn_blocking_with_tracing(move || {
            authentication::compute_password_hash(password.into_secret())
        })
        .await
        .context("Failed to spawn blocking task.")?
        .context("Failed to hash password")?;

        let mut transaction = pool
            .begin()
            .await
            .context("Failed to acquire a Postgres connection from the pool")?;

        // A concurrent registration can claim the address after `validate_unique`.
        let user =
            match repository::insert_user(&email, &full_name, password_hash, &mut transaction).await
            {
                Ok(user) => user,
                Err(InsertUserError::DuplicateEmail) => {
                    return Err(SaveError::Invalid(FormErrors::single(
                        CustomUser::EMAIL.name,
                        FieldError::Unique,
                    )));
                }
                Err(InsertUserError::Unexpected(e)) => return Err(e.into()),
            };

        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to store a new user")?;

        tracing::info!(user_id = %user.id, "Registered a new user");
        Ok(user)
    }
}

fn clean_entity_field<T>(
    field: &'static str,
    value: Option<&str>,
    parse: fn(String) -> Result<T, FieldError>,
    errors: &mut FormErrors,
) -> Option<T> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse(value.to_string())
            .map_err(|e| errors.add(field, e))
            .ok(),
        None => {
            errors.add(field, FieldError::Required);
            None
        }
    }
}

// Passwords are compared and stored exactly as submitted, whitespace included.
fn clean_password_field(
    field: &'static str,
    value: Option<&str>,
    errors: &mut FormErrors,
) -> Option<Secret<String>> {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => Some(Secret::new(value.to_string())),
        None => {
            errors.add(field, FieldError::Required);
            None
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
