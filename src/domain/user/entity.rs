use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::full_name::FULL_NAME_MAX_LENGTH;
use super::user_email::EMAIL_MAX_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Email,
    Text,
    Password,
}

/// Metadata of a `users` column that a form may collect from a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub unique: bool,
}

/// A stored user account. The password hash is never loaded into this type.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

static FORM_FIELDS: [EntityField; 2] = [CustomUser::EMAIL, CustomUser::FULL_NAME];

impl CustomUser {
    pub const EMAIL: EntityField = EntityField {
        name: "email",
        label: "email address",
        kind: FieldKind::Email,
        required: true,
        max_length: Some(EMAIL_MAX_LENGTH),
        unique: true,
    };

    pub const FULL_NAME: EntityField = EntityField {
        name: "full_name",
        label: "full name",
        kind: FieldKind::Text,
        required: true,
        max_length: Some(FULL_NAME_MAX_LENGTH),
        unique: false,
    };

    /// Columns a form is allowed to expose. `id`, `password`, the flags and
    /// timestamps are managed by the application.
    pub fn form_fields() -> &'static [EntityField] {
        &FORM_FIELDS
    }

    pub fn field(name: &str) -> Option<&'static EntityField> {
        FORM_FIELDS.iter().find(|field| field.name == name)
    }
}
