use std::fmt;
use std::fmt::{Debug, Formatter};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{Span, field};
use uuid::Uuid;

use crate::domain::CustomUser;
use crate::forms::{FieldDescriptor, FormData, FormErrors, RegistrationForm, SaveError};
use crate::utils;

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("Registration form is invalid.")]
    ValidationError(FormErrors),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<SaveError> for RegisterError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Invalid(errors) => RegisterError::ValidationError(errors),
            SaveError::Unexpected(e) => RegisterError::UnexpectedError(e),
        }
    }
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            RegisterError::ValidationError(errors) => {
                utils::build_form_error_response(self.to_string(), errors)
            }
            RegisterError::UnexpectedError(_) => {
                utils::build_error_response(self.status_code(), self.to_string())
            }
        }
    }
}

#[derive(Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

impl From<CustomUser> for RegisteredUser {
    fn from(user: CustomUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationFields {
    pub fields: Vec<FieldDescriptor>,
}

/// Input descriptors of the sign-up form, in the order they are collected.
pub async fn registration_fields(registration_form: web::Data<RegistrationForm>) -> HttpResponse {
    HttpResponse::Ok().json(RegistrationFields {
        fields: registration_form.describe(),
    })
}

#[tracing::instrument(
    skip_all,
    fields(
        user_email = tracing::field::Empty,
        user_id = tracing::field::Empty
    )
)]
pub async fn register_user(
    form: web::Form<FormData>,
    registration_form: web::Data<RegistrationForm>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, RegisterError> {
    let bound = registration_form.bind(form.into_inner());
    if let Some(email) = bound.data().get("email") {
        Span::current().record("user_email", field::display(email));
    }

    let user = bound.save(&pool).await?;
    Span::current().record("user_id", field::display(user.id));

    Ok(HttpResponse::Created().json(RegisteredUser::from(user)))
}
