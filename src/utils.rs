use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::forms::FormErrors;

#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a FormErrors>,
}

pub fn build_error_response(status_code: StatusCode, message: String) -> HttpResponse {
    let error_response = ErrorResponse {
        code: status_code.as_u16(),
        message,
        errors: None,
    };
    HttpResponse::build(status_code).json(error_response)
}

/// 400 response listing the field-level errors of a rejected form.
pub fn build_form_error_response(message: String, errors: &FormErrors) -> HttpResponse {
    let status_code = StatusCode::BAD_REQUEST;
    let error_response = ErrorResponse {
        code: status_code.as_u16(),
        message,
        errors: Some(errors),
    };
    HttpResponse::build(status_code).json(error_response)
}

pub fn error_chain_fmt(
    e: &dyn std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}")?;

    let mut current = e.source();
    while let Some(cause) = current {
        // Debug for causes under `{:#?}`, Display otherwise
        if f.alternate() {
            writeln!(f, "Caused by:\n\t{cause:?}")?;
        } else {
            writeln!(f, "Caused by:\n\t{cause}")?;
        }
        current = cause.source();
    }
    Ok(())
}
