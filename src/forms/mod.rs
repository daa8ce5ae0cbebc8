mod errors;
mod form_data;
pub mod password_validation;
mod registration;
mod user_creation;

pub use errors::*;
pub use form_data::FormData;
pub use password_validation::PasswordPolicy;
pub use registration::*;
pub use user_creation::*;
