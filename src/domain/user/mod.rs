mod entity;
mod full_name;
mod user_email;
mod user_password;

pub use entity::*;
pub use full_name::FullName;
pub use user_email::UserEmail;
pub use user_password::UserPassword;

/// A cleaned registration, ready to be stored as a `CustomUser`.
#[derive(Debug)]
pub struct NewUser {
    pub email: UserEmail,
    pub full_name: FullName,
    pub password: UserPassword,
}
