use secrecy::Secret;

/// A password that passed the confirmation and policy checks of the creation form.
///
/// Never trimmed: surrounding whitespace is part of the password.
#[derive(Debug)]
pub struct UserPassword(Secret<String>);

impl UserPassword {
    pub fn new(password: Secret<String>) -> Self {
        Self(password)
    }

    pub fn as_secret(&self) -> &Secret<String> {
        &self.0
    }

    pub fn into_secret(self) -> Secret<String> {
        self.0
    }
}
