use sqlx::PgPool;

use crate::domain::{CustomUser, NewUser};
use crate::forms::{
    FieldDescriptor, FormConfigError, FormData, FormErrors, PasswordPolicy, SaveError,
    UserCreationForm,
};

/// Sign-up form for `CustomUser`: collects the email address and full name
/// next to the two password inputs of the base creation form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    fields: &'static [&'static str],
    base: UserCreationForm,
}

impl RegistrationForm {
    pub const FIELDS: &'static [&'static str] = &["email", "full_name", "password1", "password2"];

    pub fn new(policy: PasswordPolicy) -> Result<Self, FormConfigError> {
        Self::with_fields(Self::FIELDS, policy)
    }

    /// Builds a form exposing `fields` in the given order. Every name must be
    /// an entity field or a base form field, and all of those needed to
    /// create a user must be present.
    pub fn with_fields(
        fields: &'static [&'static str],
        policy: PasswordPolicy,
    ) -> Result<Self, FormConfigError> {
        if policy.min_length > policy.max_length {
            return Err(FormConfigError::InvalidPasswordPolicy {
                min: policy.min_length,
                max: policy.max_length,
            });
        }

        for (position, &field) in fields.iter().enumerate() {
            if fields[..position].contains(&field) {
                return Err(FormConfigError::DuplicateField(field));
            }
            if CustomUser::field(field).is_none() && !UserCreationForm::supplies(field) {
                return Err(FormConfigError::UnknownField(field));
            }
        }

        let entity_required = CustomUser::form_fields()
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name);
        for required in entity_required.chain(UserCreationForm::PASSWORD_FIELDS) {
            if !fields.contains(&required) {
                return Err(FormConfigError::MissingField(required));
            }
        }

        Ok(Self {
            fields,
            base: UserCreationForm::new(policy),
        })
    }

    pub fn fields(&self) -> &[&'static str] {
        self.fields
    }

    pub fn describe(&self) -> Vec<FieldDescriptor> {
        self.fields
            .iter()
            .filter_map(|field| self.base.describe_field(field))
            .collect()
    }

    /// Attaches a submission to the form. Keys that are not declared fields are ignored.
    pub fn bind(&self, data: FormData) -> BoundForm<'_> {
        BoundForm {
            form: self,
            data: data.restrict_to(self.fields),
        }
    }
}

pub struct BoundForm<'a> {
    form: &'a RegistrationForm,
    data: FormData,
}

impl BoundForm<'_> {
    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn clean(&self) -> Result<NewUser, FormErrors> {
        self.form.base.clean(self.form.fields, &self.data)
    }

    pub fn is_valid(&self) -> bool {
        self.clean().is_ok()
    }

    /// Cleans, checks uniqueness against stored users, then creates the user.
    pub async fn save(&self, pool: &PgPool) -> Result<CustomUser, SaveError> {
        let user = self.clean().map_err(SaveError::Invalid)?;
        self.form.base.validate_unique(&user, pool).await?;
        self.form.base.save(user, pool).await
    }
}
