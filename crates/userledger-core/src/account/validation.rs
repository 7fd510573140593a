//! Input validation for account creation.
//!
//! Presence checks only; format and strength policy belong to callers.

use super::model::NewAccount;

/// Validation error for a single missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Display name is empty.
    EmptyName,
    /// Email address is empty.
    EmptyEmail,
    /// Password is empty.
    EmptyPassword,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Name is required",
            Self::EmptyEmail => "Email address is required",
            Self::EmptyPassword => "Password is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Every validation failure from one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check that all required creation fields are present.
///
/// # Errors
///
/// Returns every missing field in one [`ValidationErrors`] value.
pub fn validate_new_account(request: &NewAccount) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if request.email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    }
    if request.password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    }

    if errors.is_empty() { Ok(()) } else { Err(ValidationErrors(errors)) }
}
