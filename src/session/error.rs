use thiserror::Error;

use crate::http::error::ApiError;

/// Form input rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields.")]
    LoginFieldsMissing,

    #[error("All fields are required")]
    SignupFieldsMissing,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The server answered with `Status: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Server error. Please try again later.")]
    Transport(#[source] ApiError),
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::LoginFieldsMissing);
    }
    Ok(())
}

pub fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::SignupFieldsMissing);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            validate_login("  ", "secret").unwrap_err().to_string(),
            "Please fill all fields."
        );
        assert!(validate_login("a@b.c", "").is_err());
        assert!(validate_login("a@b.c", "secret").is_ok());
    }

    #[test]
    fn signup_requires_every_field() {
        assert_eq!(
            validate_signup("", "a@b.c", "pw").unwrap_err().to_string(),
            "All fields are required"
        );
        assert!(validate_signup("ann", "a@b.c", "pw").is_ok());
    }
}
