use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::identity::AuthError;

// WHATWG "valid e-mail address", the check browsers run on <input type=email>.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Structured code for a rejected sign in, when the provider sends one.
pub const INVALID_CREDENTIALS_CODE: &str = "invalid_credentials";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEmail,
    PasswordTooShort { min: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail => write!(f, "Please enter a valid email address."),
            ValidationError::PasswordTooShort { min } => {
                write!(f, "Password must be at least {} characters.", min)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn validate_credentials(
    email: &str,
    password: &str,
    min_password_len: usize,
) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    // Measured in UTF-16 code units, as the browser's minlength rule does.
    if password.encode_utf16().count() < min_password_len {
        return Err(ValidationError::PasswordTooShort {
            min: min_password_len,
        });
    }
    Ok(())
}

/// Whether a failed sign in means "no such account".
///
/// A structured code decides when present. Otherwise fall back to looking for
/// `marker` in the message, which breaks silently if the provider rewords it.
pub fn is_invalid_credentials(err: &AuthError, marker: &str) -> bool {
    match err.code() {
        Some(code) => code == INVALID_CREDENTIALS_CODE,
        None => err.message().contains(marker),
    }
}
