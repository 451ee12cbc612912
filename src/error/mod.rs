pub(crate) mod internal;

use std::fmt;
use std::io;

use crate::core::AuthError;

// Errors surfaced to callers of the crate.
// Failures of a single submit never show up here, the auth surface handles them locally.
#[derive(Debug)]
pub enum GateError {
    // Route must be an absolute path.
    InvalidRoute { route: String },
    // The shell task is gone and can no longer accept input.
    ShellClosed,
    // Identity provider failed outside of a submit, e.g. the startup fetch.
    Provider(AuthError),
    // Configuration or data file could not be decoded.
    Decode { description: String },
    Io(io::Error),
    Internal(String),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GateError::InvalidRoute { route } => {
                write!(f, "invalid route {:?}. route must start with '/'", route)
            }
            GateError::ShellClosed => write!(f, "shell closed"),
            GateError::Provider(err) => write!(f, "identity provider: {}", err),
            GateError::Decode { description } => write!(f, "decode error. {}", description),
            GateError::Io(err) => err.fmt(f),
            GateError::Internal(description) => write!(f, "internal error. {}", description),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Provider(err) => Some(err),
            GateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GateError {
    fn from(err: io::Error) -> Self {
        GateError::Io(err)
    }
}

impl From<AuthError> for GateError {
    fn from(err: AuthError) -> Self {
        GateError::Provider(err)
    }
}

impl From<internal::Error> for GateError {
    fn from(err: internal::Error) -> Self {
        use internal::ErrorKind;
        match err.into_kind() {
            ErrorKind::Io(err) => GateError::Io(err),
            ErrorKind::Yaml(err) => GateError::Decode {
                description: err.to_string(),
            },
            ErrorKind::Json(err) => GateError::Decode {
                description: err.to_string(),
            },
            ErrorKind::Provider(err) => GateError::Provider(err),
        }
    }
}
