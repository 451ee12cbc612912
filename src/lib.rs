#![allow(clippy::module_inception)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod locale;

pub use crate::error::GateError;
pub type Result<T, E = crate::error::GateError> = std::result::Result<T, E>;

pub use crate::core::{Identity, Route};

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Time = chrono::DateTime<chrono::Utc>;

    pub use tracing::{debug, error, info, trace, warn};
}
