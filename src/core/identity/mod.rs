//! Contract with the external identity service.
//!
//! The service owns accounts and sessions. This crate only reads the current
//! identity, listens for changes and forwards credentials.

mod memory;
pub use self::memory::{InMemoryProvider, UserEntry};

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::Route;

/// Marker that someone is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Failure reported by the identity service.
///
/// `message` is meant for humans. `code` is set when the service exposes a
/// machine readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    message: String,
    code: Option<String>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug, Clone)]
pub struct SignUpOptions {
    // Where the confirmation link sends the new user.
    pub redirect_to: Route,
}

/// Live feed of identity changes.
///
/// Dropping the subscription unsubscribes from the provider, so every exit
/// path of the owner releases it.
pub struct Subscription {
    receiver: UnboundedReceiver<Option<Identity>>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        receiver: UnboundedReceiver<Option<Identity>>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Next notification in provider order. `None` once the provider stops the feed.
    pub async fn recv(&mut self) -> Option<Option<Identity>> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    fn subscribe(&self) -> Subscription;

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
