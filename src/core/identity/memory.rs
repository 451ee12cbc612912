use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::common::{debug, info};
use crate::core::identity::{AuthError, Identity, IdentityProvider, SignUpOptions, Subscription};

// Messages and codes follow the hosted auth service the site talks to in production.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";
const INVALID_CREDENTIALS_CODE: &str = "invalid_credentials";
const USER_EXISTS_MESSAGE: &str = "User already registered";
const USER_EXISTS_CODE: &str = "user_already_exists";

#[derive(Debug, Deserialize, Clone)]
pub struct UserEntry {
    pub email: String,
    pub password: String,
}

/// Identity provider keeping accounts and the session in memory.
///
/// Cloning shares the same state.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    inner: Arc<Mutex<Inner>>,
    // Simulated network latency range in milliseconds.
    latency: Option<(u64, u64)>,
    // Delay between a successful sign in and its change notification.
    feed_lag_ms: Option<u64>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, String>,
    session: Option<Identity>,
    subscribers: HashMap<u64, UnboundedSender<Option<Identity>>>,
    next_subscriber_id: u64,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserEntry>) -> Self {
        let provider = Self::new();
        {
            let mut inner = provider.lock();
            for user in users {
                inner.users.insert(user.email, user.password);
            }
        }
        provider
    }

    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency = Some((min_ms, std::cmp::max(min_ms, max_ms)));
        self
    }

    /// Deliver sign in notifications `lag_ms` after `sign_in` has returned,
    /// the way hosted services push auth state changes.
    pub fn with_feed_lag(mut self, lag_ms: u64) -> Self {
        self.feed_lag_ms = Some(lag_ms);
        self
    }

    /// Start with `identity` already signed in.
    pub fn with_session(self, identity: Identity) -> Self {
        self.lock().session = Some(identity);
        self
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Deliver `identity` to every live subscriber, in subscription order.
    pub fn broadcast(&self, identity: Option<Identity>) {
        let mut inner = self.lock();
        inner.session = identity.clone();
        let mut ids: Vec<u64> = inner.subscribers.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let closed = inner
                .subscribers
                .get(&id)
                .map_or(true, |tx| tx.send(identity.clone()).is_err());
            if closed {
                inner.subscribers.remove(&id);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if let Some((min_ms, max_ms)) = self.latency {
            let spread = (max_ms - min_ms) as f64;
            let ms = min_ms + (rand::random::<f64>() * spread) as u64;
            tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        self.simulate_latency().await;
        Ok(self.lock().session.clone())
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.lock();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.insert(id, tx);
            id
        };
        debug!(subscriber = id, "Subscribe identity feed");

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(rx, move || {
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.subscribers.remove(&id);
                debug!(subscriber = id, "Unsubscribe identity feed");
            }
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.simulate_latency().await;

        let matched = self
            .lock()
            .users
            .get(email)
            .map_or(false, |stored| stored == password);
        if !matched {
            info!(user = email, "Sign in rejected");
            return Err(AuthError::new(INVALID_CREDENTIALS_MESSAGE).with_code(INVALID_CREDENTIALS_CODE));
        }

        info!(user = email, "Signed in");
        let identity = Identity::new(email);
        match self.feed_lag_ms {
            Some(lag_ms) => {
                self.lock().session = Some(identity.clone());
                let provider = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(tokio::time::Duration::from_millis(lag_ms)).await;
                    provider.broadcast(Some(identity));
                });
            }
            None => self.broadcast(Some(identity)),
        }
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> Result<(), AuthError> {
        self.simulate_latency().await;

        let mut inner = self.lock();
        if inner.users.contains_key(email) {
            return Err(AuthError::new(USER_EXISTS_MESSAGE).with_code(USER_EXISTS_CODE));
        }
        inner.users.insert(email.to_owned(), password.to_owned());
        // New accounts wait for confirmation, no session is created here.
        info!(user = email, redirect_to = %options.redirect_to, "Signed up");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.simulate_latency().await;
        info!("Signed out");
        self.broadcast(None);
        Ok(())
    }
}
