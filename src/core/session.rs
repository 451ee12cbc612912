use crate::common::{debug, info};
use crate::core::identity::{AuthError, Identity, IdentityProvider, Subscription};

/// How a notification changed the cached identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    // absent -> present
    SignedIn(Identity),
    // present -> absent
    SignedOut,
    // present -> a different present
    Switched(Identity),
    Unchanged,
}

/// Caches the latest identity reported by the provider.
///
/// The cache is written only from provider notifications. Holding the
/// observer keeps the feed subscription alive, dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionObserver {
    current: Option<Identity>,
    subscription: Subscription,
}

impl SessionObserver {
    /// Fetch the current identity once, then attach to the change feed.
    pub async fn start(provider: &dyn IdentityProvider) -> Result<Self, AuthError> {
        let current = provider.current_identity().await?;
        let subscription = provider.subscribe();

        info!(identity = ?current, "Session observer started");

        Ok(Self {
            current,
            subscription,
        })
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Wait for the next provider notification.
    pub async fn next_change(&mut self) -> Option<Option<Identity>> {
        self.subscription.recv().await
    }

    /// Apply a notification to the cache.
    pub fn observe(&mut self, next: Option<Identity>) -> Transition {
        let transition = match (self.current.as_ref(), next.as_ref()) {
            (None, Some(identity)) => Transition::SignedIn(identity.clone()),
            (Some(_), None) => Transition::SignedOut,
            (Some(prev), Some(identity)) if prev != identity => {
                Transition::Switched(identity.clone())
            }
            _ => Transition::Unchanged,
        };
        debug!(?transition, "Identity notification");

        self.current = next;
        transition
    }
}
