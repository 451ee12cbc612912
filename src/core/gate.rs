//! Gated navigation decisions.
//!
//! Affordances that need a signed-in user call `request_navigation`. The
//! resolution side (`resolve`) runs on identity transitions and is the only
//! consumer of the pending intent.

use crate::common::info;
use crate::core::identity::Identity;
use crate::core::intent::PendingIntent;
use crate::core::session::Transition;
use crate::core::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    // Signed in, go right away.
    Navigate(Route),
    // Target remembered, the auth surface must be shown.
    Authenticate,
}

pub fn request_navigation(
    identity: Option<&Identity>,
    intent: &mut PendingIntent,
    target: Route,
) -> Dispatch {
    match identity {
        Some(identity) => {
            info!(user = %identity, %target, "Navigate");
            Dispatch::Navigate(target)
        }
        None => {
            info!(%target, "Authentication required, remember intent");
            intent.set(target);
            Dispatch::Authenticate
        }
    }
}

/// Route to honor after `transition`, if any.
///
/// Only an absent to present transition consumes the intent. The intent is
/// cleared before the route is handed out, so a repeated notification finds
/// nothing left to resume.
pub fn resolve(transition: &Transition, intent: &mut PendingIntent) -> Option<Route> {
    match transition {
        Transition::SignedIn(identity) => {
            let route = intent.take()?;
            info!(user = %identity, %route, "Resume pending navigation");
            Some(route)
        }
        _ => None,
    }
}
