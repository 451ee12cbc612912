use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::debug;
use crate::GateError;

/// Absolute in-app path such as `/create-event`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Route(String);

impl Route {
    pub fn new(route: impl Into<String>) -> crate::Result<Self> {
        let route = route.into();
        if !route.starts_with('/') {
            return Err(GateError::InvalidRoute { route });
        }
        Ok(Route(route))
    }

    // Caller guarantees the route is absolute.
    pub(crate) fn new_unchecked(route: impl Into<String>) -> Self {
        let route = route.into();
        debug_assert!(route.starts_with('/'));
        Route(route)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Route {
    type Error = GateError;
    fn try_from(route: String) -> Result<Self, Self::Error> {
        Route::new(route)
    }
}

impl FromStr for Route {
    type Err = GateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::new(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single slot holding where to go once authentication succeeds.
///
/// Setting replaces any previous target. `take` is the only way the target
/// is honored, so a target can be consumed at most once.
#[derive(Debug, Default)]
pub struct PendingIntent {
    slot: Option<Route>,
}

impl PendingIntent {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns the target that was overwritten, if any.
    pub fn set(&mut self, route: Route) -> Option<Route> {
        let replaced = self.slot.replace(route);
        if let Some(replaced) = replaced.as_ref() {
            debug!(%replaced, "Pending intent overwritten");
        }
        replaced
    }

    pub fn take(&mut self) -> Option<Route> {
        self.slot.take()
    }

    // Drop the target without honoring it.
    pub fn discard(&mut self) -> Option<Route> {
        let discarded = self.slot.take();
        if let Some(discarded) = discarded.as_ref() {
            debug!(%discarded, "Pending intent discarded");
        }
        discarded
    }

    pub fn peek(&self) -> Option<&Route> {
        self.slot.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}
