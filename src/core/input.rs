use std::fmt;

use tokio::sync::oneshot;

use crate::core::auth_flow::{Mode, Notice};
use crate::core::identity::{AuthError, Identity};
use crate::core::menu::{Action, MenuItem};
use crate::core::Route;

// Requests from UI surfaces to the shell.
pub(crate) enum Input {
    RequestNavigation(Route),
    Activate(Action),
    OpenAuthFlow,
    CloseAuthFlow,
    SetEmail(String),
    SetPassword(String),
    ToggleMode,
    Submit,
    SignOut,
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown,
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Input::RequestNavigation(route) => write!(f, "RequestNavigation {}", route),
            Input::Activate(action) => write!(f, "Activate {:?}", action),
            Input::OpenAuthFlow => write!(f, "OpenAuthFlow"),
            Input::CloseAuthFlow => write!(f, "CloseAuthFlow"),
            Input::SetEmail(email) => write!(f, "SetEmail {}", email),
            // never log credentials.
            Input::SetPassword(_) => write!(f, "SetPassword ***"),
            Input::ToggleMode => write!(f, "ToggleMode"),
            Input::Submit => write!(f, "Submit"),
            Input::SignOut => write!(f, "SignOut"),
            Input::Snapshot(_) => write!(f, "Snapshot"),
            Input::Shutdown => write!(f, "Shutdown"),
        }
    }
}

// Results of provider calls made on behalf of the shell.
#[derive(Debug)]
pub(crate) enum Completion {
    Submit {
        // Surface generation the submit was issued from.
        generation: u64,
        attempt: u64,
        mode: Mode,
        result: Result<(), AuthError>,
    },
    SignOut(Result<(), AuthError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    // User closed the surface. Pending intent is dropped.
    Dismissed,
    // Sign in submit succeeded.
    Authenticated,
    // Pending navigation was resumed.
    Resolved,
}

/// Everything the shell reports to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Navigated(Route),
    AuthOpened,
    AuthClosed(CloseReason),
    Notice(Notice),
    IdentityChanged(Option<Identity>),
}

/// Read-only view of the auth surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthView {
    pub mode: Mode,
    pub email: String,
    pub submitting: bool,
    pub last_error: Option<String>,
}

/// Point in time view of the shell state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub identity: Option<Identity>,
    pub pending: Option<Route>,
    pub auth: Option<AuthView>,
    // Navbar affordances for the current identity.
    pub menu: Vec<MenuItem>,
}
