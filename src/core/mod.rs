mod shell;
pub use self::shell::{Builder, Shell, ShellEvents, ShellHandle};

mod config;
pub use self::config::{AuthConfig, Config, RoutesConfig};

pub mod identity;
pub use self::identity::{AuthError, Identity, IdentityProvider, InMemoryProvider, UserEntry};

mod intent;
pub use self::intent::{PendingIntent, Route};

mod session;
pub use self::session::{SessionObserver, Transition};

pub mod auth_flow;
pub use self::auth_flow::{AuthFlowController, Mode, Notice, Severity};

pub mod gate;

pub mod menu;
pub use self::menu::{Action, MenuItem, Routes};

mod input;
pub use self::input::{AuthView, CloseReason, ShellEvent, Snapshot};
