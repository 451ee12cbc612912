mod initialize;
pub use initialize::Initializer;

mod config;
pub use config::{Config, DiscoverConfig};

pub mod env {
    pub const LOG_DIRECTIVE: &str = "EVENTGATE_LOG";
    pub const CONFIG_PATH: &str = "EVENTGATE_CONFIG_PATH";
}
