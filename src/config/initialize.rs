use std::path::Path;
use std::sync::Arc;

use tokio::fs;

use crate::common::{debug, Result};
use crate::config::Config;
use crate::core::{self, IdentityProvider, InMemoryProvider, Shell, ShellEvents, ShellHandle};

#[derive(Debug, Default)]
pub struct Initializer {
    pub config: Config,
}

impl Initializer {
    pub async fn load_config_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Initializer::from_config(read_config(path.as_ref()).await?))
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// In-memory identity provider seeded with the configured users.
    pub fn provider(&self) -> InMemoryProvider {
        InMemoryProvider::with_users(self.config.shell.users.iter().cloned())
    }

    pub async fn build_shell(
        self,
        provider: Arc<dyn IdentityProvider>,
    ) -> crate::Result<(Shell, ShellHandle, ShellEvents)> {
        core::Builder::from_config(self.config.shell, provider)
            .build()
            .await
    }
}

async fn read_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).await?;
    let config = serde_yaml::from_str::<Config>(&raw)?;
    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}
