#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use eventgate::core::{
    Builder, IdentityProvider, InMemoryProvider, ShellEvent, ShellEvents, ShellHandle, UserEntry,
};

pub const ALICE: &str = "alice@example.com";
pub const ALICE_PASSWORD: &str = "secret1";

const WAIT: Duration = Duration::from_secs(2);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn provider() -> InMemoryProvider {
    InMemoryProvider::with_users(vec![UserEntry {
        email: ALICE.into(),
        password: ALICE_PASSWORD.into(),
    }])
}

pub struct Running {
    pub handle: ShellHandle,
    pub events: ShellEvents,
    pub task: JoinHandle<()>,
}

impl Running {
    /// Receive events until one satisfies `pred`. Skipped events are returned along with it.
    pub async fn wait_for(&mut self, pred: impl Fn(&ShellEvent) -> bool) -> Vec<ShellEvent> {
        let mut seen = Vec::new();
        let result = tokio::time::timeout(WAIT, async {
            while let Some(event) = self.events.recv().await {
                let done = pred(&event);
                seen.push(event);
                if done {
                    return true;
                }
            }
            false
        })
        .await;

        match result {
            Ok(true) => seen,
            _ => panic!("expected event did not arrive. seen {:?}", seen),
        }
    }

    /// Everything emitted within `window`.
    pub async fn drain(&mut self, window: Duration) -> Vec<ShellEvent> {
        let mut seen = Vec::new();
        let _ = tokio::time::timeout(window, async {
            while let Some(event) = self.events.recv().await {
                seen.push(event);
            }
        })
        .await;
        seen
    }

    pub async fn sign_in(&self, email: &str, password: &str) {
        self.handle.set_email(email).await.unwrap();
        self.handle.set_password(password).await.unwrap();
        self.handle.submit().await.unwrap();
    }

    pub async fn stop(self) {
        self.handle.shutdown().await.unwrap();
        self.task.await.unwrap();
    }
}

pub async fn start(provider: impl IdentityProvider + 'static) -> Running {
    let (shell, handle, events) = Builder::new(Arc::new(provider)).build().await.unwrap();
    let task = tokio::spawn(shell.run());
    Running {
        handle,
        events,
        task,
    }
}

pub fn navigations(events: &[ShellEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ShellEvent::Navigated(route) => Some(route.to_string()),
            _ => None,
        })
        .collect()
}

pub fn notice_titles(events: &[ShellEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ShellEvent::Notice(notice) => Some(notice.title.clone()),
            _ => None,
        })
        .collect()
}

pub fn is_navigation(event: &ShellEvent) -> bool {
    matches!(event, ShellEvent::Navigated(_))
}

pub fn is_notice(title: &'static str) -> impl Fn(&ShellEvent) -> bool {
    move |event| matches!(event, ShellEvent::Notice(notice) if notice.title == title)
}
