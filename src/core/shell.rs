use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::common::{debug, info, trace, warn, Result};
use crate::core::auth_flow::{
    AuthFlowController, AuthPolicy, Notice, Outcome, Rejection, Resolution, Submission,
};
use crate::core::gate::{self, Dispatch};
use crate::core::identity::{Identity, IdentityProvider, SignUpOptions};
use crate::core::input::{AuthView, CloseReason, Completion, Input, ShellEvent, Snapshot};
use crate::core::intent::PendingIntent;
use crate::core::menu::{self, Action, Routes};
use crate::core::session::{SessionObserver, Transition};
use crate::core::{Config, Mode, Route};
use crate::GateError;

/// Receiving side of the shell's outbound events.
pub type ShellEvents = UnboundedReceiver<ShellEvent>;

pub struct Builder {
    config: Option<Config>,
    provider: Arc<dyn IdentityProvider>,
}

impl Builder {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: None,
            provider,
        }
    }

    pub fn from_config(config: Config, provider: Arc<dyn IdentityProvider>) -> Self {
        let mut builder = Builder::new(provider);
        builder.config = Some(config);
        builder
    }

    /// Fetch the current identity, subscribe to changes and wire the channels.
    pub async fn build(self) -> crate::Result<(Shell, ShellHandle, ShellEvents)> {
        Ok(self.build_inner().await?)
    }

    async fn build_inner(self) -> Result<(Shell, ShellHandle, ShellEvents)> {
        let config = self.config.unwrap_or_default();

        let session = SessionObserver::start(self.provider.as_ref()).await?;

        let (input_send, input_recv) = mpsc::channel(config.input_channel_buffer());
        let (completion_send, completion_recv) = mpsc::unbounded_channel();
        let (event_send, event_recv) = mpsc::unbounded_channel();

        let shell = Shell {
            provider: self.provider,
            session,
            intent: PendingIntent::new(),
            surface: None,
            generation: 0,
            policy: config.auth.policy(),
            routes: config.routes.routes(),
            input_recv,
            completion_send,
            completion_recv,
            event_send,
        };

        Ok((shell, ShellHandle { input_send }, event_recv))
    }
}

/// Owner of the navigation state.
///
/// A single task runs [`Shell::run`], so inputs, identity notifications and
/// provider results are applied one at a time. Identity notifications are
/// applied in the order the provider emitted them.
pub struct Shell {
    provider: Arc<dyn IdentityProvider>,
    session: SessionObserver,
    intent: PendingIntent,
    // Open auth surface, if any.
    surface: Option<AuthFlowController>,
    // Bumped whenever a surface is opened or dismissed. Provider results
    // tagged with an older generation are dropped.
    generation: u64,
    policy: AuthPolicy,
    routes: Routes,
    input_recv: Receiver<Input>,
    completion_send: UnboundedSender<Completion>,
    completion_recv: UnboundedReceiver<Completion>,
    event_send: UnboundedSender<ShellEvent>,
}

impl Shell {
    pub async fn run(mut self) {
        info!(identity = ?self.session.current(), "Shell running");

        let mut feed_open = true;
        loop {
            tokio::select! {
                input = self.input_recv.recv() => match input {
                    Some(Input::Shutdown) | None => break,
                    Some(input) => self.handle_input(input),
                },
                change = self.session.next_change(), if feed_open => match change {
                    Some(next) => self.handle_identity(next),
                    None => {
                        warn!("Identity feed closed");
                        feed_open = false;
                    }
                },
                Some(completion) = self.completion_recv.recv() => {
                    self.handle_completion(completion)
                },
            }
        }

        // Dropping self releases the identity subscription.
        info!("Shell stopped");
    }

    fn handle_input(&mut self, input: Input) {
        let start = tokio::time::Instant::now();
        let log = format!("{:?}", input);

        match input {
            Input::RequestNavigation(target) => self.request_navigation(target),
            Input::Activate(action) => self.activate(action),
            Input::OpenAuthFlow => self.open_surface(),
            Input::CloseAuthFlow => self.close_surface(CloseReason::Dismissed),
            Input::SetEmail(email) => self.with_surface(|surface| surface.set_email(email)),
            Input::SetPassword(password) => {
                self.with_surface(|surface| surface.set_password(password))
            }
            Input::ToggleMode => self.with_surface(|surface| {
                surface.toggle_mode();
            }),
            Input::Submit => self.submit(),
            Input::SignOut => self.sign_out(),
            Input::Snapshot(response_sender) => {
                if response_sender.send(self.snapshot()).is_err() {
                    debug!("Snapshot receiver dropped");
                }
            }
            Input::Shutdown => unreachable!(),
        }

        debug!(input=%log, elapsed=?start.elapsed(), "Input done");
    }

    fn handle_identity(&mut self, next: Option<Identity>) {
        let transition = self.session.observe(next);
        if transition == Transition::Unchanged {
            return;
        }
        self.emit(ShellEvent::IdentityChanged(self.session.current().cloned()));

        if let Some(route) = gate::resolve(&transition, &mut self.intent) {
            self.navigate(route);
            self.close_surface(CloseReason::Resolved);
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Submit {
                generation,
                attempt,
                mode,
                result,
            } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "Discard submit result of dismissed surface"
                    );
                    return;
                }
                let outcome = match self.surface.as_mut() {
                    Some(surface) => surface.complete(attempt, result),
                    // Closed by resumed navigation. Report only, never reopen.
                    None => Some(Outcome::of(mode, &result, &self.policy)),
                };
                let Some(outcome) = outcome else {
                    return;
                };

                self.emit(ShellEvent::Notice(outcome.notice));
                if outcome.resolution == Resolution::Authenticated {
                    self.close_surface(CloseReason::Authenticated);
                }
            }
            Completion::SignOut(result) => {
                if let Err(err) = result {
                    warn!(%err, "Sign out failed");
                    self.emit(ShellEvent::Notice(Notice::destructive("Error", err.message())));
                }
            }
        }
    }

    fn request_navigation(&mut self, target: Route) {
        match gate::request_navigation(self.session.current(), &mut self.intent, target) {
            Dispatch::Navigate(route) => self.navigate(route),
            Dispatch::Authenticate => self.open_surface(),
        }
    }

    fn activate(&mut self, action: Action) {
        match action {
            Action::Link(route) => self.navigate(route),
            Action::Gated(route) => self.request_navigation(route),
            Action::OpenAuth => self.open_surface(),
            Action::SignOut => self.sign_out(),
        }
    }

    fn open_surface(&mut self) {
        if self.surface.is_some() {
            debug!("Auth surface already open");
            return;
        }
        self.generation += 1;
        self.surface = Some(AuthFlowController::new(self.policy.clone()));

        info!(generation = self.generation, "Auth surface opened");
        self.emit(ShellEvent::AuthOpened);
    }

    fn close_surface(&mut self, reason: CloseReason) {
        let Some(surface) = self.surface.take() else {
            // Already closed, e.g. after a successful sign in whose notification
            // has not arrived yet. The pending intent still belongs to it.
            debug!(?reason, "Auth surface is not open");
            return;
        };
        if reason == CloseReason::Dismissed {
            self.intent.discard();
            self.generation += 1;
        }
        info!(?reason, mode = %surface.mode(), "Auth surface closed");
        self.emit(ShellEvent::AuthClosed(reason));
    }

    fn with_surface(&mut self, f: impl FnOnce(&mut AuthFlowController)) {
        match self.surface.as_mut() {
            Some(surface) => f(surface),
            None => debug!("Auth surface is not open"),
        }
    }

    fn submit(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            debug!("Submit without auth surface");
            return;
        };
        let redirect_to = surface.policy().sign_up_redirect.clone();
        let begun = surface.begin_submit();

        match begun {
            Ok(submission) => self.spawn_submit(submission, redirect_to),
            Err(Rejection::InFlight) => debug!("Ignore submit while in flight"),
            Err(Rejection::Validation(err)) => {
                debug!(%err, "Submit rejected locally");
                self.emit(ShellEvent::Notice(Notice::destructive("Error", err.to_string())));
            }
        }
    }

    fn spawn_submit(&self, submission: Submission, redirect_to: Route) {
        let provider = Arc::clone(&self.provider);
        let completion_send = self.completion_send.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let Submission {
                attempt,
                mode,
                email,
                password,
            } = submission;

            let result = match mode {
                Mode::SignIn => provider.sign_in(&email, &password).await,
                Mode::SignUp => {
                    provider
                        .sign_up(&email, &password, SignUpOptions { redirect_to })
                        .await
                }
            };

            if completion_send
                .send(Completion::Submit {
                    generation,
                    attempt,
                    mode,
                    result,
                })
                .is_err()
            {
                trace!("Shell gone before submit finished");
            }
        });
    }

    // The cached identity is left alone, the provider notification updates it.
    fn sign_out(&self) {
        let provider = Arc::clone(&self.provider);
        let completion_send = self.completion_send.clone();

        tokio::spawn(async move {
            let result = provider.sign_out().await;
            if completion_send.send(Completion::SignOut(result)).is_err() {
                trace!("Shell gone before sign out finished");
            }
        });
    }

    fn navigate(&self, route: Route) {
        info!(%route, "Navigate");
        self.emit(ShellEvent::Navigated(route));
    }

    fn snapshot(&self) -> Snapshot {
        let identity = self.session.current().cloned();
        Snapshot {
            menu: menu::menu(identity.as_ref(), &self.routes),
            identity,
            pending: self.intent.peek().cloned(),
            auth: self.surface.as_ref().map(|surface| AuthView {
                mode: surface.mode(),
                email: surface.email().to_owned(),
                submitting: surface.is_submitting(),
                last_error: surface.last_error().map(ToOwned::to_owned),
            }),
        }
    }

    fn emit(&self, event: ShellEvent) {
        if self.event_send.send(event).is_err() {
            trace!("Shell event receiver dropped");
        }
    }
}

/// Cloneable entry point for UI surfaces.
#[derive(Clone)]
pub struct ShellHandle {
    input_send: Sender<Input>,
}

impl ShellHandle {
    async fn send(&self, input: Input) -> crate::Result<()> {
        self.input_send
            .send(input)
            .await
            .map_err(|_| GateError::ShellClosed)
    }

    /// Navigate now when signed in, otherwise remember `target` and ask for authentication.
    pub async fn request_navigation(&self, target: Route) -> crate::Result<()> {
        self.send(Input::RequestNavigation(target)).await
    }

    pub async fn activate(&self, action: Action) -> crate::Result<()> {
        self.send(Input::Activate(action)).await
    }

    pub async fn open_auth_flow(&self) -> crate::Result<()> {
        self.send(Input::OpenAuthFlow).await
    }

    /// Dismiss the auth surface. Any pending navigation is dropped.
    pub async fn close_auth_flow(&self) -> crate::Result<()> {
        self.send(Input::CloseAuthFlow).await
    }

    pub async fn set_email(&self, email: impl Into<String>) -> crate::Result<()> {
        self.send(Input::SetEmail(email.into())).await
    }

    pub async fn set_password(&self, password: impl Into<String>) -> crate::Result<()> {
        self.send(Input::SetPassword(password.into())).await
    }

    pub async fn toggle_mode(&self) -> crate::Result<()> {
        self.send(Input::ToggleMode).await
    }

    pub async fn submit(&self) -> crate::Result<()> {
        self.send(Input::Submit).await
    }

    pub async fn sign_out(&self) -> crate::Result<()> {
        self.send(Input::SignOut).await
    }

    pub async fn snapshot(&self) -> crate::Result<Snapshot> {
        let (response_sender, response_recv) = oneshot::channel();
        self.send(Input::Snapshot(response_sender)).await?;
        response_recv.await.map_err(|_| GateError::ShellClosed)
    }

    pub async fn shutdown(&self) -> crate::Result<()> {
        self.send(Input::Shutdown).await
    }
}
