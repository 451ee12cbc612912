//! Sign in / sign up surface.
//!
//! The controller is a plain state machine. It never talks to the provider
//! itself: `begin_submit` hands out a [`Submission`] for the caller to send,
//! and `complete` folds the provider's answer back in. It also has no idea
//! why authentication was requested, pending navigation lives elsewhere.
//!
//! ```text
//!            toggle_mode
//!   SignIn <-------------> SignUp
//!     |  invalid credentials  ^
//!     +-----------------------+
//!     ^                       |
//!     +--- sign up success ---+
//! ```

mod notice;
pub use self::notice::{Notice, Severity};

pub mod validate;
pub use self::validate::ValidationError;

use std::fmt;

use crate::common::{debug, info};
use crate::core::identity::AuthError;
use crate::core::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SignIn,
    SignUp,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::SignIn => f.write_str("sign-in"),
            Mode::SignUp => f.write_str("sign-up"),
        }
    }
}

/// Knobs of the surface that come from configuration.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub min_password_len: usize,
    pub invalid_credentials_marker: String,
    pub sign_up_redirect: Route,
}

/// Credentials accepted for sending to the provider.
#[derive(Clone)]
pub struct Submission {
    pub attempt: u64,
    pub mode: Mode,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Submission")
            .field("attempt", &self.attempt)
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Validation(ValidationError),
    // A submit is already in flight.
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    // Sign in succeeded, the surface should close.
    Authenticated,
    StayOpen,
}

/// What a finished submit means for the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub mode: Mode,
    pub resolution: Resolution,
    pub notice: Notice,
    pub error: Option<String>,
}

impl Outcome {
    pub fn of(mode: Mode, result: &Result<(), AuthError>, policy: &AuthPolicy) -> Self {
        match (mode, result) {
            (Mode::SignIn, Ok(())) => Outcome {
                mode: Mode::SignIn,
                resolution: Resolution::Authenticated,
                notice: Notice::info("Welcome back!", "You have successfully signed in."),
                error: None,
            },
            (Mode::SignIn, Err(err))
                if validate::is_invalid_credentials(err, &policy.invalid_credentials_marker) =>
            {
                let description =
                    "No account exists with this email. Please create a new account to continue.";
                Outcome {
                    mode: Mode::SignUp,
                    resolution: Resolution::StayOpen,
                    notice: Notice::destructive("Account Not Found", description),
                    error: Some(description.to_owned()),
                }
            }
            (Mode::SignUp, Ok(())) => Outcome {
                mode: Mode::SignIn,
                resolution: Resolution::StayOpen,
                notice: Notice::info(
                    "Account created!",
                    "You can now sign in with your credentials.",
                ),
                error: None,
            },
            (mode, Err(err)) => Outcome {
                mode,
                resolution: Resolution::StayOpen,
                notice: Notice::destructive("Error", err.message()),
                error: Some(err.message().to_owned()),
            },
        }
    }
}

pub struct AuthFlowController {
    mode: Mode,
    email: String,
    password: String,
    submitting: bool,
    last_error: Option<String>,
    attempt: u64,
    policy: AuthPolicy,
}

impl AuthFlowController {
    pub fn new(policy: AuthPolicy) -> Self {
        Self {
            mode: Mode::SignIn,
            email: String::new(),
            password: String::new(),
            submitting: false,
            last_error: None,
            attempt: 0,
            policy,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Flip between sign in and sign up. Typed credentials are kept.
    /// Returns false while a submit is in flight.
    pub fn toggle_mode(&mut self) -> bool {
        if self.submitting {
            debug!(mode = %self.mode, "Ignore toggle while submitting");
            return false;
        }
        self.mode = self.mode.toggled();
        self.last_error = None;
        true
    }

    pub fn begin_submit(&mut self) -> Result<Submission, Rejection> {
        if self.submitting {
            return Err(Rejection::InFlight);
        }

        let email = self.email.trim();
        if let Err(err) =
            validate::validate_credentials(email, &self.password, self.policy.min_password_len)
        {
            self.last_error = Some(err.to_string());
            return Err(Rejection::Validation(err));
        }

        self.attempt += 1;
        self.submitting = true;
        self.last_error = None;

        let submission = Submission {
            attempt: self.attempt,
            mode: self.mode,
            email: email.to_owned(),
            password: self.password.clone(),
        };
        info!(mode = %self.mode, attempt = self.attempt, user = %submission.email, "Submit");

        Ok(submission)
    }

    /// Fold a provider answer into the surface.
    ///
    /// Answers for anything but the submit in flight are ignored.
    pub fn complete(&mut self, attempt: u64, result: Result<(), AuthError>) -> Option<Outcome> {
        if !self.submitting || attempt != self.attempt {
            debug!(attempt, current = self.attempt, "Ignore stale submit result");
            return None;
        }

        let outcome = Outcome::of(self.mode, &result, &self.policy);
        info!(
            from = %self.mode,
            to = %outcome.mode,
            resolution = ?outcome.resolution,
            "Submit finished"
        );

        self.submitting = false;
        self.mode = outcome.mode;
        self.last_error = outcome.error.clone();

        Some(outcome)
    }
}

impl fmt::Debug for AuthFlowController {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthFlowController")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("submitting", &self.submitting)
            .field("last_error", &self.last_error)
            .field("attempt", &self.attempt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AuthPolicy {
        AuthPolicy {
            min_password_len: 6,
            invalid_credentials_marker: "Invalid login credentials".into(),
            sign_up_redirect: Route::new("/").unwrap(),
        }
    }

    fn filled(mode: Mode) -> AuthFlowController {
        let mut controller = AuthFlowController::new(policy());
        controller.set_email("alice@example.com");
        controller.set_password("secret1");
        if mode == Mode::SignUp {
            controller.toggle_mode();
        }
        controller
    }

    fn invalid_credentials() -> AuthError {
        AuthError::new("Invalid login credentials")
    }

    #[test]
    fn starts_in_sign_in_idle() {
        let controller = AuthFlowController::new(policy());
        assert_eq!(controller.mode(), Mode::SignIn);
        assert!(!controller.is_submitting());
        assert_eq!(controller.last_error(), None);
    }

    #[test]
    fn sign_in_success_closes() {
        let mut controller = filled(Mode::SignIn);
        let submission = controller.begin_submit().unwrap();
        assert_eq!(submission.mode, Mode::SignIn);
        assert_eq!(submission.email, "alice@example.com");

        let outcome = controller.complete(submission.attempt, Ok(())).unwrap();

        assert_eq!(outcome.resolution, Resolution::Authenticated);
        assert_eq!(outcome.notice.title, "Welcome back!");
        assert_eq!(controller.mode(), Mode::SignIn);
        assert!(!controller.is_submitting());
    }

    #[test]
    fn invalid_credentials_flips_to_sign_up() {
        let mut controller = filled(Mode::SignIn);
        let submission = controller.begin_submit().unwrap();

        let outcome = controller
            .complete(submission.attempt, Err(invalid_credentials()))
            .unwrap();

        assert_eq!(outcome.resolution, Resolution::StayOpen);
        assert_eq!(outcome.notice.title, "Account Not Found");
        assert_eq!(outcome.notice.severity, Severity::Destructive);
        assert_eq!(controller.mode(), Mode::SignUp);
        assert!(controller.last_error().unwrap().contains("No account exists"));
        assert!(!controller.is_submitting());
    }

    #[test]
    fn other_sign_in_failure_stays_in_sign_in() {
        for message in ["Email not confirmed", "Email rate limit exceeded", "network error"] {
            let mut controller = filled(Mode::SignIn);
            let submission = controller.begin_submit().unwrap();

            let outcome = controller
                .complete(submission.attempt, Err(AuthError::new(message)))
                .unwrap();

            assert_eq!(outcome.resolution, Resolution::StayOpen);
            assert_eq!(outcome.notice.description, message);
            assert_eq!(controller.mode(), Mode::SignIn);
            assert_eq!(controller.last_error(), Some(message));
        }
    }

    #[test]
    fn sign_up_success_returns_to_sign_in_without_closing() {
        let mut controller = filled(Mode::SignUp);
        let submission = controller.begin_submit().unwrap();
        assert_eq!(submission.mode, Mode::SignUp);

        let outcome = controller.complete(submission.attempt, Ok(())).unwrap();

        assert_eq!(outcome.resolution, Resolution::StayOpen);
        assert_eq!(outcome.notice.title, "Account created!");
        assert_eq!(controller.mode(), Mode::SignIn);
        assert_eq!(controller.email(), "alice@example.com");
    }

    #[test]
    fn sign_up_failure_stays_in_sign_up() {
        let mut controller = filled(Mode::SignUp);
        let submission = controller.begin_submit().unwrap();

        controller
            .complete(
                submission.attempt,
                Err(AuthError::new("User already registered")),
            )
            .unwrap();

        assert_eq!(controller.mode(), Mode::SignUp);
        assert_eq!(controller.last_error(), Some("User already registered"));
    }

    #[test]
    fn invalid_input_never_becomes_a_submission() {
        let mut controller = AuthFlowController::new(policy());
        controller.set_email("not-an-email");
        controller.set_password("secret1");
        assert_eq!(
            controller.begin_submit().unwrap_err(),
            Rejection::Validation(ValidationError::InvalidEmail)
        );

        controller.set_email("alice@example.com");
        controller.set_password("12345");
        assert_eq!(
            controller.begin_submit().unwrap_err(),
            Rejection::Validation(ValidationError::PasswordTooShort { min: 6 })
        );
        assert!(!controller.is_submitting());
        assert!(controller.last_error().is_some());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut controller = filled(Mode::SignIn);
        let first = controller.begin_submit().unwrap();

        assert_eq!(controller.begin_submit().unwrap_err(), Rejection::InFlight);
        assert!(!controller.toggle_mode());

        assert!(controller.complete(first.attempt, Ok(())).is_some());
    }

    #[test]
    fn stale_attempt_is_ignored() {
        let mut controller = filled(Mode::SignIn);
        let first = controller.begin_submit().unwrap();
        controller
            .complete(first.attempt, Err(AuthError::new("network error")))
            .unwrap();

        let second = controller.begin_submit().unwrap();
        assert!(controller.complete(first.attempt, Ok(())).is_none());
        assert!(controller.is_submitting());
        assert!(controller.complete(second.attempt, Ok(())).is_some());
    }

    #[test]
    fn toggle_clears_error_and_keeps_credentials() {
        let mut controller = filled(Mode::SignIn);
        let submission = controller.begin_submit().unwrap();
        controller
            .complete(submission.attempt, Err(AuthError::new("network error")))
            .unwrap();
        assert!(controller.last_error().is_some());

        assert!(controller.toggle_mode());

        assert_eq!(controller.mode(), Mode::SignUp);
        assert_eq!(controller.last_error(), None);
        assert_eq!(controller.email(), "alice@example.com");
        let resubmit = controller.begin_submit().unwrap();
        assert_eq!(resubmit.password, "secret1");
    }

    #[test]
    fn email_is_trimmed_before_submit() {
        let mut controller = AuthFlowController::new(policy());
        controller.set_email("  alice@example.com \n");
        controller.set_password("secret1");

        assert_eq!(controller.begin_submit().unwrap().email, "alice@example.com");
    }
}
