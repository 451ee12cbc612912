use serde::Deserialize;

use crate::core::auth_flow::AuthPolicy;
use crate::core::identity::UserEntry;
use crate::core::menu::Routes;
use crate::core::Route;

// Shell configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    // Accounts seeded into the in-memory identity provider.
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    // Capacity of the shell input channel.
    input_channel_buffer: Option<usize>,
}

impl Config {
    const DEFAULT_INPUT_CHANNEL_BUFFER: usize = 1024;

    pub fn set_input_channel_buffer(&mut self, val: Option<usize>) {
        if let Some(val) = val {
            self.input_channel_buffer = Some(std::cmp::max(val, 1));
        }
    }

    pub(crate) fn input_channel_buffer(&self) -> usize {
        self.input_channel_buffer
            .unwrap_or(Config::DEFAULT_INPUT_CHANNEL_BUFFER)
    }

    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.set_input_channel_buffer(other.input_channel_buffer);
        self.auth.override_merge(&mut other.auth);
        self.routes.override_merge(&mut other.routes);
        self.users.append(&mut other.users);
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthConfig {
    // Minimum password length accepted before contacting the provider.
    min_password_len: Option<usize>,
    // Text identifying a rejected sign in when the provider sends no code.
    invalid_credentials_marker: Option<String>,
    // Where sign up confirmation links land.
    sign_up_redirect: Option<Route>,
}

impl AuthConfig {
    const DEFAULT_MIN_PASSWORD_LEN: usize = 6;
    const DEFAULT_INVALID_CREDENTIALS_MARKER: &'static str = "Invalid login credentials";
    const DEFAULT_SIGN_UP_REDIRECT: &'static str = "/";

    pub fn set_min_password_len(&mut self, val: Option<usize>) {
        if let Some(val) = val {
            self.min_password_len = Some(std::cmp::max(val, 1));
        }
    }
    pub fn set_invalid_credentials_marker(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.invalid_credentials_marker = Some(val)
        }
    }
    pub fn set_sign_up_redirect(&mut self, val: &mut Option<Route>) {
        if let Some(val) = val.take() {
            self.sign_up_redirect = Some(val)
        }
    }

    fn override_merge(&mut self, other: &mut AuthConfig) {
        self.set_min_password_len(other.min_password_len);
        self.set_invalid_credentials_marker(&mut other.invalid_credentials_marker);
        self.set_sign_up_redirect(&mut other.sign_up_redirect);
    }

    pub fn policy(&self) -> AuthPolicy {
        AuthPolicy {
            min_password_len: self
                .min_password_len
                .unwrap_or(AuthConfig::DEFAULT_MIN_PASSWORD_LEN),
            invalid_credentials_marker: self
                .invalid_credentials_marker
                .clone()
                .unwrap_or_else(|| AuthConfig::DEFAULT_INVALID_CREDENTIALS_MARKER.to_owned()),
            sign_up_redirect: self
                .sign_up_redirect
                .clone()
                .unwrap_or_else(|| Route::new_unchecked(AuthConfig::DEFAULT_SIGN_UP_REDIRECT)),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RoutesConfig {
    home: Option<Route>,
    create_event: Option<Route>,
    my_events: Option<Route>,
}

impl RoutesConfig {
    const DEFAULT_HOME: &'static str = "/";
    const DEFAULT_CREATE_EVENT: &'static str = "/create-event";
    const DEFAULT_MY_EVENTS: &'static str = "/my-events";

    fn override_merge(&mut self, other: &mut RoutesConfig) {
        if let Some(home) = other.home.take() {
            self.home = Some(home);
        }
        if let Some(create_event) = other.create_event.take() {
            self.create_event = Some(create_event);
        }
        if let Some(my_events) = other.my_events.take() {
            self.my_events = Some(my_events);
        }
    }

    pub fn routes(&self) -> Routes {
        let or_default = |route: &Option<Route>, default: &'static str| {
            route
                .clone()
                .unwrap_or_else(|| Route::new_unchecked(default))
        };
        Routes {
            home: or_default(&self.home, RoutesConfig::DEFAULT_HOME),
            create_event: or_default(&self.create_event, RoutesConfig::DEFAULT_CREATE_EVENT),
            my_events: or_default(&self.my_events, RoutesConfig::DEFAULT_MY_EVENTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        let policy = config.auth.policy();

        assert_eq!(config.input_channel_buffer(), 1024);
        assert_eq!(policy.min_password_len, 6);
        assert_eq!(policy.invalid_credentials_marker, "Invalid login credentials");
        assert_eq!(policy.sign_up_redirect.as_str(), "/");
        assert_eq!(config.routes.routes().create_event.as_str(), "/create-event");
    }

    #[test]
    fn decode_yaml() {
        let yaml = r#"
users:
  - email: alice@example.com
    password: secret1
auth:
  min_password_len: 8
  sign_up_redirect: /welcome
routes:
  create_event: /events/new
input_channel_buffer: 16
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.users.len(), 1);
        assert_eq!(config.input_channel_buffer(), 16);
        assert_eq!(config.auth.policy().min_password_len, 8);
        assert_eq!(config.auth.policy().sign_up_redirect.as_str(), "/welcome");
        let routes = config.routes.routes();
        assert_eq!(routes.create_event.as_str(), "/events/new");
        assert_eq!(routes.my_events.as_str(), "/my-events");
    }

    #[test]
    fn relative_route_is_rejected() {
        let yaml = "routes:\n  create_event: events/new\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn override_merge_prefers_other() {
        let mut config = Config::default();
        let mut other = Config::default();
        other.set_input_channel_buffer(Some(0));
        other.auth.set_min_password_len(Some(10));

        config.override_merge(&mut other);

        assert_eq!(config.input_channel_buffer(), 1);
        assert_eq!(config.auth.policy().min_password_len, 10);
    }
}
