//! End-to-end configuration loading through the public API.
//!
//! Invariants:
//! - Tests are `#[serial]` because they mutate process environment variables.
//! - `DOTENV_DISABLED` is set so a developer's `.env` never leaks in.

use std::time::Duration;

use coop_config::constants::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
use coop_config::{ConfigError, ConfigLoader, default_state_path};
use secrecy::ExposeSecret;
use serial_test::serial;

const VARS: [&str; 8] = [
    "COOP_BASE_URL",
    "COOP_USERNAME",
    "COOP_PASSWORD",
    "COOP_SKIP_VERIFY",
    "COOP_TIMEOUT",
    "COOP_CONNECT_TIMEOUT",
    "COOP_MAX_RETRIES",
    "COOP_STATE_PATH",
];

fn env(set: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    let mut vars: Vec<_> = VARS
        .iter()
        .map(|name| (*name, set.iter().find(|(k, _)| k == name).map(|(_, v)| *v)))
        .collect();
    vars.push(("DOTENV_DISABLED", Some("1")));
    vars
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    temp_env::with_vars(env(&[]), || {
        let config = ConfigLoader::new()
            .load_dotenv()
            .unwrap()
            .from_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.connection.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connection.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.connection.timeout, None);
        assert!(config.credentials.is_none());
        assert_eq!(config.state_path, default_state_path().unwrap());
    });
}

#[test]
#[serial]
fn test_overrides_win_over_environment() {
    temp_env::with_vars(
        env(&[
            ("COOP_BASE_URL", "http://env.example:8000"),
            ("COOP_USERNAME", "ana"),
            ("COOP_PASSWORD", "secreto"),
            ("COOP_TIMEOUT", "30"),
        ]),
        || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_base_url("https://coop.example/".to_string())
                .with_timeout(Duration::from_secs(5))
                .build()
                .unwrap();

            assert_eq!(config.connection.base_url, "https://coop.example");
            assert_eq!(config.connection.timeout, Some(Duration::from_secs(5)));
            let creds = config.credentials.unwrap();
            assert_eq!(creds.username, "ana");
            assert_eq!(creds.password.expose_secret(), "secreto");
        },
    );
}

#[test]
#[serial]
fn test_password_never_in_debug_output() {
    temp_env::with_vars(
        env(&[("COOP_USERNAME", "ana"), ("COOP_PASSWORD", "muy-secreto")]),
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
            assert!(!format!("{config:?}").contains("muy-secreto"));
        },
    );
}

#[test]
#[serial]
fn test_out_of_range_retries_rejected() {
    temp_env::with_vars(env(&[]), || {
        let err = ConfigLoader::new().with_max_retries(11).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxRetries { .. }));
    });
}
