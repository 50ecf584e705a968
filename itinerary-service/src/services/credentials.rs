//! Login check for the optional credential gate.

use crate::config::GateSettings;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::utils::constant_time_eq;

/// Username/password pair submitted by the login form. Missing fields
/// arrive empty so they fail `verify` like any other mismatch.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default = "empty_secret")]
    pub password: Secret<String>,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

/// Decides whether submitted credentials open the gate.
///
/// Swapping the implementation (e.g. for an identity provider) does not
/// touch the planner.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// Accepts exactly one configured pair.
pub struct StaticCredentialVerifier {
    username: String,
    password: Secret<String>,
}

impl StaticCredentialVerifier {
    pub fn new(username: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// `None` when the gate settings carry no password.
    pub fn from_settings(settings: &GateSettings) -> Option<Self> {
        settings
            .password
            .as_ref()
            .map(|password| Self::new(settings.username.clone(), password.clone()))
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, credentials: &Credentials) -> bool {
        // Both comparisons always run.
        let username_ok = constant_time_eq(self.username.as_bytes(), credentials.username.as_bytes());
        let password_ok = constant_time_eq(
            self.password.expose_secret().as_bytes(),
            credentials.password.expose_secret().as_bytes(),
        );
        username_ok & password_ok
    }
}
