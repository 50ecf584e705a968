use crate::services::prompts::PipelineMode;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config::{load_layered, ServerConfig};
use service_core::error::AppError;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub features: FeatureSettings,
    #[serde(default)]
    pub gate: GateSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Which backend answers prompts.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Gemini,
    /// Canned responses, no network. Useful for demos without an API key.
    Mock,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is read on every call and never stored in settings.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// HTTP timeout for a single model call; 0 waits indefinitely.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
            temperature: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PipelineSettings {
    #[serde(default)]
    pub mode: PipelineMode,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FeatureSettings {
    #[serde(default)]
    pub credential_gate: bool,
    #[serde(default = "default_true")]
    pub language_selection: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            credential_gate: false,
            language_selection: true,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct GateSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    #[serde(default = "default_inactivity_hours")]
    pub inactivity_hours: i64,
    /// Set the `Secure` cookie attribute. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_inactivity_hours() -> i64 {
    24
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inactivity_hours: default_inactivity_hours(),
            secure_cookie: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), AppError> {
        self.server.validate()?;

        if self.model.model.trim().is_empty() {
            return Err(config_error("model.model cannot be empty"));
        }

        if self.model.provider == ProviderKind::Gemini && self.model.api_key_env.trim().is_empty()
        {
            return Err(config_error("model.api_key_env cannot be empty"));
        }

        if let Some(temperature) = self.model.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(config_error("model.temperature must be between 0.0 and 2.0"));
            }
        }

        if self.session.inactivity_hours <= 0 {
            return Err(config_error("session.inactivity_hours must be positive"));
        }

        if self.features.credential_gate {
            let password_set = self
                .gate
                .password
                .as_ref()
                .is_some_and(|p| !p.expose_secret().is_empty());
            if self.gate.username.trim().is_empty() || !password_set {
                return Err(config_error(
                    "gate.username and gate.password are required when features.credential_gate is enabled",
                ));
            }
        }

        Ok(())
    }
}

fn config_error(message: &str) -> AppError {
    AppError::ConfigError(anyhow::anyhow!("{}", message))
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("No working directory: {}", e)))?;

    // Works both from the workspace root and from inside the crate directory.
    let configuration_directory = if base_path.ends_with("itinerary-service") {
        base_path.join("config")
    } else {
        base_path.join("itinerary-service").join("config")
    };

    let settings: Settings = load_layered(&configuration_directory.join("base.yaml"), "APP")?;
    settings.validate()?;
    Ok(settings)
}
