use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ADBOARD__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub authority: AuthorityConfig,
}

/// Connection settings for the remote booking/ad-space authority.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorityConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            authority: AuthorityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADBOARD")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
