//! Configuration for the sentiment gateway.

use std::env;
use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as ConfigLoader, ConfigError, Environment, File, Source};
use serde::Deserialize;

/// Environment variable naming the endpoint, honoured for older deployments.
pub const LEGACY_ENDPOINT_NAME_VAR: &str = "SAGEMAKER_ENDPOINT_NAME";

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Inference endpoint settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Name of the hosted inference endpoint.
    pub endpoint_name: String,
    /// Base URL of the inference runtime serving the endpoint.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Total attempts per request, including the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Config for `endpoint_name` with every other setting at its default.
    pub fn new(endpoint_name: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            endpoint_url: default_endpoint_url(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint_name.trim().is_empty() {
            return Err(ConfigError::Message(
                "gateway.endpoint_name must not be empty".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Message(
                "gateway.max_retries must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "gateway.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_endpoint_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (SENTIMENT__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. SAGEMAKER_ENDPOINT_NAME for the endpoint name
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(
            env::var(LEGACY_ENDPOINT_NAME_VAR).ok(),
            File::with_name("config").required(false),
            Self::environment(),
        )
    }

    /// Layer the given sources over the built-in defaults, lowest first.
    pub fn load_from<S>(
        legacy_endpoint_name: Option<String>,
        file: S,
        environment: Environment,
    ) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut builder = Self::defaults()?;
        if let Some(name) = legacy_endpoint_name {
            builder = builder.set_default("gateway.endpoint_name", name)?;
        }

        Self::build(builder.add_source(file).add_source(environment))
    }

    /// Environment source for SENTIMENT__SECTION__KEY variables.
    pub fn environment() -> Environment {
        Environment::with_prefix("SENTIMENT")
            .separator("__")
            .try_parsing(true)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLoader::builder()
            .set_default("api.host", default_host())?
            .set_default("api.port", default_port() as i64)?
            .set_default("gateway.endpoint_url", default_endpoint_url())?
            .set_default("gateway.max_retries", default_max_retries() as i64)?
            .set_default("gateway.timeout_secs", default_timeout() as i64)?
            .set_default("logging.level", default_log_level())
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.gateway.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{FileFormat, Map};

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::build(Config::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn env_source(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::environment().source(Some(vars))
    }

    fn toml_source(toml: &str) -> File<config::FileSourceString, FileFormat> {
        File::from_str(toml, FileFormat::Toml)
    }

    #[test]
    fn test_default_api_config() {
        let api = ApiConfig::default();
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 3000);
    }

    #[test]
    fn test_gateway_config_defaults() {
        let config = GatewayConfig::new("sentiment-endpoint");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_endpoint_name_only() {
        let config = from_toml("[gateway]\nendpoint_name = \"sentiment-endpoint\"\n").unwrap();
        assert_eq!(config.gateway.endpoint_name, "sentiment-endpoint");
        assert_eq!(config.gateway.endpoint_url, "http://127.0.0.1:8080");
        assert_eq!(config.gateway.max_retries, 3);
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_endpoint_name_is_fatal() {
        assert!(from_toml("[api]\nport = 9000\n").is_err());
    }

    #[test]
    fn test_non_numeric_retries_is_fatal() {
        let toml = "[gateway]\nendpoint_name = \"e\"\nmax_retries = \"many\"\n";
        assert!(from_toml(toml).is_err());
    }

    #[test]
    fn test_zero_retries_is_rejected() {
        let toml = "[gateway]\nendpoint_name = \"e\"\nmax_retries = 0\n";
        let err = from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = GatewayConfig::new("e");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_legacy_endpoint_name_is_used_alone() {
        let config =
            Config::load_from(Some("legacy".to_string()), toml_source(""), env_source(&[]))
                .unwrap();
        assert_eq!(config.gateway.endpoint_name, "legacy");
        assert_eq!(config.gateway.max_retries, 3);
    }

    #[test]
    fn test_source_precedence() {
        let file = "[gateway]\nendpoint_name = \"from-file\"\nmax_retries = 2\n";

        let config =
            Config::load_from(Some("legacy".to_string()), toml_source(file), env_source(&[]))
                .unwrap();
        assert_eq!(config.gateway.endpoint_name, "from-file");
        assert_eq!(config.gateway.max_retries, 2);

        let env = env_source(&[
            ("SENTIMENT__GATEWAY__ENDPOINT_NAME", "from-env"),
            ("SENTIMENT__GATEWAY__MAX_RETRIES", "5"),
        ]);
        let config = Config::load_from(Some("legacy".to_string()), toml_source(file), env).unwrap();
        assert_eq!(config.gateway.endpoint_name, "from-env");
        assert_eq!(config.gateway.max_retries, 5);
    }

    #[test]
    fn test_env_overrides_only_named_keys() {
        let env = env_source(&[("SENTIMENT__GATEWAY__TIMEOUT_SECS", "7")]);
        let config = Config::load_from(
            None,
            toml_source("[gateway]\nendpoint_name = \"from-file\"\n"),
            env,
        )
        .unwrap();
        assert_eq!(config.gateway.endpoint_name, "from-file");
        assert_eq!(config.gateway.timeout_secs, 7);
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_no_endpoint_name_from_any_source_is_fatal() {
        assert!(Config::load_from(None, toml_source(""), env_source(&[])).is_err());
    }
}
