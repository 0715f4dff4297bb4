use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use aiven_broker_sdk::{ServiceOffering, ServicePlan};
use serde::{Deserialize, Serialize};

/// Aiven only accepts service names up to 64 characters; the checksum suffix needs nine of them.
pub const MAX_SERVICE_NAME_PREFIX_LEN: usize = 27;
pub const DEFAULT_AIVEN_API_URL: &str = "https://api.aiven.io";

pub const ENV_AIVEN_USERNAME: &str = "AIVEN_USERNAME";
pub const ENV_AIVEN_PASSWORD: &str = "AIVEN_PASSWORD";
pub const ENV_PORT: &str = "PORT";
pub const ENV_AIVEN_CLOUD: &str = "AIVEN_CLOUD";
pub const ENV_AIVEN_API_TOKEN: &str = "AIVEN_API_TOKEN";
pub const ENV_AIVEN_PROJECT: &str = "AIVEN_PROJECT";
pub const ENV_SERVICE_NAME_PREFIX: &str = "SERVICE_NAME_PREFIX";
pub const ENV_IP_WHITELIST: &str = "IP_WHITELIST";
pub const ENV_AIVEN_API_URL: &str = "AIVEN_API_URL";

// ---------------------------------------------------------------------------
// File configuration
// ---------------------------------------------------------------------------

/// Configuration as read from the broker's JSON file.
#[derive(Clone, Serialize, Deserialize)]
pub struct BrokerFileConfig {
    /// Broker name, recorded in the tags of every created service.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub basic_auth_username: String,
    #[serde(default)]
    pub basic_auth_password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_metrics_interval_secs")]
    pub metrics_interval_secs: u64,
    #[serde(default)]
    pub prometheus_integration_endpoint_id: Option<String>,
    #[serde(default)]
    pub catalog: Catalog,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "debug".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_metrics_interval_secs() -> u64 {
    120
}

impl fmt::Debug for BrokerFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerFileConfig")
            .field("name", &self.name)
            .field("basic_auth_username", &self.basic_auth_username)
            .field("basic_auth_password", &"[REDACTED]")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("metrics_interval_secs", &self.metrics_interval_secs)
            .field(
                "prometheus_integration_endpoint_id",
                &self.prometheus_integration_endpoint_id,
            )
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<CatalogService>,
}

/// A catalog service. Its `name` selects the Aiven service kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bindable: bool,
    #[serde(default)]
    pub plan_updateable: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub plans: Vec<CatalogPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub free: Option<bool>,
    /// Aiven plan identifier, e.g. `startup-4`.
    #[serde(default)]
    pub aiven_plan: String,
    #[serde(default)]
    pub elasticsearch_version: Option<String>,
    #[serde(default)]
    pub opensearch_version: Option<String>,
}

impl From<&CatalogService> for ServiceOffering {
    fn from(service: &CatalogService) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            bindable: service.bindable,
            plan_updateable: service.plan_updateable,
            tags: service.tags.clone(),
            plans: service.plans.iter().map(ServicePlan::from).collect(),
        }
    }
}

impl From<&CatalogPlan> for ServicePlan {
    fn from(plan: &CatalogPlan) -> Self {
        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            description: plan.description.clone(),
            free: plan.free,
        }
    }
}

// ---------------------------------------------------------------------------
// Log level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    /// Only errors are emitted; kept for compatibility with existing config files.
    Fatal,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(ConfigError::InvalidLogLevel(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config error: basic auth username required")]
    MissingBasicAuthUsername,

    #[error("Config error: basic auth password required")]
    MissingBasicAuthPassword,

    #[error("Config error: environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("Config error: PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("Config error: log level {0} is not one of debug, info, warn, error, fatal")]
    InvalidLogLevel(String),

    #[error("Config error: at least one service must be configured")]
    EmptyCatalog,

    #[error("Config error: at least one plan must be configured for service {service}")]
    ServiceWithoutPlans { service: String },

    #[error("Config error: plan {plan_id} of service {service} must specify an `aiven_plan`")]
    MissingAivenPlan { service: String, plan_id: String },

    #[error("Config error: every {service} plan must specify an `{field}` (plan {plan_id})")]
    MissingVersion {
        service: String,
        plan_id: String,
        field: &'static str,
    },

    #[error(
        "Config error: service name prefix cannot be longer than {max} characters, got {len}"
    )]
    PrefixTooLong { len: usize, max: usize },

    #[error("Config error: `{field}` must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("Config error: metrics converger requires `prometheus_integration_endpoint_id`")]
    MissingPrometheusEndpoint,
}

// ---------------------------------------------------------------------------
// Assembled configuration
// ---------------------------------------------------------------------------

/// Connection settings for the Aiven API.
#[derive(Clone)]
pub struct AivenConfig {
    pub api_url: String,
    pub api_token: String,
    pub project: String,
    pub cloud: String,
}

impl fmt::Debug for AivenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AivenConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"[REDACTED]")
            .field("project", &self.project)
            .field("cloud", &self.cloud)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Immutable broker configuration, assembled from the JSON file and the environment.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub broker_name: String,
    pub basic_auth: BasicAuth,
    pub port: u16,
    pub log_level: LogLevel,
    pub catalog: Catalog,
    pub aiven: AivenConfig,
    pub service_name_prefix: String,
    /// Comma-separated IPv4 addresses allowed on every provisioned service.
    pub ip_whitelist: Option<String>,
    pub request_timeout: Duration,
    pub metrics_interval: Duration,
    pub prometheus_integration_endpoint_id: Option<String>,
}

impl BrokerConfig {
    /// Parses `raw` as JSON and overlays values from `env`.
    ///
    /// `env` is injected so that assembly stays pure; the binary passes a
    /// closure over `std::env::var`.
    pub fn load<F>(raw: &[u8], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: BrokerFileConfig = serde_json::from_slice(raw)?;
        Self::from_file(file, env)
    }

    pub fn from_file<F>(file: BrokerFileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| non_empty(key).ok_or(ConfigError::MissingEnv(key));

        let username = env(ENV_AIVEN_USERNAME).unwrap_or(file.basic_auth_username);
        if username.is_empty() {
            return Err(ConfigError::MissingBasicAuthUsername);
        }
        let password = env(ENV_AIVEN_PASSWORD).unwrap_or(file.basic_auth_password);
        if password.is_empty() {
            return Err(ConfigError::MissingBasicAuthPassword);
        }

        let port = match env(ENV_PORT) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => file.port,
        };
        let log_level = file.log_level.parse::<LogLevel>()?;
        let request_timeout = non_zero_secs("request_timeout_secs", file.request_timeout_secs)?;
        let metrics_interval =
            non_zero_secs("metrics_interval_secs", file.metrics_interval_secs)?;

        validate_catalog(&file.catalog)?;

        let cloud = required(ENV_AIVEN_CLOUD)?;
        let api_token = required(ENV_AIVEN_API_TOKEN)?;
        let project = required(ENV_AIVEN_PROJECT)?;
        let service_name_prefix = required(ENV_SERVICE_NAME_PREFIX)?;
        if service_name_prefix.len() > MAX_SERVICE_NAME_PREFIX_LEN {
            return Err(ConfigError::PrefixTooLong {
                len: service_name_prefix.len(),
                max: MAX_SERVICE_NAME_PREFIX_LEN,
            });
        }

        let api_url = non_empty(ENV_AIVEN_API_URL)
            .unwrap_or_else(|| DEFAULT_AIVEN_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            broker_name: file.name,
            basic_auth: BasicAuth { username, password },
            port,
            log_level,
            catalog: file.catalog,
            aiven: AivenConfig {
                api_url,
                api_token,
                project,
                cloud,
            },
            service_name_prefix,
            ip_whitelist: non_empty(ENV_IP_WHITELIST),
            request_timeout,
            metrics_interval,
            prometheus_integration_endpoint_id: file
                .prometheus_integration_endpoint_id
                .filter(|id| !id.is_empty()),
        })
    }

    /// Endpoint the metrics converger wires services to.
    pub fn prometheus_endpoint_id(&self) -> Result<&str, ConfigError> {
        self.prometheus_integration_endpoint_id
            .as_deref()
            .ok_or(ConfigError::MissingPrometheusEndpoint)
    }
}

fn non_zero_secs(field: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroDuration { field });
    }
    Ok(Duration::from_secs(secs))
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    if catalog.services.is_empty() {
        return Err(ConfigError::EmptyCatalog);
    }
    for service in &catalog.services {
        if service.plans.is_empty() {
            return Err(ConfigError::ServiceWithoutPlans {
                service: service.name.clone(),
            });
        }
        for plan in &service.plans {
            if plan.aiven_plan.is_empty() {
                return Err(ConfigError::MissingAivenPlan {
                    service: service.name.clone(),
                    plan_id: plan.id.clone(),
                });
            }
            let version = match service.name.as_str() {
                "elasticsearch" => Some(("elasticsearch_version", &plan.elasticsearch_version)),
                "opensearch" => Some(("opensearch_version", &plan.opensearch_version)),
                _ => None,
            };
            if let Some((field, value)) = version
                && value.as_deref().is_none_or(str::is_empty)
            {
                return Err(ConfigError::MissingVersion {
                    service: service.name.clone(),
                    plan_id: plan.id.clone(),
                    field,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const CONFIG: &str = r#"{
        "name": "test-broker",
        "basic_auth_username": "admin",
        "basic_auth_password": "s3cret-password",
        "catalog": {
            "services": [{
                "id": "opensearch-svc",
                "name": "opensearch",
                "description": "OpenSearch",
                "bindable": true,
                "plans": [{
                    "id": "os-small",
                    "name": "small",
                    "description": "small plan",
                    "aiven_plan": "startup-4",
                    "opensearch_version": "2"
                }]
            }]
        }
    }"#;

    fn env_with(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let mut vars: HashMap<String, String> = [
            (ENV_AIVEN_CLOUD, "aws-eu-west-1"),
            (ENV_AIVEN_API_TOKEN, "token-abc123"),
            (ENV_AIVEN_PROJECT, "my-project"),
            (ENV_SERVICE_NAME_PREFIX, "env"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        for (k, v) in pairs {
            vars.insert((*k).to_owned(), (*v).to_owned());
        }
        move |key: &str| vars.get(key).cloned()
    }

    fn env_without(missing: &'static str) -> impl Fn(&str) -> Option<String> + use<> {
        let base = env_with(&[]);
        move |key: &str| if key == missing { None } else { base(key) }
    }

    #[test]
    fn loads_file_values_and_defaults() {
        let config = BrokerConfig::load(CONFIG.as_bytes(), env_with(&[])).unwrap();
        assert_eq!(config.broker_name, "test-broker");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.metrics_interval, Duration::from_secs(120));
        assert_eq!(config.aiven.api_url, DEFAULT_AIVEN_API_URL);
        assert_eq!(config.aiven.cloud, "aws-eu-west-1");
        assert_eq!(config.service_name_prefix, "env");
        assert!(config.ip_whitelist.is_none());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env = env_with(&[
            (ENV_AIVEN_USERNAME, "env-user"),
            (ENV_AIVEN_PASSWORD, "env-pass"),
            (ENV_PORT, "8080"),
            (ENV_AIVEN_API_URL, "http://localhost:9999/"),
            (ENV_IP_WHITELIST, "1.2.3.4"),
        ]);
        let config = BrokerConfig::load(CONFIG.as_bytes(), env).unwrap();
        assert_eq!(config.basic_auth.username, "env-user");
        assert_eq!(config.basic_auth.password, "env-pass");
        assert_eq!(config.port, 8080);
        assert_eq!(config.aiven.api_url, "http://localhost:9999");
        assert_eq!(config.ip_whitelist.as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn each_required_env_var_is_reported_by_name() {
        for key in [
            ENV_AIVEN_CLOUD,
            ENV_AIVEN_API_TOKEN,
            ENV_AIVEN_PROJECT,
            ENV_SERVICE_NAME_PREFIX,
        ] {
            let err = BrokerConfig::load(CONFIG.as_bytes(), env_without(key)).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingEnv(name) if name == key),
                "expected MissingEnv({key}), got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_long_service_name_prefix() {
        let prefix = "p".repeat(MAX_SERVICE_NAME_PREFIX_LEN + 1);
        let err = BrokerConfig::load(
            CONFIG.as_bytes(),
            env_with(&[(ENV_SERVICE_NAME_PREFIX, prefix.as_str())]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::PrefixTooLong { len: 28, max: 27 }));
    }

    #[test]
    fn rejects_invalid_port_and_log_level() {
        let err =
            BrokerConfig::load(CONFIG.as_bytes(), env_with(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));

        let raw = CONFIG.replace(r#""name": "test-broker","#, r#""log_level": "loud","#);
        let err = BrokerConfig::load(raw.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "loud"));
    }

    #[test]
    fn rejects_zero_metrics_interval() {
        let raw = CONFIG.replace(
            r#""name": "test-broker","#,
            r#""name": "test-broker", "metrics_interval_secs": 0,"#,
        );
        let err = BrokerConfig::load(raw.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroDuration { field: "metrics_interval_secs" }
        ));
    }

    #[test]
    fn rejects_zero_request_timeout() {
        let raw = CONFIG.replace(
            r#""name": "test-broker","#,
            r#""name": "test-broker", "request_timeout_secs": 0,"#,
        );
        let err = BrokerConfig::load(raw.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroDuration { field: "request_timeout_secs" }
        ));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Fatal".parse::<LogLevel>().unwrap().as_filter_directive(), "error");
    }

    #[test]
    fn catalog_validation() {
        let err = BrokerConfig::load(
            br#"{"basic_auth_username":"a","basic_auth_password":"b"}"#,
            env_with(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCatalog));

        let no_version = CONFIG.replace(r#""opensearch_version": "2""#, r#""free": true"#);
        let err = BrokerConfig::load(no_version.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVersion { field: "opensearch_version", .. }
        ));

        let no_aiven_plan = CONFIG.replace(r#""aiven_plan": "startup-4","#, "");
        let err = BrokerConfig::load(no_aiven_plan.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAivenPlan { .. }));
    }

    #[test]
    fn missing_basic_auth_is_rejected() {
        let raw = CONFIG.replace(r#""basic_auth_password": "s3cret-password","#, "");
        let err = BrokerConfig::load(raw.as_bytes(), env_with(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBasicAuthPassword));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = BrokerConfig::load(CONFIG.as_bytes(), env_with(&[])).unwrap();
        let debug_output = format!("{config:?}");
        assert!(
            !debug_output.contains("s3cret-password"),
            "Debug output must not contain the basic auth password"
        );
        assert!(
            !debug_output.contains("token-abc123"),
            "Debug output must not contain the API token"
        );
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn catalog_service_converts_to_offering_without_aiven_fields() {
        let config = BrokerConfig::load(CONFIG.as_bytes(), env_with(&[])).unwrap();
        let offering = ServiceOffering::from(&config.catalog.services[0]);
        let json = serde_json::to_value(&offering).unwrap();
        assert_eq!(json["plans"][0]["id"], "os-small");
        assert!(json["plans"][0].get("aiven_plan").is_none());
    }
}
