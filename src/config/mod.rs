use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for the digest run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub hr: HrConfig,
    pub webhook: WebhookConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = required_var("HR_API_KEY")?;
        let company_domain = required_var("HR_COMPANY_DOMAIN")?;
        let api_base = env::var("HR_API_BASE")
            .unwrap_or_else(|_| "https://api.bamboohr.com/api/gateway.php".to_string());

        let webhook_url = required_var("CHAT_WEBHOOK_URL")?;

        let artifact_path = env::var("DIGEST_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output.json"));

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            hr: HrConfig {
                api_base,
                company_domain,
                api_key,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            webhook: WebhookConfig {
                url: webhook_url,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            output: OutputConfig { artifact_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the HR platform API.
#[derive(Debug, Clone)]
pub struct HrConfig {
    pub api_base: String,
    pub company_domain: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl HrConfig {
    /// Tenant-scoped gateway root, e.g. `{api_base}/{company_domain}`.
    pub fn gateway_base(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.company_domain
        )
    }
}

/// Settings for the chat webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub request_timeout: Duration,
}

/// Settings for the JSON artifact written each run.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub artifact_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar { name: &'static str },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { name } => {
                write!(f, "{} must be set to a non-empty value", name)
            }
            ConfigError::InvalidTimeout => {
                write!(f, "HTTP_TIMEOUT_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
