//! Configuration loading and resolution
//!
//! Each value is resolved once at startup in priority order:
//! 1. Command-line argument or environment variable (supplied by the binary)
//! 2. TOML config file
//! 3. Compiled default
//!
//! Components receive the resolved `AppConfig`; nothing reads the process
//! environment after startup.

use crate::questionnaire::Questionnaire;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5780";

/// Default display name of the notification sender
pub const DEFAULT_SENDER_NAME: &str = "Capability Assessment";

/// Values taken from the command line / environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    pub sendgrid_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub sender_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub test_email: Option<String>,
    pub public_base_url: Option<String>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    pub sendgrid_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub sender_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub test_email: Option<String>,
    pub public_base_url: Option<String>,
    pub questionnaire: Option<Questionnaire>,
}

/// Outbound email settings
#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    /// Verified sender address
    pub sender_email: Option<String>,
    pub sender_name: String,
    /// Reviewer who receives assessment summaries
    pub interviewer_email: Option<String>,
    /// Recipient of `/test-email`; falls back to the reviewer
    pub test_email: Option<String>,
}

impl EmailConfig {
    pub fn test_recipient(&self) -> Option<&str> {
        self.test_email
            .as_deref()
            .or(self.interviewer_email.as_deref())
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_path: PathBuf,
    /// Base URL used to build result links, without trailing slash
    pub public_base_url: String,
    pub email: EmailConfig,
    pub questionnaire: Questionnaire,
}

impl AppConfig {
    /// Merge overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Result<Self> {
        let bind_address = pick(overrides.bind_address, file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_path = overrides
            .database_path
            .or(file.database_path)
            .unwrap_or_else(default_database_path);

        let public_base_url = pick(overrides.public_base_url, file.public_base_url)
            .unwrap_or_else(|| format!("http://{}", bind_address))
            .trim_end_matches('/')
            .to_string();

        let email = EmailConfig {
            sendgrid_api_key: pick(overrides.sendgrid_api_key, file.sendgrid_api_key),
            sender_email: pick(overrides.sender_email, file.sender_email),
            sender_name: pick(overrides.sender_name, file.sender_name)
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            interviewer_email: pick(overrides.interviewer_email, file.interviewer_email),
            test_email: pick(overrides.test_email, file.test_email),
        };

        let questionnaire = file.questionnaire.unwrap_or_default();
        questionnaire.validate()?;

        Ok(Self {
            bind_address,
            database_path,
            public_base_url,
            email,
            questionnaire,
        })
    }

    /// Warn about settings whose absence disables a feature
    pub fn log_missing(&self) {
        if self.email.sendgrid_api_key.is_none() {
            warn!("SENDGRID_API_KEY not configured: notifications will fail");
        }
        if self.email.sender_email.is_none() {
            warn!("SENDGRID_SENDER_EMAIL not configured: notifications will fail");
        }
        if self.email.interviewer_email.is_none() {
            warn!("INTERVIEWER_EMAIL not configured: assessment summaries will not be sent");
        }
    }

    /// Link to the results page for a response
    pub fn results_url(&self, response_id: &str) -> String {
        format!(
            "{}/results?response_id={}",
            self.public_base_url,
            urlencoding::encode(response_id)
        )
    }
}

/// First non-blank value
fn pick(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    primary
        .filter(|v| is_set(v))
        .or_else(|| secondary.filter(|v| is_set(v)))
        .map(|v| v.trim().to_string())
}

/// A configured string counts only when it is non-empty after trimming
pub fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Load the TOML config file
///
/// An explicit path must exist and parse. Without one, the platform default
/// location is tried and a missing file yields defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                info!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// `<config_dir>/assessment/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("assessment").join("config.toml"))
}

/// `<data_local_dir>/assessment/assessment.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("assessment"))
        .unwrap_or_else(|| PathBuf::from("./assessment_data"))
        .join("assessment.db")
}
