//! Command-line arguments
//!
//! Every flag can also be supplied through its environment variable; the
//! flag wins when both are present.

use assessment_common::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for assessment-server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "assessment-server")]
#[command(about = "Capability self-assessment webhook and results service")]
#[command(version)]
pub struct Cli {
    /// Address to listen on (host:port)
    #[arg(short, long, env = "ASSESSMENT_BIND")]
    pub bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "ASSESSMENT_DATABASE")]
    pub database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "ASSESSMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// SendGrid API key
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,

    /// Verified sender address for notifications
    #[arg(long, env = "SENDGRID_SENDER_EMAIL")]
    pub sender_email: Option<String>,

    /// Display name of the sender
    #[arg(long, env = "SENDGRID_SENDER_NAME")]
    pub sender_name: Option<String>,

    /// Reviewer who receives assessment summaries
    #[arg(long, env = "INTERVIEWER_EMAIL")]
    pub interviewer_email: Option<String>,

    /// Recipient of /test-email
    #[arg(long, env = "TEST_EMAIL")]
    pub test_email: Option<String>,

    /// Base URL used in result links
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,
}

impl Cli {
    /// Highest-priority configuration layer
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind,
            database_path: self.database,
            sendgrid_api_key: self.sendgrid_api_key,
            sender_email: self.sender_email,
            sender_name: self.sender_name,
            interviewer_email: self.interviewer_email,
            test_email: self.test_email,
            public_base_url: self.public_base_url,
        }
    }
}
