use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (taskping.toml + TASKPING_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskpingConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Outbound SMTP settings. There are no defaults for the relay host or the
/// credential pair — the daemon refuses to start without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host name.
    pub host: String,
    /// Submission port for the STARTTLS session.
    #[serde(default = "default_mail_port")]
    pub port: u16,
    /// Authenticated sender address; doubles as the SMTP username.
    pub from: String,
    pub password: String,
    /// Time budget in seconds for a single delivery attempt.
    #[serde(default = "default_mail_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Seconds between dispatch passes.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

fn default_mail_port() -> u16 {
    587
}
fn default_mail_timeout() -> u64 {
    30
}
fn default_interval() -> u64 {
    3600
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.taskping/taskping.db", home)
}

impl TaskpingConfig {
    /// Load config from a TOML file with TASKPING_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.taskping/taskping.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: TaskpingConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("TASKPING_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.taskping/taskping.toml", home)
}
