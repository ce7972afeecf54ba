// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Deskflow helpdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Deskflow configuration.
///
/// Every section is optional and defaults to values suitable for a local
/// development instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeskflowConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Text classification service used for auto-routing.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Outbound SMTP relay.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Workflow email notifications.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Ticket workflow rules.
    #[serde(default)]
    pub tickets: TicketConfig,

    /// Classifier retraining schedule.
    #[serde(default)]
    pub retrain: RetrainConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Instance name, used in logs and the email sender display name default.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "deskflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("deskflow").join("deskflow.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("deskflow.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Classification service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Base URL of the classification service (`/classify` and `/train` are appended).
    #[serde(default = "default_classifier_url")]
    pub base_url: String,

    /// Bearer token sent with every request. `None` sends no Authorization header.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient responses (429, 500, 503).
    #[serde(default = "default_classifier_retries")]
    pub max_retries: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_url(),
            api_token: None,
            timeout_secs: default_classifier_timeout(),
            max_retries: default_classifier_retries(),
        }
    }
}

fn default_classifier_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_classifier_timeout() -> u64 {
    30
}

fn default_classifier_retries() -> u32 {
    1
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// SMTP username. Credentials are only sent when both username and password are set.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Envelope sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Display name shown next to the sender address.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from_address: default_from_address(),
            from_name: default_from_name(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "tickets@localhost".to_string()
}

fn default_from_name() -> String {
    "Deskflow Tickets".to_string()
}

/// Workflow notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// When false, workflow events produce no email.
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,

    /// Frontend base URL used to build ticket links in emails.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_frontend_url() -> String {
    "http://localhost:4200".to_string()
}

/// Ticket workflow rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketConfig {
    /// Lowest accepted rating, also used when a rating request carries none.
    #[serde(default = "default_min_rating")]
    pub min_rating: u8,

    /// Highest accepted rating.
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            min_rating: default_min_rating(),
            max_rating: default_max_rating(),
        }
    }
}

fn default_min_rating() -> u8 {
    0
}

fn default_max_rating() -> u8 {
    5
}

/// Classifier retraining schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrainConfig {
    /// Enable the background retraining worker.
    #[serde(default = "default_retrain_enabled")]
    pub enabled: bool,

    /// Periodic retraining interval in seconds (default: weekly).
    #[serde(default = "default_retrain_interval")]
    pub interval_secs: u64,

    /// Quiet period after a retrain request; requests arriving within it
    /// are folded into the same run.
    #[serde(default = "default_retrain_debounce")]
    pub debounce_secs: u64,
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            enabled: default_retrain_enabled(),
            interval_secs: default_retrain_interval(),
            debounce_secs: default_retrain_debounce(),
        }
    }
}

fn default_retrain_enabled() -> bool {
    true
}

fn default_retrain_interval() -> u64 {
    7 * 24 * 60 * 60
}

fn default_retrain_debounce() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DeskflowConfig::default();
        assert_eq!(config.service.name, "deskflow");
        assert_eq!(config.tickets.max_rating, 5);
        assert_eq!(config.retrain.interval_secs, 604_800);
        assert!(config.storage.database_path.ends_with("deskflow.db"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: DeskflowConfig = toml::from_str(
            r#"
[smtp]
host = "smtp.example.com"
"#,
        )
        .unwrap();
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.username.is_none());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = toml::from_str::<DeskflowConfig>(
            r#"
[tickets]
max_ratng = 10
"#,
        );
        assert!(result.is_err());
    }
}
