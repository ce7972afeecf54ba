// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::{ConfigError, Section};
use crate::model::DeskflowConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &DeskflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |section: Section, message: String| {
        errors.push(ConfigError::Invalid { section, message })
    };

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(Section::Service, format!(
            "service.log_level `{}` must be one of: {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail(Section::Storage, "storage.database_path must not be empty".to_string());
    }

    let base_url = config.classifier.base_url.trim();
    if base_url.is_empty() {
        fail(Section::Classifier, "classifier.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(Section::Classifier, format!(
            "classifier.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.classifier.timeout_secs == 0 {
        fail(Section::Classifier, "classifier.timeout_secs must be at least 1".to_string());
    }

    if config.smtp.host.trim().is_empty() {
        fail(Section::Smtp, "smtp.host must not be empty".to_string());
    }

    if config.smtp.port == 0 {
        fail(Section::Smtp, "smtp.port must not be 0".to_string());
    }

    if !config.smtp.from_address.contains('@') {
        fail(Section::Smtp, format!(
            "smtp.from_address `{}` is not an email address",
            config.smtp.from_address
        ));
    }

    if config.smtp.username.is_some() != config.smtp.password.is_some() {
        fail(Section::Smtp, "smtp.username and smtp.password must be set together".to_string());
    }

    if config.notifications.frontend_url.trim().is_empty() {
        fail(Section::Notifications, "notifications.frontend_url must not be empty".to_string());
    }

    if config.tickets.min_rating > config.tickets.max_rating {
        fail(Section::Tickets, format!(
            "tickets.min_rating ({}) must not exceed tickets.max_rating ({})",
            config.tickets.min_rating, config.tickets.max_rating
        ));
    }

    if config.retrain.interval_secs == 0 {
        fail(Section::Retrain, "retrain.interval_secs must be at least 1".to_string());
    }

    if config.retrain.debounce_secs >= config.retrain.interval_secs {
        fail(Section::Retrain, format!(
            "retrain.debounce_secs ({}) must be shorter than retrain.interval_secs ({})",
            config.retrain.debounce_secs, config.retrain.interval_secs
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
