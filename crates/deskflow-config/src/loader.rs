// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./deskflow.toml` > `~/.config/deskflow/deskflow.toml` > `/etc/deskflow/deskflow.toml`
//! with environment variable overrides via `DESKFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use strum::IntoEnumIterator;

use crate::diagnostic::Section;
use crate::model::DeskflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/deskflow/deskflow.toml` (system-wide)
/// 3. `~/.config/deskflow/deskflow.toml` (user XDG config)
/// 4. `./deskflow.toml` (local directory)
/// 5. `DESKFLOW_*` environment variables
pub fn load_config() -> Result<DeskflowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<DeskflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DeskflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DeskflowConfig::default()))
        .merge(Toml::file("/etc/deskflow/deskflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("deskflow/deskflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("deskflow.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `DESKFLOW_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `DESKFLOW_CLASSIFIER_API_TOKEN` maps to `classifier.api_token`.
fn env_provider() -> Env {
    Env::prefixed("DESKFLOW_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in Section::iter() {
        if let Some(rest) = key
            .strip_prefix(section.to_string().as_str())
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("classifier_api_token"), "classifier.api_token");
        assert_eq!(
            map_env_key("notifications_frontend_url"),
            "notifications.frontend_url"
        );
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("RETRAIN_ENABLED"), "retrain.enabled");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
