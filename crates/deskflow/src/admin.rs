// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskflow config` and `deskflow migrate`.

use deskflow_config::DeskflowConfig;
use deskflow_core::{DeskflowError, TICKET_SEQUENCE};
use deskflow_storage::SqliteStore;
use tracing::info;

const REDACTED: &str = "********";

/// Print the effective configuration as TOML.
pub fn print_config(config: &DeskflowConfig) -> Result<(), DeskflowError> {
    print!("{}", render_config(config)?);
    Ok(())
}

fn render_config(config: &DeskflowConfig) -> Result<String, DeskflowError> {
    let mut shown = config.clone();
    redact(&mut shown.classifier.api_token);
    redact(&mut shown.smtp.password);
    toml::to_string_pretty(&shown).map_err(|e| DeskflowError::Config(e.to_string()))
}

fn redact(secret: &mut Option<String>) {
    if secret.is_some() {
        *secret = Some(REDACTED.to_string());
    }
}

/// Open the database (applying pending migrations) and report its state.
pub async fn migrate(config: &DeskflowConfig) -> Result<(), DeskflowError> {
    let store = SqliteStore::new(config.storage.clone());
    store.initialize().await?;
    let issued = store.current_sequence(TICKET_SEQUENCE).await?.unwrap_or(0);
    store.close().await?;

    info!(path = %config.storage.database_path, issued, "database ready");
    println!(
        "database ready at {} ({issued} ticket numbers issued)",
        config.storage.database_path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let mut config = DeskflowConfig::default();
        config.classifier.api_token = Some("sk-secret".into());
        config.smtp.username = Some("mailer".into());
        config.smtp.password = Some("hunter2".into());

        let rendered = render_config(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("mailer"));
        assert!(rendered.contains(REDACTED));
    }

    #[tokio::test]
    async fn migrate_creates_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DeskflowConfig::default();
        config.storage.database_path = dir
            .path()
            .join("nested/deskflow.db")
            .to_string_lossy()
            .into_owned();

        migrate(&config).await.unwrap();
        assert!(dir.path().join("nested/deskflow.db").exists());
        migrate(&config).await.unwrap();
    }
}
