// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskflow send-test-email`.

use deskflow_config::DeskflowConfig;
use deskflow_core::{DeskflowError, EmailSender, OutgoingEmail};
use deskflow_notify::SmtpEmailSender;
use tracing::info;

pub async fn send_test_email(config: &DeskflowConfig, to: &str) -> Result<(), DeskflowError> {
    let sender = SmtpEmailSender::new(&config.smtp)?;
    sender.send(&test_email(config, to)).await?;
    info!(to, host = %config.smtp.host, "test email sent");
    println!("sent test email to {to} via {}:{}", config.smtp.host, config.smtp.port);
    Ok(())
}

fn test_email(config: &DeskflowConfig, to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: vec![to.to_string()],
        subject: format!("Test email | {}", config.service.name),
        html: format!(
            "<p>SMTP delivery from {} is working.</p>",
            config.smtp.from_address
        ),
    }
}
