// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP delivery through `lettre`.

use async_trait::async_trait;
use deskflow_config::model::SmtpConfig;
use deskflow_core::{DeskflowError, EmailSender, OutgoingEmail};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::debug;

/// Sends rendered notifications through an SMTP relay.
///
/// Uses STARTTLS except for loopback relays, which are spoken to in plain
/// text. Credentials are sent only when both username and password are set.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, DeskflowError> {
        let address: Address = config.from_address.parse().map_err(|e| {
            DeskflowError::Config(format!(
                "invalid smtp.from_address `{}`: {e}",
                config.from_address
            ))
        })?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let mut builder = if is_loopback(&config.host) {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host).map_err(|e| {
                DeskflowError::Email {
                    message: format!("failed to configure SMTP relay {}: {e}", config.host),
                    source: Some(Box::new(e)),
                }
            })?
        }
        .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, DeskflowError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML);
        for recipient in &email.to {
            let mailbox: Mailbox = recipient.parse().map_err(|e| DeskflowError::Email {
                message: format!("invalid recipient `{recipient}`: {e}"),
                source: None,
            })?;
            builder = builder.to(mailbox);
        }
        builder
            .body(email.html.clone())
            .map_err(|e| DeskflowError::Email {
                message: format!("failed to build message: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeskflowError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DeskflowError::Email {
                message: format!("SMTP delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(recipients = email.to.len(), subject = %email.subject, "email delivered");
        Ok(())
    }
}

fn is_loopback(host: &str) -> bool {
    host == "localhost"
        || host
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}
