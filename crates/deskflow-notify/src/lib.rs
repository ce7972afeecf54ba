// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email notifications for ticket workflow events.
//!
//! - [`NotificationDispatcher`] turns a ticket event into one rendered email
//! - [`SmtpEmailSender`] delivers it through an SMTP relay

pub mod dispatcher;
pub mod smtp;
pub mod templates;

pub use dispatcher::{NotificationDispatcher, NotificationOutcome, NotificationSources};
pub use smtp::SmtpEmailSender;
pub use templates::{EmailTemplate, TemplateFields};
