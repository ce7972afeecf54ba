// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded HTML email templates and placeholder substitution.
//!
//! Templates use `{{name}}` placeholders. Substituted values are
//! HTML-escaped; placeholders without a value render as empty text.

use deskflow_core::NotificationKind;

const CREATION: &str = include_str!("../templates/ticket_creation.html");
const ASSIGNED_AGENT: &str = include_str!("../templates/ticket_assigned_agent.html");
const ASSIGNED_AUTHOR: &str = include_str!("../templates/ticket_assigned_author.html");
const CLOSING: &str = include_str!("../templates/ticket_closing.html");

/// Values available to every template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    pub ticket_number: String,
    pub ticket_title: String,
    pub help_topic: String,
    pub department: String,
    pub description: String,
    pub url: String,
    pub author: Option<String>,
    pub agent: Option<String>,
}

/// Subject line and HTML body for one notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: &'static str,
    pub body: &'static str,
}

impl EmailTemplate {
    pub fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Creation => Self {
                subject: "New Ticket",
                body: CREATION,
            },
            NotificationKind::AssignmentForAgent => Self {
                subject: "Ticket Assigned",
                body: ASSIGNED_AGENT,
            },
            NotificationKind::AssignmentForAuthor => Self {
                subject: "Ticket Assigned",
                body: ASSIGNED_AUTHOR,
            },
            NotificationKind::Closing => Self {
                subject: "Ticket Closed",
                body: CLOSING,
            },
        }
    }

    /// Subject as sent: `"<subject> #<number> | <suffix>"`.
    pub fn subject_line(&self, fields: &TemplateFields, suffix: &str) -> String {
        format!("{} #{} | {suffix}", self.subject, fields.ticket_number)
    }

    /// Fills the template's placeholders in a single pass over the body.
    /// Substituted text is never scanned again, so values containing
    /// `{{...}}` appear verbatim.
    pub fn render(&self, fields: &TemplateFields) -> String {
        let mut html = String::with_capacity(self.body.len() + fields.description.len());
        let mut rest = self.body;
        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            let name = &rest[start + 2..start + 2 + len];
            html.push_str(&rest[..start]);
            match fields.lookup(name) {
                Some(value) => html.push_str(&escape_html(value)),
                None => html.push_str(&rest[start..start + len + 4]),
            }
            rest = &rest[start + len + 4..];
        }
        html.push_str(rest);
        html
    }
}

impl TemplateFields {
    /// Value for a placeholder name. Unset optional values are empty.
    fn lookup(&self, name: &str) -> Option<&str> {
        let value = match name {
            "ticketNumber" => self.ticket_number.as_str(),
            "ticketTitle" => self.ticket_title.as_str(),
            "helpTopic" => self.help_topic.as_str(),
            "department" => self.department.as_str(),
            "description" => self.description.as_str(),
            "url" => self.url.as_str(),
            "author" => self.author.as_deref().unwrap_or_default(),
            "agent" => self.agent.as_deref().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

/// Link to a ticket in the frontend.
pub fn ticket_url(frontend_url: &str, ticket_id: &str) -> String {
    format!("{}/tickets/view/{ticket_id}", frontend_url.trim_end_matches('/'))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TemplateFields {
        TemplateFields {
            ticket_number: "42".into(),
            ticket_title: "Printer".into(),
            help_topic: "Printers".into(),
            department: "Facilities".into(),
            description: "Paper <jam> on floor 3".into(),
            url: ticket_url("https://help.example.com/", "t-1"),
            author: Some("Ada Lovelace".into()),
            agent: None,
        }
    }

    #[test]
    fn every_placeholder_is_substituted() {
        for kind in [
            NotificationKind::Creation,
            NotificationKind::AssignmentForAgent,
            NotificationKind::AssignmentForAuthor,
            NotificationKind::Closing,
        ] {
            let html = EmailTemplate::for_kind(kind).render(&fields());
            assert!(!html.contains("{{"), "{kind} left a placeholder: {html}");
            assert!(html.contains("#42"));
        }
    }

    #[test]
    fn values_are_escaped() {
        let html = EmailTemplate::for_kind(NotificationKind::Creation).render(&fields());
        assert!(html.contains("Paper &lt;jam&gt; on floor 3"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("https://help.example.com/tickets/view/t-1"));
    }

    #[test]
    fn user_text_is_not_expanded_again() {
        let template = EmailTemplate::for_kind(NotificationKind::Creation);
        let slots = template.body.matches("{{description}}").count();
        let fields = TemplateFields {
            ticket_title: "{{description}}".into(),
            description: "SECRET-DESC {{url}}".into(),
            ..fields()
        };

        let html = template.render(&fields);
        assert_eq!(html.matches("SECRET-DESC").count(), slots);
        assert_eq!(html.matches("{{url}}").count(), slots);
        assert!(html.contains("{{description}}"));
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_kept() {
        let template = EmailTemplate {
            subject: "Test",
            body: "<p>{{ticketNumber}} {{nope}} {{ticketTitle</p>",
        };
        assert_eq!(template.render(&fields()), "<p>42 {{nope}} {{ticketTitle</p>");
    }

    #[test]
    fn subject_carries_number_and_suffix() {
        let template = EmailTemplate::for_kind(NotificationKind::Closing);
        assert_eq!(
            template.subject_line(&fields(), "Tickets"),
            "Ticket Closed #42 | Tickets"
        );
    }
}
