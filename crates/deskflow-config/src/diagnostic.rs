// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment extraction failures and semantic validation failures both become
//! [`ConfigError`]s tied to a [`Section`] of `deskflow.toml`, so the rendered
//! report can point at the offending line and say what that table is for.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// The top-level tables of `deskflow.toml`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    Service,
    Storage,
    Classifier,
    Smtp,
    Notifications,
    Tickets,
    Retrain,
}

impl Section {
    /// Keys accepted inside this table.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Section::Service => &["name", "log_level"],
            Section::Storage => &["database_path", "wal_mode"],
            Section::Classifier => &["base_url", "api_token", "timeout_secs", "max_retries"],
            Section::Smtp => &[
                "host",
                "port",
                "username",
                "password",
                "from_address",
                "from_name",
            ],
            Section::Notifications => &["enabled", "frontend_url"],
            Section::Tickets => &["min_rating", "max_rating"],
            Section::Retrain => &["enabled", "interval_secs", "debounce_secs"],
        }
    }

    pub fn purpose(self) -> &'static str {
        match self {
            Section::Service => "[service] names this instance and sets the log level",
            Section::Storage => "[storage] locates the SQLite file holding tickets and transfers",
            Section::Classifier => {
                "[classifier] is the text classification service that routes new tickets"
            }
            Section::Smtp => "[smtp] is the relay that delivers ticket notifications",
            Section::Notifications => {
                "[notifications] switches workflow email on or off and sets the ticket link base URL"
            }
            Section::Tickets => "[tickets] holds workflow rules such as the accepted rating range",
            Section::Retrain => "[retrain] schedules classifier retraining",
        }
    }

    fn name(self) -> &'static str {
        self.into()
    }

    fn of_table(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// A configuration problem, rendered with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key or table Deskflow does not read.
    #[error("unknown key `{key}` in {location}")]
    #[diagnostic(code(deskflow::config::unknown_key), help("{help}"))]
    UnknownKey {
        section: Option<Section>,
        key: String,
        /// Close spelling within the same table, if any.
        suggestion: Option<String>,
        location: String,
        help: String,
        #[label("not a Deskflow setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(deskflow::config::wrong_type), help("{help}"))]
    WrongType {
        key: String,
        found: String,
        help: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that deserialized but makes no sense for its table.
    #[error("{message}")]
    #[diagnostic(code(deskflow::config::invalid), help("{}", section.purpose()))]
    Invalid { section: Section, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(deskflow::config::other))]
    Other(String),
}

/// Converts every error carried by a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs file names with their contents and is used to attach
/// source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| from_figment(&error, toml_sources))
        .collect()
}

fn from_figment(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    let path: Vec<String> = error.path.iter().map(ToString::to_string).collect();
    let origin = Origin::of(error, toml_sources);

    match &error.kind {
        Kind::UnknownField(key, _) => {
            let section = path.first().and_then(|t| Section::of_table(t));
            let suggestion = section.and_then(|s| suggest_key(key, s.keys()));
            let mut help = unknown_key_help(section, key, suggestion.as_deref());
            if let Some(note) = origin.env_note(section, key) {
                help = format!("{help}. {note}");
            }
            let (span, src) = origin.locate(path.first().map(String::as_str), key);
            ConfigError::UnknownKey {
                location: section.map_or_else(|| "the top level".to_string(), |s| format!("[{s}]")),
                section,
                key: key.clone(),
                suggestion,
                help,
                span,
                src,
            }
        }
        Kind::InvalidType(found, expected) => {
            let (table, field) = match path.as_slice() {
                [table, .., field] => (Some(table.as_str()), field.as_str()),
                [field] => (None, field.as_str()),
                [] => (None, ""),
            };
            let mut help = format!("expected {expected}");
            if let Some(section) = table.and_then(Section::of_table) {
                help = format!("{help}. {}", section.purpose());
            }
            let (span, src) = origin.locate(table, field);
            ConfigError::WrongType {
                key: path.join("."),
                found: found.to_string(),
                help,
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn unknown_key_help(section: Option<Section>, key: &str, suggestion: Option<&str>) -> String {
    let Some(section) = section else {
        let tables: Vec<&str> = Section::iter().map(Section::name).collect();
        return match suggest_key(key, &tables) {
            Some(table) => format!("did you mean the [{table}] table?"),
            None => format!("Deskflow reads these tables: {}", tables.join(", ")),
        };
    };

    let owners: Vec<&str> = Section::iter()
        .filter(|s| *s != section && s.keys().contains(&key))
        .map(Section::name)
        .collect();
    if !owners.is_empty() {
        return format!("`{key}` belongs in [{}], not [{section}]", owners.join("] or ["));
    }

    match suggestion {
        Some(s) => format!("did you mean `{s}`? {}", section.purpose()),
        None => format!("[{section}] accepts: {}", section.keys().join(", ")),
    }
}

/// Where the failing value came from.
enum Origin<'a> {
    File { name: &'a str, content: &'a str },
    Environment,
    Unknown,
}

impl<'a> Origin<'a> {
    fn of(error: &FigmentError, toml_sources: &'a [(String, String)]) -> Self {
        let metadata = error.metadata.as_ref();
        if metadata.is_some_and(|m| m.name.contains("environment")) {
            return Origin::Environment;
        }
        let file = match metadata.and_then(|m| m.source.as_ref()) {
            Some(figment::Source::File(path)) => {
                let path = path.display().to_string();
                toml_sources.iter().find(|(name, _)| *name == path)
            }
            // Inline strings and merged defaults carry no file path.
            _ if toml_sources.len() == 1 => toml_sources.first(),
            _ => None,
        };
        match file {
            Some((name, content)) => Origin::File { name, content },
            None => Origin::Unknown,
        }
    }

    fn locate(
        &self,
        table: Option<&str>,
        key: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Origin::File { name, content } = self else {
            return (None, None);
        };
        match find_key_offset(content, table, key) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(*name, content.to_string())),
            ),
            None => (None, None),
        }
    }

    fn env_note(&self, section: Option<Section>, key: &str) -> Option<String> {
        let Origin::Environment = self else {
            return None;
        };
        let var = match section {
            Some(section) => format!("DESKFLOW_{section}_{key}"),
            None => format!("DESKFLOW_{key}"),
        };
        Some(format!("The value came from the environment; unset {}", var.to_uppercase()))
    }
}

/// Byte offset of `key` in TOML `content`.
///
/// With `table = Some(t)` only assignments inside `[t]` match. With `None`,
/// both top-level assignments and a `[key]` table header match.
pub fn find_key_offset(content: &str, table: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed.strip_prefix('[') {
            let inner = header.split(']').next().unwrap_or_default();
            let name = inner.trim();
            if table.is_none() && name == key {
                let pad = inner.len() - inner.trim_start().len();
                return Some(offset + indent + 1 + pad);
            }
            current = Some(name);
        } else if current == table && assigns(trimmed, key) {
            return Some(offset + indent);
        }

        offset += line.len();
    }

    None
}

fn assigns(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

/// Closest entry of `valid` to `unknown`, if similar enough.
pub fn suggest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(unknown, candidate)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.to_string())
}

/// Renders `errors` as one plain-text report.
pub fn render_report(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let plural = if errors.len() == 1 { "" } else { "s" };
    let mut out = format!("deskflow: {} configuration problem{plural}\n\n", errors.len());
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("error: {error}\n"));
        }
    }
    out
}

/// Prints [`render_report`] to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_report(errors));
}
