// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod counters;
pub mod tickets;
pub mod transfers;

use chrono::{DateTime, SecondsFormat, Utc};
use deskflow_core::DeskflowError;
use rusqlite::types::Type;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Timestamps are stored as RFC 3339 text with microsecond precision.
pub(crate) fn encode_ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(idx: usize, raw: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn decode_opt_ts(
    idx: usize,
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    raw.map(|r| decode_ts(idx, r)).transpose()
}

pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<String, DeskflowError> {
    serde_json::to_string(value).map_err(|e| DeskflowError::Storage {
        source: Box::new(e),
    })
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    idx: usize,
    raw: String,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
