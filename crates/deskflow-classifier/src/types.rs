// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the classification service.

use serde::{Deserialize, Serialize};

/// Body of `POST /classify`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub description: &'a str,
}

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: String,
}
