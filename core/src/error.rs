// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::types::Partition;

/// Errors that can occur in daybook operations.
///
/// Calendar failures are recoverable: they are reported before any local
/// store write has happened, so retrying the whole operation is safe.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid datestamp '{0}', expected YYYY-MM-DD")]
    InvalidDatestamp(String),

    #[error("Record not found: {partition}/{key}")]
    RecordNotFound { partition: Partition, key: String },

    #[error("No event with id '{event_id}' in planner {day}")]
    EventNotInPlanner { event_id: String, day: String },

    #[error("Multi-day link broken for event '{0}'")]
    BrokenLink(String),

    #[error("Calendar permission denied")]
    CalendarPermission,

    #[error("Calendar event not found: {0}")]
    CalendarEventMissing(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for daybook operations.
pub type Result<T> = std::result::Result<T, Error>;
