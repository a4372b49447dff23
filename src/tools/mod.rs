//! Nutrilog Tools module
//!
//! Operations behind the MCP tools. Each takes the application context and
//! returns a serializable response or a `ToolError`.

pub mod diary;
pub mod ingredients;
pub mod recipes;
pub mod shopping;
pub mod status;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;

/// Error returned by tool operations
#[derive(Debug, Error)]
pub enum ToolError {
    /// The caller sent something unusable: bad date, unknown label, missing id
    #[error("{0}")]
    Invalid(String),

    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: DbError,
    },
}

impl ToolError {
    /// Wrap a storage error with what the tool was doing
    pub fn db(context: &'static str) -> impl Fn(DbError) -> ToolError {
        move |source| ToolError::Database { context, source }
    }

    /// True when retrying with different arguments could succeed
    pub fn is_invalid_input(&self) -> bool {
        match self {
            ToolError::Invalid(_) => true,
            ToolError::Database { source, .. } => matches!(
                source,
                DbError::Validation(_) | DbError::NotFound { .. } | DbError::InUse { .. }
            ),
        }
    }
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(raw: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ToolError::Invalid(format!("Invalid date '{}': expected YYYY-MM-DD", raw)))
}
