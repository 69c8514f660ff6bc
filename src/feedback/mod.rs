//! Structured Feedback Module
//!
//! Machine-readable diagnostics: an [`ErrorReport`] carries an error code,
//! a message and a line/column location, and serializes to JSON.

use serde::{Deserialize, Serialize};

use crate::utils::Error;

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Location information
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    /// Character offset into the source
    pub offset: usize,
}

impl ErrorReport {
    /// Create an error report from a front end error. `source` is the text
    /// that was parsed and is only used to resolve line and column.
    pub fn from_error(error: &Error, file_name: &str, source: &str) -> Self {
        let span = error.span();
        let (line, column) = span.line_col(source);

        Self {
            code: error_code(error).to_string(),
            message: error.to_string(),
            location: Location {
                file: file_name.to_string(),
                line,
                column,
                offset: span.start,
            },
        }
    }

    /// One-line human form: `file:line:col: error[E0001]: message`
    pub fn render(&self) -> String {
        let loc = &self.location;
        format!(
            "{}:{}:{}: error[{}]: {}",
            loc.file, loc.line, loc.column, self.code, self.message
        )
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::UnexpectedToken { .. } => "E0001",
        Error::UnexpectedEof { .. } => "E0002",
        Error::InvalidAssignmentTarget { .. } => "E0003",
        Error::NestingTooDeep { .. } => "E0004",
    }
}
