//! Error handling for the front end

use crate::frontend::token::TokenKind;
use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Front end error.
///
/// Lexical anomalies never show up here: the lexer encodes them as
/// [`TokenKind::Unknown`] tokens and the parser reports them as unexpected
/// tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Syntax Errors ====================

    #[error("Syntax error at offset {}: expected {expected}, got {kind} '{text}'", .span.start)]
    UnexpectedToken {
        expected: String,
        kind: TokenKind,
        text: String,
        span: Span,
    },

    #[error("Syntax error at offset {}: expected {expected}, got end of input", .span.start)]
    UnexpectedEof { expected: String, span: Span },

    #[error("Syntax error at offset {}: invalid assignment target", .span.start)]
    InvalidAssignmentTarget { span: Span },

    #[error("Syntax error at offset {}: nesting too deep", .span.start)]
    NestingTooDeep { span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::InvalidAssignmentTarget { span }
            | Self::NestingTooDeep { span } => *span,
        }
    }

    /// Source offset of the offending token
    pub fn offset(&self) -> usize {
        self.span().start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unexpected_token() {
        let err = Error::UnexpectedToken {
            expected: "')'".to_string(),
            kind: TokenKind::Delimiter,
            text: "{".to_string(),
            span: Span::new(10, 11),
        };
        assert_eq!(
            err.to_string(),
            "Syntax error at offset 10: expected ')', got Delimiter '{'"
        );
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn test_display_nesting_too_deep() {
        let err = Error::NestingTooDeep { span: Span::new(130, 131) };
        assert_eq!(err.to_string(), "Syntax error at offset 130: nesting too deep");
        assert_eq!(err.span(), Span::new(130, 131));
    }
}
