//! Token definitions for the front end

use std::fmt;

use serde::Serialize;

use crate::utils::Span;

/// Reserved words. A word in this set always lexes as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "return", "int", "float", "void", "class", "public",
    "private", "static",
];

/// Keywords that start a declaration
pub const TYPE_KEYWORDS: &[&str] = &["int", "float", "void"];

/// Operators, two-character forms first
pub const OPERATORS: &[&str] = &[
    "<=", ">=", "==", "!=", "++", "--", "+", "-", "*", "/", "=", "<", ">", "!", "&", "|", "^",
    "%",
];

/// Single-character delimiters
pub const DELIMITERS: &[char] = &[';', ',', '.', '(', ')', '{', '}', '[', ']'];

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword,
    Operator,
    Delimiter,
    String,
    Comment,
    Whitespace,
    /// A single character no pattern matched
    Unknown,
}

impl TokenKind {
    /// Tokens the parser never sees
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "Number",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Operator => "Operator",
            TokenKind::Delimiter => "Delimiter",
            TokenKind::String => "String",
            TokenKind::Comment => "Comment",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Unknown => "Unknown",
        };
        f.pad(name)
    }
}

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The lexeme, exactly as it appears in the source
    pub text: String,
    /// Character offset of the first character of the lexeme
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self { kind, text: text.into(), offset }
    }

    /// Length of the lexeme in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.len())
    }

    /// Check both the kind and the lexeme
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&self.text.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}  {:<10}  {:?}", self.offset, self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_span_counts_chars() {
        let token = Token::new(TokenKind::String, "\"héllo\"", 3);
        assert_eq!(token.len(), 7);
        assert_eq!(token.span(), Span::new(3, 10));
    }

    #[test]
    fn test_type_keywords() {
        assert!(Token::new(TokenKind::Keyword, "float", 0).is_type_keyword());
        assert!(!Token::new(TokenKind::Keyword, "return", 0).is_type_keyword());
        assert!(!Token::new(TokenKind::Identifier, "int", 0).is_type_keyword());
    }

    #[test]
    fn test_trivia() {
        assert!(TokenKind::Comment.is_trivia());
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(!TokenKind::Unknown.is_trivia());
    }
}
