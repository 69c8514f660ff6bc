//! Lexer for the front end
//!
//! Converts source code into a stream of tokens. At every position the
//! classification patterns are tried in a fixed priority order and the first
//! one that matches wins:
//!
//! ```text
//! Comment > String > Number > Keyword > Identifier > Operator > Delimiter > Whitespace
//! ```
//!
//! Nothing fails here. A character no pattern accepts becomes a one-character
//! [`TokenKind::Unknown`] token and scanning carries on after it.

use log::{debug, trace};

use crate::frontend::token::{Token, TokenKind, DELIMITERS, KEYWORDS, OPERATORS};

/// One classification rule: how many characters at the start of the
/// remaining input it accepts, if any.
struct Pattern {
    kind: TokenKind,
    matcher: fn(&[char]) -> Option<usize>,
}

/// Tried top to bottom; order is the tie-break.
const PATTERNS: &[Pattern] = &[
    Pattern { kind: TokenKind::Comment, matcher: match_comment },
    Pattern { kind: TokenKind::String, matcher: match_string },
    Pattern { kind: TokenKind::Number, matcher: match_number },
    Pattern { kind: TokenKind::Keyword, matcher: match_keyword },
    Pattern { kind: TokenKind::Identifier, matcher: match_identifier },
    Pattern { kind: TokenKind::Operator, matcher: match_operator },
    Pattern { kind: TokenKind::Delimiter, matcher: match_delimiter },
    Pattern { kind: TokenKind::Whitespace, matcher: match_whitespace },
];

/// `// ...` up to (not including) the newline, or a non-nested `/* ... */`
fn match_comment(input: &[char]) -> Option<usize> {
    match input {
        ['/', '/', rest @ ..] => {
            let body = rest.iter().take_while(|&&c| c != '\n').count();
            Some(2 + body)
        }
        ['/', '*', rest @ ..] => rest
            .windows(2)
            .position(|w| w == ['*', '/'])
            .map(|end| 2 + end + 2),
        _ => None,
    }
}

/// Double-quoted, backslash escapes any character. Unterminated strings do
/// not match.
fn match_string(input: &[char]) -> Option<usize> {
    if input.first() != Some(&'"') {
        return None;
    }
    let mut i = 1;
    loop {
        match input.get(i)? {
            '"' => return Some(i + 1),
            '\\' => {
                input.get(i + 1)?;
                i += 2;
            }
            _ => i += 1,
        }
    }
}

fn count_digits(input: &[char]) -> usize {
    input.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// Digits with an optional fractional part
fn match_number(input: &[char]) -> Option<usize> {
    let int_len = count_digits(input);
    if int_len == 0 {
        return None;
    }
    if input.get(int_len) == Some(&'.') {
        let frac_len = count_digits(&input[int_len + 1..]);
        if frac_len > 0 {
            return Some(int_len + 1 + frac_len);
        }
    }
    Some(int_len)
}

/// Length of the identifier-shaped word at the start of `input`
fn word_len(input: &[char]) -> usize {
    match input.first() {
        Some(&c) if c.is_alphabetic() || c == '_' => {
            1 + input[1..]
                .iter()
                .take_while(|&&c| c.is_alphanumeric() || c == '_')
                .count()
        }
        _ => 0,
    }
}

/// A whole word from the reserved set; `iffy` is not `if`
fn match_keyword(input: &[char]) -> Option<usize> {
    let len = word_len(input);
    if len == 0 {
        return None;
    }
    let word: String = input[..len].iter().collect();
    KEYWORDS.contains(&word.as_str()).then_some(len)
}

fn match_identifier(input: &[char]) -> Option<usize> {
    match word_len(input) {
        0 => None,
        len => Some(len),
    }
}

fn match_operator(input: &[char]) -> Option<usize> {
    OPERATORS.iter().find_map(|op| {
        let len = op.chars().count();
        (input.len() >= len && op.chars().zip(input).all(|(a, &b)| a == b)).then_some(len)
    })
}

fn match_delimiter(input: &[char]) -> Option<usize> {
    input
        .first()
        .filter(|&&c| DELIMITERS.contains(&c))
        .map(|_| 1)
}

fn match_whitespace(input: &[char]) -> Option<usize> {
    match input.iter().take_while(|c| c.is_whitespace()).count() {
        0 => None,
        len => Some(len),
    }
}

/// The lexer state
pub struct Lexer {
    /// Source code as characters
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Emit whitespace tokens instead of dropping them
    keep_whitespace: bool,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            keep_whitespace: false,
        }
    }

    /// Also emit [`TokenKind::Whitespace`] tokens, so that the lexemes
    /// concatenate back to the input.
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Classify the characters at the current position and advance past
    /// them. Must not be called at end of input.
    fn scan(&mut self) -> Token {
        let start = self.pos;
        let rest = &self.source[start..];

        let (kind, len) = PATTERNS
            .iter()
            .find_map(|p| (p.matcher)(rest).map(|len| (p.kind, len)))
            .unwrap_or((TokenKind::Unknown, 1));

        if kind == TokenKind::Unknown {
            debug!("unknown character {:?} at offset {}", rest[0], start);
        }

        self.pos += len;
        let text: String = self.source[start..self.pos].iter().collect();
        Token::new(kind, text, start)
    }

    /// Get the next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> Option<Token> {
        while !self.is_at_end() {
            let token = self.scan();
            if token.kind == TokenKind::Whitespace && !self.keep_whitespace {
                continue;
            }
            trace!("token {:?} {:?} at {}", token.kind, token.text, token.offset);
            return Some(token);
        }
        None
    }

    /// Tokenize the rest of the source and return all tokens
    pub fn tokenize(&mut self) -> Vec<Token> {
        let tokens: Vec<Token> = self.by_ref().collect();
        debug!("lexed {} tokens from {} characters", tokens.len(), self.source.len());
        tokens
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize `source`, dropping whitespace
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
