use log::debug;
use std::fmt;

/// The different kinds of tokens recognized by the Kaleidoscope scanner.
///
/// `IDENTIFIER(String)` and `NUMBER(f64)` carry their payloads.
/// `CHAR(char)` is the catch‑all for every other single character
/// (operators and punctuation alike); the parser decides what it means.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    /// End‑of‑input marker
    EOF,

    /// 'def'
    DEF,

    /// 'extern'
    EXTERN,

    /// A user‑defined name
    IDENTIFIER(String),

    /// A numeric literal
    NUMBER(f64),

    /// Any other single character: `(`, `)`, `,`, `+`, `;`, …
    CHAR(char),
}

impl TokenType {
    /// Variant name without payload, as printed by `tokenize`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::EOF => "EOF",
            TokenType::DEF => "DEF",
            TokenType::EXTERN => "EXTERN",
            TokenType::IDENTIFIER(_) => "IDENTIFIER",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::CHAR(_) => "CHAR",
        }
    }
}

/// A scanned token: its kind, the exact source text, and the line it
/// started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The category (and payload) of this token.
    pub token_type: TokenType,

    /// The characters consumed to produce this token (empty for `EOF`).
    pub lexeme: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
        let lexeme: String = lexeme.into();

        debug!(
            "Creating new token: type={:?}, lexeme={}, line={}",
            token_type, lexeme, line
        );

        Self {
            token_type,
            lexeme,
            line,
        }
    }

    /// Is this the single‑character token `c`?
    #[inline]
    pub fn is_char(&self, c: char) -> bool {
        self.token_type == TokenType::CHAR(c)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::EOF
    }
}

/// Render a number the way the tools print it: integral values keep one
/// decimal digit (`3` → `3.0`), everything else uses the shortest form.
pub fn format_number(n: f64) -> String {
    if n.fract() != 0.0 {
        return n.to_string();
    }

    // -0.0 has no sign once cast to an integer
    if n == 0.0 && n.is_sign_negative() {
        return "-0.0".to_string();
    }

    // i64 holds every integral f64 below 2^63 exactly
    if n.abs() < 9.0e18 {
        let mut buf: itoa::Buffer = itoa::Buffer::new();

        format!("{}.0", buf.format(n as i64))
    } else {
        format!("{:.1}", n)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload: String = match &self.token_type {
            TokenType::IDENTIFIER(name) => name.clone(),
            TokenType::NUMBER(n) => format_number(*n),
            _ => "null".to_string(),
        };

        write!(f, "{} {} {}", self.token_type.name(), self.lexeme, payload)
    }
}
