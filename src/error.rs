//! Centralised error hierarchy for the **Kaleidoscope front end**.
//!
//! Every subsystem (scanner, parser, precedence configuration, driver, CLI)
//! converts its failure modes into one of the variants defined here.  This
//! keeps a uniform `Result<T>` alias throughout the crate and lets the binary
//! lift everything into `anyhow` with `?`.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the front end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KaleidoscopeError {
    /// No expression rule matched, or a `)` / `,` was missing inside one.
    #[error("[line {line}] Error in expression: {message}")]
    Expression {
        /// Human‑readable description.
        message: String,

        /// 1‑based line of the offending token.
        line: usize,
    },

    /// Malformed `name(params)` prototype.
    #[error("[line {line}] Error in prototype: {message}")]
    Prototype { message: String, line: usize },

    /// The same parameter name appears twice in one prototype.
    #[error("[line {line}] Error in prototype: duplicate parameter '{name}' in '{function}'")]
    DuplicateParameter {
        name: String,
        function: String,
        line: usize,
    },

    /// Expression nesting exceeded the parser's configured limit.
    #[error("[line {line}] Error: expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, line: usize },

    /// One expression tree grew taller than the parser's configured limit.
    #[error("[line {line}] Error: expression tree deeper than {limit} levels")]
    TreeTooDeep { limit: usize, line: usize },

    /// Invalid operator precedence configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed JSON in a configuration file (transparent).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl KaleidoscopeError {
    /// Helper constructor for expression‑level syntax errors.
    pub fn expression<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Expression error: line={}, msg={}", line, message);

        KaleidoscopeError::Expression { message, line }
    }

    /// Helper constructor for prototype syntax errors.
    pub fn prototype<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Prototype error: line={}, msg={}", line, message);

        KaleidoscopeError::Prototype { message, line }
    }

    /// Helper constructor for configuration errors.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Config error: msg={}", message);

        KaleidoscopeError::Config(message)
    }

    /// `true` for errors the driver recovers from by discarding one token.
    /// Everything else (I/O, configuration) is fatal to the session.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            KaleidoscopeError::Expression { .. }
                | KaleidoscopeError::Prototype { .. }
                | KaleidoscopeError::DuplicateParameter { .. }
                | KaleidoscopeError::NestingTooDeep { .. }
                | KaleidoscopeError::TreeTooDeep { .. }
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, KaleidoscopeError>;
