//! Module `scanner` implements the streaming lexer for Kaleidoscope.
//!
//! It pulls characters lazily from any [`Read`] source (stdin, a file, an
//! in‑memory slice) and turns them into [`Token`]s one at a time, holding
//! exactly one character of lookahead between calls.  Nothing is read ahead
//! of what the current token needs, so an interactive session only blocks
//! when the next token genuinely depends on unread input.
//!
//! # Public API
//!
//! - `Scanner::new(source: R) -> Scanner<R>`
//!   Create a lexer over a byte source.
//!
//! - `Scanner::next_token(&mut self) -> Result<Token>`
//!   Produce the next token.  The lexer is total: every character becomes
//!   part of some token, and the only possible error is an I/O failure of
//!   the underlying reader.
//!
//! - `impl Iterator for Scanner<R>`
//!   Yields `Result<Token>` and stops after exactly one `EOF` token.
//!
//! # Token Recognition (`next_token`)
//!
//! 1. Whitespace is skipped (newlines advance the line counter).
//! 2. `[A-Za-z][A-Za-z0-9]*` is an identifier, unless it is one of the
//!    keywords in [`KEYWORDS`].
//! 3. `[0-9]+ ('.' [0-9]*)?` is a number.  Only one `.` is taken, so
//!    `1.2.3` lexes as `1.2`, `.`, `3`.  There is no exponent syntax.
//! 4. `#` starts a comment running to the end of the line.
//! 5. End of input yields `EOF`, and keeps yielding it.
//! 6. Anything else is returned as a `CHAR` token for the parser to judge.
//!
//! # Example
//!
//! ```rust
//! use kaleidoscope::scanner::Scanner;
//!
//! let mut scanner = Scanner::new("def f(x) x * 2 # double".as_bytes());
//! for result in &mut scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("I/O error: {}", err),
//!     }
//! }
//! ```

use crate::error::Result;
use crate::token::{Token, TokenType};
use log::{debug, info};
use phf::phf_map;
use std::io::{Bytes, Read};
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "def"    => TokenType::DEF,
    "extern" => TokenType::EXTERN,
};

/// A streaming **scanner / lexer** converting characters from `R` into
/// [`Token`]s.
pub struct Scanner<R: Read> {
    bytes: Bytes<R>,      // raw byte source, decoded as UTF‑8 on the fly
    pending: Option<u8>,  // byte that ended a truncated UTF‑8 sequence, not yet decoded
    last: Option<char>,   // one character of lookahead; `None` once input is exhausted
    line: usize,          // 1‑based line counter (\n increments)
    finished: bool,       // iterator already yielded EOF
}

impl<R: Read> Scanner<R> {
    /// Create a new lexer over `source`.
    pub fn new(source: R) -> Self {
        info!("Scanner created");

        Self {
            bytes: source.bytes(),
            pending: None,
            // Pretend we just saw a blank so the first call reads real input.
            last: Some(' '),
            line: 1,
            finished: false,
        }
    }

    /// Line the scanner is currently positioned on.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Next raw byte, taking a byte held back by [`read_char`] first.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }

        match self.bytes.next() {
            Some(b) => Ok(Some(b?)),
            None => Ok(None),
        }
    }

    /// Decode the next character from the byte source.  Invalid UTF‑8
    /// becomes U+FFFD so the lexer never has to reject input.  A sequence
    /// cut short by a non‑continuation byte leaves that byte unconsumed.
    fn read_char(&mut self) -> Result<Option<char>> {
        let first: u8 = match self.next_byte()? {
            None => return Ok(None),
            Some(b) => b,
        };

        if first.is_ascii() {
            return Ok(Some(first as char));
        }

        let width: usize = match first {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };

        let mut buf: [u8; 4] = [first, 0, 0, 0];

        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(b) if b & 0xC0 == 0x80 => *slot = b,
                Some(b) => {
                    self.pending = Some(b);
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            }
        }

        let decoded: char = std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);

        Ok(Some(decoded))
    }

    /// Replace the lookahead with the next character of input.
    #[inline]
    fn advance(&mut self) -> Result<()> {
        self.last = self.read_char()?;

        Ok(())
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Return the next token from the input.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            // ── whitespace / newline ─────────────────────────────────────
            while let Some(c) = self.last {
                if !c.is_whitespace() {
                    break;
                }

                if c == '\n' {
                    self.line += 1;
                }

                self.advance()?;
            }

            let line: usize = self.line;

            let c: char = match self.last {
                Some(c) => c,
                None => return Ok(Token::new(TokenType::EOF, "", line)),
            };

            // ── identifiers / keywords ───────────────────────────────────
            if c.is_ascii_alphabetic() {
                return self.scan_identifier(line);
            }

            // ── number literal (digit‑leading) ───────────────────────────
            if c.is_ascii_digit() {
                return self.scan_number(line);
            }

            // ── comments (# … until newline) ─────────────────────────────
            if c == '#' {
                self.skip_comment()?;

                continue;
            }

            // ── everything else is a one‑character token ─────────────────
            self.advance()?;

            return Ok(Token::new(TokenType::CHAR(c), c.to_string(), line));
        }
    }

    /// Accumulate `[A-Za-z0-9]*` after an alphabetic lookahead and classify
    /// it as keyword or identifier.
    fn scan_identifier(&mut self, line: usize) -> Result<Token> {
        let mut text: String = String::new();

        while let Some(c) = self.last.filter(char::is_ascii_alphanumeric) {
            text.push(c);
            self.advance()?;
        }

        let tt: TokenType = KEYWORDS
            .get(text.as_str())
            .cloned()
            .unwrap_or_else(|| TokenType::IDENTIFIER(text.clone()));

        Ok(Token::new(tt, text, line))
    }

    /// Accumulate digits, at most one `.`, then more digits.
    fn scan_number(&mut self, line: usize) -> Result<Token> {
        let mut text: String = String::new();

        self.take_digits(&mut text)?;

        if self.last == Some('.') {
            text.push('.');
            self.advance()?;

            self.take_digits(&mut text)?;
        }

        // Only digits and one optional '.' reach here, which always parses;
        // 0.0 mirrors strtod for anything that would not.
        let n: f64 = text.parse::<f64>().unwrap_or(0.0);

        Ok(Token::new(TokenType::NUMBER(n), text, line))
    }

    fn take_digits(&mut self, text: &mut String) -> Result<()> {
        while let Some(c) = self.last.filter(char::is_ascii_digit) {
            text.push(c);
            self.advance()?;
        }

        Ok(())
    }

    /// Discard everything up to (not including) the next newline.
    fn skip_comment(&mut self) -> Result<()> {
        debug!("Skipping comment on line {}", self.line);

        while let Some(c) = self.last {
            if c == '\n' {
                break;
            }

            self.advance()?;
        }

        Ok(())
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result: Result<Token> = self.next_token();

        // Stop after EOF, and after an I/O error so a broken reader cannot
        // spin forever.
        match &result {
            Ok(token) if token.is_eof() => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }

        Some(result)
    }
}

impl<R: Read> FusedIterator for Scanner<R> {}
