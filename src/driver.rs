//! The read‑parse loop: pull one top‑level unit at a time from the parser,
//! acknowledge it, and throw it away.
//!
//! Recovery is deliberately coarse.  A syntax error is reported, the single
//! offending token is discarded, and the loop carries on from whatever
//! comes next.  A nested error can therefore leave the stream in the middle
//! of an expression, which then usually produces a follow‑up error or two.

use std::io::{Read, Write};

use log::{debug, info};

use crate::ast::Item;
use crate::ast_printer::AstPrinter;
use crate::error::Result;
use crate::parser::Parser;
use crate::precedence::PrecedenceTable;
use crate::scanner::Scanner;
use crate::token::TokenType;

pub const PROMPT: &str = "ready> ";

/// Tally of what a session parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub definitions: usize,
    pub externs: usize,
    pub expressions: usize,
    pub errors: usize,
}

impl Summary {
    fn record(&mut self, item: &Item) {
        match item {
            Item::Definition(_) => self.definitions += 1,
            Item::Extern(_) => self.externs += 1,
            Item::Expression(_) => self.expressions += 1,
        }
    }

    /// Units parsed successfully.
    pub fn parsed(&self) -> usize {
        self.definitions + self.externs + self.expressions
    }
}

/// Drives a [`Parser`] to the end of its input.
///
/// Acknowledgements (and the prompt) go to `out`; syntax errors go to
/// `diagnostics`.
pub struct Driver<'t, R: Read, W: Write, E: Write> {
    parser: Parser<'t, R>,
    out: W,
    diagnostics: E,
    prompt: bool,
    // the first prompt went out before the parser read its first token
    prompted: bool,
}

impl<'t, R: Read, W: Write, E: Write> Driver<'t, R, W, E> {
    pub fn new(parser: Parser<'t, R>, out: W, diagnostics: E) -> Self {
        Self {
            parser,
            out,
            diagnostics,
            prompt: true,
            prompted: false,
        }
    }

    /// Build a prompting driver for a terminal session.
    ///
    /// The parser reads its first token on construction, which blocks on a
    /// terminal, so the first prompt is written before the parser exists.
    pub fn interactive(
        scanner: Scanner<R>,
        precedence: &'t PrecedenceTable,
        mut out: W,
        diagnostics: E,
    ) -> Result<Self> {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let parser: Parser<'t, R> = Parser::new(scanner, precedence)?;

        Ok(Self {
            parser,
            out,
            diagnostics,
            prompt: true,
            prompted: true,
        })
    }

    /// Show (`true`, the default) or suppress the `ready> ` prompt.
    pub fn prompt(mut self, enabled: bool) -> Self {
        self.prompt = enabled;
        self
    }

    /// Run until end of input.  Only I/O failures end the loop early.
    pub fn run(&mut self) -> Result<Summary> {
        info!("Driver loop starting");

        let mut summary: Summary = Summary::default();

        loop {
            if self.prompt && !std::mem::take(&mut self.prompted) {
                write!(self.out, "{}", PROMPT)?;
                self.out.flush()?;
            }

            let kind: TokenType = self.parser.current().token_type.clone();

            let outcome: Result<Item> = match kind {
                TokenType::EOF => break,

                // ignore at top level
                TokenType::CHAR(';') => {
                    self.parser.advance()?;

                    continue;
                }

                TokenType::DEF => self.parser.parse_definition().map(Item::Definition),

                TokenType::EXTERN => self.parser.parse_extern().map(Item::Extern),

                _ => self.parser.parse_top_level_expr().map(Item::Expression),
            };

            match outcome {
                Ok(item) => {
                    debug!("Parsed {}", AstPrinter::print_item(&item));

                    summary.record(&item);

                    writeln!(self.out, "...parsed {}.", item.describe())?;
                }

                Err(e) if e.is_syntax() => {
                    summary.errors += 1;

                    writeln!(self.diagnostics, "{}", e)?;

                    // skip the offending token and try again
                    self.parser.advance()?;
                }

                Err(e) => return Err(e),
            }
        }

        if self.prompt {
            writeln!(self.out)?;
        }

        info!("Driver loop finished: {:?}", summary);

        Ok(summary)
    }

    /// Give back the output sinks, e.g. to inspect captured output.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.diagnostics)
    }
}
