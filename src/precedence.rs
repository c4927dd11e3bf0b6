//! Binary operator precedence table.
//!
//! Precedences live on a bounded `0..=255` scale so the parser's
//! "tighter than" arithmetic (`precedence + 1`) can be done in a wider
//! integer without any overflow corner.  A table is plain configuration:
//! build it once, then lend it read‑only to as many parser sessions as
//! needed.
//!
//! Tables can be extended from JSON, an object mapping single operator
//! characters to precedences:
//!
//! ```json
//! { "/": 40, "<": 10, "|": 5 }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{KaleidoscopeError, Result};
use crate::token::{Token, TokenType};

/// Binding strength of a binary operator; higher binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Precedence(u8);

impl Precedence {
    pub const LOWEST: Precedence = Precedence(u8::MIN);
    pub const HIGHEST: Precedence = Precedence(u8::MAX);

    pub const fn new(value: u8) -> Self {
        Precedence(value)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Characters that already mean something to the lexer or the grammar and
/// therefore can never be binary operators.
const RESERVED: &[char] = &['(', ')', ',', ';', '#'];

/// Mapping from operator character to [`Precedence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    ops: HashMap<char, Precedence>,
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PrecedenceTable {
    /// A table with no operators; every expression is a lone primary.
    pub fn empty() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    /// The built‑in operators: `<` 10, `+` 20, `-` 20, `*` 40.
    pub fn standard() -> Self {
        let ops: HashMap<char, Precedence> = [
            ('<', Precedence(10)),
            ('+', Precedence(20)),
            ('-', Precedence(20)),
            ('*', Precedence(40)),
        ]
        .into_iter()
        .collect();

        Self { ops }
    }

    /// Install (or re‑rank) `op`.  Returns the previous precedence, if any.
    pub fn insert(&mut self, op: char, precedence: Precedence) -> Result<Option<Precedence>> {
        validate_operator(op)?;

        debug!("Operator '{}' gets precedence {}", op, precedence.value());

        Ok(self.ops.insert(op, precedence))
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, op: char, precedence: Precedence) -> Result<Self> {
        self.insert(op, precedence)?;

        Ok(self)
    }

    /// Precedence of `op`, or `None` when it is not a binary operator.
    #[inline]
    pub fn get(&self, op: char) -> Option<Precedence> {
        self.ops.get(&op).copied()
    }

    /// Precedence of `token` when it is a binary operator.
    #[inline]
    pub fn of(&self, token: &Token) -> Option<Precedence> {
        match token.token_type {
            TokenType::CHAR(c) => self.get(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Merge operators from a JSON object over this table.
    ///
    /// Either every entry is merged or, on the first bad entry, none is.
    pub fn extend_from_json(&mut self, text: &str) -> Result<()> {
        let entries: BTreeMap<String, Precedence> = serde_json::from_str(text)?;

        let mut checked: Vec<(char, Precedence)> = Vec::with_capacity(entries.len());

        for (key, precedence) in entries {
            let mut chars = key.chars();

            let op: char = match (chars.next(), chars.next()) {
                (Some(op), None) => op,
                _ => {
                    return Err(KaleidoscopeError::config(format!(
                        "operator '{}' must be exactly one character",
                        key
                    )))
                }
            };

            validate_operator(op)?;
            checked.push((op, precedence));
        }

        for (op, precedence) in checked {
            self.insert(op, precedence)?;
        }

        Ok(())
    }

    /// The standard table overridden by the JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading operator precedences from {:?}", path);

        let text: String = fs::read_to_string(path)?;
        let mut table: PrecedenceTable = Self::standard();

        table.extend_from_json(&text)?;

        info!("Precedence table has {} operators", table.len());

        Ok(table)
    }
}

fn validate_operator(op: char) -> Result<()> {
    if op.is_alphanumeric() || op.is_whitespace() || RESERVED.contains(&op) {
        return Err(KaleidoscopeError::config(format!(
            "'{}' cannot be used as a binary operator",
            op.escape_default()
        )));
    }

    Ok(())
}
