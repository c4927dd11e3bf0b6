/*!
Recursive‑descent parser for Kaleidoscope with precedence climbing for
binary operators.

Grammar
-------

```text
item           → definition | extern_decl | toplevel_expr | ";" ;
definition     → "def" prototype expression ;
extern_decl    → "extern" prototype ;
toplevel_expr  → expression ;
prototype      → IDENT "(" IDENT* ")" ;
expression     → primary ( BINOP primary )* ;
primary        → NUMBER
               | IDENT
               | IDENT "(" ( expression ( "," expression )* )? ")"
               | "(" expression ")" ;
```

Parameters in a prototype are separated by whitespace, not commas.
A top‑level expression becomes a [`Function`] with an anonymous prototype.

Token discipline
----------------

The parser keeps one token of lookahead in `current`.  Every `parse_*`
method starts with `current` on the first token of its construct and, when
it returns `Ok`, leaves `current` on the first token *after* it.  On `Err`
no tree is returned and `current` is the offending token; callers that want
to carry on discard it with [`Parser::advance`].

Complexity
----------

Θ(n) in the number of tokens.  Call‑stack depth grows with parenthesis and
call nesting, which is capped by [`Parser::with_max_depth`]; the climbing
recursion itself is bounded by the number of distinct precedence levels.

A flat chain such as `1+1+…+1` is folded in a loop but still yields a tree
as tall as the chain is long.  Tree height is capped separately by
[`Parser::with_max_height`] so that the derived `Clone`, `PartialEq`, `Debug`
and `Serialize` impls, which recurse, stay within the stack.  Dropping and
printing trees does not recurse.

Logging Policy
--------------

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`                | `info` | Session lifecycle.                        |
| `parse_*` entry points       | `debug`| Descent into grammar rules.               |
| Error paths                  | `info` | Via the error constructors.               |
*/

use std::io::Read;

use log::{debug, info};

use crate::ast::{Expr, Function, Item, Prototype};
use crate::error::{KaleidoscopeError, Result};
use crate::precedence::{Precedence, PrecedenceTable};
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};

/// Default cap on expression nesting (parentheses and call arguments).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default cap on the height of one expression tree.
pub const DEFAULT_MAX_HEIGHT: usize = 1024;

/// A node plus the height of the tree rooted at it.
type Parsed = (Expr, usize);

/// One parsing session over one token stream.
///
/// The precedence table is borrowed, so any number of sessions can share a
/// single table while each owns its own scanner and lookahead.
pub struct Parser<'t, R: Read> {
    scanner: Scanner<R>,
    current: Token,
    precedence: &'t PrecedenceTable,
    depth: usize,
    max_depth: usize,
    max_height: usize,
    halted: bool,
}

impl<'t, R: Read> Parser<'t, R> {
    /// Construct a new parser and prime the lookahead with the first token.
    pub fn new(mut scanner: Scanner<R>, precedence: &'t PrecedenceTable) -> Result<Self> {
        let current: Token = scanner.next_token()?;

        info!(
            "Parser created with {} binary operators, first token {:?}",
            precedence.len(),
            current.token_type
        );

        Ok(Self {
            scanner,
            current,
            precedence,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            halted: false,
        })
    }

    /// Replace the nesting limit (default [`DEFAULT_MAX_DEPTH`]).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the tree height limit (default [`DEFAULT_MAX_HEIGHT`]).
    /// Long operator chains grow trees without nesting, so this is checked
    /// separately from [`with_max_depth`](Self::with_max_depth).
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    /// The lookahead token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Discard the lookahead and read the next token.
    pub fn advance(&mut self) -> Result<&Token> {
        self.current = self.scanner.next_token()?;

        Ok(&self.current)
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse every remaining top‑level unit, stopping at the first error.
    pub fn parse(&mut self) -> Result<Vec<Item>> {
        info!("Beginning parse phase");

        let mut items: Vec<Item> = Vec::new();

        while let Some(item) = self.parse_item()? {
            items.push(item);
        }

        Ok(items)
    }

    /// Parse the next top‑level unit.  Stray `;` separators are skipped;
    /// `Ok(None)` means the input is exhausted.
    pub fn parse_item(&mut self) -> Result<Option<Item>> {
        loop {
            match self.current.token_type {
                TokenType::EOF => return Ok(None),

                TokenType::CHAR(';') => {
                    self.advance()?;
                }

                TokenType::DEF => return Ok(Some(Item::Definition(self.parse_definition()?))),

                TokenType::EXTERN => return Ok(Some(Item::Extern(self.parse_extern()?))),

                _ => return Ok(Some(Item::Expression(self.parse_top_level_expr()?))),
            }
        }
    }

    // ──────────────────────── top‑level rules ─────────────────────

    /// `"def" prototype expression`
    pub fn parse_definition(&mut self) -> Result<Function> {
        debug!("Entering definition on line {}", self.current.line);

        self.expect_keyword(TokenType::DEF, "expected 'def'")?;

        let prototype: Prototype = self.parse_prototype()?;
        let body: Expr = self.parse_expression()?;

        Ok(Function::new(prototype, body))
    }

    /// `"extern" prototype`
    pub fn parse_extern(&mut self) -> Result<Prototype> {
        debug!("Entering extern on line {}", self.current.line);

        self.expect_keyword(TokenType::EXTERN, "expected 'extern'")?;

        self.parse_prototype()
    }

    /// A bare expression, wrapped in an anonymous zero‑argument function.
    pub fn parse_top_level_expr(&mut self) -> Result<Function> {
        debug!("Entering top-level expression on line {}", self.current.line);

        let body: Expr = self.parse_expression()?;

        Ok(Function::new(Prototype::anonymous(), body))
    }

    /// `IDENT "(" IDENT* ")"`
    pub fn parse_prototype(&mut self) -> Result<Prototype> {
        debug!("Entering prototype on line {}", self.current.line);

        let name: String = match &self.current.token_type {
            TokenType::IDENTIFIER(name) => name.clone(),
            _ => {
                return Err(KaleidoscopeError::prototype(
                    self.current.line,
                    format!("expected function name, found {}", describe(&self.current)),
                ))
            }
        };

        self.advance()?;

        if !self.current.is_char('(') {
            return Err(KaleidoscopeError::prototype(
                self.current.line,
                format!("expected '(' after '{}', found {}", name, describe(&self.current)),
            ));
        }

        let mut params: Vec<String> = Vec::new();

        loop {
            self.advance()?;

            let param: String = match &self.current.token_type {
                TokenType::IDENTIFIER(param) => param.clone(),
                _ => break,
            };

            if params.contains(&param) {
                return Err(KaleidoscopeError::DuplicateParameter {
                    name: param,
                    function: name,
                    line: self.current.line,
                });
            }

            params.push(param);
        }

        if !self.current.is_char(')') {
            return Err(KaleidoscopeError::prototype(
                self.current.line,
                format!("expected ')' in prototype, found {}", describe(&self.current)),
            ));
        }

        self.advance()?; // eat ')'

        Ok(Prototype::new(name, params))
    }

    // ─────────────────────── expression rules ─────────────────────

    /// `primary ( BINOP primary )*`
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.expression().map(|(expr, _)| expr)
    }

    /// Precedence climbing.  Folds `(BINOP primary)*` onto `lhs` as long as
    /// the operators bind at least as tightly as `min_precedence`.
    ///
    /// `min_precedence` is wider than [`Precedence`] so that "one tighter
    /// than the highest precedence" is still representable.
    pub fn parse_binop_rhs(&mut self, min_precedence: u16, lhs: Expr) -> Result<Expr> {
        let height: usize = lhs.depth();

        self.binop_rhs(min_precedence, (lhs, height))
            .map(|(expr, _)| expr)
    }

    fn expression(&mut self) -> Result<Parsed> {
        self.nested(|parser| {
            let lhs: Parsed = parser.parse_primary()?;

            parser.binop_rhs(0, lhs)
        })
    }

    fn binop_rhs(&mut self, min_precedence: u16, lhs: Parsed) -> Result<Parsed> {
        let (mut lhs, mut lhs_height): Parsed = lhs;

        loop {
            let (op, precedence): (char, Precedence) = match self.current_operator() {
                Some((op, precedence)) if u16::from(precedence.value()) >= min_precedence => {
                    (op, precedence)
                }
                // Not an operator, or one that belongs to an enclosing call.
                _ => return Ok((lhs, lhs_height)),
            };

            self.advance()?; // eat operator

            let mut rhs: Parsed = self.parse_primary()?;

            // If the next operator binds tighter, it takes `rhs` as its
            // left operand first.
            if let Some((_, next)) = self.current_operator() {
                if next > precedence {
                    rhs = self.binop_rhs(u16::from(precedence.value()) + 1, rhs)?;
                }
            }

            lhs_height = self.check_height(1 + lhs_height.max(rhs.1))?;
            lhs = Expr::binary(op, lhs, rhs.0);
        }
    }

    fn parse_primary(&mut self) -> Result<Parsed> {
        match self.current.token_type {
            TokenType::IDENTIFIER(_) => self.parse_identifier_expr(),

            TokenType::NUMBER(_) => self.parse_number_expr(),

            TokenType::CHAR('(') => self.parse_paren_expr(),

            _ => Err(KaleidoscopeError::expression(
                self.current.line,
                format!("expected an expression, found {}", describe(&self.current)),
            )),
        }
    }

    fn parse_number_expr(&mut self) -> Result<Parsed> {
        let value: f64 = match self.current.token_type {
            TokenType::NUMBER(n) => n,
            _ => {
                return Err(KaleidoscopeError::expression(
                    self.current.line,
                    format!("expected a number, found {}", describe(&self.current)),
                ))
            }
        };

        self.advance()?;

        Ok((Expr::Number(value), 1))
    }

    /// `"(" expression ")"`; the parentheses leave no node behind.
    fn parse_paren_expr(&mut self) -> Result<Parsed> {
        self.advance()?; // eat '('

        let inner: Parsed = self.expression()?;

        self.expect_char(')', "expected ')' after expression")?;

        Ok(inner)
    }

    /// `IDENT` or `IDENT "(" arguments? ")"`
    fn parse_identifier_expr(&mut self) -> Result<Parsed> {
        let name: String = match &self.current.token_type {
            TokenType::IDENTIFIER(name) => name.clone(),
            _ => {
                return Err(KaleidoscopeError::expression(
                    self.current.line,
                    format!("expected an identifier, found {}", describe(&self.current)),
                ))
            }
        };

        self.advance()?;

        if !self.current.is_char('(') {
            return Ok((Expr::Variable(name), 1));
        }

        self.advance()?; // eat '('

        let mut args: Vec<Expr> = Vec::new();
        let mut tallest: usize = 0;

        if !self.current.is_char(')') {
            loop {
                let (arg, height): Parsed = self.expression()?;

                tallest = tallest.max(height);
                args.push(arg);

                if self.current.is_char(')') {
                    break;
                }

                if !self.current.is_char(',') {
                    return Err(KaleidoscopeError::expression(
                        self.current.line,
                        format!(
                            "expected ')' or ',' in arguments to '{}', found {}",
                            name,
                            describe(&self.current)
                        ),
                    ));
                }

                self.advance()?; // eat ','
            }
        }

        let height: usize = self.check_height(1 + tallest)?;

        self.advance()?; // eat ')'

        Ok((Expr::Call { callee: name, args }, height))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// The lookahead as a known binary operator.
    #[inline]
    fn current_operator(&self) -> Option<(char, Precedence)> {
        match self.current.token_type {
            TokenType::CHAR(op) => self.precedence.get(op).map(|p| (op, p)),
            _ => None,
        }
    }

    fn expect_char(&mut self, expected: char, message: &str) -> Result<()> {
        if !self.current.is_char(expected) {
            return Err(KaleidoscopeError::expression(
                self.current.line,
                format!("{}, found {}", message, describe(&self.current)),
            ));
        }

        self.advance()?;

        Ok(())
    }

    fn expect_keyword(&mut self, keyword: TokenType, message: &str) -> Result<()> {
        if self.current.token_type != keyword {
            return Err(KaleidoscopeError::expression(
                self.current.line,
                format!("{}, found {}", message, describe(&self.current)),
            ));
        }

        self.advance()?;

        Ok(())
    }

    /// Run `rule` one nesting level deeper, failing instead of recursing
    /// past `max_depth`.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            info!("Nesting limit {} reached", self.max_depth);

            return Err(KaleidoscopeError::NestingTooDeep {
                limit: self.max_depth,
                line: self.current.line,
            });
        }

        self.depth += 1;
        let result: Result<T> = rule(self);
        self.depth -= 1;

        result
    }

    /// Reject trees taller than `max_height`.
    fn check_height(&self, height: usize) -> Result<usize> {
        if height > self.max_height {
            info!("Tree height limit {} reached", self.max_height);

            return Err(KaleidoscopeError::TreeTooDeep {
                limit: self.max_height,
                line: self.current.line,
            });
        }

        Ok(height)
    }
}

/// How a token is named in error messages.
fn describe(token: &Token) -> String {
    match &token.token_type {
        TokenType::EOF => "end of input".to_string(),
        TokenType::DEF => "'def'".to_string(),
        TokenType::EXTERN => "'extern'".to_string(),
        TokenType::IDENTIFIER(name) => format!("identifier '{}'", name),
        TokenType::NUMBER(_) => format!("number {}", token.lexeme),
        TokenType::CHAR(c) => format!("'{}'", c.escape_default()),
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

/// Yields one top‑level unit per step.  After a syntax error the offending
/// token is discarded and parsing resumes; I/O errors end the iteration.
impl<'t, R: Read> Iterator for Parser<'t, R> {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        match self.parse_item() {
            Ok(Some(item)) => Some(Ok(item)),

            Ok(None) => {
                self.halted = true;
                None
            }

            Err(e) => {
                if !e.is_syntax() || self.advance().is_err() {
                    self.halted = true;
                }

                Some(Err(e))
            }
        }
    }
}
