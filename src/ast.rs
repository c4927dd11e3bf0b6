//! Abstract syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Every node exclusively owns its children; trees are acyclic and carry
//! no back‑references.  A parsed top‑level unit is handed to the caller as
//! an [`Item`], which takes ownership of the whole tree.

use serde::Serialize;

/// **Expression node**.  Kaleidoscope has a single value type (`f64`), so
/// no node carries type information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Numeric literal, e.g. `1.5`.
    Number(f64),

    /// Reference to a parameter by name.
    Variable(String),

    /// Infix binary operator expression
    /// *Example:* `a + b`, `x < y`
    Binary {
        /// Operator character such as `+`, `*` or `<`.
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call
    /// *Example:* `f(1, g(2, 3))`
    Call {
        callee: String,
        /// Argument list in source order (may be empty).
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Build a [`Expr::Binary`], boxing both operands.
    pub fn binary(op: char, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of nodes on the longest root‑to‑leaf path (a leaf is 1).
    /// Walks with an explicit stack, so it is safe on any tree.
    pub fn depth(&self) -> usize {
        let mut deepest: usize = 0;
        let mut pending: Vec<(&Expr, usize)> = vec![(self, 1)];

        while let Some((expr, level)) = pending.pop() {
            deepest = deepest.max(level);

            match expr {
                Expr::Binary { left, right, .. } => {
                    pending.push((left.as_ref(), level + 1));
                    pending.push((right.as_ref(), level + 1));
                }
                Expr::Call { args, .. } => {
                    pending.extend(args.iter().map(|arg| (arg, level + 1)));
                }
                Expr::Number(_) | Expr::Variable(_) => {}
            }
        }

        deepest
    }

    /// Move this node's children onto `out`, leaving it childless.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Binary { left, right, .. } => {
                out.push(std::mem::replace(&mut **left, Expr::Number(0.0)));
                out.push(std::mem::replace(&mut **right, Expr::Number(0.0)));
            }
            Expr::Call { args, .. } => out.append(args),
            Expr::Number(_) | Expr::Variable(_) => {}
        }
    }
}

/// Chains like `1+1+…+1` build a spine as long as the input; the default
/// recursive drop would follow it down the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut orphans: Vec<Expr> = Vec::new();

        self.detach_children(&mut orphans);

        while let Some(mut expr) = orphans.pop() {
            expr.detach_children(&mut orphans);
        }
    }
}

/// A function signature: name plus ordered, unique parameter names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The nameless, parameterless prototype that wraps top‑level
    /// expressions.
    pub fn anonymous() -> Self {
        Self::new("", Vec::new())
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A prototype paired with the expression that computes its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expr,
}

impl Function {
    pub fn new(prototype: Prototype, body: Expr) -> Self {
        Self { prototype, body }
    }
}

/// One parsed **top‑level unit**.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    /// `def name(params) body`
    Definition(Function),

    /// `extern name(params)`
    Extern(Prototype),

    /// A bare expression, wrapped in a function with an anonymous
    /// prototype so later stages can treat it like any other function.
    Expression(Function),
}

impl Item {
    /// Short human description used in driver acknowledgements.
    pub fn describe(&self) -> &'static str {
        match self {
            Item::Definition(_) => "a function definition",
            Item::Extern(_) => "an extern statement",
            Item::Expression(_) => "a top-level expression",
        }
    }
}
