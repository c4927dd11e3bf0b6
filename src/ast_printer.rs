use crate::ast::{Expr, Function, Item, Prototype};
use crate::token::format_number;

/// Renders trees in a parenthesised prefix form, e.g. `a + b * c` becomes
/// `(+ a (* b c))`.  Two trees print the same exactly when they have the
/// same shape, which makes the output handy for eyeballing and for tests.
pub struct AstPrinter;

/// Pending output while walking a tree without recursion.
enum Step<'a> {
    Node(&'a Expr),
    Text(&'static str),
}

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut s = String::new();
        let mut steps: Vec<Step<'_>> = vec![Step::Node(expr)];

        // Children are pushed in reverse so they pop in source order.
        while let Some(step) = steps.pop() {
            let node: &Expr = match step {
                Step::Text(text) => {
                    s.push_str(text);
                    continue;
                }
                Step::Node(node) => node,
            };

            match node {
                // ── leaves ──────────────────────────────────────────────
                Expr::Number(n) => s.push_str(&format_number(*n)),

                Expr::Variable(name) => s.push_str(name),

                // ── binary operator ─────────────────────────────────────
                Expr::Binary { op, left, right } => {
                    s.push('(');
                    s.push(*op);
                    s.push(' ');
                    steps.push(Step::Text(")"));
                    steps.push(Step::Node(right));
                    steps.push(Step::Text(" "));
                    steps.push(Step::Node(left));
                }

                // ── call ────────────────────────────────────────────────
                Expr::Call { callee, args } => {
                    s.push_str("(call ");
                    s.push_str(callee);
                    steps.push(Step::Text(")"));
                    for arg in args.iter().rev() {
                        steps.push(Step::Node(arg));
                        steps.push(Step::Text(" "));
                    }
                }
            }
        }

        s
    }

    pub fn print_prototype(prototype: &Prototype) -> String {
        let mut s = String::from("(prototype");

        if !prototype.is_anonymous() {
            s.push(' ');
            s.push_str(&prototype.name);
        }

        for param in &prototype.params {
            s.push(' ');
            s.push_str(param);
        }

        s.push(')');
        s
    }

    pub fn print_function(function: &Function) -> String {
        format!(
            "(def {} {})",
            Self::print_prototype(&function.prototype),
            Self::print(&function.body)
        )
    }

    pub fn print_item(item: &Item) -> String {
        match item {
            Item::Definition(function) => Self::print_function(function),

            Item::Extern(prototype) => format!("(extern {})", Self::print_prototype(prototype)),

            // The wrapping prototype is always anonymous; show only the body.
            Item::Expression(function) => format!("(toplevel {})", Self::print(&function.body)),
        }
    }
}
