pub mod ast;
pub mod ast_printer;
pub mod driver;
pub mod error;
pub mod parser;
pub mod precedence;
pub mod scanner;
pub mod token;
