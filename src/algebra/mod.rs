//! The symbolic algebra system.

mod expr;
pub mod ops;
mod parse;
pub mod render;
mod token;

pub use expr::{BinaryOperation, Expression};
pub use ops::FactorError;
pub use parse::{parse, parse_tokens, ParseError};
pub(crate) use token::join;
pub use token::{operator_symbols, relation_symbols, tokenize, Token};
