//! Lexer module for tokenizing Piethon source code

mod token;
mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Lexer;
