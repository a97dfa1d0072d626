//! Lexer module for CQL

pub mod keyword;
pub mod scanner;
pub mod token;

pub use keyword::*;
pub use scanner::*;
pub use token::*;
