//! Parser module for CQL

pub mod ast;
mod auth;
mod ddl;
mod dml;
mod expr;
pub mod parser;
mod relation;

pub use ast::*;
pub use parser::*;
