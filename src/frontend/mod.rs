//! Frontend module - Lexer, Parser, syntax tree

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod tree;
pub mod printer;
