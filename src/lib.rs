//! minic front end
//!
//! Lexer and recursive-descent parser for a small C-like language.
//!
//! ```
//! use minic::frontend::parser::parse_source;
//! use minic::frontend::tree::Node;
//!
//! let program = parse_source("int x = 10;").unwrap();
//! let decl = Node::from(&program).children()[0];
//! assert_eq!(decl.kind(), "Declaration");
//! assert_eq!(decl.children().len(), 3);
//! ```

pub mod frontend;
pub mod feedback;
pub mod utils;

pub use frontend::lexer::{tokenize, Lexer};
pub use frontend::parser::{parse, parse_source, Parser};
pub use utils::{Error, Result};
