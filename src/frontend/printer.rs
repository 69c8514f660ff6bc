//! Tree printer - pretty print the syntax tree
//!
//! Outputs one node per line, children indented under their parent.

use crate::frontend::ast::Program;
use crate::frontend::tree::Node;

/// Pretty printer over the generic node view
pub struct TreePrinter {
    output: String,
    indent: usize,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Print a program to string
    pub fn print_program(&mut self, program: &Program) -> String {
        self.print_node(Node::from(program))
    }

    /// Print any subtree to string
    pub fn print_node(&mut self, node: Node<'_>) -> String {
        self.output.clear();
        self.indent = 0;
        self.write_node(node);
        std::mem::take(&mut self.output)
    }

    fn write_node(&mut self, node: Node<'_>) {
        let line = match node.value() {
            Some(value) => format!("{}: {}", node.kind(), value),
            None => node.kind().to_string(),
        };
        self.output.push_str(&" ".repeat(self.indent));
        self.output.push_str(&line);
        self.output.push('\n');

        self.indent += 2;
        for child in node.children() {
            self.write_node(child);
        }
        self.indent -= 2;
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `program` as indented text
pub fn print_tree(program: &Program) -> String {
    TreePrinter::new().print_program(program)
}
