//! Generic node view over the typed AST
//!
//! Every node is presented as `{kind, value, children}`. The kind tags and
//! the order of children are the contract external consumers rely on:
//!
//! | kind | value | children |
//! |---|---|---|
//! | `Program` | | statements |
//! | `Declaration` | | `Type`, `Identifier`, initializer? |
//! | `Declaration` (function) | | `Type`, `Identifier`, `ParameterList`, `Block` |
//! | `ParameterList` | | `Parameter`* |
//! | `Parameter` | | `Type`, `Identifier` |
//! | `IfStatement` | | condition, then, else? |
//! | `WhileStatement` | | condition, body |
//! | `ReturnStatement` | | expression? |
//! | `Block` | | statements |
//! | `ExpressionStatement` | | expression |
//! | `Type` | keyword | |
//! | `Literal` | lexeme | |
//! | `Identifier` | name | |
//! | `Assignment` | `=` | `Identifier`, value |
//! | `BinaryOp` | operator | left, right |
//! | `UnaryOp` / `PostfixOp` | operator | operand |
//! | `Call` | callee | arguments |

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::frontend::ast::*;
use crate::utils::Span;

/// A borrowed node of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Program(&'a Program),
    Stmt(&'a Stmt),
    Block(&'a Block),
    Type(&'a TypeName),
    Ident(&'a Ident),
    Params(&'a ParamList),
    Param(&'a Param),
    Expr(&'a Expr),
}

impl<'a> Node<'a> {
    /// Kind tag
    pub fn kind(&self) -> &'static str {
        match *self {
            Node::Program(_) => "Program",
            Node::Stmt(stmt) => match stmt {
                Stmt::Declaration { .. } | Stmt::Function { .. } => "Declaration",
                Stmt::If { .. } => "IfStatement",
                Stmt::While { .. } => "WhileStatement",
                Stmt::Return { .. } => "ReturnStatement",
                Stmt::Block(_) => "Block",
                Stmt::Expr { .. } => "ExpressionStatement",
            },
            Node::Block(_) => "Block",
            Node::Type(_) => "Type",
            Node::Ident(_) => "Identifier",
            Node::Params(_) => "ParameterList",
            Node::Param(_) => "Parameter",
            Node::Expr(expr) => match expr {
                Expr::Literal(_) => "Literal",
                Expr::Ident(_) => "Identifier",
                Expr::Assign { .. } => "Assignment",
                Expr::Binary { .. } => "BinaryOp",
                Expr::Unary { .. } => "UnaryOp",
                Expr::Postfix { .. } => "PostfixOp",
                Expr::Call { .. } => "Call",
            },
        }
    }

    /// Literal payload: lexeme, name or operator
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Node::Type(ty) => Some(ty.name.as_str()),
            Node::Ident(ident) => Some(ident.name.as_str()),
            Node::Expr(expr) => match expr {
                Expr::Literal(lit) => Some(lit.text.as_str()),
                Expr::Ident(ident) => Some(ident.name.as_str()),
                Expr::Assign { .. } => Some("="),
                Expr::Binary { op, .. } => Some(op.as_str()),
                Expr::Unary { op, .. } => Some(op.as_str()),
                Expr::Postfix { op, .. } => Some(op.as_str()),
                Expr::Call { callee, .. } => Some(callee.name.as_str()),
            },
            _ => None,
        }
    }

    /// Children in their contractual order
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Program(program) => program.body.iter().map(Node::Stmt).collect(),
            Node::Stmt(stmt) => match stmt {
                Stmt::Declaration { ty, name, init, .. } => {
                    let mut children = vec![Node::Type(ty), Node::Ident(name)];
                    children.extend(init.iter().map(Node::Expr));
                    children
                }
                Stmt::Function { ty, name, params, body, .. } => vec![
                    Node::Type(ty),
                    Node::Ident(name),
                    Node::Params(params),
                    Node::Block(body),
                ],
                Stmt::If { cond, then_branch, else_branch, .. } => {
                    let mut children = vec![Node::Expr(cond), Node::Stmt(then_branch)];
                    children.extend(else_branch.as_deref().map(Node::Stmt));
                    children
                }
                Stmt::While { cond, body, .. } => vec![Node::Expr(cond), Node::Stmt(body)],
                Stmt::Return { value, .. } => value.iter().map(Node::Expr).collect(),
                Stmt::Block(block) => Node::Block(block).children(),
                Stmt::Expr { expr, .. } => vec![Node::Expr(expr)],
            },
            Node::Block(block) => block.stmts.iter().map(Node::Stmt).collect(),
            Node::Params(list) => list.params.iter().map(Node::Param).collect(),
            Node::Param(param) => vec![Node::Type(&param.ty), Node::Ident(&param.name)],
            Node::Type(_) | Node::Ident(_) => Vec::new(),
            Node::Expr(expr) => match expr {
                Expr::Literal(_) | Expr::Ident(_) => Vec::new(),
                Expr::Assign { target, value, .. } => vec![Node::Ident(target), Node::Expr(value)],
                Expr::Binary { left, right, .. } => vec![Node::Expr(left), Node::Expr(right)],
                Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => {
                    vec![Node::Expr(operand)]
                }
                Expr::Call { args, .. } => args.iter().map(Node::Expr).collect(),
            },
        }
    }

    /// Source range, `None` for the program root
    pub fn span(&self) -> Option<Span> {
        match *self {
            Node::Program(_) => None,
            Node::Stmt(stmt) => Some(stmt.span()),
            Node::Block(block) => Some(block.span),
            Node::Type(ty) => Some(ty.span),
            Node::Ident(ident) => Some(ident.span),
            Node::Params(list) => Some(list.span),
            Node::Param(param) => Some(param.span),
            Node::Expr(expr) => Some(expr.span()),
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}

/// `{"kind": .., "value": .., "children": [..]}`, `value` omitted when absent
impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value();
        let len = if value.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Node", len)?;
        state.serialize_field("kind", self.kind())?;
        match value {
            Some(value) => state.serialize_field("value", value)?,
            None => state.skip_field("value")?,
        }
        state.serialize_field("children", &self.children())?;
        state.end()
    }
}
