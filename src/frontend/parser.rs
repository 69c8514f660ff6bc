//! Parser for the front end
//!
//! Recursive descent, one method per grammar production:
//!
//! ```text
//! program     ::= statement*
//! statement   ::= if_stmt | while_stmt | declaration | return_stmt | block | expr_stmt
//! if_stmt     ::= "if" "(" expression ")" statement ("else" statement)?
//! while_stmt  ::= "while" "(" expression ")" statement
//! declaration ::= type IDENT ("=" expression)? ";"
//!               | type IDENT "(" params ")" block
//! params      ::= "void" | (type IDENT ("," type IDENT)*)?
//! return_stmt ::= "return" expression? ";"
//! block       ::= "{" statement* "}"
//! expr_stmt   ::= expression ";"
//! ```
//!
//! Expressions go through one method per precedence level, loosest first:
//! assignment, `|`, `^`, `&`, equality, comparison, additive,
//! multiplicative, prefix, postfix, primary.

use log::{debug, trace};

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// Binary operator levels, loosest first. All left associative.
const BINARY_LEVELS: &[&[&str]] = &[
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", ">", "<=", ">="],
    &["+", "-"],
    &["*", "/", "%"],
];

const PREFIX_OPERATORS: &[&str] = &["-", "+", "!", "++", "--"];

/// Deepest statement or expression nesting accepted before the parser gives
/// up with [`Error::NestingTooDeep`]. Bounds parser recursion.
pub const MAX_NESTING: usize = 128;

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset reported for errors at end of input
    end: usize,
    /// Current statement/expression nesting
    depth: usize,
}

impl Parser {
    /// Create a parser from lexer output. Whitespace and comment tokens are
    /// dropped here.
    ///
    /// End of input is reported at the end of the last significant token,
    /// so trailing whitespace and comments never move it.
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let end = tokens.last().map_or(0, |t| t.span().end);
        Self {
            tokens,
            pos: 0,
            end,
            depth: 0,
        }
    }

    /// Tokenize `source` and create a parser over it
    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::new(source).tokenize())
    }

    // ==================== Helper Methods ====================

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(kind, text))
    }

    fn check_delim(&self, text: &str) -> bool {
        self.check(TokenKind::Delimiter, text)
    }

    fn check_op(&self, text: &str) -> bool {
        self.check(TokenKind::Operator, text)
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.check(TokenKind::Keyword, word)
    }

    /// Current token, if it is one of `operators`
    fn peek_operator(&self, operators: &[&str]) -> Option<&Token> {
        self.peek()
            .filter(|t| t.kind == TokenKind::Operator && operators.contains(&t.text.as_str()))
    }

    fn consume(&mut self, kind: TokenKind, text: &str) -> bool {
        if self.check(kind, text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, text: &str) -> Result<Token> {
        if self.check(kind, text) {
            self.next_or_eof(text)
        } else {
            Err(self.error_here(&format!("'{}'", text)))
        }
    }

    /// Consume the current token, reporting `expected` if there is none
    fn next_or_eof(&mut self, expected: &str) -> Result<Token> {
        match self.advance() {
            Some(token) => Ok(token),
            None => Err(self.error_here(expected)),
        }
    }

    /// Syntax error describing the current token
    fn error_here(&self, expected: &str) -> Error {
        match self.peek() {
            Some(token) => Error::UnexpectedToken {
                expected: expected.to_string(),
                kind: token.kind,
                text: token.text.clone(),
                span: token.span(),
            },
            None => Error::UnexpectedEof {
                expected: expected.to_string(),
                span: Span::point(self.end),
            },
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            let span = self.peek().map_or(Span::point(self.end), Token::span);
            debug!("nesting limit reached at offset {}", span.start);
            return Err(Error::NestingTooDeep { span });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Span of the most recently consumed token
    fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::point(0), Token::span)
    }

    /// Span from `start` through the most recently consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(&self.prev_span())
    }

    // ==================== Program & Statements ====================

    /// Parse a complete program
    pub fn parse(&mut self) -> Result<Program> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        debug!("parsed {} top-level statements", body.len());
        Ok(Program { body })
    }

    /// Parse one statement
    pub fn parse_statement(&mut self) -> Result<Stmt> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.error_here("statement")),
        };
        trace!("statement at offset {}: {:?}", token.offset, token.text);

        let is_declaration = token.is_type_keyword()
            && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Identifier);

        if token.is_keyword("if") {
            self.parse_if_statement()
        } else if token.is_keyword("while") {
            self.parse_while_statement()
        } else if is_declaration {
            self.parse_declaration()
        } else if token.is_keyword("return") {
            self.parse_return_statement()
        } else if token.is(TokenKind::Delimiter, "{") {
            Ok(Stmt::Block(self.parse_block()?))
        } else {
            self.parse_expression_statement()
        }
    }

    /// `if ( cond ) stmt [else stmt]`
    fn parse_if_statement(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Keyword, "if")?.span();
        self.expect(TokenKind::Delimiter, "(")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Delimiter, ")")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.consume(TokenKind::Keyword, "else") {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    /// `while ( cond ) stmt`
    fn parse_while_statement(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Keyword, "while")?.span();
        self.expect(TokenKind::Delimiter, "(")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Delimiter, ")")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            cond,
            body,
            span: self.span_from(start),
        })
    }

    /// Variable declaration, or a function definition when the name is
    /// followed by `(`.
    fn parse_declaration(&mut self) -> Result<Stmt> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;

        if self.check_delim("(") {
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            return Ok(Stmt::Function {
                span: ty.span.merge(&body.span),
                ty,
                name,
                params,
                body,
            });
        }

        let init = if self.consume(TokenKind::Operator, "=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Delimiter, ";")?;

        Ok(Stmt::Declaration {
            span: self.span_from(ty.span),
            ty,
            name,
            init,
        })
    }

    fn parse_params(&mut self) -> Result<ParamList> {
        let start = self.expect(TokenKind::Delimiter, "(")?.span();
        let mut params = Vec::new();

        let void_only = self.check_keyword("void")
            && self.peek_nth(1).is_some_and(|t| t.is(TokenKind::Delimiter, ")"));
        if void_only {
            self.pos += 1;
        } else if !self.check_delim(")") {
            loop {
                let ty = self.parse_type()?;
                let name = self.parse_ident()?;
                params.push(Param {
                    span: ty.span.merge(&name.span),
                    ty,
                    name,
                });
                if !self.consume(TokenKind::Delimiter, ",") {
                    break;
                }
            }
        }

        self.expect(TokenKind::Delimiter, ")")?;
        Ok(ParamList {
            params,
            span: self.span_from(start),
        })
    }

    fn parse_type(&mut self) -> Result<TypeName> {
        match self.peek() {
            Some(token) if token.is_type_keyword() => {
                let token = self.next_or_eof("type")?;
                Ok(TypeName {
                    span: token.span(),
                    name: token.text,
                })
            }
            _ => Err(self.error_here("type")),
        }
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => {
                let token = self.next_or_eof("identifier")?;
                Ok(Ident {
                    span: token.span(),
                    name: token.text,
                })
            }
            _ => Err(self.error_here("identifier")),
        }
    }

    /// `return [expr] ;`
    fn parse_return_statement(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Keyword, "return")?.span();
        let value = if self.check_delim(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Delimiter, ";")?;

        Ok(Stmt::Return {
            value,
            span: self.span_from(start),
        })
    }

    /// `{ stmt* }`
    fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(TokenKind::Delimiter, "{")?.span();
        let mut stmts = Vec::new();

        while !self.check_delim("}") && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.expect(TokenKind::Delimiter, "}")?;
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Delimiter, ";")?;
        Ok(Stmt::Expr {
            span: self.span_from(expr.span()),
            expr,
        })
    }

    // ==================== Expressions ====================

    /// Parse an expression
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(Self::parse_assignment)
    }

    /// `IDENT = expr`, right associative
    fn parse_assignment(&mut self) -> Result<Expr> {
        let left = self.parse_binary(0)?;

        if !self.check_op("=") {
            return Ok(left);
        }
        let target = match left {
            Expr::Ident(ident) => ident,
            other => return Err(Error::InvalidAssignmentTarget { span: other.span() }),
        };
        self.pos += 1;

        let value = self.nested(Self::parse_assignment)?;
        Ok(Expr::Assign {
            span: target.span.merge(&value.span()),
            target,
            value: Box::new(value),
        })
    }

    /// One binary precedence level; defers to the next-tighter level for
    /// its operands.
    fn parse_binary(&mut self, level: usize) -> Result<Expr> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };

        let mut left = self.parse_binary(level + 1)?;
        loop {
            let op = self
                .peek_operator(operators)
                .and_then(|t| BinOp::from_lexeme(&t.text));
            let Some(op) = op else { break };
            self.pos += 1;

            let right = self.parse_binary(level + 1)?;
            left = Expr::Binary {
                span: left.span().merge(&right.span()),
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// Prefix `- + ! ++ --`
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = self
            .peek_operator(PREFIX_OPERATORS)
            .and_then(|t| UnOp::from_lexeme(&t.text).map(|op| (op, t.span())));

        match op {
            Some((op, start)) => {
                self.pos += 1;
                let operand = self.nested(Self::parse_unary)?;
                Ok(Expr::Unary {
                    span: start.merge(&operand.span()),
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_postfix(),
        }
    }

    /// Postfix `++ --`
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let op = if self.check_op("++") {
                PostfixOp::Inc
            } else if self.check_op("--") {
                PostfixOp::Dec
            } else {
                break;
            };
            self.pos += 1;
            expr = Expr::Postfix {
                span: self.span_from(expr.span()),
                op,
                operand: Box::new(expr),
            };
        }
        Ok(expr)
    }

    /// Literals, identifiers, calls and parenthesized expressions
    fn parse_primary(&mut self) -> Result<Expr> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.error_here("expression")),
        };

        match token.kind {
            TokenKind::Number | TokenKind::String => {
                self.pos += 1;
                let kind = if token.kind == TokenKind::Number {
                    LiteralKind::Number
                } else {
                    LiteralKind::String
                };
                Ok(Expr::Literal(Literal {
                    kind,
                    span: token.span(),
                    text: token.text,
                }))
            }
            TokenKind::Identifier => {
                let callee = self.parse_ident()?;
                if self.check_delim("(") {
                    self.parse_call(callee)
                } else {
                    Ok(Expr::Ident(callee))
                }
            }
            TokenKind::Delimiter if token.text == "(" => {
                self.pos += 1;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Delimiter, ")")?;
                Ok(expr)
            }
            _ => Err(self.error_here("expression")),
        }
    }

    /// `callee ( args )`, the callee already consumed
    fn parse_call(&mut self, callee: Ident) -> Result<Expr> {
        self.expect(TokenKind::Delimiter, "(")?;
        let mut args = Vec::new();

        if !self.check_delim(")") {
            loop {
                args.push(self.parse_expression()?);
                if !self.consume(TokenKind::Delimiter, ",") {
                    break;
                }
            }
        }

        self.expect(TokenKind::Delimiter, ")")?;
        Ok(Expr::Call {
            span: self.span_from(callee.span),
            callee,
            args,
        })
    }
}

/// Parse a token sequence into a program.
///
/// An [`Error::UnexpectedEof`] carries the offset just past the last
/// non-whitespace, non-comment token.
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse()
}

/// Tokenize and parse `source`
pub fn parse_source(source: &str) -> Result<Program> {
    let result = Parser::from_source(source).parse();
    if let Err(ref e) = result {
        debug!("parse failed: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use crate::frontend::tree::Node;
    use pretty_assertions::assert_eq;

    /// `(kind, value)` of each child
    fn shape(node: Node) -> Vec<(&'static str, Option<String>)> {
        node.children()
            .iter()
            .map(|c| (c.kind(), c.value().map(str::to_string)))
            .collect()
    }

    fn first_stmt(program: &Program) -> Node<'_> {
        Node::Stmt(&program.body[0])
    }

    fn leaf(kind: &'static str, value: &str) -> (&'static str, Option<String>) {
        (kind, Some(value.to_string()))
    }

    #[test]
    fn test_declaration_with_initializer() {
        let program = parse_source("int x = 10;").unwrap();
        assert_eq!(program.body.len(), 1);

        let decl = first_stmt(&program);
        assert_eq!(decl.kind(), "Declaration");
        assert_eq!(
            shape(decl),
            vec![leaf("Type", "int"), leaf("Identifier", "x"), leaf("Literal", "10")]
        );
    }

    #[test]
    fn test_declaration_without_initializer() {
        let program = parse_source("float ratio;").unwrap();
        assert_eq!(
            shape(first_stmt(&program)),
            vec![leaf("Type", "float"), leaf("Identifier", "ratio")]
        );
    }

    #[test]
    fn test_if_else_shape() {
        let program = parse_source("if (x > 5) { return 0; } else { return 1; }").unwrap();
        let stmt = first_stmt(&program);
        assert_eq!(stmt.kind(), "IfStatement");

        let children = stmt.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].kind(), "BinaryOp");
        assert_eq!(children[0].value(), Some(">"));
        assert_eq!(children[1].kind(), "Block");
        assert_eq!(children[2].kind(), "Block");
        assert_eq!(children[2].children()[0].kind(), "ReturnStatement");
        assert_eq!(shape(children[2].children()[0]), vec![leaf("Literal", "1")]);
    }

    #[test]
    fn test_if_without_else() {
        let program = parse_source("if (ok) run();").unwrap();
        let children = first_stmt(&program).children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].kind(), "ExpressionStatement");
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let program = parse_source("if (a) if (b) x(); else y();").unwrap();
        let outer = first_stmt(&program).children();
        assert_eq!(outer.len(), 2);
        assert_eq!(outer[1].kind(), "IfStatement");
        assert_eq!(outer[1].children().len(), 3);
    }

    #[test]
    fn test_call_statement() {
        let program = parse_source("printf(\"hi\");").unwrap();
        let stmt = first_stmt(&program);
        assert_eq!(stmt.kind(), "ExpressionStatement");

        let call = stmt.children()[0];
        assert_eq!(call.kind(), "Call");
        assert_eq!(call.value(), Some("printf"));
        assert_eq!(shape(call), vec![leaf("Literal", "\"hi\"")]);

        match &program.body[0] {
            Stmt::Expr { expr: Expr::Call { args, .. }, .. } => {
                assert!(matches!(
                    &args[0],
                    Expr::Literal(Literal { kind: LiteralKind::String, .. })
                ));
            }
            other => panic!("expected call statement, got {:?}", other),
        }
    }

    #[test]
    fn test_call_arguments_in_order() {
        let program = parse_source("f(a, 1 + 2, g());").unwrap();
        let call = first_stmt(&program).children()[0];
        assert_eq!(
            shape(call),
            vec![leaf("Identifier", "a"), leaf("BinaryOp", "+"), leaf("Call", "g")]
        );
    }

    #[test]
    fn test_binary_children_order() {
        let mut parser = Parser::from_source("a - b");
        let expr = parser.parse_expression().unwrap();
        let node = Node::Expr(&expr);
        assert_eq!(node.kind(), "BinaryOp");
        assert_eq!(node.value(), Some("-"));
        assert_eq!(shape(node), vec![leaf("Identifier", "a"), leaf("Identifier", "b")]);
    }

    #[test]
    fn test_precedence_and_associativity() {
        let mut parser = Parser::from_source("a - b - c * d");
        let expr = parser.parse_expression().unwrap();
        // ((a - b) - (c * d))
        let root = Node::Expr(&expr);
        assert_eq!(shape(root), vec![leaf("BinaryOp", "-"), leaf("BinaryOp", "*")]);
        let left = root.children()[0];
        assert_eq!(shape(left), vec![leaf("Identifier", "a"), leaf("Identifier", "b")]);
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let mut parser = Parser::from_source("x + 1 == y * 2");
        let expr = parser.parse_expression().unwrap();
        let root = Node::Expr(&expr);
        assert_eq!(root.value(), Some("=="));
        assert_eq!(shape(root), vec![leaf("BinaryOp", "+"), leaf("BinaryOp", "*")]);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let mut parser = Parser::from_source("(a + b) * c");
        let expr = parser.parse_expression().unwrap();
        let root = Node::Expr(&expr);
        assert_eq!(root.value(), Some("*"));
        assert_eq!(shape(root), vec![leaf("BinaryOp", "+"), leaf("Identifier", "c")]);
    }

    #[test]
    fn test_unary_and_postfix() {
        let mut parser = Parser::from_source("-x + i++");
        let expr = parser.parse_expression().unwrap();
        let root = Node::Expr(&expr);
        assert_eq!(shape(root), vec![leaf("UnaryOp", "-"), leaf("PostfixOp", "++")]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let program = parse_source("a = b = 3;").unwrap();
        let assign = first_stmt(&program).children()[0];
        assert_eq!(assign.kind(), "Assignment");
        assert_eq!(shape(assign), vec![leaf("Identifier", "a"), leaf("Assignment", "=")]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_source("1 + a = 2;").unwrap_err();
        assert_eq!(err, Error::InvalidAssignmentTarget { span: Span::new(0, 5) });
    }

    #[test]
    fn test_function_definition() {
        let source = "int main(void) { int x = 1; while (x < 10) x = x + 1; return x; }";
        let program = parse_source(source).unwrap();
        match &program.body[0] {
            Stmt::Function { ty, name, params, body, span } => {
                assert_eq!(ty.name, "int");
                assert_eq!(name.name, "main");
                assert!(params.params.is_empty());
                assert_eq!(body.stmts.len(), 3);
                assert!(matches!(body.stmts[1], Stmt::While { .. }));
                assert_eq!(*span, Span::new(0, source.len()));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_are_skipped() {
        let program = parse_source("// header\nint x; /* note */ x = 2;").unwrap();
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_parse_from_tokens_with_whitespace() {
        let tokens = Lexer::new("return 1 ;").keep_whitespace(true).tokenize();
        let program = parse(tokens).unwrap();
        assert!(matches!(program.body[0], Stmt::Return { value: Some(_), .. }));
    }

    #[test]
    fn test_missing_paren_reports_brace() {
        let err = parse_source("if (x > 5 { return 0; }").unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedToken {
                expected: "')'".to_string(),
                kind: TokenKind::Delimiter,
                text: "{".to_string(),
                span: Span::new(10, 11),
            }
        );
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("int x = 1 int y;").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedToken { ref text, span, .. } if text == "int" && span.start == 10
        ));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = parse_source("int f() { return 0;").unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedEof {
                expected: "'}'".to_string(),
                span: Span::point(19),
            }
        );

        let err = parse(tokenize("x =")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof { ref expected, .. } if expected == "expression"
        ));
    }

    #[test]
    fn test_unknown_token_is_a_syntax_error() {
        let err = parse_source("int x = @;").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedToken { kind: TokenKind::Unknown, ref text, .. } if text == "@"
        ));
    }

    #[test]
    fn test_unsupported_keyword() {
        let err = parse_source("for (;;) {}").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { kind: TokenKind::Keyword, .. }));
    }

    #[test]
    fn test_xor_is_left_associative() {
        let mut parser = Parser::from_source("a ^ b ^ c");
        let expr = parser.parse_expression().unwrap();
        // ((a ^ b) ^ c)
        let root = Node::Expr(&expr);
        assert_eq!(root.value(), Some("^"));
        assert_eq!(shape(root), vec![leaf("BinaryOp", "^"), leaf("Identifier", "c")]);
        let left = root.children()[0];
        assert_eq!(shape(left), vec![leaf("Identifier", "a"), leaf("Identifier", "b")]);
    }

    #[test]
    fn test_xor_binds_between_or_and_and() {
        let mut parser = Parser::from_source("a | b ^ c & d");
        let expr = parser.parse_expression().unwrap();
        // (a | (b ^ (c & d)))
        let root = Node::Expr(&expr);
        assert_eq!(root.value(), Some("|"));
        let xor = root.children()[1];
        assert_eq!(shape(xor), vec![leaf("Identifier", "b"), leaf("BinaryOp", "&")]);
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let source = format!("x = {}1{};", "(".repeat(10_000), ")".repeat(10_000));
        let err = parse_source(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));

        let err = parse_source(&"(".repeat(10_000)).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));
    }

    #[test]
    fn test_deep_prefix_chain_is_rejected() {
        let source = format!("x = {}1;", "- ".repeat(10_000));
        let err = parse_source(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));
    }

    #[test]
    fn test_deep_blocks_are_rejected() {
        let source = format!("{}{}", "{".repeat(10_000), "}".repeat(10_000));
        let err = parse_source(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));

        let source = format!("{}x = 1;", "if (a) ".repeat(10_000));
        let err = parse_source(&source).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let depth = 40;
        let source = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let program = parse_source(&source).unwrap();
        assert_eq!(program.body.len(), 1);

        let source = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        assert!(parse_source(&source).is_ok());
    }

    #[test]
    fn test_end_of_input_offset_ignores_trailing_trivia() {
        let expected = Error::UnexpectedEof {
            expected: "expression".to_string(),
            span: Span::point(6),
        };
        assert_eq!(parse_source("return   ").unwrap_err(), expected);
        assert_eq!(parse(tokenize("return   ")).unwrap_err(), expected);

        let tokens = Lexer::new("return  // done\n").keep_whitespace(true).tokenize();
        assert_eq!(parse(tokens).unwrap_err(), expected);
    }

    #[test]
    fn test_empty_program() {
        let program = parse_source("  // nothing\n").unwrap();
        assert!(program.body.is_empty());
    }
}
