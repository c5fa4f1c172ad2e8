//! Recursive descent parser for Basalt
//!
//! Alternation is handled with explicit backtracking: each sub-parser either
//! matches (advancing the cursor), declines without consuming anything
//! (`Ok(None)`), or raises a hard `ParseError` that aborts the compilation.

use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

/// Names that may be referenced as values but never assigned to.
pub const BUILTINS: &[&str] = &["print", "pow"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unable to parse token \"{lexeme}\" on line {line}")]
    UnexpectedToken { lexeme: String, line: usize },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected closing parenthesis on line {line}, found \"{found}\"")]
    ExpectedClosingParen { found: String, line: usize },
    #[error("expected expression after assignment operator on line {line}")]
    ExpectedExpression { line: usize },
    #[error("cannot assign to builtin \"{name}\" on line {line}")]
    AssignToBuiltin { name: String, line: usize },
    #[error("integer literal \"{lexeme}\" on line {line} is out of range")]
    IntegerOutOfRange { lexeme: String, line: usize },
    #[error("expected {expected} on line {line}")]
    Expected { expected: &'static str, line: usize },
}

/// A sub-parser result: `None` means "did not match, cursor untouched".
type Matched<T> = Result<Option<T>, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            match self.parse_statement()? {
                Some(statement) => statements.push(statement),
                None => {
                    // No grammar rule matches the current token.
                    let token = &self.tokens[self.pos];
                    return Err(ParseError::UnexpectedToken {
                        lexeme: token.lexeme.clone(),
                        line: token.line,
                    });
                }
            }
        }

        Ok(Program { statements })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Matched<Stmt> {
        if let Some(statement) = self.parse_assignment()? {
            return Ok(Some(statement));
        }
        if let Some(expression) = self.parse_expression()? {
            return Ok(Some(Stmt::Expression { expression }));
        }
        Ok(None)
    }

    fn parse_assignment(&mut self) -> Matched<Stmt> {
        let start = self.pos;

        let (target, target_line) = match self.peek() {
            Some(t) if t.kind == TokenKind::Symbol => {
                let result = (t.lexeme.clone(), t.line);
                self.pos += 1;
                result
            }
            _ => return Ok(None),
        };

        let operator_line = match self.peek() {
            Some(t) if t.kind == TokenKind::Equals => {
                if BUILTINS.contains(&target.as_str()) {
                    return Err(ParseError::AssignToBuiltin {
                        name: target,
                        line: target_line,
                    });
                }
                let line = t.line;
                self.pos += 1;
                line
            }
            _ => {
                self.pos = start;
                return Ok(None);
            }
        };

        match self.parse_expression()? {
            Some(expression) => Ok(Some(Stmt::Assignment { target, expression })),
            None => Err(ParseError::ExpectedExpression {
                line: operator_line,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Matched<Expr> {
        if let Some(e) = self.parse_function_call()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.parse_lambda()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.parse_symbol()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.parse_integer()? {
            return Ok(Some(e));
        }
        Ok(None)
    }

    fn parse_function_call(&mut self) -> Matched<Expr> {
        let start = self.pos;

        // We have to be careful which callee expressions we allow here;
        // restricting the callee to a symbol keeps the grammar unambiguous.
        let mut function = match self.parse_symbol()? {
            Some(e) => e,
            None => return Ok(None),
        };

        let mut metadata = match self.peek() {
            Some(t) => Metadata::new(t.line),
            None => {
                self.pos = start;
                return Ok(None);
            }
        };

        let mut arguments = match self.parse_argument_list()? {
            Some(list) => list,
            None => {
                self.pos = start;
                return Ok(None);
            }
        };

        // Left-associative application chaining: f(a)(b) is Call(Call(f, [a]), [b]).
        loop {
            function = Expr::Call {
                metadata,
                function: Box::new(function),
                arguments,
            };

            metadata = match self.peek() {
                Some(t) => Metadata::new(t.line),
                None => break,
            };

            arguments = match self.parse_argument_list()? {
                Some(list) => list,
                None => break,
            };
        }

        Ok(Some(function))
    }

    /// Parse a parenthesized, comma-separated expression list. Newlines are
    /// tolerated around commas; the list may be empty; a trailing comma is
    /// accepted.
    fn parse_argument_list(&mut self) -> Matched<Vec<Expr>> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::OpenParen => self.pos += 1,
            _ => return Ok(None),
        }

        let arguments = self.parse_comma_separated(Self::parse_expression)?;

        self.expect_close_paren()?;
        Ok(Some(arguments))
    }

    fn parse_lambda(&mut self) -> Matched<Expr> {
        let line = match self.peek() {
            Some(t) if t.kind == TokenKind::KwLambda => t.line,
            _ => return Ok(None),
        };
        self.pos += 1;
        let metadata = Metadata::new(line);

        match self.peek() {
            Some(t) if t.kind == TokenKind::OpenParen => self.pos += 1,
            _ => {
                return Err(ParseError::Expected {
                    expected: "parameter list after \"lambda\"",
                    line,
                })
            }
        }

        let parameters = self.parse_comma_separated(Self::parse_parameter_name)?;
        self.expect_close_paren()?;

        match self.peek() {
            Some(t) if t.kind == TokenKind::KwDo => self.pos += 1,
            _ => {
                return Err(ParseError::Expected {
                    expected: "\"do\" after lambda parameter list",
                    line,
                })
            }
        }

        // The body is a statement list whose final expression is the return
        // value: keep parsing statements until the expression directly
        // followed by "end".
        let mut body = Vec::new();
        let return_expr = loop {
            self.skip_newlines();

            match self.peek() {
                None => return Err(ParseError::UnexpectedEof),
                Some(t) if t.kind == TokenKind::KwEnd => {
                    return Err(ParseError::Expected {
                        expected: "return expression before \"end\"",
                        line,
                    })
                }
                _ => {}
            }

            if let Some(statement) = self.parse_assignment()? {
                body.push(statement);
                continue;
            }

            let expression = match self.parse_expression()? {
                Some(e) => e,
                None => {
                    let token = &self.tokens[self.pos];
                    return Err(ParseError::UnexpectedToken {
                        lexeme: token.lexeme.clone(),
                        line: token.line,
                    });
                }
            };

            self.skip_newlines();
            match self.peek() {
                Some(t) if t.kind == TokenKind::KwEnd => {
                    self.pos += 1;
                    break expression;
                }
                _ => body.push(Stmt::Expression { expression }),
            }
        };

        Ok(Some(Expr::Lambda {
            metadata,
            parameters,
            body,
            return_expr: Box::new(return_expr),
        }))
    }

    fn parse_parameter_name(&mut self) -> Matched<Ident> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Symbol => {
                let name = t.lexeme.clone();
                self.pos += 1;
                Ok(Some(name))
            }
            _ => Ok(None),
        }
    }

    fn parse_symbol(&mut self) -> Matched<Expr> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Symbol => {
                let expr = Expr::Symbol {
                    metadata: Metadata::new(t.line),
                    name: t.lexeme.clone(),
                };
                self.pos += 1;
                Ok(Some(expr))
            }
            _ => Ok(None),
        }
    }

    fn parse_integer(&mut self) -> Matched<Expr> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Integer => {
                let value = t.lexeme.parse::<i32>().map_err(|_| {
                    ParseError::IntegerOutOfRange {
                        lexeme: t.lexeme.clone(),
                        line: t.line,
                    }
                })?;
                self.pos += 1;
                Ok(Some(Expr::Integer { value }))
            }
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Comma-separated list with newlines tolerated around commas. An empty
    /// list and a trailing comma are both accepted.
    fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Matched<T>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();

        self.skip_newlines();
        match item(self)? {
            Some(first) => items.push(first),
            None => return Ok(items),
        }

        while matches!(self.peek(), Some(t) if t.kind == TokenKind::Comma) {
            self.pos += 1;
            self.skip_newlines();

            match item(self)? {
                Some(next) => items.push(next),
                None => break, // trailing comma
            }
        }

        self.skip_newlines();
        Ok(items)
    }

    fn expect_close_paren(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::CloseParen => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => Err(ParseError::ExpectedClosingParen {
                found: t.lexeme.clone(),
                line: t.line,
            }),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(t) if t.kind == TokenKind::Newline) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}
