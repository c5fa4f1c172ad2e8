//! Abstract syntax tree for Basalt

pub type Ident = String;

/// Source location carried for diagnostics.
///
/// Integer literals intentionally carry no metadata; symbols, calls and
/// lambdas do. Diagnostics that need a position for a literal fall back to
/// the enclosing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// 1-indexed line number
    pub line: usize,
}

impl Metadata {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Function application. Chained application `f(a)(b)` parses as
    /// `Call(Call(f, [a]), [b])`.
    Call {
        metadata: Metadata,
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Symbol {
        metadata: Metadata,
        name: Ident,
    },
    Integer {
        value: i32,
    },
    /// Anonymous function literal. The final expression in the body is the
    /// return value.
    Lambda {
        metadata: Metadata,
        parameters: Vec<Ident>,
        body: Vec<Stmt>,
        return_expr: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment { target: Ident, expression: Expr },
    Expression { expression: Expr },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
