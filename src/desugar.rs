//! Desugaring pass: AST → desugared AST
//!
//! This is the single seam where surface sugar is expanded into the
//! primitive node set the normalizer understands, so later stages never
//! need grammar knowledge. The mapping is total and structurally
//! congruent, node for node, preserving metadata on symbols and calls.
//!
//! Lambdas cross this boundary losing their source metadata and gaining an
//! optional declared name. Today's surface syntax only produces anonymous
//! lambdas, so desugaring always leaves the name `None`; the field is the
//! hook for named-function sugar.

use crate::ast::{Expr, Ident, Metadata, Program, Stmt};

#[derive(Debug, Clone, PartialEq)]
pub enum DesugaredExpr {
    Call {
        metadata: Metadata,
        function: Box<DesugaredExpr>,
        arguments: Vec<DesugaredExpr>,
    },
    Symbol {
        metadata: Metadata,
        name: Ident,
    },
    Integer {
        value: i32,
    },
    Lambda {
        name: Option<Ident>,
        parameters: Vec<Ident>,
        body: Vec<DesugaredStmt>,
        return_expr: Box<DesugaredExpr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DesugaredStmt {
    Assignment {
        target: Ident,
        expression: DesugaredExpr,
    },
    Expression {
        expression: DesugaredExpr,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesugaredProgram {
    pub statements: Vec<DesugaredStmt>,
}

pub fn desugar(program: Program) -> DesugaredProgram {
    DesugaredProgram {
        statements: program
            .statements
            .into_iter()
            .map(desugar_statement)
            .collect(),
    }
}

fn desugar_statement(statement: Stmt) -> DesugaredStmt {
    match statement {
        Stmt::Assignment { target, expression } => DesugaredStmt::Assignment {
            target,
            expression: desugar_expression(expression),
        },
        Stmt::Expression { expression } => DesugaredStmt::Expression {
            expression: desugar_expression(expression),
        },
    }
}

fn desugar_expression(expression: Expr) -> DesugaredExpr {
    match expression {
        Expr::Call {
            metadata,
            function,
            arguments,
        } => DesugaredExpr::Call {
            metadata,
            function: Box::new(desugar_expression(*function)),
            arguments: arguments.into_iter().map(desugar_expression).collect(),
        },
        Expr::Symbol { metadata, name } => DesugaredExpr::Symbol { metadata, name },
        Expr::Integer { value } => DesugaredExpr::Integer { value },
        Expr::Lambda {
            metadata: _,
            parameters,
            body,
            return_expr,
        } => DesugaredExpr::Lambda {
            name: None,
            parameters,
            body: body.into_iter().map(desugar_statement).collect(),
            return_expr: Box::new(desugar_expression(*return_expr)),
        },
    }
}
