//! Normalization: desugared trees into linear stack statements
//!
//! Every expression normalizes to `(prestatements, final)`: a sequence of
//! statements that must execute first to produce the operands, followed by
//! exactly one statement that leaves the expression's single result on top
//! of the operand stack. Concatenating `prestatements ++ [final]` is itself
//! a valid produces-one-value sequence, which is what makes the recursion
//! compose without re-traversal.
//!
//! Lambda bodies are kept as pending subprograms inside `LambdaPush`
//! statements; flattening them into a single address space is the
//! transform pass's job.

use crate::ast::Ident;
use crate::desugar::{DesugaredExpr, DesugaredProgram, DesugaredStmt};

/// Declared name given to lambdas with no user-supplied name.
pub const ANONYMOUS_LAMBDA_NAME: &str = "__lambda__";

#[derive(Debug, Clone, PartialEq)]
pub enum NormalStmt {
    IntegerPush { value: i32 },
    SymbolValuePush { name: Ident },
    SymbolValuePop { name: Ident },
    Call,
    Drop,
    /// A deferred subprogram reference: pushing a lambda costs nothing and
    /// has no prestatements of its own.
    LambdaPush { name: Ident, body: Vec<NormalStmt> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalProgram {
    pub statements: Vec<NormalStmt>,
}

pub fn normalize(program: DesugaredProgram) -> NormalProgram {
    let mut normalizer = Normalizer::new();
    NormalProgram {
        statements: normalizer.statement_list(program.statements),
    }
}

struct Normalizer {
    /// Monotonically increasing counter reserved for alpha-renaming.
    /// No current node kind consumes it; it is threaded through so a future
    /// renaming node has somewhere to draw fresh names from.
    #[allow(dead_code)]
    counter: u32,
}

impl Normalizer {
    fn new() -> Self {
        Self { counter: 0 }
    }

    fn statement_list(&mut self, statements: Vec<DesugaredStmt>) -> Vec<NormalStmt> {
        let mut result = Vec::new();
        for statement in statements {
            let (prestatements, last) = self.statement(statement);
            result.extend(prestatements);
            result.push(last);
        }
        result
    }

    fn statement(&mut self, statement: DesugaredStmt) -> (Vec<NormalStmt>, NormalStmt) {
        match statement {
            // target = expr: evaluate the expression, then bind the result.
            DesugaredStmt::Assignment { target, expression } => {
                let (mut prestatements, last) = self.expression(expression);
                prestatements.push(last);
                (prestatements, NormalStmt::SymbolValuePop { name: target })
            }
            // A bare expression statement evaluates and discards its result.
            DesugaredStmt::Expression { expression } => {
                let (mut prestatements, last) = self.expression(expression);
                prestatements.push(last);
                (prestatements, NormalStmt::Drop)
            }
        }
    }

    fn expression(&mut self, expression: DesugaredExpr) -> (Vec<NormalStmt>, NormalStmt) {
        match expression {
            DesugaredExpr::Integer { value } => (Vec::new(), NormalStmt::IntegerPush { value }),
            DesugaredExpr::Symbol { name, .. } => {
                (Vec::new(), NormalStmt::SymbolValuePush { name })
            }
            DesugaredExpr::Call {
                function,
                arguments,
                ..
            } => self.call(*function, arguments),
            DesugaredExpr::Lambda {
                name,
                parameters,
                body,
                return_expr,
            } => self.lambda(name, parameters, body, *return_expr),
        }
    }

    /// Arguments evaluate strictly left to right, then the function
    /// expression, then the argument count, then the call itself. The VM
    /// convention is that a call consumes the arguments, the function value
    /// and the count, and produces one result.
    fn call(
        &mut self,
        function: DesugaredExpr,
        arguments: Vec<DesugaredExpr>,
    ) -> (Vec<NormalStmt>, NormalStmt) {
        let argument_count = arguments.len() as i32;
        let mut prestatements = Vec::new();

        for argument in arguments {
            let (argument_prestatements, last) = self.expression(argument);
            prestatements.extend(argument_prestatements);
            prestatements.push(last);
        }

        let (function_prestatements, function_last) = self.expression(function);
        prestatements.extend(function_prestatements);
        prestatements.push(function_last);
        prestatements.push(NormalStmt::IntegerPush {
            value: argument_count,
        });

        (prestatements, NormalStmt::Call)
    }

    /// A lambda compiles to a self-contained statement list, not inlined at
    /// the construction site. The body discards the argument count the
    /// caller pushed, binds parameters in reverse declaration order (the
    /// last-pushed argument is on top), runs the body statements, and
    /// finally leaves the return expression's value on the stack.
    ///
    /// The argument count is dropped without being checked against the
    /// parameter count: arity mismatches are silently accepted. See the
    /// repository design notes before changing this.
    fn lambda(
        &mut self,
        name: Option<Ident>,
        parameters: Vec<Ident>,
        body: Vec<DesugaredStmt>,
        return_expr: DesugaredExpr,
    ) -> (Vec<NormalStmt>, NormalStmt) {
        let name = name.unwrap_or_else(|| ANONYMOUS_LAMBDA_NAME.to_string());

        let mut statements = vec![NormalStmt::Drop];
        for parameter in parameters.into_iter().rev() {
            statements.push(NormalStmt::SymbolValuePop { name: parameter });
        }

        statements.extend(self.statement_list(body));

        let (prestatements, last) = self.expression(return_expr);
        statements.extend(prestatements);
        statements.push(last);

        (
            Vec::new(),
            NormalStmt::LambdaPush {
                name,
                body: statements,
            },
        )
    }
}
