//! Closure flattening: nested lambda subprograms into one address space
//!
//! Walks the normalized entry sequence, translating statements 1:1 into
//! instructions, except `LambdaPush`: its body is flattened recursively
//! (depth-first, so inner lambdas are named before the enclosing one),
//! inserted into the shared table under a freshly minted unique name, and
//! the push site is replaced by a `Close` referencing that name. Free
//! variables are resolved dynamically through the runtime's symbol
//! environment, so no capture list is computed here.

use std::collections::HashMap;

use crate::ast::Ident;
use crate::normalize::{NormalProgram, NormalStmt};

/// Reserved name of the top-level entry sequence.
pub const ENTRY_SUBPROGRAM: &str = "__main__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Integer(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Call,
    Drop,
    /// Materialize a callable value referencing a flattened subprogram.
    Close { subprogram: Ident },
    Push { value: Literal },
    PushValue { symbol: Ident },
    PopValue { symbol: Ident },
}

/// Mapping from unique subprogram name to its flat instruction sequence.
///
/// Insertion order is preserved; lambdas appear before the subprograms that
/// close over them, and `__main__` is always last.
#[derive(Debug, Clone, Default)]
pub struct SubprogramTable {
    subprograms: Vec<(Ident, Vec<Instruction>)>,
}

impl SubprogramTable {
    pub fn get(&self, name: &str) -> Option<&[Instruction]> {
        self.subprograms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Instruction])> {
        self.subprograms
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subprograms.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.subprograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subprograms.is_empty()
    }

    fn insert(&mut self, name: Ident, body: Vec<Instruction>) {
        debug_assert!(
            self.get(&name).is_none(),
            "duplicate subprogram name {name}"
        );
        self.subprograms.push((name, body));
    }
}

pub fn transform(program: NormalProgram) -> SubprogramTable {
    let mut transformer = Transformer::default();
    let entry = transformer.sequence(program.statements);
    transformer
        .table
        .insert(ENTRY_SUBPROGRAM.to_string(), entry);
    transformer.table
}

/// Pass-scoped accumulator state, exclusively owned by one `transform`
/// call and discarded at return.
#[derive(Default)]
struct Transformer {
    table: SubprogramTable,
    /// Instances already emitted per declared lambda name, used to mint
    /// unique subprogram names.
    instance_counts: HashMap<Ident, u32>,
}

impl Transformer {
    fn sequence(&mut self, statements: Vec<NormalStmt>) -> Vec<Instruction> {
        statements.into_iter().map(|s| self.statement(s)).collect()
    }

    fn statement(&mut self, statement: NormalStmt) -> Instruction {
        match statement {
            NormalStmt::Call => Instruction::Call,
            NormalStmt::Drop => Instruction::Drop,
            NormalStmt::IntegerPush { value } => Instruction::Push {
                value: Literal::Integer(value),
            },
            NormalStmt::SymbolValuePush { name } => Instruction::PushValue { symbol: name },
            NormalStmt::SymbolValuePop { name } => Instruction::PopValue { symbol: name },
            NormalStmt::LambdaPush { name, body } => {
                // Flatten the body first so nested lambdas claim their
                // instance indices before this one is finalized.
                let instructions = self.sequence(body);

                let count = self.instance_counts.entry(name.clone()).or_insert(0);
                let unique = format!("{}${}", name, count);
                *count += 1;

                self.table.insert(unique.clone(), instructions);
                Instruction::Close { subprogram: unique }
            }
        }
    }
}
