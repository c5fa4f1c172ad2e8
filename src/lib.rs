//! Basalt - a small ahead-of-time compiler targeting a stack-based VM
//!
//! The compiler is a straight pipeline over immutable intermediate
//! representations:
//!
//! ```text
//! lex → parse → desugar → normalize → transform → emit
//! ```
//!
//! Parsing builds a tree-shaped AST; desugaring expands surface sugar into
//! the primitive node set; normalization linearizes trees into
//! stack-effect-correct statement sequences with lambda bodies captured as
//! pending subprograms; transformation flattens those subprograms into a
//! single address space of uniquely named instruction sequences; emission
//! renders the result as C source embedding a tiny stack VM.

pub mod ast;
pub mod desugar;
pub mod emit;
pub mod errors;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod transform;

pub use ast::{Expr, Metadata, Program, Stmt};
pub use desugar::{desugar, DesugaredExpr, DesugaredProgram, DesugaredStmt};
pub use emit::emit_c;
pub use errors::Colors;
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use normalize::{normalize, NormalProgram, NormalStmt};
pub use parser::{ParseError, Parser, BUILTINS};
pub use transform::{transform, Instruction, Literal, SubprogramTable, ENTRY_SUBPROGRAM};
