//! Atom selection language for structural models and trajectories.
//!
//! An expression such as `name =~ "^(C|O|N|CA)$" && resid <= 30` is compiled
//! once into a [`Program`] for a small stack machine, then evaluated against
//! every atom of a collection. See [`ast`] for the grammar.
pub mod ast;
pub mod atom;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod select;
pub mod value;

pub use ast::{CmpOp, Expr, LogicOp, SpannedToken, Token};
pub use atom::{load_atoms, Atom, AtomRecord, Field};
pub use compiler::{compile, Compiler};
pub use error::{CompileError, EvalError, LexError, ParseError, SelectError};
pub use evaluator::{evaluate, Evaluator, NUMERIC_EPSILON};
pub use lexer::{tokenize, Lexer};
pub use parser::Parser;
pub use program::{Instruction, Program};
pub use select::{select, select_indices, Selector};
pub use value::{Literal, Value, ValueKind};
