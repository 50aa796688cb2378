//! # Atom Selection Language - Syntax Tree
//!
//! Tokens, operators and the expression tree produced by the parser. The
//! tree is short-lived: the compiler type-checks it and flattens it into a
//! [`Program`](crate::Program), which is what gets evaluated per atom.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes
//! - **[operators]** - Relational and logical operators
//!
//! ## Grammar
//!
//! From loosest to tightest binding:
//!
//! ```text
//! or       := and ( "||" and )*
//! and      := relation ( "&&" relation )*
//! relation := unary ( relop unary )*
//! unary    := "!" unary | primary
//! primary  := "(" or ")" | "all" | identifier | string | number
//! relop    := "==" | "!=" | "<" | "<=" | ">" | ">=" | "=~" | "!~"
//! ```
//!
//! The right operand of `=~` and `!~` must be a string literal.
//!
//! ## Examples
//!
//! ```text
//! name == 'CA' && resid == 1
//! segid == "HEME" || segid == "PROT"
//! name =~ "^(C|O|N|CA)$" && !hydrogen
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::{CmpOp, LogicOp};
pub use tokens::{SpannedToken, Token};
