use crate::ast::{CmpOp, LogicOp};

/// Parsed selection expression, before type checking.
///
/// Offsets are byte positions in the source text and point at the token
/// that errors about the node should blame.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Every atom
    ///
    /// # Example
    /// ```text
    /// all
    /// ```
    All,

    /// Field or derived predicate, not yet resolved against the vocabulary
    ///
    /// # Example
    /// ```text
    /// resname
    /// ```
    Field { name: String, offset: usize },

    /// Numeric literal
    Number(f64),

    /// String literal
    Text(String),

    /// Prefix negation
    ///
    /// # Example
    /// ```text
    /// !backbone
    /// ```
    Not { operand: Box<Expr>, offset: usize },

    /// Relational comparison
    ///
    /// # Example
    /// ```text
    /// resid <= 30
    /// ```
    Compare {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
        offset: usize,
    },

    /// Regular expression search (`=~`, or `!~` when `negate` is set)
    ///
    /// The pattern is always a string literal.
    ///
    /// # Example
    /// ```text
    /// name =~ "^(C|O|N|CA)$"
    /// ```
    Match {
        subject: Box<Expr>,
        pattern: String,
        negate: bool,
        offset: usize,
        pattern_offset: usize,
    },

    /// A run of operands joined by the same logical operator (`&&` or `||`)
    ///
    /// Chains are flat, so `a || b || c` is one node with three operands.
    /// `offsets[i]` is the position of the operator between `operands[i]`
    /// and `operands[i + 1]`.
    ///
    /// # Example
    /// ```text
    /// segid == "HEME" || segid == "PROT" || hydrogen
    /// ```
    Logical {
        op: LogicOp,
        operands: Vec<Expr>,
        offsets: Vec<usize>,
    },
}
