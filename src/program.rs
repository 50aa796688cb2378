//! Compiled selection programs.
//!
//! A [`Program`] is a flat array of [`Instruction`]s for the stack machine in
//! [`evaluator`](crate::evaluator), plus the regular expressions its match
//! instructions refer to. It is built once by the compiler and never mutated
//! afterwards, so it can be cloned or shared between threads freely.

use std::fmt;

use regex::Regex;

use crate::{
    ast::{CmpOp, LogicOp},
    atom::Field,
    value::Literal,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Push the atom's value for a field
    PushField(Field),

    /// Push a literal
    PushConst(Literal),

    /// Pop right then left, push the comparison result
    Compare(CmpOp),

    /// Pop a string, push whether `patterns[pattern]` finds a match in it
    /// (or finds none, when `negate` is set)
    RegexMatch { pattern: usize, negate: bool },

    /// Peek at the boolean on top of the stack. If it already decides `op`,
    /// jump to `target` with it as the result; otherwise fall through to the
    /// right-hand operand, which is combined with it by `And`/`Or`.
    ShortCircuit { op: LogicOp, target: usize },

    /// Pop two booleans, push their conjunction
    And,

    /// Pop two booleans, push their disjunction
    Or,

    /// Pop a boolean, push its negation
    Not,

    /// Push `true`
    AcceptAll,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushField(field) => write!(f, "PUSH_FIELD {}", field.name()),
            Instruction::PushConst(literal) => write!(f, "PUSH_CONST {}", literal),
            Instruction::Compare(op) => write!(f, "CMP {}", op),
            Instruction::RegexMatch { pattern, negate } => {
                let op = if *negate { "!~" } else { "=~" };
                write!(f, "REGEX_MATCH {} #{}", op, pattern)
            }
            Instruction::ShortCircuit { op, target } => {
                write!(f, "SHORT_CIRCUIT {} -> {}", op, target)
            }
            Instruction::And => write!(f, "AND"),
            Instruction::Or => write!(f, "OR"),
            Instruction::Not => write!(f, "NOT"),
            Instruction::AcceptAll => write!(f, "ACCEPT_ALL"),
        }
    }
}

/// An immutable, compiled selection.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    instructions: Vec<Instruction>,
    patterns: Vec<Regex>,
    max_stack_depth: usize,
}

impl Program {
    pub(crate) fn new(
        source: String,
        instructions: Vec<Instruction>,
        patterns: Vec<Regex>,
        max_stack_depth: usize,
    ) -> Self {
        Program {
            source,
            instructions,
            patterns,
            max_stack_depth,
        }
    }

    /// The expression text this program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Deepest operand stack any evaluation can reach.
    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    /// True for the `all` shorthand, which selects without reading atoms.
    pub fn accepts_all(&self) -> bool {
        self.instructions == [Instruction::AcceptAll]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:4}  {}", pc, instruction)?;
        }
        for (i, pattern) in self.patterns.iter().enumerate() {
            writeln!(f, "   #{}  {:?}", i, pattern.as_str())?;
        }
        Ok(())
    }
}
