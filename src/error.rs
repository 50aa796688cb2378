//! Error types for compiling and evaluating selections.
//!
//! Compile errors carry a byte offset into the expression so they can be
//! rendered with a caret under the offending text:
//!
//! ```text
//! parse error at offset 24: expected an operand after '<=', found end of input
//!   resid >= 30 && resid <=
//!                           ^
//! ```

/// No token starts at `offset`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unexpected {found} at offset {offset}")]
pub struct LexError {
    /// Byte offset of the offending text
    pub offset: usize,
    /// The offending text, quoted for display
    pub found: String,
}

/// The token stream does not form a selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

/// Anything that stops an expression from becoming a program.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown field '{name}' at offset {offset}")]
    UnknownField { name: String, offset: usize },

    #[error("invalid pattern '{pattern}' at offset {offset}: {source}")]
    Pattern {
        pattern: String,
        offset: usize,
        #[source]
        source: regex::Error,
    },

    #[error("type mismatch at offset {offset}: {message}")]
    TypeMismatch { offset: usize, message: String },
}

impl CompileError {
    pub fn offset(&self) -> usize {
        match self {
            CompileError::Lex(e) => e.offset,
            CompileError::Parse(e) => e.offset,
            CompileError::UnknownField { offset, .. }
            | CompileError::Pattern { offset, .. }
            | CompileError::TypeMismatch { offset, .. } => *offset,
        }
    }

    /// The error message followed by the expression and a caret under the
    /// offending position.
    pub fn render(&self, input: &str) -> String {
        let column = input
            .get(..self.offset().min(input.len()))
            .map_or(0, |prefix| prefix.chars().count());
        format!("{}\n  {}\n  {}^", self, input, " ".repeat(column))
    }
}

/// Failures while running a program against one atom.
///
/// Everything except [`EvalError::TypeMismatch`] means the program itself
/// is malformed, which the compiler never produces.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("internal error: operand stack underflow at instruction {pc}")]
    StackUnderflow { pc: usize },

    #[error("internal error: operand stack exceeded depth {max_depth} at instruction {pc}")]
    StackOverflow { pc: usize, max_depth: usize },

    #[error("internal error: instruction {pc} refers to missing pattern #{pattern}")]
    MissingPattern { pc: usize, pattern: usize },

    #[error("internal error: program finished with {depth} operand(s) instead of one boolean")]
    InvalidFinalState { depth: usize },
}

impl EvalError {
    /// True for invariant violations that indicate a compiler defect.
    pub fn is_internal(&self) -> bool {
        !matches!(self, EvalError::TypeMismatch(_))
    }
}

/// Error returned by the one-shot selection entry points.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("selection aborted: {0}")]
    Eval(#[from] EvalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_points_at_offset() {
        let err = CompileError::UnknownField {
            name: "bogus".to_string(),
            offset: 4,
        };
        let rendered = err.render("x < bogus");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "  x < bogus");
        assert_eq!(lines[2], "      ^");
    }

    #[test]
    fn internal_errors_are_flagged() {
        assert!(EvalError::StackUnderflow { pc: 0 }.is_internal());
        assert!(!EvalError::TypeMismatch("x".to_string()).is_internal());
    }
}
