use std::fmt;

/// The static type of a selection sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Boolean,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value on the evaluator's operand stack.
///
/// Text borrows from either the atom being evaluated or the program's
/// literal pool, so pushing a value never allocates.
///
/// # Examples
///
/// ```
/// use atomsel::{Value, ValueKind};
///
/// let resid = Value::Number(12.0);
/// let name = Value::Text("CA");
///
/// assert_eq!(resid.kind(), ValueKind::Number);
/// assert_eq!(name.as_text(), Some("CA"));
/// assert_eq!(Value::Boolean(true).as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Integer and floating-point fields alike
    Number(f64),

    /// Borrowed UTF-8 string
    Text(&'a str),

    /// Result of a comparison or derived predicate
    Boolean(bool),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Boolean(_) => ValueKind::Boolean,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// An owned literal stored in a compiled program.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(Box<str>),
}

impl Literal {
    pub fn kind(&self) -> ValueKind {
        match self {
            Literal::Number(_) => ValueKind::Number,
            Literal::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::Number(n) => Value::Number(*n),
            Literal::Text(s) => Value::Text(s),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_value().fmt(f)
    }
}
