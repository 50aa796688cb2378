use std::fmt;

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Equal (`==`), tolerant for numbers
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl CmpOp {
    /// Ordering operators only make sense between numbers or between strings.
    pub fn is_ordering(self) -> bool {
        !matches!(self, CmpOp::Equal | CmpOp::NotEqual)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Equal => "==",
            CmpOp::NotEqual => "!=",
            CmpOp::LessThan => "<",
            CmpOp::GreaterThan => ">",
            CmpOp::LessEqual => "<=",
            CmpOp::GreaterEqual => ">=",
        }
    }
}

/// Binary logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

impl LogicOp {
    /// The left-operand value that already decides the result.
    pub fn deciding_value(self) -> bool {
        match self {
            LogicOp::And => false,
            LogicOp::Or => true,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
