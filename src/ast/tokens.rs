use std::fmt;

/// A token together with the byte offset where it starts in the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, always read as a double
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1.5
    /// 2.5e-3
    /// ```
    Number(f64),

    /// String literal enclosed in single or double quotes
    ///
    /// No escape processing: the content is taken verbatim up to the
    /// matching quote.
    ///
    /// # Examples
    /// ```text
    /// 'CA'
    /// "^(C|O|N|CA)$"
    /// ```
    String(String),

    // Identifiers
    /// Field name or derived predicate
    ///
    /// Must start with an ASCII letter or underscore, followed by ASCII
    /// letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// resname
    /// bfactor
    /// hydrogen
    /// ```
    Identifier(String),

    /// The `all` keyword (case-sensitive)
    All,

    // Relational
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Regular expression match (`=~`)
    ///
    /// # Examples
    /// ```text
    /// name =~ "^H"
    /// ```
    Match,

    /// Negated regular expression match (`!~`)
    NotMatch,

    // Logical
    /// Logical AND
    ///
    /// # Examples
    /// ```text
    /// resid >= 10 && resid <= 20
    /// ```
    AndAnd,

    /// Logical OR
    ///
    /// # Examples
    /// ```text
    /// segid == "HEME" || segid == "PROT"
    /// ```
    OrOr,

    /// Logical negation prefix
    ///
    /// # Examples
    /// ```text
    /// !hydrogen
    /// !(resname == "WAT")
    /// ```
    Exclamation,

    // Delimiters
    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}

impl Token {
    /// Whether this token can start a relational operator.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Token::EqEq
                | Token::NotEq
                | Token::Lt
                | Token::Gt
                | Token::LtEq
                | Token::GtEq
                | Token::Match
                | Token::NotMatch
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::String(s) => write!(f, "string '{}'", s),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::All => write!(f, "'all'"),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::Match => write!(f, "'=~'"),
            Token::NotMatch => write!(f, "'!~'"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::OrOr => write!(f, "'||'"),
            Token::Exclamation => write!(f, "'!'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
