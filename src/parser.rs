use std::mem;

use crate::{
    ast::{CmpOp, Expr, LogicOp, SpannedToken, Token},
    error::{CompileError, ParseError},
    lexer::Lexer,
};

/// Deepest nesting of parentheses, `!` and chained comparisons accepted by
/// the parser.
///
/// Flat `&&`/`||` chains do not count towards it, so a generated list such as
/// `index == 1 || index == 2 || ...` may have any length.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive-descent parser over a lazily lexed token stream.
///
/// Holds exactly one token of lookahead. The first lexical or syntactic
/// error ends parsing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: SpannedToken,
    previous: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, CompileError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            previous: None,
            depth: 0,
        })
    }

    /// Move to the next token, returning the one just consumed.
    fn advance(&mut self) -> Result<SpannedToken, CompileError> {
        let next = self.lexer.next_token()?;
        let consumed = mem::replace(&mut self.current, next);
        self.previous = Some(consumed.token.clone());
        Ok(consumed)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        ParseError {
            offset: self.current.offset,
            message: message.into(),
        }
        .into()
    }

    /// Go one level deeper, failing at the current token past the limit.
    fn enter(&mut self) -> Result<(), CompileError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "expression nested too deeply (more than {} levels)",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn missing_operand(&self) -> CompileError {
        match &self.previous {
            Some(prev) => self.error(format!(
                "expected an operand after {}, found {}",
                prev, self.current.token
            )),
            None => self.error(format!("expected an operand, found {}", self.current.token)),
        }
    }

    /// Parse primary expressions: literals, identifiers, `all` and groups
    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        if self.check(&Token::LParen) {
            self.enter()?;
            let open = self.advance()?;
            let expr = self.parse_or()?;
            if !self.check(&Token::RParen) {
                return Err(self.error(format!(
                    "expected ')' to close '(' at offset {}, found {}",
                    open.offset, self.current.token
                )));
            }
            self.advance()?;
            self.leave(1);
            return Ok(expr);
        }

        let SpannedToken { token, offset } = match self.current.token {
            Token::Number(_) | Token::String(_) | Token::Identifier(_) | Token::All => {
                self.advance()?
            }
            _ => return Err(self.missing_operand()),
        };
        Ok(match token {
            Token::Number(n) => Expr::Number(n),
            Token::String(s) => Expr::Text(s),
            Token::Identifier(name) => Expr::Field { name, offset },
            _ => Expr::All,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.check(&Token::Exclamation) {
            self.enter()?;
            let bang = self.advance()?;
            let operand = self.parse_unary()?;
            self.leave(1);
            return Ok(Expr::Not {
                operand: Box::new(operand),
                offset: bang.offset,
            });
        }
        self.parse_primary()
    }

    fn parse_relation(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary()?;

        // Each comparison wraps the ones before it.
        let mut chained = 0;
        while self.current.token.is_relational() {
            self.enter()?;
            chained += 1;
            let SpannedToken { token, offset } = self.advance()?;

            left = match token {
                Token::Match | Token::NotMatch => {
                    let pattern_offset = self.current.offset;
                    let pattern = match &self.current.token {
                        Token::String(s) => {
                            let pattern = s.clone();
                            self.advance()?;
                            pattern
                        }
                        _ => {
                            return Err(self.error(format!(
                                "expected a string pattern after {}, found {}",
                                token, self.current.token
                            )));
                        }
                    };
                    Expr::Match {
                        subject: Box::new(left),
                        pattern,
                        negate: token == Token::NotMatch,
                        offset,
                        pattern_offset,
                    }
                }
                op => {
                    let op = match op {
                        Token::EqEq => CmpOp::Equal,
                        Token::NotEq => CmpOp::NotEqual,
                        Token::Lt => CmpOp::LessThan,
                        Token::Gt => CmpOp::GreaterThan,
                        Token::LtEq => CmpOp::LessEqual,
                        Token::GtEq => CmpOp::GreaterEqual,
                        _ => unreachable!(),
                    };
                    let right = self.parse_unary()?;
                    Expr::Compare {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                        offset,
                    }
                }
            };
        }
        self.leave(chained);
        Ok(left)
    }

    /// Collect a flat run of operands joined by `op`.
    fn parse_chain(
        &mut self,
        op: LogicOp,
        separator: &Token,
        mut operand: impl FnMut(&mut Self) -> Result<Expr, CompileError>,
    ) -> Result<Expr, CompileError> {
        let first = operand(self)?;
        if !self.check(separator) {
            return Ok(first);
        }

        let mut operands = vec![first];
        let mut offsets = Vec::new();
        while self.check(separator) {
            offsets.push(self.advance()?.offset);
            operands.push(operand(self)?);
        }
        Ok(Expr::Logical {
            op,
            operands,
            offsets,
        })
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        self.parse_chain(LogicOp::And, &Token::AndAnd, Self::parse_relation)
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        self.parse_chain(LogicOp::Or, &Token::OrOr, Self::parse_and)
    }

    /// Parse a complete selection; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Expr, CompileError> {
        let expr = self.parse_or()?;
        if !self.check(&Token::Eof) {
            return Err(self.error(format!(
                "unexpected {} after end of expression",
                self.current.token
            )));
        }
        Ok(expr)
    }
}

/// Parse an expression string into an unchecked tree.
pub fn parse(input: &str) -> Result<Expr, CompileError> {
    Parser::new(Lexer::new(input))?.parse()
}
