use crate::ast::{SpannedToken, Token};
use crate::error::LexError;

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn current_byte(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.position + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.current_byte().is_some_and(|b| b.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn error_at(&self, offset: usize, found: String) -> LexError {
        LexError { offset, found }
    }

    fn unexpected_char(&self) -> LexError {
        let ch = self.input[self.position..].chars().next().unwrap_or('\0');
        self.error_at(self.position, format!("character '{}'", ch))
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.position;
        while self
            .current_byte()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.position += 1;
        }
        &self.input[start..self.position]
    }

    fn read_string(&mut self, quote: u8) -> Result<Token, LexError> {
        let start = self.position;
        self.position += 1; // opening quote

        match self.bytes[self.position..].iter().position(|&b| b == quote) {
            Some(len) => {
                let content = &self.input[self.position..self.position + len];
                self.position += len + 1;
                Ok(Token::String(content.to_string()))
            }
            None => Err(self.error_at(
                start,
                format!("unterminated string starting with {}", quote as char),
            )),
        }
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.position;
        while self.current_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        self.position - start
    }

    /// `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least one
    /// mantissa digit.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;

        if matches!(self.current_byte(), Some(b'+' | b'-')) {
            self.position += 1;
        }

        let mut digits = self.consume_digits();
        if self.current_byte() == Some(b'.') {
            self.position += 1;
            digits += self.consume_digits();
        }
        if digits == 0 {
            self.position = start;
            return Err(self.unexpected_char());
        }

        // Only take the exponent if it is well formed, otherwise leave the
        // 'e' for the next token.
        if matches!(self.current_byte(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_byte(1), Some(b'+' | b'-')));
            if self.peek_byte(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                self.position += 1 + sign;
                self.consume_digits();
            }
        }

        let text = &self.input[start..self.position];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.error_at(start, format!("number '{}'", text)))
    }

    /// Consume a two-byte operator if the next byte matches.
    fn two_or_one(&mut self, second: u8, double: Token, single: Token) -> Token {
        if self.peek_byte(1) == Some(second) {
            self.position += 2;
            double
        } else {
            self.position += 1;
            single
        }
    }

    fn starts_number(&self) -> bool {
        match self.current_byte() {
            Some(b) if b.is_ascii_digit() => true,
            Some(b'.') => self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()),
            Some(b'+' | b'-') => match self.peek_byte(1) {
                Some(b) if b.is_ascii_digit() => true,
                Some(b'.') => self.peek_byte(2).is_some_and(|b| b.is_ascii_digit()),
                _ => false,
            },
            _ => false,
        }
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_whitespace();
        let offset = self.position;

        let token = match self.current_byte() {
            None => Token::Eof,
            Some(b'(') => {
                self.position += 1;
                Token::LParen
            }
            Some(b')') => {
                self.position += 1;
                Token::RParen
            }
            Some(b'=') => match self.peek_byte(1) {
                Some(b'=') => {
                    self.position += 2;
                    Token::EqEq
                }
                Some(b'~') => {
                    self.position += 2;
                    Token::Match
                }
                _ => return Err(self.unexpected_char()),
            },
            Some(b'!') => match self.peek_byte(1) {
                Some(b'=') => {
                    self.position += 2;
                    Token::NotEq
                }
                Some(b'~') => {
                    self.position += 2;
                    Token::NotMatch
                }
                _ => {
                    self.position += 1;
                    Token::Exclamation
                }
            },
            Some(b'<') => self.two_or_one(b'=', Token::LtEq, Token::Lt),
            Some(b'>') => self.two_or_one(b'=', Token::GtEq, Token::Gt),
            Some(b'&') if self.peek_byte(1) == Some(b'&') => {
                self.position += 2;
                Token::AndAnd
            }
            Some(b'|') if self.peek_byte(1) == Some(b'|') => {
                self.position += 2;
                Token::OrOr
            }
            Some(q @ (b'"' | b'\'')) => self.read_string(q)?,
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => match self.read_identifier() {
                "all" => Token::All,
                ident => Token::Identifier(ident.to_string()),
            },
            Some(_) if self.starts_number() => self.read_number()?,
            Some(_) => return Err(self.unexpected_char()),
        };

        Ok(SpannedToken { token, offset })
    }

    /// Read every token up to and including [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Tokenize a whole expression.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, LexError> {
    Lexer::new(input).tokenize()
}
