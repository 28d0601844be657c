//! Recursive-descent parser for judge literals

use indexmap::IndexMap;

use crate::lexer::{Token, TokenKind};
use crate::literal::Literal;
use crate::{Error, Result};

/// Nesting deeper than this is rejected instead of risking the stack.
const MAX_DEPTH: usize = 64;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let (line, col) = tokens.last().map(|t| (t.line, t.col)).unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, line, col));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse exactly one literal followed by end of input.
    pub fn parse(&mut self) -> Result<Literal> {
        let value = self.parse_value()?;
        if !self.at_end() {
            let tok = self.current();
            return Err(Error::UnexpectedToken {
                expected: "end of input".to_string(),
                got: tok.kind.describe(),
                line: tok.line,
                col: tok.col,
            });
        }
        Ok(value)
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn parse_value(&mut self) -> Result<Literal> {
        let kind = self.current_kind().clone();
        match kind {
            TokenKind::String(_) => Ok(Literal::Str(self.parse_string()?)),
            TokenKind::Int(i) => {
                self.advance();
                Ok(Literal::Int(i))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Literal::Float(f))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Literal::Bool(b))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Literal::Null)
            }
            TokenKind::LBracket => self.nested(|p| p.parse_sequence(TokenKind::RBracket)),
            TokenKind::LParen => self.nested(|p| p.parse_sequence(TokenKind::RParen)),
            TokenKind::LBrace => self.nested(Self::parse_braced),
            TokenKind::Eof => Err(Error::UnexpectedEof),
            other => {
                let tok = self.current();
                Err(Error::UnexpectedToken {
                    expected: "a value".to_string(),
                    got: other.describe(),
                    line: tok.line,
                    col: tok.col,
                })
            }
        }
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Result<Literal>) -> Result<Literal> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::ParseError(format!(
                "Nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Adjacent string literals concatenate.
    fn parse_string(&mut self) -> Result<String> {
        let mut out = String::new();
        while let TokenKind::String(s) = self.current_kind() {
            out.push_str(s);
            self.advance();
        }
        Ok(out)
    }

    /// `[a, b, ...]` or `(a, b, ...)`; trailing comma allowed.
    fn parse_sequence(&mut self, close: TokenKind) -> Result<Literal> {
        self.advance();
        let mut items = Vec::new();
        while !self.check(&close) {
            items.push(self.parse_value()?);
            if !self.eat_comma() {
                break;
            }
        }
        self.expect(close)?;
        Ok(Literal::List(items))
    }

    /// `{k: v, ...}` as a dict, `{a, b}` as a set, `{}` as an empty dict.
    fn parse_braced(&mut self) -> Result<Literal> {
        self.advance();
        if self.check(&TokenKind::RBrace) {
            self.advance();
            return Ok(Literal::Dict(IndexMap::new()));
        }

        let first = self.parse_value()?;
        if self.check(&TokenKind::Colon) {
            self.parse_dict_rest(first)
        } else {
            let mut items = vec![first];
            while self.eat_comma() && !self.check(&TokenKind::RBrace) {
                items.push(self.parse_value()?);
            }
            self.expect(TokenKind::RBrace)?;
            Ok(Literal::List(items))
        }
    }

    fn parse_dict_rest(&mut self, first_key: Literal) -> Result<Literal> {
        let mut map = IndexMap::new();
        let mut key = first_key;
        loop {
            let key_str = match key {
                Literal::Str(s) => s,
                other => {
                    return Err(Error::ParseError(format!(
                        "Dict keys must be strings, got {}",
                        other.type_name()
                    )))
                }
            };
            self.expect(TokenKind::Colon)?;
            let value = self.parse_value()?;
            map.insert(key_str, value);

            if !self.eat_comma() || self.check(&TokenKind::RBrace) {
                break;
            }
            key = self.parse_value()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Literal::Dict(map))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn current(&self) -> &Token {
        // The token stream always ends with Eof and we never advance past it
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat_comma(&mut self) -> bool {
        if self.check(&TokenKind::Comma) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<()> {
        if self.check(&expected) {
            self.advance();
            return Ok(());
        }
        let tok = self.current();
        if matches!(tok.kind, TokenKind::Eof) {
            return Err(Error::UnexpectedEof);
        }
        Err(Error::UnexpectedToken {
            expected: expected.describe(),
            got: tok.kind.describe(),
            line: tok.line,
            col: tok.col,
        })
    }
}
