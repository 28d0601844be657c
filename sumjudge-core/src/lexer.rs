//! Lexer for the literal notation LLM judges answer in
//!
//! Accepts both JSON and Python literal spellings: single- or double-quoted
//! strings (optionally triple-quoted), `True`/`False`/`None` alongside
//! `true`/`false`/`null`, and signed integers or floats.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,

    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,

    Eof,
}

impl TokenKind {
    /// Short human-readable name used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::String(s) => format!("string {:?}", s),
            TokenKind::Int(i) => format!("integer {}", i),
            TokenKind::Float(f) => format!("float {}", f),
            TokenKind::Bool(b) => format!("bool {}", b),
            TokenKind::Null => "null".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let line = self.line;
        let col = self.col;

        let Some(c) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, line, col));
        };

        let simple = match c {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };

        if let Some(kind) = simple {
            self.advance();
            return Ok(Token::new(kind, line, col));
        }

        if c == '"' || c == '\'' {
            return self.read_string(c, line, col);
        }

        let starts_number = c.is_ascii_digit()
            || (c == '.' && self.peek_char(1).is_some_and(|n| n.is_ascii_digit()))
            || ((c == '-' || c == '+')
                && self
                    .peek_char(1)
                    .is_some_and(|n| n.is_ascii_digit() || n == '.'));
        if starts_number {
            return self.read_number(line, col);
        }

        if c.is_alphabetic() || c == '_' {
            let word = self.read_word();
            let kind = match word.as_str() {
                "True" | "true" => TokenKind::Bool(true),
                "False" | "false" => TokenKind::Bool(false),
                "None" | "null" => TokenKind::Null,
                _ => {
                    return Err(Error::ParseError(format!(
                        "Unexpected identifier '{}' at {}:{}",
                        word, line, col
                    )))
                }
            };
            return Ok(Token::new(kind, line, col));
        }

        Err(Error::ParseError(format!(
            "Unexpected character {:?} at {}:{}",
            c, line, col
        )))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_string(&mut self, quote: char, line: usize, col: usize) -> Result<Token> {
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let is_triple = self.input[self.pos..].starts_with(&triple);
        let quote_len = if is_triple { 3 } else { 1 };
        for _ in 0..quote_len {
            self.advance();
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.current_char() else {
                return Err(Error::ParseError(format!(
                    "Unterminated string starting at {}:{}",
                    line, col
                )));
            };

            if c == quote && (!is_triple || self.input[self.pos..].starts_with(&triple)) {
                for _ in 0..quote_len {
                    self.advance();
                }
                return Ok(Token::new(TokenKind::String(value), line, col));
            }

            match c {
                '\n' if !is_triple => {
                    return Err(Error::ParseError(format!(
                        "Unterminated string starting at {}:{}",
                        line, col
                    )));
                }
                '\\' => {
                    self.advance();
                    self.read_escape(&mut value)?;
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_escape(&mut self, value: &mut String) -> Result<()> {
        let Some(escaped) = self.current_char() else {
            return Err(Error::UnexpectedEof);
        };
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            '0' => value.push('\0'),
            '"' | '\'' | '\\' | '/' => value.push(escaped),
            // Line continuation
            '\n' => {}
            'x' => {
                self.advance();
                let code = self.read_hex_digits(2, escaped)?;
                value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(());
            }
            'u' => {
                self.advance();
                let code = self.read_hex_digits(4, escaped)?;
                let ch = match code {
                    0xD800..=0xDBFF => self
                        .read_low_surrogate()
                        .and_then(|low| char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))),
                    _ => char::from_u32(code),
                };
                // Lone surrogates have no char; substitute rather than reject the literal
                value.push(ch.unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(());
            }
            // Unknown escapes keep the backslash
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        self.advance();
        Ok(())
    }

    fn read_hex_digits(&mut self, digits: usize, escaped: char) -> Result<u32> {
        let start = self.pos;
        for _ in 0..digits {
            match self.current_char() {
                Some(h) if h.is_ascii_hexdigit() => self.advance(),
                _ => {
                    return Err(Error::ParseError(format!(
                        "Invalid escape: expected {} hex digits after \\{}",
                        digits, escaped
                    )))
                }
            }
        }
        let hex = &self.input[start..self.pos];
        u32::from_str_radix(hex, 16)
            .map_err(|_| Error::ParseError(format!("Invalid escape: \\{}{}", escaped, hex)))
    }

    /// Consume a `\uDC00`-`\uDFFF` escape if one comes next.
    fn read_low_surrogate(&mut self) -> Option<u32> {
        let rest = self.input[self.pos..].strip_prefix("\\u")?;
        let hex = rest.get(..4)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let low = u32::from_str_radix(hex, 16).ok()?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        for _ in 0..6 {
            self.advance();
        }
        Some(low)
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<Token> {
        let start = self.pos;

        if matches!(self.current_char(), Some('-') | Some('+')) {
            self.advance();
        }

        let mut has_dot = false;
        let mut has_exp = false;
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else if c == '.' && !has_dot && !has_exp {
                has_dot = true;
                self.advance();
            } else if (c == 'e' || c == 'E') && !has_exp {
                has_exp = true;
                self.advance();
                if matches!(self.current_char(), Some('+') | Some('-')) {
                    self.advance();
                }
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let text = text.strip_prefix('+').unwrap_or(&text);

        if !has_dot && !has_exp {
            if let Ok(val) = text.parse::<i64>() {
                return Ok(Token::new(TokenKind::Int(val), line, col));
            }
        }

        // Integers beyond i64 degrade to floats rather than failing
        let val: f64 = text
            .parse()
            .map_err(|_| Error::ParseError(format!("Invalid number: {}", text)))?;
        Ok(Token::new(TokenKind::Float(val), line, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_punctuation() {
        let tokens = kinds("{ } [ ] ( ) : ,");
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[0], TokenKind::LBrace);
        assert_eq!(tokens[7], TokenKind::Comma);
        assert_eq!(tokens[8], TokenKind::Eof);
    }

    #[test]
    fn test_both_quote_styles() {
        let tokens = kinds(r#"'it\'s' "say \"hi\"""#);
        assert_eq!(tokens[0], TokenKind::String("it's".to_string()));
        assert_eq!(tokens[1], TokenKind::String("say \"hi\"".to_string()));
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let tokens = kinds("'''first\nsecond'''");
        assert_eq!(tokens[0], TokenKind::String("first\nsecond".to_string()));
    }

    #[test]
    fn test_raw_newline_in_string_is_an_error() {
        assert!(Lexer::new("'first\nsecond'").tokenize().is_err());
    }

    #[test]
    fn test_escapes() {
        let tokens = kinds(r#""a\nbé\x41\q""#);
        assert_eq!(tokens[0], TokenKind::String("a\nbéA\\q".to_string()));
    }

    #[test]
    fn test_surrogate_pair_escapes() {
        let tokens = kinds(r#""smile \ud83d\ude00" '\uD840\uDC0B'"#);
        assert_eq!(tokens[0], TokenKind::String("smile \u{1F600}".to_string()));
        assert_eq!(tokens[1], TokenKind::String("\u{2000B}".to_string()));
    }

    #[test]
    fn test_lone_surrogates_are_replaced() {
        let tokens = kinds(r#""a\ud83db" "\ude00" "\ud83d\u0041""#);
        assert_eq!(tokens[0], TokenKind::String("a\u{FFFD}b".to_string()));
        assert_eq!(tokens[1], TokenKind::String("\u{FFFD}".to_string()));
        assert_eq!(tokens[2], TokenKind::String("\u{FFFD}A".to_string()));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 -17 +3 2.5 .5 1e3 1_000 99999999999999999999");
        assert_eq!(tokens[0], TokenKind::Int(42));
        assert_eq!(tokens[1], TokenKind::Int(-17));
        assert_eq!(tokens[2], TokenKind::Int(3));
        assert_eq!(tokens[3], TokenKind::Float(2.5));
        assert_eq!(tokens[4], TokenKind::Float(0.5));
        assert_eq!(tokens[5], TokenKind::Float(1000.0));
        assert_eq!(tokens[6], TokenKind::Int(1000));
        assert!(matches!(tokens[7], TokenKind::Float(_)));
    }

    #[test]
    fn test_keywords_in_both_spellings() {
        let tokens = kinds("True false None null");
        assert_eq!(tokens[0], TokenKind::Bool(true));
        assert_eq!(tokens[1], TokenKind::Bool(false));
        assert_eq!(tokens[2], TokenKind::Null);
        assert_eq!(tokens[3], TokenKind::Null);
    }

    #[test]
    fn test_bare_words_are_rejected() {
        let err = Lexer::new("[yes]").tokenize().unwrap_err();
        assert!(err.to_string().contains("yes"));
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = Lexer::new("[\n  1]").tokenize().unwrap();
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
    }
}
