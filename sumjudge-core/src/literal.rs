//! Decoded literal values

use indexmap::IndexMap;

use crate::{Error, Result};

/// A value decoded from judge output.
///
/// Tuples and sets decode to `List`; dict key order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Dict(IndexMap<String, Literal>),
}

impl Literal {
    /// Parse a complete literal; trailing content is an error.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = crate::Lexer::new(input).tokenize()?;
        crate::Parser::new(tokens).parse()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "string",
            Literal::List(_) => "list",
            Literal::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Literal>> {
        match self {
            Literal::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Literal> {
        self.as_dict().and_then(|map| map.get(key))
    }

    /// Look up a required string field of a dict record.
    pub fn str_field(&self, key: &str) -> Result<&str> {
        let record = self.as_dict().ok_or_else(|| Error::TypeMismatch {
            field: "record".to_string(),
            expected: "a dict",
        })?;
        let value = record
            .get(key)
            .ok_or_else(|| Error::MissingField(key.to_string()))?;
        value.as_str().ok_or_else(|| Error::TypeMismatch {
            field: key.to_string(),
            expected: "a string",
        })
    }
}
