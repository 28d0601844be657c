//! Key-fact list output

use std::sync::OnceLock;

use regex::Regex;

use crate::literal::Literal;
use crate::{Parsed, Provenance};

fn string_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?s)\[\s*".*?"\s*\]"#).unwrap())
}

/// Decode a key-fact extraction response: the first list of double-quoted
/// strings in the text. Anything else comes back empty and `Failed`.
pub fn parse_key_facts(raw: &str) -> Parsed<Vec<String>> {
    let Some(found) = string_list_pattern().find(raw) else {
        return Parsed::failed();
    };

    let facts = Literal::parse(found.as_str()).ok().and_then(|value| {
        value
            .as_list()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });

    match facts {
        Some(facts) if !facts.is_empty() => Parsed::new(facts, Provenance::Exact),
        _ => Parsed::failed(),
    }
}
