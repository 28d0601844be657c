//! Fact-checking judge output
//!
//! The judge is asked for a list of `{"sentence", "reason", "category"}`
//! records, one per summary sentence. Decoding escalates through three
//! tiers:
//!
//! 1. the span from the first `[` to the first `]`, parsed as a list of
//!    records ([`Provenance::Exact`]);
//! 2. when the text has no `[`, the first `{...}` span as one record
//!    ([`Provenance::SingleRecord`]);
//! 3. when either of those fails, a keyword scan over the chunks that follow
//!    each occurrence of `category` ([`Provenance::Heuristic`]).
//!
//! Only when the scan finds no `category` marker at all is the result empty
//! ([`Provenance::Failed`]).

use crate::extract::{first_brace_span, first_bracket_span};
use crate::literal::Literal;
use crate::{Error, FactCheckResult, Parsed, Provenance, Result, ERROR_TYPES, NO_ERROR};

const CATEGORY_KEY: &str = "category";

/// Decode a fact-checking response. Never fails; see the module docs.
pub fn parse_fact_check(raw: &str) -> Parsed<FactCheckResult> {
    match parse_structured(raw) {
        Ok(parsed) if parsed.value.is_success() => parsed,
        // An empty record list is as good as no answer
        Ok(_) => Parsed::failed(),
        Err(_) => parse_heuristic(raw),
    }
}

/// Strip the bracket and newline noise judges leave around category names.
pub fn sanitize_category(category: &str) -> String {
    category
        .chars()
        .filter(|c| !matches!(c, '\n' | '[' | ']'))
        .collect()
}

fn parse_structured(raw: &str) -> Result<Parsed<FactCheckResult>> {
    let mut result = FactCheckResult::default();

    if let Some(span) = first_bracket_span(raw) {
        let payload = span.replace('\n', "");
        let value = Literal::parse(&payload)?;
        let records = value.as_list().ok_or_else(|| Error::TypeMismatch {
            field: "payload".to_string(),
            expected: "a list of records",
        })?;
        for record in records {
            result.push(sanitize_category(record.str_field(CATEGORY_KEY)?));
        }
        return Ok(Parsed::new(result, Provenance::Exact));
    }

    let record = Literal::parse(first_brace_span(raw))?;
    result.push(sanitize_category(record.str_field(CATEGORY_KEY)?));
    Ok(Parsed::new(result, Provenance::SingleRecord))
}

/// Lossy tier: each chunk after a `category` marker is classified by the
/// first error type it mentions. Matching is case-sensitive. Text before the
/// first marker is never a verdict and is skipped.
fn parse_heuristic(raw: &str) -> Parsed<FactCheckResult> {
    let mut result = FactCheckResult::default();

    for chunk in raw.split(CATEGORY_KEY).skip(1) {
        let category = ERROR_TYPES
            .iter()
            .find(|error_type| chunk.contains(*error_type))
            .copied()
            .unwrap_or(NO_ERROR);
        result.push(category.to_string());
    }

    if result.is_success() {
        Parsed::new(result, Provenance::Heuristic)
    } else {
        Parsed::failed()
    }
}
