//! Key-fact alignment judge output
//!
//! The judge answers with a list of
//! `{"key fact", "response": "Yes"|"No", "line number": [..]}` records.
//! Code fences are dropped, the list is bounded by a balanced bracket match
//! starting at the first `[`, and any decoding problem yields an empty
//! [`Provenance::Failed`] result. There is no heuristic tier.

use std::collections::BTreeSet;

use crate::extract::{balanced_span, strip_code_fences};
use crate::literal::Literal;
use crate::{AlignmentResult, Error, Parsed, Provenance, Result};

const RESPONSE_KEY: &str = "response";
const LINE_NUMBER_KEY: &str = "line number";

/// Decode an alignment response. Never fails; an unusable response comes
/// back empty with [`Provenance::Failed`].
pub fn parse_alignment(raw: &str) -> Parsed<AlignmentResult> {
    match try_parse_alignment(raw) {
        Ok(result) if result.is_success() => Parsed::new(result, Provenance::Exact),
        _ => Parsed::failed(),
    }
}

fn try_parse_alignment(raw: &str) -> Result<AlignmentResult> {
    let text = strip_code_fences(raw);
    let span = balanced_span(&text, '[', ']').ok_or(Error::NoPayload("no '[' in response"))?;
    let value = Literal::parse(span)?;
    let records = value.as_list().ok_or_else(|| Error::TypeMismatch {
        field: "payload".to_string(),
        expected: "a list of records",
    })?;

    let mut labels = Vec::with_capacity(records.len());
    let mut matched_lines = BTreeSet::new();

    for record in records {
        let response = record.str_field(RESPONSE_KEY)?;
        labels.push(if response.to_lowercase() == "yes" { 1 } else { 0 });

        if let Some(lines) = record.get(LINE_NUMBER_KEY) {
            let lines = lines.as_list().ok_or_else(|| Error::TypeMismatch {
                field: LINE_NUMBER_KEY.to_string(),
                expected: "a list",
            })?;
            for line in lines {
                matched_lines.insert(coerce_line_number(line)?);
            }
        }
    }

    Ok(AlignmentResult {
        labels,
        matched_lines,
    })
}

/// Coerce a cited line to an integer.
///
/// Strings lose stray brackets first (`"[2]"` -> 2), floats truncate and
/// booleans count as 0 or 1. The value is not range-checked: zero, negative
/// and past-the-end citations are kept so they show up in conciseness.
pub fn coerce_line_number(value: &Literal) -> Result<i64> {
    match value {
        Literal::Int(i) => Ok(*i),
        Literal::Bool(b) => Ok(i64::from(*b)),
        Literal::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Literal::Str(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '[' | ']')).collect();
            cleaned
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::ParseError(format!("Invalid line number: {:?}", s)))
        }
        other => Err(Error::TypeMismatch {
            field: format!("line number ({})", other.type_name()),
            expected: "an integer",
        }),
    }
}
