//! Core types for sumjudge

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Expected {expected}, got {got} at {line}:{col}")]
    UnexpectedToken {
        expected: String,
        got: String,
        line: usize,
        col: usize,
    },

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Field {field} must be {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("No payload found: {0}")]
    NoPayload(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Fact-checking error categories, in the order the heuristic tier scans them.
pub const ERROR_TYPES: [&str; 8] = [
    "out-of-context error",
    "entity error",
    "predicate error",
    "circumstantial error",
    "grammatical error",
    "coreference error",
    "linking error",
    "other error",
];

/// Sentinel category for a sentence without a factuality error.
pub const NO_ERROR: &str = "no error";

/// Every category a report pre-seeds: the eight error types, then `no error`.
pub fn all_categories() -> impl Iterator<Item = &'static str> {
    ERROR_TYPES.iter().copied().chain(std::iter::once(NO_ERROR))
}

// =============================================================================
// Parse Results
// =============================================================================

/// Which decoding tier produced a parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Strict parse of the full record array.
    Exact,
    /// Strict parse of a single record object (no array present).
    SingleRecord,
    /// Lossy keyword scan; counts may not match the real sentence count.
    Heuristic,
    /// Nothing usable was recovered.
    Failed,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Exact => "exact",
            Provenance::SingleRecord => "single_record",
            Provenance::Heuristic => "heuristic",
            Provenance::Failed => "failed",
        }
    }

    /// True for tiers that decoded the response structure rather than guessing.
    pub fn is_structured(&self) -> bool {
        matches!(self, Provenance::Exact | Provenance::SingleRecord)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse result tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Parsed<T> {
    pub fn new(value: T, provenance: Provenance) -> Self {
        Self { value, provenance }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Default> Parsed<T> {
    pub fn failed() -> Self {
        Self::new(T::default(), Provenance::Failed)
    }
}

/// Per-sentence verdicts from the fact-checking judge.
///
/// `labels[i]` is 1 when `error_types[i]` is anything other than `no error`.
/// Both vectors are empty when parsing failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub labels: Vec<u8>,
    pub error_types: Vec<String>,
}

impl FactCheckResult {
    pub fn push(&mut self, category: String) {
        let label = if category.to_lowercase() == NO_ERROR { 0 } else { 1 };
        self.labels.push(label);
        self.error_types.push(category);
    }

    pub fn is_success(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Faithfulness of this summary, or `None` if parsing failed.
    pub fn faithfulness(&self) -> Option<f64> {
        self.is_success()
            .then(|| crate::score::faithfulness_score(&self.labels))
    }
}

/// Per-key-fact verdicts from the alignment judge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub labels: Vec<u8>,
    /// Summary line numbers cited by any record, as the judge wrote them.
    /// Lines are meant to be 1-based, but zero, negative and out-of-range
    /// citations are kept.
    pub matched_lines: BTreeSet<i64>,
}

impl AlignmentResult {
    pub fn is_success(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn completeness(&self) -> Option<f64> {
        self.is_success()
            .then(|| crate::score::completeness_score(&self.labels))
    }

    /// Conciseness against a summary of `num_sentences` sentences.
    ///
    /// `None` if parsing failed or the summary has no sentences.
    pub fn conciseness(&self, num_sentences: usize) -> Option<f64> {
        (self.is_success() && num_sentences > 0)
            .then(|| crate::score::conciseness_score(&self.matched_lines, num_sentences))
    }
}
