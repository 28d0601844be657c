//! Summary-level scores
//!
//! All three functions require non-empty input and panic otherwise. Check
//! the parse result first; [`FactCheckResult::faithfulness`] and friends do
//! that and return `None` instead.
//!
//! [`FactCheckResult::faithfulness`]: crate::FactCheckResult::faithfulness

use std::collections::BTreeSet;

/// `1 - errors / sentences`. 1.0 means no sentence was flagged.
///
/// # Panics
///
/// If `labels` is empty.
pub fn faithfulness_score(labels: &[u8]) -> f64 {
    assert!(!labels.is_empty(), "faithfulness of an empty label set");
    1.0 - label_sum(labels) / labels.len() as f64
}

/// `inferred key facts / key facts`.
///
/// # Panics
///
/// If `labels` is empty.
pub fn completeness_score(labels: &[u8]) -> f64 {
    assert!(!labels.is_empty(), "completeness of an empty label set");
    label_sum(labels) / labels.len() as f64
}

/// `distinct cited lines / summary sentences`.
///
/// Not clamped: citations of lines past the end of the summary push the
/// score above 1.0, which marks a judge that referenced lines it was never
/// shown.
///
/// # Panics
///
/// If `num_sentences` is zero.
pub fn conciseness_score(matched_lines: &BTreeSet<i64>, num_sentences: usize) -> f64 {
    assert!(num_sentences > 0, "conciseness of an empty summary");
    matched_lines.len() as f64 / num_sentences as f64
}

fn label_sum(labels: &[u8]) -> f64 {
    labels.iter().map(|l| f64::from(*l)).sum()
}
