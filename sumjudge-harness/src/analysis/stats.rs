//! Descriptive statistics over saved raw-output files

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sumjudge::{completeness_score, conciseness_score, faithfulness_score};

use crate::records::{load_jsonl_lenient, LoadError};

/// Fact-checking row as read back from `raw-data.jsonl`. Rows missing a
/// required field are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct FaithfulnessRow {
    pub doc_id: Option<String>,
    pub pred_faithfulness_labels: Option<Vec<u8>>,
    pub pred_faithfulness_error_type: Option<Vec<String>>,
}

/// Alignment row as read back from `raw-data.jsonl`
#[derive(Debug, Clone, Deserialize)]
pub struct AlignmentRow {
    pub doc_id: Option<String>,
    pub pred_alignment_labels: Option<Vec<u8>>,
    pub pred_sentence_line_numbers: Option<Vec<i64>>,
    pub sentences: Option<Vec<String>>,
}

/// Scores of one document; a metric is absent when its input was unusable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentScores {
    pub faithfulness: Option<f64>,
    pub completeness: Option<f64>,
    pub conciseness: Option<f64>,
}

/// Mean, median, mode and population standard deviation, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralTendency {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std_dev: f64,
}

impl CentralTendency {
    /// `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean,
            median,
            mode: mode(&sorted),
            std_dev: variance.sqrt(),
        })
    }
}

/// Most frequent value of a sorted sample; ties go to the smallest value.
fn mode(sorted: &[f64]) -> f64 {
    let mut best = (sorted[0], 0usize);
    let mut run = (sorted[0], 0usize);
    for &value in sorted {
        if value == run.0 {
            run.1 += 1;
        } else {
            run = (value, 1);
        }
        if run.1 > best.1 {
            best = run;
        }
    }
    best.0
}

/// Everything the `stats` command reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub documents: IndexMap<String, DocumentScores>,
    pub faithfulness: Option<CentralTendency>,
    pub completeness: Option<CentralTendency>,
    pub conciseness: Option<CentralTendency>,
    /// Every predicted category across all fact-checked documents, in
    /// first-seen order
    pub error_types: IndexMap<String, usize>,
}

/// Per-document scores keyed by `doc_id`, in first-seen order.
///
/// Documents with empty labels are skipped; conciseness also needs cited
/// lines and a non-empty summary.
pub fn document_scores(
    faithfulness: &[FaithfulnessRow],
    alignment: &[AlignmentRow],
) -> IndexMap<String, DocumentScores> {
    let mut scores: IndexMap<String, DocumentScores> = IndexMap::new();

    for row in faithfulness {
        let (Some(doc_id), Some(labels)) = (&row.doc_id, &row.pred_faithfulness_labels) else {
            continue;
        };
        if !labels.is_empty() {
            scores.entry(doc_id.clone()).or_default().faithfulness =
                Some(faithfulness_score(labels));
        }
    }

    for row in alignment {
        let Some(doc_id) = &row.doc_id else {
            continue;
        };
        let entry = scores.entry(doc_id.clone()).or_default();
        if let Some(labels) = row.pred_alignment_labels.as_deref().filter(|l| !l.is_empty()) {
            entry.completeness = Some(completeness_score(labels));
        }
        if let (Some(lines), Some(sentences)) = (&row.pred_sentence_line_numbers, &row.sentences) {
            if !lines.is_empty() && !sentences.is_empty() {
                let distinct: BTreeSet<i64> = lines.iter().copied().collect();
                entry.conciseness = Some(conciseness_score(&distinct, sentences.len()));
            }
        }
    }

    scores
}

impl StatsReport {
    pub fn compute(faithfulness: &[FaithfulnessRow], alignment: &[AlignmentRow]) -> Self {
        let documents = document_scores(faithfulness, alignment);
        let tendency = |pick: fn(&DocumentScores) -> Option<f64>| {
            let values: Vec<f64> = documents.values().filter_map(pick).map(|v| v * 100.0).collect();
            CentralTendency::from_values(&values)
        };

        let mut error_types = IndexMap::new();
        for row in faithfulness {
            for error_type in row.pred_faithfulness_error_type.iter().flatten() {
                *error_types.entry(error_type.clone()).or_insert(0) += 1;
            }
        }

        Self {
            faithfulness: tendency(|s| s.faithfulness),
            completeness: tendency(|s| s.completeness),
            conciseness: tendency(|s| s.conciseness),
            documents,
            error_types,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Central Tendency Statistics:\n");
        for (metric, stats) in [
            ("Faithfulness", &self.faithfulness),
            ("Completeness", &self.completeness),
            ("Conciseness", &self.conciseness),
        ] {
            match stats {
                Some(s) => {
                    let _ = write!(
                        out,
                        "{}:\n  Mean: {:.2}%\n  Median: {:.2}%\n  Mode: {:.2}%\n  Std Dev: {:.2}%\n",
                        metric, s.mean, s.median, s.mode, s.std_dev
                    );
                }
                None => {
                    let _ = writeln!(out, "{}: No data available", metric);
                }
            }
        }

        out.push_str("\nError Type Breakdown:\n");
        if self.error_types.is_empty() {
            out.push_str("  No data available\n");
        }
        for (error_type, count) in &self.error_types {
            let _ = writeln!(out, "  {}: {}", error_type, count);
        }
        out
    }
}

/// Load raw-output rows, skipping (with a warning) rows that lack the
/// fields `stats` needs or hold them with the wrong type. A missing file
/// yields no rows.
pub fn load_faithfulness_rows(path: &Path) -> Result<Vec<FaithfulnessRow>, LoadError> {
    load_rows(path, "faithfulness", |row: &FaithfulnessRow| {
        row.doc_id.is_some()
            && row.pred_faithfulness_labels.is_some()
            && row.pred_faithfulness_error_type.is_some()
    })
}

pub fn load_alignment_rows(path: &Path) -> Result<Vec<AlignmentRow>, LoadError> {
    load_rows(path, "alignment", |row: &AlignmentRow| {
        row.doc_id.is_some()
            && row.pred_alignment_labels.is_some()
            && row.pred_sentence_line_numbers.is_some()
            && row.sentences.is_some()
    })
}

trait DocRow {
    fn doc_id(&self) -> Option<&str>;
}

impl DocRow for FaithfulnessRow {
    fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }
}

impl DocRow for AlignmentRow {
    fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }
}

fn load_rows<T: DeserializeOwned + DocRow>(
    path: &Path,
    kind: &str,
    is_valid: impl Fn(&T) -> bool,
) -> Result<Vec<T>, LoadError> {
    if !path.exists() {
        tracing::warn!("{} not found, skipping {} data", path.display(), kind);
        return Ok(Vec::new());
    }
    let rows: Vec<T> = load_jsonl_lenient(path)?;
    Ok(rows
        .into_iter()
        .filter(|row| {
            let valid = is_valid(row);
            if !valid {
                tracing::warn!(
                    "Skipping invalid {} entry for doc_id {}",
                    kind,
                    row.doc_id().unwrap_or("unknown")
                );
            }
            valid
        })
        .collect())
}
