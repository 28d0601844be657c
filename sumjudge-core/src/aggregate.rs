//! Per-model accumulation of document scores over one evaluation run

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{all_categories, AlignmentResult, FactCheckResult};

/// Scores gathered for one summarization model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAggregate {
    pub faithfulness_scores: Vec<f64>,
    /// Every sentence label of every scored document, pooled.
    pub binary_labels: Vec<u8>,
    pub completeness_scores: Vec<f64>,
    pub conciseness_scores: Vec<f64>,
    /// Category occurrences; the nine known categories start at zero.
    pub error_type_counts: IndexMap<String, usize>,
}

impl Default for ModelAggregate {
    fn default() -> Self {
        Self {
            faithfulness_scores: Vec::new(),
            binary_labels: Vec::new(),
            completeness_scores: Vec::new(),
            conciseness_scores: Vec::new(),
            error_type_counts: all_categories().map(|c| (c.to_string(), 0)).collect(),
        }
    }
}

impl ModelAggregate {
    /// Pooled per-sentence error rate. Lower is better.
    pub fn sentence_error_ratio(&self) -> Option<f64> {
        mean(self.binary_labels.iter().map(|l| f64::from(*l)))
    }

    /// Mean of per-document faithfulness scores.
    pub fn faithfulness(&self) -> Option<f64> {
        mean(self.faithfulness_scores.iter().copied())
    }

    pub fn completeness(&self) -> Option<f64> {
        mean(self.completeness_scores.iter().copied())
    }

    pub fn conciseness(&self) -> Option<f64> {
        mean(self.conciseness_scores.iter().copied())
    }

    /// Number of documents that contributed any score.
    pub fn documents(&self) -> usize {
        self.faithfulness_scores
            .len()
            .max(self.completeness_scores.len())
    }

    pub fn merge(&mut self, other: ModelAggregate) {
        self.faithfulness_scores.extend(other.faithfulness_scores);
        self.binary_labels.extend(other.binary_labels);
        self.completeness_scores.extend(other.completeness_scores);
        self.conciseness_scores.extend(other.conciseness_scores);
        for (category, count) in other.error_type_counts {
            *self.error_type_counts.entry(category).or_insert(0) += count;
        }
    }

    fn summary(&self, model: &str) -> ModelSummary {
        ModelSummary {
            model: model.to_string(),
            documents: self.documents(),
            sentence_error_ratio: self.sentence_error_ratio(),
            faithfulness: self.faithfulness(),
            completeness: self.completeness(),
            conciseness: self.conciseness(),
            error_type_counts: self.error_type_counts.clone(),
        }
    }
}

/// Completeness and conciseness of one aligned document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentScores {
    pub completeness: f64,
    pub conciseness: f64,
}

/// Run-wide accumulator keyed by model name, in first-seen order.
///
/// Every recorded document counts as an attempt; only documents whose
/// judge output parsed count as successes and contribute scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregator {
    models: IndexMap<String, ModelAggregate>,
    attempted: usize,
    succeeded: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact-checked document; returns its faithfulness if it parsed.
    pub fn record_fact_check(&mut self, model: &str, result: &FactCheckResult) -> Option<f64> {
        self.attempted += 1;
        let score = result.faithfulness()?;
        self.succeeded += 1;

        let entry = self.models.entry(model.to_string()).or_default();
        entry.faithfulness_scores.push(score);
        entry.binary_labels.extend_from_slice(&result.labels);
        for category in &result.error_types {
            *entry.error_type_counts.entry(category.clone()).or_insert(0) += 1;
        }
        Some(score)
    }

    /// Record an aligned document against a summary of `num_sentences`
    /// sentences; returns its scores if it parsed.
    ///
    /// A summary without sentences cannot be scored and counts as a failure.
    pub fn record_alignment(
        &mut self,
        model: &str,
        result: &AlignmentResult,
        num_sentences: usize,
    ) -> Option<AlignmentScores> {
        self.attempted += 1;
        let scores = AlignmentScores {
            completeness: result.completeness()?,
            conciseness: result.conciseness(num_sentences)?,
        };
        self.succeeded += 1;

        let entry = self.models.entry(model.to_string()).or_default();
        entry.completeness_scores.push(scores.completeness);
        entry.conciseness_scores.push(scores.conciseness);
        Some(scores)
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Fraction of attempted documents whose judge output parsed.
    pub fn success_rate(&self) -> Option<f64> {
        (self.attempted > 0).then(|| self.succeeded as f64 / self.attempted as f64)
    }

    pub fn get(&self, model: &str) -> Option<&ModelAggregate> {
        self.models.get(model)
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelAggregate)> {
        self.models.iter().map(|(name, agg)| (name.as_str(), agg))
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Fold another run's accumulator into this one.
    pub fn merge(&mut self, other: Aggregator) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        for (model, aggregate) in other.models {
            self.models.entry(model).or_default().merge(aggregate);
        }
    }

    pub fn summaries(&self) -> Vec<ModelSummary> {
        self.models
            .iter()
            .map(|(model, aggregate)| aggregate.summary(model))
            .collect()
    }
}

/// Reportable figures for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: String,
    pub documents: usize,
    pub sentence_error_ratio: Option<f64>,
    pub faithfulness: Option<f64>,
    pub completeness: Option<f64>,
    pub conciseness: Option<f64>,
    pub error_type_counts: IndexMap<String, usize>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
