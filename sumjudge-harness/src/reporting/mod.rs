//! Results reporting

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use sumjudge::{Aggregator, ModelSummary};

/// Which evaluation produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    Faithfulness,
    Alignment,
}

impl EvaluationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationKind::Faithfulness => "faithfulness",
            EvaluationKind::Alignment => "alignment",
        }
    }
}

impl std::fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `0.1234` -> `12.3%`
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn optional_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| "n/a".to_string())
}

/// Plain-text report, as printed during a run and saved to `result.txt`.
pub fn render_report(kind: EvaluationKind, aggregator: &Aggregator) -> String {
    match kind {
        EvaluationKind::Faithfulness => render_faithfulness_report(aggregator),
        EvaluationKind::Alignment => render_alignment_report(aggregator),
    }
}

pub fn render_faithfulness_report(aggregator: &Aggregator) -> String {
    let mut out = String::from("\n\n\n[Evaluation Results]\n");

    out.push_str("* sentence-level factuality error ratio (lower is better)\n");
    for (model, agg) in aggregator.models() {
        let _ = writeln!(out, "{}\t{}", model, optional_percent(agg.sentence_error_ratio()));
    }

    out.push_str("\n* summary-level faithfulness score (higher is better)\n");
    for (model, agg) in aggregator.models() {
        let _ = writeln!(out, "{}\t{}", model, optional_percent(agg.faithfulness()));
    }

    out.push_str("\n* error type breakdown\n");
    for (model, agg) in aggregator.models() {
        let _ = writeln!(out, "{}:", model);
        for (error_type, count) in &agg.error_type_counts {
            let _ = writeln!(out, "  {}: {}", error_type, count);
        }
    }

    push_success_rate(&mut out, aggregator);
    out
}

pub fn render_alignment_report(aggregator: &Aggregator) -> String {
    let mut out = String::from("\n\n\n[Evaluation Results]\n");

    out.push_str("\n* completeness score (higher is better)\n");
    for (model, agg) in aggregator.models() {
        let _ = writeln!(out, "{}\t{}", model, optional_percent(agg.completeness()));
    }

    out.push_str("\n* conciseness score (higher is better)\n");
    for (model, agg) in aggregator.models() {
        let _ = writeln!(out, "{}\t{}", model, optional_percent(agg.conciseness()));
    }

    push_success_rate(&mut out, aggregator);
    out
}

fn push_success_rate(out: &mut String, aggregator: &Aggregator) {
    let _ = write!(
        out,
        "\n* success rate: {}\n\n\n",
        optional_percent(aggregator.success_rate())
    );
}

/// Print a rendered report to the console
pub fn print_console_report(report: &str) {
    println!("{}", report);
}

/// Machine-readable run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub evaluation: EvaluationKind,
    pub judge_model: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub success_rate: Option<f64>,
    pub models: Vec<ModelSummary>,
    pub raw_output_file: String,
}

impl JsonSummary {
    /// Create from a finished run's accumulator
    pub fn from_aggregator(
        run_id: impl Into<String>,
        evaluation: EvaluationKind,
        judge_model: impl Into<String>,
        aggregator: &Aggregator,
        raw_output_file: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            evaluation,
            judge_model: judge_model.into(),
            attempted: aggregator.attempted(),
            succeeded: aggregator.succeeded(),
            success_rate: aggregator.success_rate(),
            models: aggregator.summaries(),
            raw_output_file: raw_output_file.into(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use sumjudge::{AlignmentResult, FactCheckResult};

    fn fact_check(categories: &[&str]) -> FactCheckResult {
        let mut result = FactCheckResult::default();
        for c in categories {
            result.push(c.to_string());
        }
        result
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(0.75), "75.0%");
        assert_eq!(percent(2.0 / 3.0), "66.7%");
        assert_eq!(percent(1.0), "100.0%");
    }

    #[test]
    fn test_faithfulness_report_layout() {
        let mut agg = Aggregator::new();
        agg.record_fact_check("human", &fact_check(&["no error", "entity error"]));
        agg.record_fact_check("human", &FactCheckResult::default());

        let report = render_faithfulness_report(&agg);
        assert!(report.starts_with("\n\n\n[Evaluation Results]\n* sentence-level factuality error ratio (lower is better)\nhuman\t50.0%\n"));
        assert!(report.contains("\n* summary-level faithfulness score (higher is better)\nhuman\t50.0%\n"));
        assert!(report.contains("\n* error type breakdown\nhuman:\n  out-of-context error: 0\n  entity error: 1\n"));
        assert!(report.contains("  no error: 1\n"));
        assert!(report.ends_with("\n* success rate: 50.0%\n\n\n"));
    }

    #[test]
    fn test_alignment_report_layout() {
        let mut agg = Aggregator::new();
        let result = AlignmentResult {
            labels: vec![1, 0],
            matched_lines: BTreeSet::from([1]),
        };
        agg.record_alignment("bart", &result, 4);

        let report = render_alignment_report(&agg);
        assert!(report.contains("\n* completeness score (higher is better)\nbart\t50.0%\n"));
        assert!(report.contains("\n* conciseness score (higher is better)\nbart\t25.0%\n"));
        assert!(report.ends_with("\n* success rate: 100.0%\n\n\n"));
    }

    #[test]
    fn test_empty_run_renders() {
        let report = render_report(EvaluationKind::Alignment, &Aggregator::new());
        assert!(report.contains("* success rate: n/a"));
    }

    #[test]
    fn test_json_summary_file() {
        let mut agg = Aggregator::new();
        agg.record_fact_check("human", &fact_check(&["no error"]));
        let summary = JsonSummary::from_aggregator(
            "20240101-000000",
            EvaluationKind::Faithfulness,
            "judge",
            &agg,
            "raw-data.jsonl",
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        summary.write_to_file(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["evaluation"], "faithfulness");
        assert_eq!(json["attempted"], 1);
        assert_eq!(json["models"][0]["model"], "human");
        assert_eq!(json["models"][0]["faithfulness"], 1.0);
        assert_eq!(json["models"][0]["error_type_counts"]["no error"], 1);
    }
}
