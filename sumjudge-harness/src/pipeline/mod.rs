//! Sequential evaluation pipelines
//!
//! Each document is prompted, parsed, scored and written before the next
//! one starts.

pub mod alignment;
pub mod faithfulness;
pub mod keyfacts;

pub use alignment::run_alignment;
pub use faithfulness::run_faithfulness;
pub use keyfacts::{run_keyfacts, KeyFactRun};

use std::path::PathBuf;

use sumjudge::Aggregator;

use crate::error::HarnessResult;
use crate::reporting::{print_console_report, render_report, EvaluationKind, JsonSummary};

pub const RAW_OUTPUT_FILE: &str = "raw-data.jsonl";
pub const RESULT_FILE: &str = "result.txt";
pub const SUMMARY_FILE: &str = "summary.json";
pub const KEYFACT_FILE: &str = "keyfacts.jsonl";

/// Where and how a run reports
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub run_id: String,
    pub output_dir: PathBuf,
    /// Print the running report every this many attempted documents
    pub print_interval: usize,
}

impl RunSettings {
    pub fn new(run_id: impl Into<String>, output_dir: impl Into<PathBuf>, print_interval: usize) -> Self {
        Self {
            run_id: run_id.into(),
            output_dir: output_dir.into(),
            print_interval: print_interval.max(1),
        }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}

/// Outcome of a scoring run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub aggregator: Aggregator,
    /// Final rendered text, as written to `result.txt`
    pub text: String,
    /// Documents left out before prompting
    pub skipped: usize,
}

/// Print the running report when the attempt count hits the interval.
fn maybe_print_progress(kind: EvaluationKind, aggregator: &Aggregator, settings: &RunSettings) {
    let attempted = aggregator.attempted();
    if attempted > 0 && attempted % settings.print_interval == 0 {
        print_console_report(&render_report(kind, aggregator));
    }
}

/// Render, print and persist the final report.
fn finish_run(
    kind: EvaluationKind,
    aggregator: Aggregator,
    skipped: usize,
    judge_model: &str,
    settings: &RunSettings,
) -> HarnessResult<RunReport> {
    let text = render_report(kind, &aggregator);
    print_console_report(&text);

    std::fs::write(settings.path(RESULT_FILE), &text)?;
    JsonSummary::from_aggregator(
        &settings.run_id,
        kind,
        judge_model,
        &aggregator,
        settings.path(RAW_OUTPUT_FILE).display().to_string(),
    )
    .write_to_file(settings.path(SUMMARY_FILE))?;

    tracing::info!(
        "{} run {} finished: {}/{} documents parsed, {} skipped",
        kind,
        settings.run_id,
        aggregator.succeeded(),
        aggregator.attempted(),
        skipped
    );

    Ok(RunReport {
        aggregator,
        text,
        skipped,
    })
}
