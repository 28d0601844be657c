//! Sentence-level fact checking of summaries

use sumjudge::{parse_fact_check, Aggregator};

use super::{finish_run, maybe_print_progress, RunReport, RunSettings, RAW_OUTPUT_FILE};
use crate::error::HarnessResult;
use crate::prompts::fact_checking_prompt;
use crate::records::{EvaluationRecord, FaithfulnessOutput, JsonlWriter};
use crate::reporting::{percent, EvaluationKind};
use crate::runner::Executor;

/// Fact-check every record against its transcript.
///
/// Every record is written to `raw-data.jsonl`, parsed or not; only parsed
/// ones contribute scores.
pub async fn run_faithfulness(
    executor: &Executor,
    records: Vec<EvaluationRecord>,
    settings: &RunSettings,
) -> HarnessResult<RunReport> {
    let mut raw_writer = JsonlWriter::create(settings.path(RAW_OUTPUT_FILE))?;
    let mut aggregator = Aggregator::new();

    for record in records {
        let prompt = fact_checking_prompt(&record.transcript, &record.sentences);
        let llm_output = executor.fetch(&prompt).await;
        let parsed = parse_fact_check(&llm_output);

        tracing::info!(
            "Input ID: {} Model Name: {} Success: {}",
            record.doc_id,
            record.model,
            parsed.value.is_success()
        );
        tracing::debug!(
            "[Error Label]: {:?} [Error Type]: {:?} via {}",
            parsed.value.labels,
            parsed.value.error_types,
            parsed.provenance
        );
        if parsed.value.len() != record.sentences.len() && parsed.value.is_success() {
            tracing::warn!(
                "{}: judge returned {} verdicts for {} sentences",
                record.doc_id,
                parsed.value.len(),
                record.sentences.len()
            );
        }

        if let Some(score) = aggregator.record_fact_check(&record.model, &parsed.value) {
            tracing::info!("[Faithfulness Score]: {}", percent(score));
        }

        raw_writer.write(&FaithfulnessOutput::new(record, llm_output, parsed))?;
        maybe_print_progress(EvaluationKind::Faithfulness, &aggregator, settings);
    }

    finish_run(EvaluationKind::Faithfulness, aggregator, 0, executor.model(), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{executor, record, FakeJudge};
    use crate::pipeline::{RESULT_FILE, SUMMARY_FILE};
    use crate::records::load_jsonl;
    use sumjudge::Provenance;

    const GOOD: &str = r#"[{"sentence": "A.", "reason": "ok", "category": "no error"},
{"sentence": "B.", "reason": "wrong person", "category": "entity error"}]"#;

    #[tokio::test]
    async fn test_run_writes_every_record_and_scores_parsed_ones() {
        let judge = FakeJudge::new(&[
            ("good transcript", GOOD),
            ("prose transcript", "I think the category is predicate error."),
            ("refused transcript", "I cannot help with that."),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings::new("test-run", dir.path(), 10);

        let records = vec![
            record("d1", "human", "good transcript", &["A.", "B."]),
            record("d2", "bart", "prose transcript", &["C."]),
            record("d3", "bart", "refused transcript", &["D."]),
        ];

        let report = run_faithfulness(&executor(judge.clone(), 1), records, &settings)
            .await
            .unwrap();

        assert_eq!(report.aggregator.attempted(), 3);
        assert_eq!(report.aggregator.succeeded(), 2);
        assert_eq!(report.aggregator.get("human").unwrap().faithfulness(), Some(0.5));
        assert_eq!(report.aggregator.get("bart").unwrap().faithfulness(), Some(0.0));
        assert_eq!(judge.prompt_count(), 3);

        let raw: Vec<FaithfulnessOutput> = load_jsonl(settings.path(RAW_OUTPUT_FILE)).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].pred_faithfulness_labels, vec![0, 1]);
        assert_eq!(raw[1].parse_provenance, Provenance::Heuristic);
        assert_eq!(raw[2].parse_provenance, Provenance::Failed);
        assert!(raw[2].pred_faithfulness_labels.is_empty());
        assert_eq!(raw[2].llm_output, "I cannot help with that.");

        let text = std::fs::read_to_string(settings.path(RESULT_FILE)).unwrap();
        assert_eq!(text, report.text);
        assert!(text.contains("human\t50.0%"));
        assert!(text.contains("* success rate: 66.7%"));
        assert!(settings.path(SUMMARY_FILE).exists());
    }

    #[tokio::test]
    async fn test_exhausted_judge_counts_as_failure() {
        let judge = FakeJudge::new(&[]);
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings::new("test-run", dir.path(), 1);

        let records = vec![record("d1", "human", "t", &["A."])];
        let report = run_faithfulness(&executor(judge.clone(), 3), records, &settings)
            .await
            .unwrap();

        assert_eq!(judge.prompt_count(), 3);
        assert_eq!(report.aggregator.attempted(), 1);
        assert_eq!(report.aggregator.succeeded(), 0);
        assert!(report.aggregator.is_empty());

        let raw: Vec<FaithfulnessOutput> = load_jsonl(settings.path(RAW_OUTPUT_FILE)).unwrap();
        assert_eq!(raw[0].llm_output, "");
    }
}
