//! Key-fact alignment: completeness and conciseness of summaries

use std::collections::HashMap;

use sumjudge::{parse_alignment, Aggregator};

use super::{finish_run, maybe_print_progress, RunReport, RunSettings, RAW_OUTPUT_FILE};
use crate::error::HarnessResult;
use crate::prompts::alignment_prompt;
use crate::records::{AlignmentOutput, EvaluationRecord, JsonlWriter};
use crate::reporting::{percent, EvaluationKind};
use crate::runner::Executor;

/// Align every record's summary with the key facts of its document.
///
/// Records whose `doc_id` has no key facts are skipped without prompting
/// and do not count as attempts.
pub async fn run_alignment(
    executor: &Executor,
    records: Vec<EvaluationRecord>,
    key_facts: &HashMap<String, Vec<String>>,
    settings: &RunSettings,
) -> HarnessResult<RunReport> {
    let mut raw_writer = JsonlWriter::create(settings.path(RAW_OUTPUT_FILE))?;
    let mut aggregator = Aggregator::new();
    let mut skipped = 0;

    for record in records {
        let facts = match key_facts.get(&record.doc_id) {
            Some(facts) if !facts.is_empty() => facts,
            _ => {
                tracing::warn!("No key facts for {}, skipping", record.doc_id);
                skipped += 1;
                continue;
            }
        };

        let prompt = alignment_prompt(facts, &record.sentences);
        let llm_output = executor.fetch(&prompt).await;
        let parsed = parse_alignment(&llm_output);

        tracing::info!(
            "Input ID: {} Model Name: {} Success: {}",
            record.doc_id,
            record.model,
            parsed.value.is_success()
        );
        tracing::debug!(
            "[Alignment Label]: {:?} [Matched Sentence Line Numbers]: {:?}",
            parsed.value.labels,
            parsed.value.matched_lines
        );

        if let Some(scores) =
            aggregator.record_alignment(&record.model, &parsed.value, record.sentences.len())
        {
            tracing::info!(
                "[Completeness Score]: {} [Conciseness Score]: {}",
                percent(scores.completeness),
                percent(scores.conciseness)
            );
            if scores.conciseness > 1.0 {
                tracing::warn!(
                    "{}: judge cited lines beyond the {} summary sentences",
                    record.doc_id,
                    record.sentences.len()
                );
            }
        }

        raw_writer.write(&AlignmentOutput::new(record, llm_output, parsed))?;
        maybe_print_progress(EvaluationKind::Alignment, &aggregator, settings);
    }

    finish_run(EvaluationKind::Alignment, aggregator, skipped, executor.model(), settings)
}
