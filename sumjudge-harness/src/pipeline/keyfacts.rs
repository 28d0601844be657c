//! Reference key-fact generation

use std::collections::HashSet;
use std::path::Path;

use tokio::time::sleep;

use sumjudge::parse_key_facts;

use crate::error::HarnessResult;
use crate::prompts::key_fact_prompt;
use crate::records::{EvaluationRecord, JsonlWriter, KeyFactRecord};
use crate::runner::Executor;

/// Outcome of a key-fact run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyFactRun {
    pub written: usize,
    pub skipped: usize,
}

/// Extract key facts once per distinct `doc_id` and write them as JSONL.
///
/// A response without a usable list is re-requested up to the executor's
/// attempt count; documents that never yield facts are left out.
pub async fn run_keyfacts(
    executor: &Executor,
    records: &[EvaluationRecord],
    source_chars: usize,
    output: &Path,
) -> HarnessResult<KeyFactRun> {
    let mut writer = JsonlWriter::create(output)?;
    let mut seen = HashSet::new();
    let mut run = KeyFactRun::default();

    for record in records {
        if !seen.insert(record.doc_id.as_str()) {
            tracing::debug!("Key facts for {} already extracted", record.doc_id);
            continue;
        }
        if record.transcript.trim().is_empty() {
            tracing::warn!("Skipping {}: empty transcript", record.doc_id);
            run.skipped += 1;
            continue;
        }

        tracing::info!("Generating key facts for {}", record.doc_id);
        let prompt = key_fact_prompt(&record.transcript, source_chars);

        match extract(executor, &prompt, &record.doc_id).await {
            Some(key_facts) => {
                tracing::info!("Generated {} key facts for {}", key_facts.len(), record.doc_id);
                writer.write(&KeyFactRecord {
                    doc_id: record.doc_id.clone(),
                    key_facts,
                })?;
                run.written += 1;
            }
            None => {
                tracing::warn!("No key facts generated for {}", record.doc_id);
                run.skipped += 1;
            }
        }
    }

    Ok(run)
}

async fn extract(executor: &Executor, prompt: &str, doc_id: &str) -> Option<Vec<String>> {
    let attempts = executor.config().attempts.max(1);

    for attempt in 1..=attempts {
        let output = executor.fetch(prompt).await;
        let parsed = parse_key_facts(&output);
        if parsed.provenance.is_structured() {
            return Some(parsed.into_inner());
        }

        tracing::warn!(
            "No key-fact list in response for {}, attempt {}/{}",
            doc_id,
            attempt,
            attempts
        );
        if attempt < attempts {
            sleep(executor.config().retry_delay).await;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{executor, record, FakeJudge};
    use crate::records::load_jsonl;

    #[tokio::test]
    async fn test_keyfacts_run() {
        let judge = FakeJudge::new(&[
            ("Storm article", "[\"A storm hit.\", \"Two died.\"]"),
            ("Chatty article", "Sorry, here you go: Fact one. Fact two."),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("keyfacts.jsonl");

        let records = vec![
            record("d1", "human", "Storm article", &["S."]),
            record("d1", "bart", "Storm article", &["S."]),
            record("d2", "human", "Chatty article", &["S."]),
            record("d3", "human", "   ", &["S."]),
        ];

        let run = run_keyfacts(&executor(judge.clone(), 2), &records, 2_000, &output)
            .await
            .unwrap();

        assert_eq!(run, KeyFactRun { written: 1, skipped: 2 });
        // d1 once, d2 twice; d3 never prompted
        assert_eq!(judge.prompt_count(), 3);

        let written: Vec<KeyFactRecord> = load_jsonl(&output).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].doc_id, "d1");
        assert_eq!(written[0].key_facts, vec!["A storm hit.", "Two died."]);
    }
}
