//! JSONL records read and written by the pipelines

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sumjudge::{AlignmentResult, FactCheckResult, Parsed, Provenance};

const DEFAULT_MODEL: &str = "human";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// One summary to evaluate.
///
/// Fields the harness does not know about are kept and written back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub doc_id: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub transcript: String,
    pub sentences: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reference key facts for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFactRecord {
    pub doc_id: String,
    pub key_facts: Vec<String>,
}

/// Key facts indexed by `doc_id`; a later record for the same id wins.
pub fn index_key_facts(records: Vec<KeyFactRecord>) -> HashMap<String, Vec<String>> {
    records
        .into_iter()
        .map(|record| (record.doc_id, record.key_facts))
        .collect()
}

/// Fact-checking output for one evaluation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaithfulnessOutput {
    #[serde(flatten)]
    pub record: EvaluationRecord,
    pub llm_output: String,
    pub pred_faithfulness_labels: Vec<u8>,
    pub pred_faithfulness_error_type: Vec<String>,
    pub parse_provenance: Provenance,
}

impl FaithfulnessOutput {
    pub fn new(record: EvaluationRecord, llm_output: String, parsed: Parsed<FactCheckResult>) -> Self {
        let Parsed { value, provenance } = parsed;
        Self {
            record,
            llm_output,
            pred_faithfulness_labels: value.labels,
            pred_faithfulness_error_type: value.error_types,
            parse_provenance: provenance,
        }
    }

    pub fn result(&self) -> FactCheckResult {
        FactCheckResult {
            labels: self.pred_faithfulness_labels.clone(),
            error_types: self.pred_faithfulness_error_type.clone(),
        }
    }
}

/// Alignment output for one evaluation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentOutput {
    #[serde(flatten)]
    pub record: EvaluationRecord,
    pub llm_output: String,
    pub pred_alignment_labels: Vec<u8>,
    /// Sorted ascending
    pub pred_sentence_line_numbers: Vec<i64>,
    pub parse_provenance: Provenance,
}

impl AlignmentOutput {
    pub fn new(record: EvaluationRecord, llm_output: String, parsed: Parsed<AlignmentResult>) -> Self {
        let Parsed { value, provenance } = parsed;
        Self {
            record,
            llm_output,
            pred_alignment_labels: value.labels,
            pred_sentence_line_numbers: value.matched_lines.into_iter().collect(),
            parse_provenance: provenance,
        }
    }

    pub fn result(&self) -> AlignmentResult {
        AlignmentResult {
            labels: self.pred_alignment_labels.clone(),
            matched_lines: self.pred_sentence_line_numbers.iter().copied().collect(),
        }
    }
}

/// Error type for record loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Read one JSON value per non-blank line.
pub fn load_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| LoadError::Json {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Like [`load_jsonl`], but a line that does not decode as `T` is logged
/// and skipped. Only I/O errors fail the load.
pub fn load_jsonl_lenient<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, LoadError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("{}:{}: skipping row: {}", path.display(), idx + 1, e),
        }
    }

    Ok(records)
}

/// Append-only JSONL output, flushed after every record.
pub struct JsonlWriter {
    inner: BufWriter<File>,
}

impl JsonlWriter {
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            inner: BufWriter::new(File::create(path)?),
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.inner, record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()
    }
}
