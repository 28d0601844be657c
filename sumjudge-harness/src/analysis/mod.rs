//! Offline analysis of finished runs

pub mod stats;

pub use stats::{
    document_scores, load_alignment_rows, load_faithfulness_rows, AlignmentRow, CentralTendency,
    DocumentScores, FaithfulnessRow, StatsReport,
};

use std::path::Path;

use crate::error::HarnessResult;

pub const STATS_FILE: &str = "central_tendency_stats.txt";

/// Recompute statistics from raw-output files and write them to
/// `output_dir/central_tendency_stats.txt`.
///
/// Either input may be absent; its metrics are then reported as having no
/// data.
pub fn run_stats(
    faithfulness: Option<&Path>,
    alignment: Option<&Path>,
    output_dir: &Path,
) -> HarnessResult<StatsReport> {
    let faithfulness_rows = match faithfulness {
        Some(path) => load_faithfulness_rows(path)?,
        None => Vec::new(),
    };
    let alignment_rows = match alignment {
        Some(path) => load_alignment_rows(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        "Loaded {} faithfulness and {} alignment rows",
        faithfulness_rows.len(),
        alignment_rows.len()
    );

    let report = StatsReport::compute(&faithfulness_rows, &alignment_rows);
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(STATS_FILE);
    std::fs::write(&path, report.render())?;
    tracing::info!("Statistics written to {}", path.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_with_one_input() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("alignment.jsonl");
        std::fs::write(
            &raw,
            "{\"doc_id\": \"d1\", \"model\": \"human\", \"sentences\": [\"A.\", \"B.\"], \
             \"pred_alignment_labels\": [1, 0], \"pred_sentence_line_numbers\": [2]}\n",
        )
        .unwrap();

        let out = dir.path().join("stats");
        let report = run_stats(None, Some(&raw), &out).unwrap();

        assert_eq!(report.faithfulness, None);
        assert_eq!(report.completeness.unwrap().mean, 50.0);
        assert_eq!(report.conciseness.unwrap().median, 50.0);

        let text = std::fs::read_to_string(out.join(STATS_FILE)).unwrap();
        assert!(text.contains("Faithfulness: No data available\n"));
        assert!(text.contains("Completeness:\n  Mean: 50.00%\n"));
    }
}
