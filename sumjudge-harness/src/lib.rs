//! LLM-judged evaluation of summaries
//!
//! This crate drives a judge model over a corpus of summaries and scores
//! them on three axes:
//!
//! - **faithfulness**: the share of summary sentences the judge finds free
//!   of factual errors, with a breakdown by error category
//! - **completeness**: the share of reference key facts the summary conveys
//! - **conciseness**: the share of summary sentences that carry a key fact
//!
//! Judge answers are parsed by the `sumjudge` core crate, which tolerates
//! the fenced, truncated and chatty output real judges produce.
//!
//! # Example
//!
//! ```no_run
//! use sumjudge_harness::{
//!     config::Config,
//!     pipeline::{run_faithfulness, RunSettings},
//!     providers::create_provider,
//!     records::load_jsonl,
//!     runner::{Executor, ExecutorConfig},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default();
//!     let executor = Executor::new(create_provider(&config)?, ExecutorConfig::from_config(&config));
//!
//!     let records = load_jsonl("data/summaries.jsonl")?;
//!     let settings = RunSettings::new("example", "results/example", 10);
//!     let report = run_faithfulness(&executor, records, &settings).await?;
//!     println!("{}", report.text);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod records;
pub mod reporting;
pub mod runner;

pub use config::Config;
pub use error::{HarnessError, HarnessResult};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{run_stats, StatsReport};
    pub use crate::config::Config;
    pub use crate::error::{HarnessError, HarnessResult};
    pub use crate::pipeline::{run_alignment, run_faithfulness, run_keyfacts, RunReport, RunSettings};
    pub use crate::providers::{
        create_provider, CompletionRequest, CompletionResponse, LLMProvider, Message,
        ProviderError, ProviderResult,
    };
    pub use crate::records::{load_jsonl, EvaluationRecord, KeyFactRecord};
    pub use crate::reporting::{print_console_report, EvaluationKind, JsonSummary};
    pub use crate::runner::{Executor, ExecutorConfig};
}
