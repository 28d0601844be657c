//! Summary evaluation CLI

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sumjudge_harness::{
    analysis::run_stats,
    config::{Config, ConfigError},
    pipeline::{run_alignment, run_faithfulness, run_keyfacts, RunSettings, KEYFACT_FILE},
    providers::create_provider,
    records::{index_key_facts, load_jsonl, EvaluationRecord, KeyFactRecord},
    runner::{Executor, ExecutorConfig},
};

#[derive(Parser)]
#[command(name = "sumjudge")]
#[command(about = "LLM-judged faithfulness, completeness and conciseness of summaries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fact-check summary sentences against their transcripts
    Faithfulness {
        /// JSONL file of summaries to evaluate
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (default: <output_dir>/faithfulness-<run id>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Judge model, overriding the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Print the running report every N documents
        #[arg(long)]
        print_interval: Option<usize>,
    },

    /// Align summaries with reference key facts
    Alignment {
        /// JSONL file of summaries to evaluate
        #[arg(short, long)]
        input: PathBuf,

        /// JSONL file of key facts per doc_id
        #[arg(short, long)]
        keyfacts: PathBuf,

        /// Output directory (default: <output_dir>/alignment-<run id>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Judge model, overriding the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Print the running report every N documents
        #[arg(long)]
        print_interval: Option<usize>,
    },

    /// Extract reference key facts from transcripts
    Keyfacts {
        /// JSONL file of records whose transcripts are used
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: <output_dir>/keyfacts-<run id>/keyfacts.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extraction model, overriding the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Central tendency statistics over finished runs
    Stats {
        /// raw-data.jsonl of a faithfulness run
        #[arg(long)]
        faithfulness: Option<PathBuf>,

        /// raw-data.jsonl of an alignment run
        #[arg(long)]
        alignment: Option<PathBuf>,

        /// Directory for central_tendency_stats.txt (default: <output_dir>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/sumjudge.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("sumjudge_harness=debug,info")
    } else {
        EnvFilter::new("sumjudge_harness=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Faithfulness {
            input,
            output,
            model,
            print_interval,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, model, print_interval);
            evaluate_faithfulness(&config, &input, output).await?;
        }

        Commands::Alignment {
            input,
            keyfacts,
            output,
            model,
            print_interval,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, model, print_interval);
            evaluate_alignment(&config, &input, &keyfacts, output).await?;
        }

        Commands::Keyfacts { input, output, model } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, model, None);
            generate_keyfacts(&config, &input, output).await?;
        }

        Commands::Stats {
            faithfulness,
            alignment,
            output,
        } => {
            if faithfulness.is_none() && alignment.is_none() {
                eprintln!("Error: pass --faithfulness and/or --alignment");
                std::process::exit(1);
            }
            let output = match output {
                Some(output) => output,
                None => PathBuf::from(load_config(cli.config.as_deref())?.output.output_dir),
            };
            let report = run_stats(faithfulness.as_deref(), alignment.as_deref(), &output)?;
            print!("{}", report.render());
        }

        Commands::InitConfig { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

/// `--config` must exist and parse; otherwise the default locations are
/// searched.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::load_or_default()),
    }
}

fn apply_overrides(config: &mut Config, model: Option<String>, print_interval: Option<usize>) {
    if let Some(model) = model {
        config.provider.model = model;
    }
    if let Some(interval) = print_interval {
        config.evaluation.print_interval = interval.max(1);
    }
}

fn run_id() -> String {
    Utc::now().format("%Y%m%d-%H%M%S").to_string()
}

fn prepare_run(
    config: &Config,
    task: &str,
    output: Option<PathBuf>,
) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let run_id = run_id();
    let output_dir = output.unwrap_or_else(|| {
        Path::new(&config.output.output_dir).join(format!("{}-{}", task, run_id))
    });
    std::fs::create_dir_all(&output_dir)?;

    println!("=== Summary Evaluation: {} ===", task);
    println!("Run ID: {}", run_id);
    println!("Judge:  {}", config.provider.model);
    println!("Output: {}", output_dir.display());
    println!();

    Ok(RunSettings::new(run_id, output_dir, config.evaluation.print_interval))
}

fn build_executor(config: &Config) -> Result<Executor, Box<dyn std::error::Error>> {
    let provider = create_provider(config)?;
    Ok(Executor::new(provider, ExecutorConfig::from_config(config)))
}

fn load_records(path: &Path) -> Result<Vec<EvaluationRecord>, Box<dyn std::error::Error>> {
    let records: Vec<EvaluationRecord> = load_jsonl(path)?;
    if records.is_empty() {
        eprintln!("Error: No records in {}", path.display());
        std::process::exit(1);
    }
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

async fn evaluate_faithfulness(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let executor = build_executor(config)?;
    let settings = prepare_run(config, "faithfulness", output)?;

    let report = run_faithfulness(&executor, records, &settings).await?;
    println!(
        "Finished: {}/{} documents parsed. Results in {}",
        report.aggregator.succeeded(),
        report.aggregator.attempted(),
        settings.output_dir.display()
    );
    Ok(())
}

async fn evaluate_alignment(
    config: &Config,
    input: &Path,
    keyfacts: &Path,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let key_facts = index_key_facts(load_jsonl::<KeyFactRecord>(keyfacts)?);
    tracing::info!("Loaded key facts for {} documents", key_facts.len());

    let executor = build_executor(config)?;
    let settings = prepare_run(config, "alignment", output)?;

    let report = run_alignment(&executor, records, &key_facts, &settings).await?;
    println!(
        "Finished: {}/{} documents parsed, {} skipped without key facts. Results in {}",
        report.aggregator.succeeded(),
        report.aggregator.attempted(),
        report.skipped,
        settings.output_dir.display()
    );
    Ok(())
}

async fn generate_keyfacts(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let executor = build_executor(config)?;

    let output = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => prepare_run(config, "keyfacts", None)?.path(KEYFACT_FILE),
    };

    let run = run_keyfacts(
        &executor,
        &records,
        config.evaluation.keyfact_source_chars,
        &output,
    )
    .await?;
    println!(
        "Key facts written for {} documents ({} skipped) to {}",
        run.written,
        run.skipped,
        output.display()
    );
    Ok(())
}

fn init_config(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
