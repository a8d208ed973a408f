use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use eli5_core::config::{load_env_file, DEFAULT_ENV_FILE};
use eli5_core::eval::{Conciseness, Correctness, Dataset, EvaluationHarness, Experiment};
use eli5_core::llm::Provider;
use eli5_core::{Config, ExperimentStore, FileExperimentStore, Pipeline, Variant};

#[derive(Parser)]
#[command(name = "eli5")]
#[command(about = "Explain anything like I'm five, and evaluate how well it works", long_about = None)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question with the search → explain pipeline
    Ask {
        /// The question to answer
        #[arg(required = true)]
        question: Vec<String>,

        /// Pipeline variant: working, buggy or flaky
        #[arg(short, long)]
        variant: Option<Variant>,

        /// Print the retrieved context after the answer
        #[arg(long)]
        show_context: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a pipeline variant over a dataset and score the answers
    Eval {
        /// Dataset name (looked up in the datasets directory) or file path
        #[arg(short, long)]
        dataset: Option<String>,

        /// Pipeline variant: working, buggy or flaky
        #[arg(short, long)]
        variant: Option<Variant>,

        /// Experiment name prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Do not record the experiment
        #[arg(long)]
        no_save: bool,
    },
    /// List recorded experiments, or show one in detail
    Experiments {
        /// Experiment id (a unique prefix is enough)
        id: Option<String>,
    },
    /// Print the effective configuration
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        defaults: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    // RUST_LOG may come from .env
    load_env_file(DEFAULT_ENV_FILE)?;
    init_logging(cli.verbose);

    match cli.command {
        Commands::Ask {
            question,
            variant,
            show_context,
            json,
        } => {
            let config = Config::load()?;
            let variant = resolve_variant(&config, variant)?;
            let pipeline = Pipeline::from_config_with_variant(&config, variant)?;

            let output = pipeline.ask(&question.join(" ")).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", output.output);
                if show_context {
                    println!();
                    println!("Context:");
                    for doc in &output.documents {
                        println!("  {}", doc.page_content);
                    }
                }
            }
        }
        Commands::Eval {
            dataset,
            variant,
            prefix,
            no_save,
        } => {
            let config = Config::load()?;
            let variant = resolve_variant(&config, variant)?;
            let dataset_name = dataset.unwrap_or_else(|| config.evaluation.dataset.clone());
            let prefix = prefix.unwrap_or_else(|| config.evaluation.experiment_prefix.clone());

            let dataset = Dataset::resolve(&dataset_name, &config.storage)?;
            let pipeline = Pipeline::from_config_with_variant(&config, variant)?;
            let judge_config = config.judge_llm();
            let judge = Provider::client_from_config(&judge_config)?;
            tracing::debug!(
                judge = %judge_config.model_or_default(),
                max_words = config.evaluation.max_words,
                "Evaluators ready"
            );

            println!(
                "Evaluating '{}' variant on {} ({} examples)",
                variant,
                dataset.name,
                dataset.len()
            );

            let bar = ProgressBar::new(dataset.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {elapsed}")?
                    .progress_chars("=> "),
            );
            let tick = bar.clone();

            let harness = EvaluationHarness::new(Arc::new(pipeline), variant.as_str())
                .with_evaluator(Conciseness::new(config.evaluation.max_words))
                .with_evaluator(Correctness::new(judge))
                .with_progress(move |done, _| tick.set_position(done as u64));

            let experiment = harness.evaluate(&dataset, &prefix).await;
            bar.finish_and_clear();

            print_experiment(&experiment);

            if no_save {
                println!("Experiment not recorded (--no-save).");
            } else {
                let store = FileExperimentStore::with_config(&config.storage);
                store.save_experiment(&experiment)?;
                tracing::debug!(path = %config.storage.experiments_path().display(), "Saved experiment");
                println!("Recorded experiment {}", experiment.name);
                println!("  ID: {}", experiment.id);
            }
        }
        Commands::Experiments { id } => {
            let config = Config::load()?;
            let store = FileExperimentStore::with_config(&config.storage);
            let summaries = store.list_experiments()?;

            match id {
                Some(id) => {
                    let matches: Vec<_> = summaries
                        .iter()
                        .filter(|s| s.id.starts_with(&id))
                        .collect();
                    let summary = match matches.as_slice() {
                        [one] => *one,
                        [] => return Err(eyre!("No experiment matches '{}'", id)),
                        _ => return Err(eyre!("'{}' matches more than one experiment", id)),
                    };
                    let experiment = store.load_experiment(&summary.id)?;
                    print_experiment(&experiment);
                }
                None if summaries.is_empty() => {
                    println!("No experiments found. Use 'eli5 eval' to run one.");
                }
                None => {
                    for s in summaries {
                        println!(
                            "{}  {:<24} {:<8} {:<16} {} examples, {} lost  {}",
                            &s.id[..8.min(s.id.len())],
                            s.name,
                            s.target,
                            s.dataset,
                            s.examples,
                            s.lost,
                            s.started_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
        }
        Commands::Config { defaults } => {
            if defaults {
                print!("{}", Config::default_config_string());
            } else {
                print!("{}", Config::load()?.to_toml_string());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "eli5=debug,eli5_core=debug"
    } else {
        "eli5=info,eli5_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_variant(config: &Config, flag: Option<Variant>) -> Result<Variant> {
    match flag {
        Some(variant) => Ok(variant),
        None => Ok(config.pipeline.variant.parse()?),
    }
}

fn print_experiment(experiment: &Experiment) {
    println!();
    println!(
        "{} ({} on {})",
        experiment.name, experiment.target, experiment.dataset
    );

    for result in &experiment.results {
        let verdicts = result
            .verdicts
            .iter()
            .map(|v| format!("{}={}", v.key, if v.passed { "pass" } else { "fail" }))
            .collect::<Vec<_>>()
            .join(" ");
        let status = if result.is_lost() { "LOST" } else { "ok" };
        println!("  [{}] {:<4} {} {}", result.example_id, status, result.question, verdicts);
        for error in &result.errors {
            println!("         error: {}", error);
        }
    }

    println!();
    for (key, (passed, total)) in experiment.pass_counts() {
        println!("  {}: {}/{} passed", key, passed, total);
    }
    if experiment.lost_count() > 0 {
        println!("  lost: {}", experiment.lost_count());
    }
}
