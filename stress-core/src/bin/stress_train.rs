//! Trainer CLI
//!
//! Subcommands:
//!   describe  -- print the exploratory summary of a CSV
//!   train     -- fit the candidates, keep the best, write the artifacts
//!   evaluate  -- score saved artifacts against a CSV
//!   predict   -- classify one row with saved artifacts

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stress_core::constants::{get_artifact_dir, get_seed, DEFAULT_N_ESTIMATORS, DEFAULT_TEST_SIZE, N_CLASSES};
use stress_core::logic::dataset::{describe, load_csv};
use stress_core::logic::evaluation::ClassificationReport;
use stress_core::logic::training::{persist, train, ArtifactPaths};
use stress_core::{ModelKind, Predictor, TrainConfig, FEATURE_COLUMNS};

#[derive(Parser)]
#[command(name = "stress-train", version, about = "Student stress level training pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print shape, statistics, class balance and correlations of a CSV.
    Describe {
        /// Path to the stress dataset CSV.
        #[arg(long)]
        data: PathBuf,
    },

    /// Train every candidate model and persist the best one.
    Train {
        /// Path to the stress dataset CSV.
        #[arg(long)]
        data: PathBuf,

        /// Output directory for scaler.json and model.json.
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// Fraction of rows held out for evaluation.
        #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
        test_size: f64,

        /// Random seed (falls back to STRESS_SEED, then 42).
        #[arg(long)]
        seed: Option<u64>,

        /// Trees in the random forest.
        #[arg(long, default_value_t = DEFAULT_N_ESTIMATORS)]
        trees: usize,

        /// Depth limit for every tree.
        #[arg(long)]
        max_depth: Option<usize>,

        /// Candidates in priority order.
        #[arg(long, value_delimiter = ',', default_value = "random_forest,decision_tree")]
        models: Vec<ModelKind>,
    },

    /// Score saved artifacts against every row of a CSV.
    Evaluate {
        /// Path to the labelled CSV.
        #[arg(long)]
        data: PathBuf,

        /// Directory holding scaler.json and model.json.
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// Classify one row of 20 values given in feature order.
    Predict {
        /// Directory holding scaler.json and model.json.
        #[arg(long)]
        artifacts: Option<PathBuf>,

        /// Feature values, in feature column order.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

fn artifact_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.unwrap_or_else(|| PathBuf::from(get_artifact_dir()))
}

fn load_predictor(dir: PathBuf) -> anyhow::Result<Predictor> {
    let paths = ArtifactPaths::in_dir(&dir);
    Predictor::load(&paths.scaler, &paths.model)
        .with_context(|| format!("failed to load artifacts from {}", dir.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Describe { data } => {
            let dataset = load_csv(&data)?;
            println!("{}", describe(&dataset));
        }

        Command::Train {
            data,
            artifacts,
            test_size,
            seed,
            trees,
            max_depth,
            models,
        } => {
            let dataset = load_csv(&data)?;
            let config = TrainConfig {
                test_size,
                seed: seed.unwrap_or_else(get_seed),
                n_estimators: trees,
                max_depth,
                models,
            };
            log::info!("Training with {:?}", config);

            let outcome = train(&dataset, &config)?;
            for candidate in &outcome.candidates {
                println!("\n=== {} ===", candidate.kind);
                println!("{}", candidate.report);
            }

            let best = outcome.best();
            println!(
                "Best model: {} (test accuracy {:.4})",
                best.kind, best.test_accuracy
            );

            let paths = persist(&outcome, artifact_dir(artifacts))?;
            println!("Scaler saved to {}", paths.scaler.display());
            println!("Model saved to {}", paths.model.display());
        }

        Command::Evaluate { data, artifacts } => {
            let predictor = load_predictor(artifact_dir(artifacts))?;
            let dataset = load_csv(&data)?;

            let truth = dataset.labels();
            let predicted = dataset
                .samples()
                .iter()
                .map(|s| predictor.predict_vector(&s.features).map(|level| level.index()))
                .collect::<Result<Vec<_>, _>>()?;

            let report = ClassificationReport::from_predictions(&truth, &predicted, N_CLASSES)?;
            println!("{} on {} rows", predictor.metadata().kind, dataset.len());
            println!("{}", report);
        }

        Command::Predict { artifacts, values } => {
            let predictor = load_predictor(artifact_dir(artifacts))?;
            let level = predictor
                .predict(&values)
                .with_context(|| format!("expected values for: {}", FEATURE_COLUMNS.join(", ")))?;
            println!("{}", level);
        }
    }

    Ok(())
}
