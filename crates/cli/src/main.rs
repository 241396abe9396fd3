use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{
    load_records, shuffle_records, train_validation_split, validate_rating_range, Delimiter,
    RatingIndex, Record,
};
use evaluation::{
    parse_response, EvaluationReport, FallbackPredictor, GlobalMeanPredictor, ItemMeanPredictor,
    PredictionMode, Predictor, UserMeanPredictor,
};
use pipeline::{
    class_balance, read_json_lines_from_path, write_json_lines_to_path, LabelTask, LabeledExample,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// movie-eval - prepare rating data and evaluate rating predictors
#[derive(Parser)]
#[command(name = "movie-eval")]
#[command(about = "Prepare movie rating datasets and score rating predictions", long_about = None)]
struct Cli {
    /// Field delimiter of rating files ("tab" or "comma")
    #[arg(short, long, default_value = "tab", global = true)]
    delimiter: Delimiter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TaskKind {
    /// Predict the raw rating
    Regression,
    /// Predict whether the rating is above the rating threshold
    Classification,
}

impl TaskKind {
    fn label_task(self, rating_threshold: f32) -> LabelTask {
        match self {
            TaskKind::Regression => LabelTask::Regression,
            TaskKind::Classification => LabelTask::Classification {
                threshold: rating_threshold,
            },
        }
    }

    fn prediction_mode(self, rating_threshold: f32) -> PredictionMode {
        match self {
            TaskKind::Regression => PredictionMode::Regression,
            TaskKind::Classification => PredictionMode::Classification {
                threshold: rating_threshold,
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-user and per-item rating counts of a dataset
    Stats {
        /// Rating file, e.g. data/ml-100k/u.data
        #[arg(long)]
        input: PathBuf,

        /// Records per shard when building the index in parallel
        #[arg(long, default_value = "10000")]
        shard_size: usize,
    },

    /// Shuffle, split, label and write train/validation JSON lines
    Prepare {
        #[arg(long)]
        input: PathBuf,

        /// Directory receiving train.jsonl and validation.jsonl
        #[arg(long)]
        out_dir: PathBuf,

        /// Seed for the shuffle before splitting
        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "0.1")]
        validation_fraction: f32,

        #[arg(long, value_enum, default_value = "regression")]
        task: TaskKind,

        /// Ratings strictly above this are the positive class
        #[arg(long, default_value = "3.0")]
        rating_threshold: f32,
    },

    /// Score the mean baselines on a validation rating file
    Baseline {
        /// Training rating file, e.g. data/ml-100k/ua.base
        #[arg(long)]
        train: PathBuf,

        /// Validation rating file, e.g. data/ml-100k/ua.test
        #[arg(long)]
        validation: PathBuf,

        #[arg(long, value_enum, default_value = "regression")]
        task: TaskKind,

        #[arg(long, default_value = "3.0")]
        rating_threshold: f32,
    },

    /// Score a prediction service response against a labels file
    Score {
        /// Response body: {"predictions": [...]} or a bare JSON array
        #[arg(long)]
        predictions: PathBuf,

        /// JSON lines file written by `prepare`
        #[arg(long)]
        labels: PathBuf,

        /// Scores strictly above this value are class 1 for accuracy
        #[arg(long, default_value = "0.5")]
        score_threshold: f64,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, shard_size } => handle_stats(&input, cli.delimiter, shard_size),
        Commands::Prepare {
            input,
            out_dir,
            seed,
            validation_fraction,
            task,
            rating_threshold,
        } => handle_prepare(
            &input,
            cli.delimiter,
            &out_dir,
            seed,
            validation_fraction,
            task.label_task(rating_threshold),
        ),
        Commands::Baseline {
            train,
            validation,
            task,
            rating_threshold,
        } => handle_baseline(&train, &validation, cli.delimiter, task, rating_threshold),
        Commands::Score {
            predictions,
            labels,
            score_threshold,
        } => handle_score(&predictions, &labels, score_threshold),
    }
}

fn load(path: &Path, delimiter: Delimiter) -> Result<Vec<Record>> {
    let start = Instant::now();
    let records = load_records(path, delimiter)
        .with_context(|| format!("Failed to load ratings from {}", path.display()))?;
    validate_rating_range(&records, 1.0, 5.0)
        .with_context(|| format!("Ratings in {} are outside 1-5", path.display()))?;
    println!(
        "{} Loaded {} ratings from {} in {:?}",
        "✓".green(),
        records.len(),
        path.display(),
        start.elapsed()
    );
    Ok(records)
}

/// Handle the 'stats' command
fn handle_stats(input: &Path, delimiter: Delimiter, shard_size: usize) -> Result<()> {
    let records = load(input, delimiter)?;
    let index = RatingIndex::build_parallel(&records, shard_size);
    let summary = index.summary();

    println!("{}", "Dataset summary:".bold().blue());
    println!("{}Users: {}", "• ".green(), summary.users);
    println!("{}Items: {}", "• ".green(), summary.items);
    println!("{}Ratings: {}", "• ".green(), summary.ratings);
    println!(
        "{}Ratings per user: min {}, max {}, mean {:.2}",
        "• ".cyan(),
        summary.per_user.min,
        summary.per_user.max,
        summary.per_user.mean
    );
    println!(
        "{}Ratings per item: min {}, max {}, mean {:.2}",
        "• ".cyan(),
        summary.per_item.min,
        summary.per_item.max,
        summary.per_item.mean
    );

    let mut histogram = [0usize; 5];
    for record in &records {
        let bucket = (record.rating.round() as usize).clamp(1, 5) - 1;
        histogram[bucket] += 1;
    }
    println!("Rating distribution:");
    for (i, count) in histogram.iter().enumerate() {
        println!("  {}: {}", i + 1, count);
    }
    Ok(())
}

/// Handle the 'prepare' command
fn handle_prepare(
    input: &Path,
    delimiter: Delimiter,
    out_dir: &Path,
    seed: u64,
    validation_fraction: f32,
    task: LabelTask,
) -> Result<()> {
    let mut records = load(input, delimiter)?;

    shuffle_records(&mut records, seed);
    let (train, validation) = train_validation_split(&records, validation_fraction)
        .context("Failed to split dataset")?;

    let train_examples = task.apply(&train);
    let validation_examples = task.apply(&validation);

    if let LabelTask::Classification { threshold } = task {
        report_balance("train", &train_examples, threshold);
        report_balance("validation", &validation_examples, threshold);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let train_path = out_dir.join("train.jsonl");
    let validation_path = out_dir.join("validation.jsonl");
    write_json_lines_to_path(&train_path, &train_examples)
        .with_context(|| format!("Failed to write {}", train_path.display()))?;
    write_json_lines_to_path(&validation_path, &validation_examples)
        .with_context(|| format!("Failed to write {}", validation_path.display()))?;

    println!(
        "{} Wrote {} train examples to {}",
        "✓".green(),
        train_examples.len(),
        train_path.display()
    );
    println!(
        "{} Wrote {} validation examples to {}",
        "✓".green(),
        validation_examples.len(),
        validation_path.display()
    );
    Ok(())
}

fn report_balance(split: &str, examples: &[LabeledExample], threshold: f32) {
    let (negatives, positives) = class_balance(examples);
    info!(
        "{} labels (rating > {}): {} positive, {} negative",
        split, threshold, positives, negatives
    );
}

/// Handle the 'baseline' command
fn handle_baseline(
    train_path: &Path,
    validation_path: &Path,
    delimiter: Delimiter,
    task: TaskKind,
    rating_threshold: f32,
) -> Result<()> {
    let train = load(train_path, delimiter)?;
    let validation = load(validation_path, delimiter)?;

    let mode = task.prediction_mode(rating_threshold);
    let examples = task.label_task(rating_threshold).apply(&validation);
    let pairs: Vec<_> = examples.iter().map(|e| (e.user_id, e.item_id)).collect();
    let labels: Vec<f32> = examples.iter().map(|e| e.label).collect();

    let index = RatingIndex::build(&train);
    let global = GlobalMeanPredictor::fit(&train, mode).context("Failed to fit global mean")?;
    let user_mean = FallbackPredictor::new(UserMeanPredictor::fit(&index, mode), global.clone());
    let item_mean = FallbackPredictor::new(ItemMeanPredictor::fit(&index, mode), global.clone());

    let predictors: [&dyn Predictor; 3] = [&global, &user_mean, &item_mean];

    println!("{}", "Baseline evaluation:".bold().blue());
    for predictor in predictors {
        let predictions = predictor
            .predict_batch(&pairs)
            .with_context(|| format!("{} failed", predictor.name()))?;
        let report = match task {
            TaskKind::Regression => {
                EvaluationReport::regression(predictor.name(), &predictions, &labels)?
            }
            // predictions are already 0/1, any threshold in [0, 1) separates them
            TaskKind::Classification => {
                EvaluationReport::classification(predictor.name(), &predictions, &labels, 0.5)?
            }
        };
        println!("{}{}", "• ".green(), report);
    }
    Ok(())
}

/// Handle the 'score' command
fn handle_score(predictions_path: &Path, labels_path: &Path, score_threshold: f64) -> Result<()> {
    let body = fs::read_to_string(predictions_path)
        .with_context(|| format!("Failed to read {}", predictions_path.display()))?;
    let predictions = parse_response(&body)
        .with_context(|| format!("Failed to parse {}", predictions_path.display()))?;
    let examples = read_json_lines_from_path(labels_path)
        .with_context(|| format!("Failed to read labels from {}", labels_path.display()))?;
    let labels: Vec<f32> = examples.iter().map(|e| e.label).collect();

    if predictions.len() != labels.len() {
        bail!(
            "{} has {} predictions but {} has {} labels",
            predictions_path.display(),
            predictions.len(),
            labels_path.display(),
            labels.len()
        );
    }

    let source = predictions_path.display().to_string();
    println!("{}", "Prediction scores:".bold().blue());
    let report = EvaluationReport::regression(&source, &predictions, &labels)?;
    println!("{}{}", "• ".green(), report);
    let report = EvaluationReport::classification(&source, &predictions, &labels, score_threshold)?;
    println!("{}{}", "• ".green(), report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_threshold_defaults_to_half() {
        let cli = Cli::try_parse_from([
            "movie-eval",
            "score",
            "--predictions",
            "response.json",
            "--labels",
            "validation.jsonl",
        ])
        .unwrap();
        match cli.command {
            Commands::Score { score_threshold, .. } => assert_eq!(score_threshold, 0.5),
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_score_threshold_override() {
        let cli = Cli::try_parse_from([
            "movie-eval",
            "score",
            "--predictions",
            "response.json",
            "--labels",
            "validation.jsonl",
            "--score-threshold",
            "0.7",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Score { score_threshold, .. } if score_threshold == 0.7));
    }
}
