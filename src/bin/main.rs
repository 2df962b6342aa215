//! fakedetect Command Line Interface
//!
//! Trains the fake account classifier, serves it over HTTP, and inspects or
//! evaluates saved artifacts.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use fakedetect::api::Trainer;
use fakedetect::core::{Result, TrainerConfig};
use fakedetect::persistence::{
    ArtifactPaths, SerializableModel, SerializableScaler, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE,
};
use fakedetect::server::{self, PredictorContext, ServerConfig};
use fakedetect::{Dataset, FeatureDataset, FEATURE_NAMES};
use log::{error, info};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fakedetect")]
#[command(about = "Train and serve a fake account classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "fakedetect contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model and scaler from a labeled CSV file
    Train(TrainArgs),
    /// Serve the scoring endpoint
    Serve(ServeArgs),
    /// Evaluate saved artifacts on labeled data
    Evaluate(EvaluateArgs),
    /// Display artifact information
    Info(ArtifactArgs),
}

#[derive(Args)]
struct ArtifactArgs {
    /// Model artifact file
    #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
    model: PathBuf,

    /// Scaler artifact file
    #[arg(short, long, default_value = DEFAULT_SCALER_FILE)]
    scaler: PathBuf,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model, &self.scaler)
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (CSV with header)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    model_out: PathBuf,

    /// Output scaler file
    #[arg(long, default_value = DEFAULT_SCALER_FILE)]
    scaler_out: PathBuf,

    /// Fraction of samples held out for evaluation
    #[arg(short, long, default_value = "0.2")]
    test_size: f64,

    /// Seed for the holdout shuffle
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Inverse regularization strength C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Maximum solver iterations
    #[arg(short, long, default_value = "100")]
    max_iterations: usize,

    /// Convergence tolerance
    #[arg(long, default_value = "0.0001")]
    tolerance: f64,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// Labeled data file (CSV with header)
    #[arg(long)]
    data: PathBuf,

    /// Show detailed metrics
    #[arg(long)]
    detailed: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Serve(args) => serve_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Loading dataset from {:?}", args.data);
    let dataset = FeatureDataset::from_file(&args.data)?;
    info!("Loaded {} samples", dataset.len());

    let trainer = Trainer::with_config(TrainerConfig {
        c: args.c,
        tolerance: args.tolerance,
        max_iterations: args.max_iterations,
        test_size: args.test_size,
        seed: args.seed,
    });
    info!(
        "Parameters: C={}, tolerance={}, max_iter={}, test_size={}, seed={}",
        args.c, args.tolerance, args.max_iterations, args.test_size, args.seed
    );

    let pipeline = trainer.train(&dataset)?;
    println!(
        "Model Accuracy: {:.2}%",
        pipeline.holdout().accuracy() * 100.0
    );

    info!("Saving model and scaler...");
    ArtifactPaths::new(&args.model_out, &args.scaler_out).save(&pipeline)?;
    println!(
        "Model saved to {} and scaler saved to {}",
        args.model_out.display(),
        args.scaler_out.display()
    );

    Ok(())
}

fn serve_command(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    // Scoring is impossible without both artifacts
    let ctx = PredictorContext::load(&args.artifacts.paths()).map_err(|e| {
        error!("Could not load model or scaler; run `fakedetect train` first");
        e
    })?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run_server(config, ctx))
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let paths = args.artifacts.paths();
    info!("Loading artifacts from {:?} and {:?}", paths.model, paths.scaler);
    let pipeline = paths.load()?;

    info!("Loading test data from: {:?}", args.data);
    let metrics = pipeline.evaluate_from_csv(&args.data)?;

    println!("=== Model Evaluation ===");
    println!("Samples: {}", metrics.total());
    println!("Accuracy: {:.2}%", metrics.accuracy() * 100.0);

    if args.detailed {
        println!("\nDetailed Metrics:");
        println!("  True Positives:  {}", metrics.true_positives);
        println!("  True Negatives:  {}", metrics.true_negatives);
        println!("  False Positives: {}", metrics.false_positives);
        println!("  False Negatives: {}", metrics.false_negatives);
        println!("  Precision:       {:.4}", metrics.precision());
        println!("  Recall:          {:.4}", metrics.recall());
        println!("  F1 Score:        {:.4}", metrics.f1_score());
        println!("  Specificity:     {:.4}", metrics.specificity());
    }

    Ok(())
}

fn info_command(args: ArtifactArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?;
    model.print_summary();

    info!("Loading scaler from: {:?}", args.scaler);
    let scaler = SerializableScaler::load_from_file(&args.scaler)?;

    println!("\nScaler ({} training samples):", scaler.n_samples_seen);
    for ((name, mean), scale) in FEATURE_NAMES
        .iter()
        .zip(scaler.mean.iter())
        .zip(scaler.scale.iter())
    {
        println!("  {name:<20} mean {mean:>12.4}  scale {scale:>12.4}");
    }

    Ok(())
}
