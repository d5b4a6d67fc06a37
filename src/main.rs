//! The experiment driver: one linear run per invocation.
use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rand::prelude::*;

use std::fs::File;
use std::path::PathBuf;

use treesample::prelude::*;
use treesample::experiment;
use treesample::tools::helpers;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "treesample: weighted-resampling experiments \
             for sparse decision-tree training"
)]
struct Cli {
    /// Path to the training CSV (feature columns, label column last)
    #[arg(long, default_value = "datasets/fico.csv")]
    data: PathBuf,

    /// Name of the label column (defaults to the last column)
    #[arg(long)]
    target: Option<String>,

    /// Weighting distribution
    #[arg(long = "weight_dist", value_enum)]
    weight_dist: WeightDistArg,

    /// Parameters of the weighting distribution
    #[arg(long = "weight_args", num_args = 0.., value_name = "FLOAT")]
    weight_args: Vec<f64>,

    /// Type of sampling method
    #[arg(long = "sampling_method", value_enum)]
    sampling_method: MethodArg,

    /// Dataset multiplier
    #[arg(short, default_value_t = 1.0)]
    p: f64,

    /// Where results are written to (appended; header written once)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed of the random number generator (entropy-seeded by default)
    #[arg(long)]
    seed: Option<u64>,

    /// Dump the fitted tree as JSON
    #[arg(long = "model_out")]
    model_out: Option<PathBuf>,

    /// Skip backward feature elimination
    #[arg(long = "no_backselect")]
    no_backselect: bool,

    /// Suppress console output
    #[arg(long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum WeightDistArg {
    Exponential,
    Binary,
}

impl WeightDistArg {
    fn name(&self) -> &'static str {
        match self {
            Self::Exponential => "exponential",
            Self::Binary => "binary",
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum MethodArg {
    Sampling,
    Deterministic,
    Mathias,
    Baseline,
    ResampleWeightDeterministic,
    ResampleWeightBaseline,
    NoWeightsVsWeights,
}

impl MethodArg {
    fn name(&self) -> &'static str {
        match self {
            Self::Sampling => "sampling",
            Self::Deterministic => "deterministic",
            Self::Mathias => "mathias",
            Self::Baseline => "baseline",
            Self::ResampleWeightDeterministic => {
                "resample_weight_deterministic"
            },
            Self::ResampleWeightBaseline => "resample_weight_baseline",
            Self::NoWeightsVsWeights => "no_weights_vs_weights",
        }
    }
}

fn weight_scheme(dist: WeightDistArg, args: &[f64]) -> Result<WeightScheme> {
    match dist {
        WeightDistArg::Exponential => {
            ensure!(
                args.len() == 1,
                "the exponential distribution takes one parameter \
                 (rate), got {} in {args:?}",
                args.len(),
            );
            ensure!(
                args[0] > 0.0,
                "the exponential rate must be positive, got {}",
                args[0],
            );
            Ok(WeightScheme::exponential(args[0]))
        },
        WeightDistArg::Binary => {
            ensure!(
                args.len() == 3,
                "the binary distribution takes three parameters \
                 (split_fraction, weight_a, weight_b), got {} in {args:?}",
                args.len(),
            );
            ensure!(
                (0.0..=1.0).contains(&args[0]),
                "the split fraction must be in [0, 1], got {}",
                args[0],
            );
            ensure!(
                args[1] >= 0.0 && args[2] >= 0.0,
                "weights must be non-negative, got ({}, {})",
                args[1], args[2],
            );
            Ok(WeightScheme::binary(args[0], args[1], args[2]))
        },
    }
}

fn join_args(args: &[f64]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scheme = weight_scheme(cli.weight_dist, &cli.weight_args[..])?;

    let mut reader = SampleReader::<_, String>::default()
        .file(&cli.data)
        .has_header(true);
    if let Some(target) = cli.target.clone() {
        reader = reader.target_feature(target);
    }
    let sample = reader.read()
        .with_context(|| format!("failed to read {}", cli.data.display()))?
        .into_binary_labels();

    let n_sample = sample.shape().0;
    let mut weights = scheme.draw(n_sample, &mut rng);
    helpers::normalize(&mut weights[..]);

    let config = ExperimentConfig {
        p: cli.p,
        backselect: !cli.no_backselect,
        ..ExperimentConfig::default()
    };

    let args = join_args(&cli.weight_args[..]);
    if !cli.quiet {
        println!(
            "{}    {}    {}",
            format!("[{}]", cli.sampling_method.name()).bold().red(),
            format!(
                "[{}({args})]", cli.weight_dist.name(),
            ).bold().green(),
            format!("[p = {}]", cli.p).bold().yellow(),
        );
    }

    let result = match cli.sampling_method {
        MethodArg::Mathias => {
            experiment::mathias(&sample, &weights[..], &config, &mut rng)
        },
        MethodArg::Sampling => {
            experiment::sampling(&sample, &weights[..], &config, &mut rng)
        },
        MethodArg::Deterministic => {
            experiment::deterministic(&sample, &weights[..], &config)
        },
        MethodArg::Baseline => {
            experiment::baseline(&sample, &weights[..], &config)
        },
        MethodArg::ResampleWeightDeterministic => {
            experiment::resample_and_compare_deterministic(
                &sample, &weights[..], &config, &mut rng,
            )
        },
        MethodArg::ResampleWeightBaseline => {
            experiment::resample_and_compare_baseline(
                &sample, &weights[..], &config, &mut rng,
            )
        },
        MethodArg::NoWeightsVsWeights => {
            experiment::no_weights_vs_weighted(&sample, &weights[..], &config)
        },
    };

    if !cli.quiet {
        print_outcome(&result.outcome);
    }

    if let Some(out) = &cli.out {
        let writer = ReportWriter::new(out);
        let method = cli.sampling_method.name();
        let dist = cli.weight_dist.name();
        match result.outcome {
            Outcome::Plain { loss } => {
                writer.append_plain(
                    method, &format!("{dist}({args})"), cli.p, loss,
                )
            },
            Outcome::Compare { initial, retrained } => {
                writer.append_labeled(
                    method,
                    dist,
                    &format!("({args})"),
                    cli.p,
                    &[(initial, "Initial"), (retrained, "Retrained")],
                )
            },
            Outcome::FourWay {
                initial_loss,
                initial_accuracy,
                weighted_loss,
                weighted_accuracy,
            } => {
                writer.append_labeled(
                    method,
                    dist,
                    &format!("({args})"),
                    cli.p,
                    &[
                        (initial_loss, "initial_weighted_loss"),
                        (initial_accuracy, "initial_accuracy"),
                        (weighted_loss, "weighted_weighted_loss"),
                        (weighted_accuracy, "weighted_accuracy"),
                    ],
                )
            },
        }
        .with_context(|| {
            format!("failed to append results to {}", out.display())
        })?;
    }

    if let Some(path) = &cli.model_out {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result.model)
            .context("failed to serialize the fitted tree")?;
    }

    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Plain { loss } => {
            println!("{} {loss}", "training loss:".bold().cyan());
        },
        Outcome::Compare { initial, retrained } => {
            println!("{} {initial}", "initial loss:".bold().cyan());
            println!("{} {retrained}", "retrained loss:".bold().cyan());
        },
        Outcome::FourWay {
            initial_loss,
            initial_accuracy,
            weighted_loss,
            weighted_accuracy,
        } => {
            println!(
                "{} loss = {initial_loss}, accuracy = {initial_accuracy}",
                "unweighted tree:".bold().cyan(),
            );
            println!(
                "{} loss = {weighted_loss}, accuracy = {weighted_accuracy}",
                "weighted tree:".bold().cyan(),
            );
        },
    }
}
