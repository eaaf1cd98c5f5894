// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Labeled split exporter
//!
//! Writes `train.csv` and `test.csv` (`text,label`) from a post dataset for
//! training a misinformation classifier.

use anyhow::Result;
use clap::Parser;
use disinfo_dashboard::labels::{LabeledSplit, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use disinfo_dashboard::loader::{load, DataSource};
use disinfo_dashboard::posts::Dataset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "export-labels")]
#[command(about = "Export a labeled train/test split of a post dataset")]
#[command(version)]
struct Args {
    /// URL or path of the JSON array of posts
    #[arg(short, long, default_value = "data/csvjson.json")]
    data: String,

    /// Use N synthetic posts instead of loading data
    #[arg(long)]
    synthetic: Option<usize>,

    /// Output directory for train.csv and test.csv
    #[arg(short, long, default_value = "data/splits")]
    output: PathBuf,

    /// Share of labeled posts held out for testing
    #[arg(short, long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Random seed for the shuffle
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let dataset = match args.synthetic {
        Some(size) => Dataset::synthetic(size, args.seed),
        None => load(&DataSource::parse(&args.data)).await?.dataset,
    };

    let split = LabeledSplit::from_posts(dataset.posts(), args.test_fraction, args.seed);
    let (train_path, test_path) = split.write_csv(&args.output)?;

    let (train_pos, train_neg) = LabeledSplit::label_counts(&split.train);
    let (test_pos, test_neg) = LabeledSplit::label_counts(&split.test);

    println!("\n{}", "=".repeat(50));
    println!("LABELED SPLIT");
    println!("{}", "=".repeat(50));
    println!("{:<10} {:>8} {:>10} {:>10}", "Split", "Total", "Misinfo", "Authentic");
    println!("{:-<50}", "");
    println!("{:<10} {:>8} {:>10} {:>10}", "train", split.train.len(), train_pos, train_neg);
    println!("{:<10} {:>8} {:>10} {:>10}", "test", split.test.len(), test_pos, test_neg);
    println!("{:-<50}", "");
    println!("Skipped (uncertain, unknown or no text): {}", split.skipped);
    println!("\nTrain split saved to: {}", train_path.display());
    println!("Test split saved to: {}", test_path.display());

    Ok(())
}
