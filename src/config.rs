use crate::knn::DistanceMetric;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Fraction of the rows held out for evaluation.
pub const TEST_SIZE: f64 = 0.4;

/// Predict whether a shopping session ends in a purchase with a 1-nearest
/// neighbor classifier, and report how well it does on a held-out split.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// CSV file of browsing sessions.
    pub data: PathBuf,

    /// Fraction of rows held out as the test set.
    #[arg(long, default_value_t = TEST_SIZE, value_parser = parse_test_size)]
    pub test_size: f64,

    /// Seed for the train/test shuffle. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Distance used to find the nearest training session.
    #[arg(long, value_enum, default_value_t = DistanceMetric::Euclidean)]
    pub metric: DistanceMetric,

    /// More log output on stderr (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

fn parse_test_size(value: &str) -> Result<f64, String> {
    let test_size: f64 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if test_size > 0.0 && test_size < 1.0 {
        Ok(test_size)
    } else {
        Err(format!("must be between 0 and 1 (exclusive), got {test_size}"))
    }
}
