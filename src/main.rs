mod config;
mod dataset;
mod knn;
mod metrics;
mod split;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::Args;
use dataset::Dataset;
use knn::NearestNeighbor;
use metrics::Evaluation;
use rand::{rngs::StdRng, SeedableRng};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let evaluation = run(&args)?;
    println!("{}", evaluation);

    Ok(())
}

fn run(args: &Args) -> Result<Evaluation> {
    let dataset = Dataset::from_path(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    if dataset.is_empty() {
        bail!("{} has no sessions", args.data.display());
    }
    log::info!(
        "Loaded {} sessions ({} with revenue) from {}",
        dataset.len(),
        dataset.positives(),
        args.data.display()
    );

    // Unseeded runs draw a fresh seed from the OS.
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (train, test) = split::train_test_split(&dataset, args.test_size, &mut rng)
        .context("failed to split dataset")?;
    log::info!("Training on {} rows, testing on {}", train.len(), test.len());

    let model = NearestNeighbor::fit(&train.features, &train.labels)
        .context("failed to train model")?
        .with_metric(args.metric);
    log::debug!("Fitted 1-NN with {:?} distance", model.metric());

    let predictions = model.predict(&test.features).context("failed to predict")?;
    let evaluation = metrics::evaluate(&test.labels, &predictions)?;

    if evaluation.is_degenerate() {
        log::warn!(
            "Test split has {} positive and {} negative sessions; a rate is undefined",
            test.positives(),
            test.len() - test.positives()
        );
    }

    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsStr, io::Write};

    const SESSIONS: &str = "\
Administrative,Administrative_Duration,Informational,Informational_Duration,ProductRelated,ProductRelated_Duration,BounceRates,ExitRates,PageValues,SpecialDay,Month,OperatingSystems,Browser,Region,TrafficType,VisitorType,Weekend,Revenue
0,0.0,0,0.0,1,0.0,0.2,0.2,0.0,0.0,Feb,1,1,1,1,Returning_Visitor,FALSE,FALSE
3,142.5,0,0.0,48,1052.3,0.0,0.013,0.0,0.0,Mar,2,2,3,2,Returning_Visitor,FALSE,FALSE
1,10.0,0,0.0,20,700.0,0.0,0.02,45.2,0.0,Nov,2,2,1,4,New_Visitor,TRUE,TRUE
4,75.0,1,12.0,62,2300.8,0.004,0.015,22.1,0.0,Dec,3,2,7,1,Returning_Visitor,FALSE,TRUE
0,0.0,0,0.0,5,120.0,0.05,0.08,0.0,0.4,May,1,1,9,3,New_Visitor,TRUE,FALSE
";

    #[test]
    fn test_train_on_self_reproduces_labels() {
        let dataset = Dataset::from_reader(SESSIONS.as_bytes()).unwrap();
        assert_eq!(dataset.labels, vec![0, 0, 1, 1, 0]);

        let model = NearestNeighbor::fit(&dataset.features, &dataset.labels).unwrap();
        let predictions = model.predict(&dataset.features).unwrap();
        assert_eq!(predictions, dataset.labels);

        let evaluation = metrics::evaluate(&dataset.labels, &predictions).unwrap();
        assert_eq!(evaluation.sensitivity, 1.0);
        assert_eq!(evaluation.specificity, 1.0);
        assert_eq!(evaluation.correct, 5);
        assert_eq!(evaluation.incorrect, 0);
    }

    #[test]
    fn test_run_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSIONS.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::try_parse_from(["shopping_knn", "--seed", "1", path]).unwrap();
        let evaluation = run(&args).unwrap();

        // 0.4 of 5 rows are held out.
        assert_eq!(evaluation.correct + evaluation.incorrect, 2);

        let again = run(&args).unwrap();
        assert_eq!(again.correct, evaluation.correct);
        assert_eq!(again.incorrect, evaluation.incorrect);
    }

    #[test]
    fn test_run_unseeded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSIONS.as_bytes()).unwrap();
        let args =
            Args::try_parse_from([OsStr::new("shopping_knn"), file.path().as_os_str()]).unwrap();
        assert_eq!(args.seed, None);

        let evaluation = run(&args).unwrap();
        assert_eq!(evaluation.correct + evaluation.incorrect, 2);
    }

    #[test]
    fn test_run_header_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSIONS.lines().next().unwrap().as_bytes())
            .unwrap();
        let args =
            Args::try_parse_from([OsStr::new("shopping_knn"), file.path().as_os_str()]).unwrap();

        let err = run(&args).unwrap_err();
        assert!(err.to_string().ends_with("has no sessions"));
    }

    #[test]
    fn test_run_non_finite_cell() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSIONS.replace("142.5", "NaN").as_bytes())
            .unwrap();
        let args =
            Args::try_parse_from([OsStr::new("shopping_knn"), file.path().as_os_str()]).unwrap();

        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<dataset::DatasetError>(),
            Some(dataset::DatasetError::InvalidFloat { row: 2, .. })
        ));
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let args = Args::try_parse_from([OsStr::new("shopping_knn"), path.as_os_str()]).unwrap();

        let err = run(&args).unwrap_err();
        assert!(err.to_string().starts_with("failed to load"));
    }

    #[test]
    fn test_run_bad_month() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSIONS.replace("Dec", "Foo").as_bytes())
            .unwrap();
        let args =
            Args::try_parse_from([OsStr::new("shopping_knn"), file.path().as_os_str()]).unwrap();

        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<dataset::DatasetError>(),
            Some(dataset::DatasetError::UnknownMonth { row: 4, .. })
        ));
    }
}
