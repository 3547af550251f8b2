use crate::dataset::Dataset;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("test size must be between 0 and 1, got {0}")]
    InvalidTestSize(f64),

    #[error("cannot split {rows} rows with test size {test_size}: one side would be empty")]
    TooFewRows { rows: usize, test_size: f64 },
}

/// Randomly partitions `dataset` into (train, test). The test side gets
/// `ceil(test_size * n)` rows and the train side the rest; labels stay aligned
/// with their feature vectors.
pub fn train_test_split<R: Rng + ?Sized>(
    dataset: &Dataset,
    test_size: f64,
    rng: &mut R,
) -> Result<(Dataset, Dataset), SplitError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SplitError::InvalidTestSize(test_size));
    }

    let rows = dataset.len();
    let n_test = (test_size * rows as f64).ceil() as usize;
    if n_test == 0 || n_test >= rows {
        return Err(SplitError::TooFewRows { rows, test_size });
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    indices.shuffle(rng);

    let (test_indices, train_indices) = indices.split_at(n_test);
    Ok((take(dataset, train_indices), take(dataset, test_indices)))
}

fn take(dataset: &Dataset, indices: &[usize]) -> Dataset {
    Dataset {
        features: indices.iter().map(|&i| dataset.features[i]).collect(),
        labels: indices.iter().map(|&i| dataset.labels[i]).collect(),
    }
}
