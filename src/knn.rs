use crate::dataset::{FeatureVector, Label};
use clap::ValueEnum;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    /// A value that orders points the same way the metric does. For Euclidean
    /// this is the squared distance.
    fn rank(self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        let pairs = a.iter().zip(b.iter());
        match self {
            DistanceMetric::Euclidean => pairs.map(|(x, y)| (x - y) * (x - y)).sum(),
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FitError {
    #[error("cannot fit with zero training examples")]
    Empty,

    #[error("{features} feature vectors but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("training row {0} has a non-finite feature")]
    NonFinite(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("query {0} has a non-finite feature")]
pub struct NonFiniteQuery(pub usize);

fn first_non_finite(vectors: &[FeatureVector]) -> Option<usize> {
    vectors
        .iter()
        .position(|features| features.iter().any(|value| !value.is_finite()))
}

/// A k = 1 nearest neighbor classifier. Fitting keeps a copy of the training
/// set and every prediction is a brute-force scan over it. Features are used
/// as-is, with no scaling.
pub struct NearestNeighbor {
    metric: DistanceMetric,
    features: Vec<FeatureVector>,
    labels: Vec<Label>,
}

impl NearestNeighbor {
    /// Stores the training set. The metric starts as Euclidean; see `with_metric`.
    pub fn fit(features: &[FeatureVector], labels: &[Label]) -> Result<Self, FitError> {
        if features.len() != labels.len() {
            return Err(FitError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(FitError::Empty);
        }
        if let Some(row) = first_non_finite(features) {
            return Err(FitError::NonFinite(row));
        }

        Ok(NearestNeighbor {
            metric: DistanceMetric::default(),
            features: features.to_vec(),
            labels: labels.to_vec(),
        })
    }

    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Fails without predicting anything if any query holds a NaN or infinity.
    pub fn predict(&self, queries: &[FeatureVector]) -> Result<Vec<Label>, NonFiniteQuery> {
        if let Some(index) = first_non_finite(queries) {
            return Err(NonFiniteQuery(index));
        }
        Ok(queries.iter().map(|query| self.predict_one(query)).collect())
    }

    /// Label of the closest training vector. Ties go to the earliest one.
    fn predict_one(&self, query: &FeatureVector) -> Label {
        let (best_label, _) = self.features.iter().zip(&self.labels).fold(
            (self.labels[0], f64::INFINITY),
            |(best_label, best_distance), (features, &label)| {
                let distance = self.metric.rank(query, features);
                if distance < best_distance {
                    (label, distance)
                } else {
                    (best_label, best_distance)
                }
            },
        );

        best_label
    }
}
