use csv::StringRecord;
use std::{fs::File, io::Read, path::Path};
use thiserror::Error;

pub const NUM_FEATURES: usize = 17;

pub type FeatureVector = [f64; NUM_FEATURES];
pub type Label = u8;

/// How the text of a single cell is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Integer,
    Float,
    Month,
    VisitorType,
    Flag,
    /// Not a feature; the cell becomes the row's label.
    Label,
}

/// Every column the loader accepts, in feature-vector order. `Revenue` is
/// last and is the only column that does not land in the feature vector.
pub const COLUMNS: [(&str, Encoding); NUM_FEATURES + 1] = [
    ("Administrative", Encoding::Integer),
    ("Administrative_Duration", Encoding::Float),
    ("Informational", Encoding::Integer),
    ("Informational_Duration", Encoding::Float),
    ("ProductRelated", Encoding::Integer),
    ("ProductRelated_Duration", Encoding::Float),
    ("BounceRates", Encoding::Float),
    ("ExitRates", Encoding::Float),
    ("PageValues", Encoding::Float),
    ("SpecialDay", Encoding::Float),
    ("Month", Encoding::Month),
    ("OperatingSystems", Encoding::Integer),
    ("Browser", Encoding::Integer),
    ("Region", Encoding::Integer),
    ("TrafficType", Encoding::Integer),
    ("VisitorType", Encoding::VisitorType),
    ("Weekend", Encoding::Flag),
    ("Revenue", Encoding::Label),
];

// "may" and "june" are what the source data actually uses.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "june", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{0} type not coercable")]
    UnknownColumn(String),

    #[error("missing column {0}")]
    MissingColumn(&'static str),

    #[error("column {0} appears more than once")]
    DuplicateColumn(String),

    #[error("row {row}: {column} value {value:?} is not an integer")]
    InvalidInteger {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {column} value {value:?} is not a finite number")]
    InvalidFloat {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: unknown month {value:?}")]
    UnknownMonth { row: usize, value: String },
}

/// Feature vectors and their index-aligned labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<Label>,
}

/// Maps a month abbreviation (any case) to 0 for January through 11 for December.
pub fn encode_month(value: &str) -> Option<usize> {
    let value = value.to_lowercase();
    MONTHS.iter().position(|&month| month == value)
}

pub fn encode_visitor_type(value: &str) -> u8 {
    (value == "Returning_Visitor") as u8
}

/// `"TRUE"` is 1, anything else is 0.
pub fn encode_flag(value: &str) -> u8 {
    (value == "TRUE") as u8
}

// Where one physical column of the file ends up.
struct Slot {
    column: &'static str,
    encoding: Encoding,
    index: usize,
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_reader(rdr);
        let slots = resolve_headers(reader.headers()?)?;

        let mut dataset = Dataset::default();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let (features, label) = encode_record(&slots, &record, i + 1)?;
            dataset.features.push(features);
            dataset.labels.push(label);
        }

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows labelled 1.
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&label| label == 1).count()
    }
}

/// Checks the header row against the column table before any data is read.
fn resolve_headers(headers: &StringRecord) -> Result<Vec<Slot>, DatasetError> {
    let mut seen = [false; NUM_FEATURES + 1];
    let mut slots = Vec::with_capacity(headers.len());

    for header in headers {
        let index = COLUMNS
            .iter()
            .position(|(column, _)| *column == header)
            .ok_or_else(|| DatasetError::UnknownColumn(header.to_string()))?;

        if seen[index] {
            return Err(DatasetError::DuplicateColumn(header.to_string()));
        }
        seen[index] = true;

        let (column, encoding) = COLUMNS[index];
        slots.push(Slot {
            column,
            encoding,
            index,
        });
    }

    if let Some(missing) = seen.iter().position(|&present| !present) {
        return Err(DatasetError::MissingColumn(COLUMNS[missing].0));
    }

    Ok(slots)
}

fn encode_record(
    slots: &[Slot],
    record: &StringRecord,
    row: usize,
) -> Result<(FeatureVector, Label), DatasetError> {
    let mut features = [0.0; NUM_FEATURES];
    let mut label = 0;

    // The csv reader rejects records whose length differs from the header.
    for (slot, cell) in slots.iter().zip(record.iter()) {
        let value = match slot.encoding {
            Encoding::Integer => cell
                .trim()
                .parse::<i64>()
                .map_err(|_| DatasetError::InvalidInteger {
                    row,
                    column: slot.column,
                    value: cell.to_string(),
                })? as f64,
            Encoding::Float => cell
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| DatasetError::InvalidFloat {
                    row,
                    column: slot.column,
                    value: cell.to_string(),
                })?,
            Encoding::Month => encode_month(cell).ok_or_else(|| DatasetError::UnknownMonth {
                row,
                value: cell.to_string(),
            })? as f64,
            Encoding::VisitorType => encode_visitor_type(cell) as f64,
            Encoding::Flag => encode_flag(cell) as f64,
            Encoding::Label => {
                label = encode_flag(cell);
                continue;
            }
        };

        features[slot.index] = value;
    }

    Ok((features, label))
}
