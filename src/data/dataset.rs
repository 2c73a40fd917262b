use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::math::Vector;

/// One training sample: an input and the output the model should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub input: Vector,
    pub ground_truth: Vector,
}

impl DatasetEntry {
    pub fn new(input: impl Into<Vector>, ground_truth: impl Into<Vector>) -> DatasetEntry {
        DatasetEntry {
            input: input.into(),
            ground_truth: ground_truth.into(),
        }
    }
}

/// Ordered collection of samples. Dereferences to `[DatasetEntry]`, which is
/// what the trainer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<DatasetEntry>) -> Dataset {
        Dataset { entries }
    }

    /// Zips parallel input/target lists. Panics if their lengths differ.
    pub fn from_pairs(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Dataset {
        assert_eq!(
            inputs.len(),
            targets.len(),
            "inputs and targets must have equal length"
        );
        inputs
            .into_iter()
            .zip(targets)
            .map(|(input, target)| DatasetEntry::new(input, target))
            .collect()
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: DatasetEntry) {
        self.entries.push(entry);
    }

    pub fn into_entries(self) -> Vec<DatasetEntry> {
        self.entries
    }
}

impl Deref for Dataset {
    type Target = [DatasetEntry];

    fn deref(&self) -> &[DatasetEntry] {
        &self.entries
    }
}

impl FromIterator<DatasetEntry> for Dataset {
    fn from_iter<I: IntoIterator<Item = DatasetEntry>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl From<Vec<DatasetEntry>> for Dataset {
    fn from(entries: Vec<DatasetEntry>) -> Self {
        Dataset::new(entries)
    }
}
