//! Labeled sensor records and their dense-matrix views.
//!
//! A [`Dataset`] is validated once at construction, so the conversion
//! methods can hand out matrices and vectors without re-checking shapes.

use crate::error::{PodarError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// One timestamped observation from one sensor unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Observation timestamp, seconds since the Unix epoch.
    pub valid_at: i64,
    /// Identifier of the originating sensor unit.
    pub sensor_id: String,
    /// Feature values, one per dataset feature name.
    pub features: Vec<f32>,
    /// Reference value the system is calibrated against.
    pub target: f32,
}

impl Record {
    /// Creates a record.
    #[must_use]
    pub fn new(
        valid_at: i64,
        sensor_id: impl Into<String>,
        features: Vec<f32>,
        target: f32,
    ) -> Self {
        Self {
            valid_at,
            sensor_id: sensor_id.into(),
            features,
            target,
        }
    }
}

/// A collection of records sharing one feature layout.
///
/// # Examples
///
/// ```
/// use podar::dataset::{Dataset, Record};
///
/// let ds = Dataset::new(
///     vec!["pm_raw".into(), "humidity".into()],
///     vec![
///         Record::new(1_700_000_000, "unit-a", vec![12.0, 55.0], 10.5),
///         Record::new(1_700_000_060, "unit-a", vec![14.0, 57.0], 11.8),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.to_matrix().shape(), (2, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    feature_names: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset, validating every record against the feature layout.
    ///
    /// # Errors
    ///
    /// Returns an error when `feature_names` is empty, `records` is empty,
    /// or any record's feature count differs from the layout.
    pub fn new(feature_names: Vec<String>, records: Vec<Record>) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(PodarError::empty_input("feature names"));
        }
        if records.is_empty() {
            return Err(PodarError::empty_input("records"));
        }
        for (i, record) in records.iter().enumerate() {
            if record.features.len() != feature_names.len() {
                return Err(PodarError::DimensionMismatch {
                    expected: format!("{} features per record", feature_names.len()),
                    actual: format!("{} in record {i} ({})", record.features.len(), record.sensor_id),
                });
            }
        }
        Ok(Self {
            feature_names,
            records,
        })
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset holds no records. Construction rejects this
    /// state, so the method exists for the conventional pairing with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature names in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// The underlying records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Dense feature matrix, one row per record.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        let cols = self.feature_names.len();
        let mut data = Vec::with_capacity(self.records.len() * cols);
        for record in &self.records {
            data.extend_from_slice(&record.features);
        }
        // shape was validated at construction
        Matrix::from_vec(self.records.len(), cols, data)
            .unwrap_or_else(|_| unreachable!("record shapes validated at construction"))
    }

    /// Target values, one per record.
    #[must_use]
    pub fn targets(&self) -> Vector<f32> {
        Vector::from_vec(self.records.iter().map(|r| r.target).collect())
    }

    /// Sensor identifiers, one per record, aligned with `to_matrix` rows.
    #[must_use]
    pub fn group_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.sensor_id.as_str()).collect()
    }

    /// Pairs each record with a prediction, keeping the record order.
    ///
    /// # Errors
    ///
    /// Returns an error when the prediction count differs from the record
    /// count.
    pub fn join_predictions(&self, predictions: &Vector<f32>) -> Result<Vec<ScoredRecord>> {
        if predictions.len() != self.records.len() {
            return Err(PodarError::dimension_mismatch(
                "predictions",
                self.records.len(),
                predictions.len(),
            ));
        }
        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| ScoredRecord {
                record: record.clone(),
                prediction: predictions[i],
            })
            .collect())
    }
}

/// A record joined with its model prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// The original observation.
    pub record: Record,
    /// The model output for this record, NaN when undefined.
    pub prediction: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["pm_raw".into(), "humidity".into()],
            vec![
                Record::new(100, "unit-a", vec![10.0, 40.0], 9.0),
                Record::new(160, "unit-b", vec![20.0, 60.0], 18.0),
                Record::new(220, "unit-a", vec![30.0, 50.0], 27.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_layout_matches_records() {
        let ds = sample();
        let m = ds.to_matrix();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(0, 0), 10.0);
        assert_eq!(m.get(1, 1), 60.0);
        assert_eq!(m.get(2, 0), 30.0);
    }

    #[test]
    fn test_targets_and_groups_align_with_rows() {
        let ds = sample();
        assert_eq!(ds.targets().as_slice(), &[9.0, 18.0, 27.0]);
        assert_eq!(ds.group_ids(), vec!["unit-a", "unit-b", "unit-a"]);
    }

    #[test]
    fn test_rejects_ragged_records() {
        let result = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![
                Record::new(0, "u", vec![1.0, 2.0], 0.0),
                Record::new(1, "u", vec![1.0], 0.0),
            ],
        );
        assert!(matches!(result, Err(PodarError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Dataset::new(vec![], vec![Record::new(0, "u", vec![], 0.0)]).is_err());
        assert!(Dataset::new(vec!["a".into()], vec![]).is_err());
    }

    #[test]
    fn test_join_predictions_pairs_in_order() {
        let ds = sample();
        let scored = ds
            .join_predictions(&Vector::from_slice(&[9.5, 17.0, f32::NAN]))
            .unwrap();
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].prediction, 9.5);
        assert_eq!(scored[0].record.target, 9.0);
        assert!(scored[2].prediction.is_nan());
    }

    #[test]
    fn test_join_predictions_length_checked() {
        let ds = sample();
        assert!(ds.join_predictions(&Vector::from_slice(&[1.0])).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let ds = sample();
        let json = serde_json::to_string(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(ds, back);
    }
}
