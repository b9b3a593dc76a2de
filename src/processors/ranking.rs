//! Score-to-probability conversion and ranked top-k selection.
//!
//! Raw model scores are turned into a probability distribution with a
//! numerically stable softmax, paired with their labels, and sorted by
//! confidence descending.

use crate::core::errors::ClassifierError;
use crate::core::labels::LabelTable;
use crate::core::Tensor2D;
use serde::{Deserialize, Serialize};

/// A single labeled prediction with its calibrated confidence in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Human-readable class name.
    pub label: String,
    /// Softmax probability for this class.
    pub confidence: f32,
}

/// Applies a numerically stable softmax to the first batch row of `scores`.
///
/// The row maximum is subtracted before exponentiating, so large positive
/// scores cannot overflow, and the result always sums to 1 within
/// floating-point tolerance. Only row 0 is consumed: the pipeline never
/// varies batch size from 1.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the score tensor has no rows or no columns.
pub fn softmax(scores: &Tensor2D) -> Result<Vec<f32>, ClassifierError> {
    if scores.nrows() == 0 || scores.ncols() == 0 {
        return Err(ClassifierError::InvalidInput {
            message: format!(
                "cannot apply softmax to an empty score tensor, got shape {:?}",
                scores.shape()
            ),
        });
    }

    let row = scores.row(0);
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let exp: Vec<f32> = row.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exp.iter().sum();

    Ok(exp.into_iter().map(|e| e / sum).collect())
}

/// Converts raw scores into a label-aligned list sorted by confidence descending.
///
/// Position `i` of the score vector is paired with `labels[i]`. The sort is
/// stable, so exactly equal confidences keep their label-table order.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the score width does not match the
/// label count. The pairing is normally guaranteed at model-load time; this
/// guard only catches an engine handing over the wrong tensor.
pub fn to_ranked_predictions(
    scores: &Tensor2D,
    labels: &LabelTable,
) -> Result<Vec<Prediction>, ClassifierError> {
    let probs = softmax(scores)?;

    if probs.len() != labels.len() {
        return Err(ClassifierError::InvalidInput {
            message: format!(
                "score vector has {} entries but the label table has {}",
                probs.len(),
                labels.len()
            ),
        });
    }

    let mut predictions: Vec<Prediction> = probs
        .into_iter()
        .zip(labels.as_slice())
        .map(|(confidence, label)| Prediction {
            label: label.clone(),
            confidence,
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(predictions)
}

/// Truncates a ranked prediction list to its top `k` entries.
///
/// Clamping, not failing: `k = 0` yields an empty list, `k` beyond the
/// number of predictions yields the full list unchanged.
pub fn truncate_top_k(mut predictions: Vec<Prediction>, k: usize) -> Vec<Prediction> {
    predictions.truncate(k);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(names: &[&str]) -> LabelTable {
        LabelTable::from_names(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let scores = array![[1.0f32, 2.0, 3.0, 4.0]];
        let probs = softmax(&scores).unwrap();
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_softmax_survives_large_scores() {
        let scores = array![[1000.0f32, 999.0, 998.0]];
        let probs = softmax(&scores).unwrap();
        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_softmax_consumes_only_row_zero() {
        let scores = array![[5.0f32, 0.0], [0.0, 5.0]];
        let probs = softmax(&scores).unwrap();
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_softmax_rejects_empty_tensor() {
        let scores = Tensor2D::zeros((0, 0));
        assert!(softmax(&scores).is_err());
    }

    #[test]
    fn test_ranking_sorts_descending() {
        let scores = array![[0.5f32, 3.0, 1.0]];
        let ranked = to_ranked_predictions(&scores, &labels(&["a", "b", "c"])).unwrap();

        assert_eq!(ranked[0].label, "b");
        for pair in ranked.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_ranking_ties_keep_label_order() {
        let scores = array![[2.0f32, 2.0, 5.0]];
        let ranked = to_ranked_predictions(&scores, &labels(&["a", "b", "c"])).unwrap();

        assert_eq!(ranked[0].label, "c");
        assert_eq!(ranked[1].label, "a");
        assert_eq!(ranked[2].label, "b");
    }

    #[test]
    fn test_ranking_rejects_label_mismatch() {
        let scores = array![[1.0f32, 2.0]];
        let result = to_ranked_predictions(&scores, &labels(&["only one"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_truncate_clamps_both_ends() {
        let scores = array![[1.0f32, 2.0, 3.0]];
        let ranked = to_ranked_predictions(&scores, &labels(&["a", "b", "c"])).unwrap();

        assert!(truncate_top_k(ranked.clone(), 0).is_empty());
        assert_eq!(truncate_top_k(ranked.clone(), 100), ranked);
        assert_eq!(truncate_top_k(ranked, 2).len(), 2);
    }
}
