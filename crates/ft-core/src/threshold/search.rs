//! Cost-minimizing threshold search over (probability, label) pairs.
//!
//! A candidate threshold `t` predicts positive for every example scoring
//! `p >= t`. Its cost is `cost_ratio * FP(t) + FN(t)`, evaluated from integer
//! confusion counts at each candidate so that equal counts always compare
//! equal. The cheapest candidate wins; ties go to the smallest threshold.

use ft_common::{Error, Result};
use ft_config::CandidateGrid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A predicted probability paired with its ground truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub probability: f64,
    pub positive: bool,
}

impl ScoredPair {
    pub fn new(probability: f64, positive: bool) -> Self {
        Self {
            probability,
            positive,
        }
    }
}

/// Cost of one false positive relative to one false negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CostRatio(f64);

impl CostRatio {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidCostRatio { value })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for CostRatio {
    fn default() -> Self {
        Self(ft_config::DEFAULT_COST_RATIO)
    }
}

/// A decision threshold, or the sentinel for "no recommendation".
///
/// Serializes as a number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Threshold {
    Value(f64),
    Undefined,
}

impl Threshold {
    pub fn value(self) -> Option<f64> {
        match self {
            Threshold::Value(v) => Some(v),
            Threshold::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Threshold::Undefined)
    }
}

impl From<Option<f64>> for Threshold {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Threshold::Undefined, Threshold::Value)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Threshold::Value(v) => write!(f, "{v}"),
            Threshold::Undefined => write!(f, "undefined"),
        }
    }
}

/// Confusion counts at one threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Confusion {
    #[serde(rename = "tp")]
    pub true_pos: usize,
    #[serde(rename = "fp")]
    pub false_pos: usize,
    #[serde(rename = "tn")]
    pub true_neg: usize,
    #[serde(rename = "fn")]
    pub false_neg: usize,
}

impl Confusion {
    pub fn total(&self) -> usize {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    /// Examples predicted positive.
    pub fn selected(&self) -> usize {
        self.true_pos + self.false_pos
    }

    pub fn cost(&self, cost_ratio: CostRatio) -> f64 {
        weighted_cost(self.false_pos, self.false_neg, cost_ratio)
    }

    pub fn selection_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.selected() as f64 / n as f64,
        }
    }
}

/// Cost from integer error counts.
pub(crate) fn weighted_cost(false_pos: usize, false_neg: usize, cost_ratio: CostRatio) -> f64 {
    cost_ratio.get() * false_pos as f64 + false_neg as f64
}

/// One candidate threshold with its confusion counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePoint {
    pub threshold: f64,
    pub confusion: Confusion,
}

/// What a chosen threshold does on the examples it was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdEvaluation {
    pub threshold: f64,
    #[serde(flatten)]
    pub confusion: Confusion,
    pub cost: f64,
    pub selection_rate: f64,
}

impl ThresholdEvaluation {
    pub fn new(point: &CandidatePoint, cost_ratio: CostRatio) -> Self {
        Self {
            threshold: point.threshold,
            confusion: point.confusion,
            cost: point.confusion.cost(cost_ratio),
            selection_rate: point.confusion.selection_rate(),
        }
    }
}

/// Confusion counts at every candidate threshold, ascending by threshold.
#[derive(Debug, Clone, Default)]
pub struct CandidateCurve {
    points: Vec<CandidatePoint>,
}

impl CandidateCurve {
    /// Build the curve for `pairs`. Empty input yields an empty curve.
    pub fn build(pairs: &[ScoredPair], grid: CandidateGrid) -> Self {
        if pairs.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<ScoredPair> = pairs.to_vec();
        sorted.sort_by(|a, b| a.probability.total_cmp(&b.probability));

        // pos_below[i] / neg_below[i]: labels among the i lowest scores.
        let mut pos_below = Vec::with_capacity(sorted.len() + 1);
        let mut neg_below = Vec::with_capacity(sorted.len() + 1);
        pos_below.push(0usize);
        neg_below.push(0usize);
        let (mut total_pos, mut total_neg) = (0usize, 0usize);
        for pair in &sorted {
            if pair.positive {
                total_pos += 1;
            } else {
                total_neg += 1;
            }
            pos_below.push(total_pos);
            neg_below.push(total_neg);
        }

        let points = candidate_thresholds(&sorted, grid)
            .into_iter()
            .map(|threshold| {
                let below = sorted.partition_point(|p| p.probability < threshold);
                let false_neg = pos_below[below];
                let true_neg = neg_below[below];
                CandidatePoint {
                    threshold,
                    confusion: Confusion {
                        true_pos: total_pos - false_neg,
                        false_pos: total_neg - true_neg,
                        true_neg,
                        false_neg,
                    },
                }
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[CandidatePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cheapest point; ties go to the smallest threshold.
    pub fn best(&self, cost_ratio: CostRatio) -> Option<&CandidatePoint> {
        let mut best: Option<(&CandidatePoint, f64)> = None;
        for point in &self.points {
            let cost = point.confusion.cost(cost_ratio);
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((point, cost)),
            }
        }
        best.map(|(point, _)| point)
    }
}

/// Ascending candidate thresholds for scores already sorted ascending.
fn candidate_thresholds(sorted: &[ScoredPair], grid: CandidateGrid) -> Vec<f64> {
    match grid {
        CandidateGrid::Observed => {
            let mut candidates = Vec::with_capacity(sorted.len() + 1);
            candidates.push(0.0);
            for pair in sorted {
                // Normalizes -0.0 so it collapses into the zero candidate.
                let p = pair.probability + 0.0;
                if candidates.last().is_some_and(|&last| last == p) {
                    continue;
                }
                if p > 0.0 {
                    candidates.push(p);
                }
            }
            candidates
        }
        CandidateGrid::Uniform { steps } => {
            let steps = steps.max(1);
            (0..=steps)
                .map(|k| f64::from(k) / f64::from(steps))
                .collect()
        }
    }
}

/// Evaluate the cost-minimizing threshold, `None` for empty input.
pub fn search(
    pairs: &[ScoredPair],
    cost_ratio: CostRatio,
    grid: CandidateGrid,
) -> Option<ThresholdEvaluation> {
    let curve = CandidateCurve::build(pairs, grid);
    let evaluation = curve
        .best(cost_ratio)
        .map(|point| ThresholdEvaluation::new(point, cost_ratio));
    tracing::trace!(
        target: "threshold.search",
        pairs = pairs.len(),
        candidates = curve.points().len(),
        cost_ratio = cost_ratio.get(),
        threshold = ?evaluation.map(|e| e.threshold),
        "Threshold search complete"
    );
    evaluation
}

/// The cost-minimizing threshold over the observed candidates.
pub fn find_threshold(pairs: &[ScoredPair], cost_ratio: CostRatio) -> Threshold {
    search(pairs, cost_ratio, CandidateGrid::Observed)
        .map(|e| e.threshold)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(f64, bool)]) -> Vec<ScoredPair> {
        raw.iter().map(|&(p, y)| ScoredPair::new(p, y)).collect()
    }

    fn ratio(v: f64) -> CostRatio {
        CostRatio::new(v).unwrap()
    }

    #[test]
    fn test_empty_input_is_undefined() {
        assert_eq!(find_threshold(&[], ratio(1.0)), Threshold::Undefined);
        assert!(search(&[], ratio(1.0), CandidateGrid::Uniform { steps: 10 }).is_none());
    }

    #[test]
    fn test_cost_ratio_must_be_positive() {
        assert!(CostRatio::new(0.0).is_err());
        assert!(CostRatio::new(-0.5).is_err());
        assert!(CostRatio::new(f64::NAN).is_err());
        assert_eq!(CostRatio::default().get(), 1.0);
    }

    #[test]
    fn test_separable_data_cuts_at_lowest_positive() {
        let data = pairs(&[(0.1, false), (0.2, false), (0.8, true), (0.9, true)]);
        assert_eq!(find_threshold(&data, ratio(1.0)), Threshold::Value(0.8));
    }

    #[test]
    fn test_all_positive_picks_zero() {
        let data = pairs(&[(0.3, true), (0.6, true)]);
        assert_eq!(find_threshold(&data, ratio(1.0)), Threshold::Value(0.0));
    }

    #[test]
    fn test_all_negative_picks_highest_score() {
        // No observed candidate lies above the top score, so one FP remains.
        let data = pairs(&[(0.3, false), (0.6, false)]);
        let eval = search(&data, ratio(1.0), CandidateGrid::Observed).unwrap();
        assert_eq!(eval.threshold, 0.6);
        assert_eq!(eval.confusion.false_pos, 1);
    }

    #[test]
    fn test_ties_go_to_smallest_threshold() {
        // t=0 and t=0.2 cost one FP, t=0.8 costs one FN.
        let data = pairs(&[(0.2, true), (0.5, false), (0.8, true)]);
        let curve = CandidateCurve::build(&data, CandidateGrid::Observed);
        assert_eq!(curve.points().len(), 4);
        assert_eq!(find_threshold(&data, ratio(1.0)), Threshold::Value(0.0));
    }

    #[test]
    fn test_duplicate_scores_share_a_candidate() {
        let data = pairs(&[(0.4, true), (0.4, false), (0.0, false)]);
        let curve = CandidateCurve::build(&data, CandidateGrid::Observed);
        let thresholds: Vec<f64> = curve.points().iter().map(|p| p.threshold).collect();
        assert_eq!(thresholds, vec![0.0, 0.4]);
    }

    #[test]
    fn test_zero_threshold_selects_everything() {
        let data = pairs(&[(0.0, false), (0.0, true), (0.7, true)]);
        let curve = CandidateCurve::build(&data, CandidateGrid::Observed);
        let zero = curve.points()[0];
        assert_eq!(zero.threshold, 0.0);
        assert_eq!(zero.confusion.selected(), 3);
    }

    #[test]
    fn test_confusion_counts_are_consistent() {
        let data = pairs(&[(0.1, true), (0.3, false), (0.5, true), (0.7, false), (0.9, true)]);
        let curve = CandidateCurve::build(&data, CandidateGrid::Observed);
        for point in curve.points() {
            let c = point.confusion;
            assert_eq!(c.total(), 5);
            assert_eq!(c.true_pos + c.false_neg, 3);
            assert_eq!(c.false_pos + c.true_neg, 2);
        }
    }

    #[test]
    fn test_higher_ratio_is_more_conservative() {
        let data = pairs(&[
            (0.05, true),
            (0.10, false),
            (0.30, false),
            (0.71, true),
            (0.74, true),
            (0.76, true),
            (0.80, false),
            (0.86, true),
            (0.86, false),
        ]);
        assert_eq!(find_threshold(&data, ratio(0.2)), Threshold::Value(0.0));
        assert_eq!(find_threshold(&data, ratio(1.0)), Threshold::Value(0.71));
        assert_eq!(find_threshold(&data, ratio(5.0)), Threshold::Value(0.86));
    }

    #[test]
    fn test_uniform_grid_can_exceed_every_score() {
        let data = pairs(&[(0.3, false), (0.62, false)]);
        let eval = search(&data, ratio(1.0), CandidateGrid::Uniform { steps: 100 }).unwrap();
        assert!((eval.threshold - 0.63).abs() < 1e-12);
        assert_eq!(eval.confusion.false_pos, 0);
        assert_eq!(eval.cost, 0.0);
        assert_eq!(eval.selection_rate, 0.0);
    }

    #[test]
    fn test_threshold_serializes_as_number_or_null() {
        assert_eq!(serde_json::to_string(&Threshold::Value(0.71)).unwrap(), "0.71");
        assert_eq!(serde_json::to_string(&Threshold::Undefined).unwrap(), "null");
        let back: Threshold = serde_json::from_str("null").unwrap();
        assert!(back.is_undefined());
    }
}
