//! Threshold strategies across facets.
//!
//! - **Single**: one threshold for the whole population, reported per facet.
//! - **Individual**: each facet searched on its own members.
//! - **Demographic parity**: one shared selection rate for every facet, at the
//!   lowest total cost.

use super::search::{
    search, weighted_cost, CandidateCurve, CandidatePoint, Confusion, CostRatio, ScoredPair,
    Threshold, ThresholdEvaluation,
};
use crate::facets::Facet;
use ft_config::CandidateGrid;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Named threshold policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Single,
    Individual,
    #[serde(rename = "Demographic parity")]
    DemographicParity,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Single,
        Strategy::Individual,
        Strategy::DemographicParity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Single => "Single",
            Strategy::Individual => "Individual",
            Strategy::DemographicParity => "Demographic parity",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per strategy, serialized under the strategy names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerStrategy<T> {
    #[serde(rename = "Single")]
    pub single: T,
    #[serde(rename = "Individual")]
    pub individual: T,
    #[serde(rename = "Demographic parity")]
    pub demographic_parity: T,
}

impl<T> PerStrategy<T> {
    pub fn get(&self, strategy: Strategy) -> &T {
        match strategy {
            Strategy::Single => &self.single,
            Strategy::Individual => &self.individual,
            Strategy::DemographicParity => &self.demographic_parity,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerStrategy<U> {
        PerStrategy {
            single: f(self.single),
            individual: f(self.individual),
            demographic_parity: f(self.demographic_parity),
        }
    }
}

/// Evaluations of every strategy on one facet; `None` is the sentinel.
pub type FacetEvaluations = PerStrategy<Option<ThresholdEvaluation>>;

impl FacetEvaluations {
    pub fn thresholds(&self) -> PerStrategy<Threshold> {
        self.map(|e| e.map(|e| e.threshold).into())
    }
}

/// Run all three strategies over `pairs`, restricted per facet.
///
/// `pairs` holds every evaluated example; facet members index into it.
pub fn run_strategies(
    pairs: &[ScoredPair],
    facets: &[Facet],
    cost_ratio: CostRatio,
    grid: CandidateGrid,
) -> BTreeMap<String, FacetEvaluations> {
    let single = search(pairs, cost_ratio, grid);

    let members: Vec<Vec<ScoredPair>> = facets
        .iter()
        .map(|facet| facet.members.iter().map(|&i| pairs[i]).collect())
        .collect();

    let individual: Vec<Option<ThresholdEvaluation>> = members
        .par_iter()
        .map(|facet_pairs| search(facet_pairs, cost_ratio, grid))
        .collect();

    let parity = demographic_parity(&members, cost_ratio, grid);

    facets
        .iter()
        .zip(&members)
        .zip(individual)
        .zip(parity)
        .map(|(((facet, facet_pairs), individual), demographic_parity)| {
            // Empty facets get no recommendation under any strategy.
            let single = if facet_pairs.is_empty() {
                None
            } else {
                single.map(|s| restrict(s, facet_pairs, cost_ratio))
            };
            (
                facet.name.clone(),
                PerStrategy {
                    single,
                    individual,
                    demographic_parity,
                },
            )
        })
        .collect()
}

/// Re-evaluate a global threshold on a facet's own members.
fn restrict(
    global: ThresholdEvaluation,
    facet_pairs: &[ScoredPair],
    cost_ratio: CostRatio,
) -> ThresholdEvaluation {
    let mut confusion = Confusion::default();
    for pair in facet_pairs {
        match (pair.probability >= global.threshold, pair.positive) {
            (true, true) => confusion.true_pos += 1,
            (true, false) => confusion.false_pos += 1,
            (false, false) => confusion.true_neg += 1,
            (false, true) => confusion.false_neg += 1,
        }
    }
    ThresholdEvaluation::new(
        &CandidatePoint {
            threshold: global.threshold,
            confusion,
        },
        cost_ratio,
    )
}

/// A selection rate as an exact fraction.
#[derive(Debug, Clone, Copy)]
struct Rate {
    selected: usize,
    size: usize,
}

impl Rate {
    fn cmp_exact(&self, other: &Rate) -> Ordering {
        let lhs = self.selected as u128 * other.size as u128;
        let rhs = other.selected as u128 * self.size as u128;
        lhs.cmp(&rhs)
    }
}

/// Attainable selection levels of one facet, ascending by selected count.
///
/// Each level keeps the smallest threshold reaching that count.
struct RateLevels {
    size: usize,
    levels: Vec<CandidatePoint>,
}

impl RateLevels {
    fn new(curve: &CandidateCurve) -> Option<Self> {
        let size = curve.points().first()?.confusion.total();
        // Ascending thresholds select non-increasing counts.
        let mut levels: Vec<CandidatePoint> = Vec::new();
        for point in curve.points() {
            if levels
                .last()
                .is_some_and(|last| last.confusion.selected() == point.confusion.selected())
            {
                continue;
            }
            levels.push(*point);
        }
        levels.reverse();
        Some(Self { size, levels })
    }

    fn rates(&self) -> impl Iterator<Item = Rate> + '_ {
        self.levels.iter().map(|p| Rate {
            selected: p.confusion.selected(),
            size: self.size,
        })
    }

    /// Level with the largest rate not above `target`, else the lowest level.
    fn at_most(&self, target: Rate) -> &CandidatePoint {
        let idx = self.levels.partition_point(|p| {
            Rate {
                selected: p.confusion.selected(),
                size: self.size,
            }
            .cmp_exact(&target)
                != Ordering::Greater
        });
        &self.levels[idx.saturating_sub(1)]
    }
}

/// Per-facet thresholds sharing one selection rate at minimum total cost.
///
/// Candidate rates are every rate some facet can attain. Among equally cheap
/// rates the highest one wins.
pub fn demographic_parity(
    facets: &[Vec<ScoredPair>],
    cost_ratio: CostRatio,
    grid: CandidateGrid,
) -> Vec<Option<ThresholdEvaluation>> {
    let tables: Vec<Option<RateLevels>> = facets
        .iter()
        .map(|pairs| RateLevels::new(&CandidateCurve::build(pairs, grid)))
        .collect();

    let mut rates: Vec<Rate> = tables.iter().flatten().flat_map(RateLevels::rates).collect();
    rates.sort_by(|a, b| b.cmp_exact(a));
    rates.dedup_by(|a, b| a.cmp_exact(b) == Ordering::Equal);

    let mut best: Option<(Rate, f64)> = None;
    for &rate in &rates {
        let (false_pos, false_neg) = tables
            .iter()
            .flatten()
            .map(|t| t.at_most(rate).confusion)
            .fold((0usize, 0usize), |(fp, fneg), c| {
                (fp + c.false_pos, fneg + c.false_neg)
            });
        let cost = weighted_cost(false_pos, false_neg, cost_ratio);
        // Rates are visited high to low; only a strictly lower cost moves on.
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((rate, cost)),
        }
    }

    tracing::debug!(
        target: "threshold.parity",
        facets = facets.len(),
        candidate_rates = rates.len(),
        total_cost = ?best.map(|(_, c)| c),
        "Demographic parity search complete"
    );

    tables
        .iter()
        .map(|table| {
            let (rate, _) = best?;
            let table = table.as_ref()?;
            Some(ThresholdEvaluation::new(table.at_most(rate), cost_ratio))
        })
        .collect()
}
