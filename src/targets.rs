//! Coverage metrics and threshold targets

use serde::{Deserialize, Serialize};

use crate::model::ProjectCoverage;

/// The four tracked coverage dimensions, in scoring order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMetric {
    Method,
    Conditional,
    Statement,
    Element,
}

impl CoverageMetric {
    /// Fixed order used for scoring and tie-breaking
    pub const ALL: [CoverageMetric; 4] = [
        CoverageMetric::Method,
        CoverageMetric::Conditional,
        CoverageMetric::Statement,
        CoverageMetric::Element,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CoverageMetric::Method => "Methods",
            CoverageMetric::Conditional => "Conditionals",
            CoverageMetric::Statement => "Statements",
            CoverageMetric::Element => "Elements",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Per-metric percentage thresholds
///
/// A fixed four-slot table rather than a map: a `None` slot means the metric
/// is not tracked and is excluded from scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverageTarget {
    targets: [Option<f64>; 4],
}

impl CoverageTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, metric: CoverageMetric, percentage: f64) {
        self.targets[metric.index()] = Some(percentage);
    }

    pub fn get(&self, metric: CoverageMetric) -> Option<f64> {
        self.targets[metric.index()]
    }

    pub fn is_tracked(&self, metric: CoverageMetric) -> bool {
        self.targets[metric.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.iter().all(|t| t.is_none())
    }

    /// Score each metric tracked by both targets against the snapshot
    ///
    /// `self` is the healthy (score 100) end of the band, `unhealthy` the
    /// score-0 end. Results come back in `CoverageMetric::ALL` order.
    pub fn range_scores(
        &self,
        unhealthy: &CoverageTarget,
        coverage: &ProjectCoverage,
    ) -> Vec<(CoverageMetric, u32)> {
        let mut scores = Vec::new();
        for metric in CoverageMetric::ALL {
            if let (Some(healthy_pct), Some(unhealthy_pct)) =
                (self.get(metric), unhealthy.get(metric))
            {
                let actual = coverage.ratio(metric).percentage();
                scores.push((metric, range_score(actual, healthy_pct, unhealthy_pct)));
            }
        }
        scores
    }
}

/// Linear interpolation of `actual` between the unhealthy (0) and healthy
/// (100) thresholds, clamped to [0, 100]
fn range_score(actual: f64, healthy: f64, unhealthy: f64) -> u32 {
    if actual >= healthy {
        100
    } else if actual <= unhealthy {
        0
    } else {
        let score = (actual - unhealthy) / (healthy - unhealthy) * 100.0;
        (score.round() as u32).min(100)
    }
}
