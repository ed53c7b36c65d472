//! Health scoring over a coverage snapshot
//!
//! A build is only as healthy as its weakest tracked metric: every metric
//! tracked by both targets gets a 0-100 range score, and the minimum wins.

use serde::Serialize;

use crate::model::ProjectCoverage;
use crate::targets::{CoverageMetric, CoverageTarget};

/// A 0-100 health value plus the line shown for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub score: u32,
    pub description: String,
}

/// Score a snapshot against healthy/unhealthy targets
///
/// Health reporting is opt-in: `None` when either target is missing, or when
/// no metric is tracked by both. On a tie the metric earliest in
/// `CoverageMetric::ALL` is reported.
pub fn build_health(
    coverage: &ProjectCoverage,
    healthy: Option<&CoverageTarget>,
    unhealthy: Option<&CoverageTarget>,
) -> Option<HealthReport> {
    let healthy = healthy?;
    let unhealthy = unhealthy?;

    let mut worst: Option<(CoverageMetric, u32)> = None;
    for (metric, score) in healthy.range_scores(unhealthy, coverage) {
        if worst.map_or(true, |(_, min)| score < min) {
            worst = Some((metric, score));
        }
    }

    let (metric, score) = worst?;
    let ratio = coverage.ratio(metric);
    let description = format!(
        "Clover Coverage: {} {:.1}% ({})",
        metric.label(),
        ratio.percentage(),
        ratio
    );

    Some(HealthReport { score, description })
}
