//! Per-build coverage accessor
//!
//! `CoverageAction` is what a build record carries: the report cache for that
//! build plus its optional health targets. Every accessor re-reads the cache,
//! so callers always see the freshest snapshot and get `None` instead of a
//! crash when the report is unavailable.

use std::sync::Arc;

use crate::cache::ReportCache;
use crate::health::{self, HealthReport};
use crate::history::BuildId;
use crate::model::{ClassCoverage, CoverageCounts, FileCoverage, PackageCoverage, ProjectCoverage};
use crate::ratio::Ratio;
use crate::targets::{CoverageMetric, CoverageTarget};

pub struct CoverageAction {
    cache: ReportCache,
    healthy: Option<CoverageTarget>,
    unhealthy: Option<CoverageTarget>,
}

impl CoverageAction {
    pub fn new(
        cache: ReportCache,
        healthy: Option<CoverageTarget>,
        unhealthy: Option<CoverageTarget>,
    ) -> Self {
        Self {
            cache,
            healthy,
            unhealthy,
        }
    }

    pub fn owner(&self) -> BuildId {
        self.cache.owner()
    }

    /// The current snapshot, reparsed transparently after reclamation
    pub fn result(&self) -> Option<Arc<ProjectCoverage>> {
        self.cache.snapshot()
    }

    /// Health of this build's coverage, if targets are configured and the
    /// report is readable
    pub fn build_health(&self) -> Option<HealthReport> {
        if self.healthy.is_none() || self.unhealthy.is_none() {
            return None;
        }
        let coverage = self.result()?;
        health::build_health(&coverage, self.healthy.as_ref(), self.unhealthy.as_ref())
    }

    pub fn ratio(&self, metric: CoverageMetric) -> Option<Ratio> {
        self.result().map(|c| c.ratio(metric))
    }

    pub fn method_coverage(&self) -> Option<Ratio> {
        self.ratio(CoverageMetric::Method)
    }

    pub fn conditional_coverage(&self) -> Option<Ratio> {
        self.ratio(CoverageMetric::Conditional)
    }

    pub fn statement_coverage(&self) -> Option<Ratio> {
        self.ratio(CoverageMetric::Statement)
    }

    pub fn element_coverage(&self) -> Option<Ratio> {
        self.ratio(CoverageMetric::Element)
    }

    pub fn counts(&self) -> Option<CoverageCounts> {
        self.result().map(|c| c.counts())
    }

    pub fn find_package_coverage(&self, name: &str) -> Option<PackageCoverage> {
        self.result()?.find_package_coverage(name).cloned()
    }

    pub fn find_file_coverage(&self, name: &str) -> Option<FileCoverage> {
        self.result()?.find_file_coverage(name).cloned()
    }

    pub fn find_class_coverage(&self, name: &str) -> Option<ClassCoverage> {
        self.result()?.find_class_coverage(name).cloned()
    }
}
