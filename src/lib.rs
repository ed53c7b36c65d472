//! Cloverage - Clover coverage report access
//!
//! A library for working with Clover XML coverage reports:
//! - Clover report parsing into an immutable snapshot tree
//! - Per-build report cache, held weakly and reparsed on miss
//! - Range-based health scoring against healthy/unhealthy targets
//! - Build-chain lookup of the nearest previous build with coverage

pub mod action;
pub mod cache;
pub mod config;
pub mod health;
pub mod history;
pub mod model;
pub mod parser;
pub mod ratio;
pub mod targets;

pub use action::CoverageAction;
pub use cache::ReportCache;
pub use health::{build_health, HealthReport};
pub use history::{previous_with_coverage, BuildId, BuildRecord, Outcome};
pub use model::{ClassCoverage, CoverageCounts, FileCoverage, PackageCoverage, ProjectCoverage};
pub use ratio::Ratio;
pub use targets::{CoverageMetric, CoverageTarget};
