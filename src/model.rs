//! In-memory model of a parsed Clover report
//!
//! A snapshot is immutable once the parser has produced it: project at the
//! root, then packages, files, and classes, each carrying an aggregated
//! `CoverageCounts` block.

use serde::Serialize;

use crate::history::BuildId;
use crate::ratio::Ratio;
use crate::targets::CoverageMetric;

/// Aggregated counters for one node of the report tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageCounts {
    pub packages: u32,
    pub files: u32,
    pub classes: u32,
    pub loc: u32,
    pub ncloc: u32,
    pub methods: u32,
    pub covered_methods: u32,
    pub conditionals: u32,
    pub covered_conditionals: u32,
    pub statements: u32,
    pub covered_statements: u32,
    pub elements: u32,
    pub covered_elements: u32,
}

impl CoverageCounts {
    pub fn ratio(&self, metric: CoverageMetric) -> Ratio {
        match metric {
            CoverageMetric::Method => Ratio::new(self.covered_methods, self.methods),
            CoverageMetric::Conditional => Ratio::new(self.covered_conditionals, self.conditionals),
            CoverageMetric::Statement => Ratio::new(self.covered_statements, self.statements),
            CoverageMetric::Element => Ratio::new(self.covered_elements, self.elements),
        }
    }

    fn add(&mut self, other: &CoverageCounts) {
        self.packages += other.packages;
        self.files += other.files;
        self.classes += other.classes;
        self.loc += other.loc;
        self.ncloc += other.ncloc;
        self.methods += other.methods;
        self.covered_methods += other.covered_methods;
        self.conditionals += other.conditionals;
        self.covered_conditionals += other.covered_conditionals;
        self.statements += other.statements;
        self.covered_statements += other.covered_statements;
        self.elements += other.elements;
        self.covered_elements += other.covered_elements;
    }
}

/// Project-level snapshot, the root of the report tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCoverage {
    pub name: String,
    /// Aggregate block from the report, if present
    pub counts: Option<CoverageCounts>,
    pub packages: Vec<PackageCoverage>,
    /// Non-owning association with the build this snapshot was parsed for
    pub owner: Option<BuildId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageCoverage {
    pub name: String,
    pub counts: Option<CoverageCounts>,
    pub files: Vec<FileCoverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCoverage {
    pub name: String,
    /// Source path, relative to the build's base directory when it was under it
    pub path: String,
    pub counts: Option<CoverageCounts>,
    pub classes: Vec<ClassCoverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCoverage {
    pub name: String,
    pub counts: CoverageCounts,
}

impl ProjectCoverage {
    /// Aggregate counts, summed from packages if the report carried none
    pub fn counts(&self) -> CoverageCounts {
        self.counts.unwrap_or_else(|| {
            let mut total = CoverageCounts::default();
            for package in &self.packages {
                total.add(&package.counts());
            }
            total.packages = self.packages.len() as u32;
            total
        })
    }

    pub fn ratio(&self, metric: CoverageMetric) -> Ratio {
        self.counts().ratio(metric)
    }

    pub fn find_package_coverage(&self, name: &str) -> Option<&PackageCoverage> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn find_file_coverage(&self, name: &str) -> Option<&FileCoverage> {
        self.packages.iter().find_map(|p| p.find_file_coverage(name))
    }

    pub fn find_class_coverage(&self, name: &str) -> Option<&ClassCoverage> {
        self.packages
            .iter()
            .flat_map(|p| p.files.iter())
            .find_map(|f| f.find_class_coverage(name))
    }
}

impl PackageCoverage {
    pub fn counts(&self) -> CoverageCounts {
        self.counts.unwrap_or_else(|| {
            let mut total = CoverageCounts::default();
            for file in &self.files {
                total.add(&file.counts());
            }
            total.files = self.files.len() as u32;
            total
        })
    }

    pub fn ratio(&self, metric: CoverageMetric) -> Ratio {
        self.counts().ratio(metric)
    }

    pub fn find_file_coverage(&self, name: &str) -> Option<&FileCoverage> {
        self.files.iter().find(|f| f.name == name || f.path == name)
    }
}

impl FileCoverage {
    pub fn counts(&self) -> CoverageCounts {
        self.counts.unwrap_or_else(|| {
            let mut total = CoverageCounts::default();
            for class in &self.classes {
                total.add(&class.counts);
            }
            total.classes = self.classes.len() as u32;
            total
        })
    }

    pub fn ratio(&self, metric: CoverageMetric) -> Ratio {
        self.counts().ratio(metric)
    }

    pub fn find_class_coverage(&self, name: &str) -> Option<&ClassCoverage> {
        self.classes.iter().find(|c| c.name == name)
    }
}

impl ClassCoverage {
    pub fn ratio(&self, metric: CoverageMetric) -> Ratio {
        self.counts.ratio(metric)
    }
}
