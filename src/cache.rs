//! Reclaimable per-build report cache
//!
//! Each build owns one `ReportCache` for its clover.xml. The cache holds the
//! parsed snapshot only weakly: it stays live exactly as long as some caller
//! holds an `Arc` to it, and the next access after the last `Arc` drops
//! reparses the report transparently. No caller may rely on the cached value
//! surviving between calls.

use colored::Colorize;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::{Arc, Mutex, Weak};

use crate::history::BuildId;
use crate::model::ProjectCoverage;
use crate::parser;

pub struct ReportCache {
    owner: BuildId,
    report_file: PathBuf,
    base_dir: String,
    snapshot: Mutex<Weak<ProjectCoverage>>,
}

impl ReportCache {
    /// Create a cache for one build's report file
    ///
    /// The base directory is normalized once, here, to end with the platform
    /// path separator; absent, it defaults to the separator alone.
    pub fn new(owner: BuildId, report_file: PathBuf, base_dir: Option<&str>) -> Self {
        let base_dir = match base_dir {
            None => MAIN_SEPARATOR.to_string(),
            Some(dir) if dir.ends_with(MAIN_SEPARATOR) => dir.to_string(),
            Some(dir) => format!("{}{}", dir, MAIN_SEPARATOR),
        };

        Self {
            owner,
            report_file,
            base_dir,
            snapshot: Mutex::new(Weak::new()),
        }
    }

    pub fn owner(&self) -> BuildId {
        self.owner
    }

    pub fn report_file(&self) -> &Path {
        &self.report_file
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// Get the parsed snapshot, reparsing the report if it was reclaimed
    ///
    /// The populate path runs under the cache mutex, so at most one parse is
    /// in flight per build and a half-built snapshot is never observable.
    /// Returns `None` when the report is missing or malformed; that is logged
    /// as a warning, not escalated.
    pub fn snapshot(&self) -> Option<Arc<ProjectCoverage>> {
        let mut slot = self.snapshot.lock().unwrap();
        if let Some(live) = slot.upgrade() {
            return Some(live);
        }

        match parser::parse(&self.report_file, &self.base_dir) {
            Ok(mut coverage) => {
                coverage.owner = Some(self.owner);
                let fresh = Arc::new(coverage);
                *slot = Arc::downgrade(&fresh);
                Some(fresh)
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to load {}: {}",
                    "Warning:".yellow(),
                    self.report_file.display(),
                    e
                );
                None
            }
        }
    }
}
