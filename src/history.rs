//! Build-chain traversal
//!
//! Builds form an externally owned chain of predecessors. The walker here
//! only reads it: it never mutates history and never keeps a build alive.

use crate::action::CoverageAction;

/// Identifier of a build in its owning chain
pub type BuildId = u32;

/// Terminal outcome of a finished build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

/// Read-only view of one historical build
pub trait BuildRecord {
    fn previous(&self) -> Option<&Self>
    where
        Self: Sized;

    fn outcome(&self) -> Outcome;

    /// The coverage action recorded on this build, if any
    fn coverage(&self) -> Option<&CoverageAction>;
}

/// Find the nearest predecessor carrying a coverage record
///
/// Failed builds are skipped outright, even when they carry coverage data.
/// Any other outcome is an eligible stop. Returns `None` when the chain is
/// exhausted.
pub fn previous_with_coverage<B: BuildRecord>(start: &B) -> Option<&CoverageAction> {
    let mut build = start.previous();
    while let Some(b) = build {
        if b.outcome() != Outcome::Failure {
            if let Some(action) = b.coverage() {
                return Some(action);
            }
        }
        build = b.previous();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReportCache;
    use std::path::PathBuf;

    struct Build {
        number: BuildId,
        outcome: Outcome,
        coverage: Option<CoverageAction>,
        previous: Option<Box<Build>>,
    }

    impl BuildRecord for Build {
        fn previous(&self) -> Option<&Self> {
            self.previous.as_deref()
        }

        fn outcome(&self) -> Outcome {
            self.outcome
        }

        fn coverage(&self) -> Option<&CoverageAction> {
            self.coverage.as_ref()
        }
    }

    fn action(number: BuildId) -> CoverageAction {
        let cache = ReportCache::new(
            number,
            PathBuf::from(format!("/builds/{}/clover.xml", number)),
            Some("/workspace"),
        );
        CoverageAction::new(cache, None, None)
    }

    fn build(
        number: BuildId,
        outcome: Outcome,
        with_coverage: bool,
        previous: Option<Build>,
    ) -> Build {
        Build {
            number,
            outcome,
            coverage: with_coverage.then(|| action(number)),
            previous: previous.map(Box::new),
        }
    }

    #[test]
    fn test_skips_failed_builds_even_with_coverage() {
        let b3 = build(3, Outcome::Success, true, None);
        let b4 = build(4, Outcome::Failure, true, Some(b3));
        let b5 = build(5, Outcome::Failure, false, Some(b4));

        let found = previous_with_coverage(&b5).unwrap();
        assert_eq!(found.owner(), 3);
    }

    #[test]
    fn test_skips_builds_without_coverage() {
        let b1 = build(1, Outcome::Success, true, None);
        let b2 = build(2, Outcome::Success, false, Some(b1));
        let b3 = build(3, Outcome::Success, false, Some(b2));

        let found = previous_with_coverage(&b3).unwrap();
        assert_eq!(found.owner(), 1);
    }

    #[test]
    fn test_unstable_build_is_eligible() {
        let b1 = build(1, Outcome::Unstable, true, None);
        let b2 = build(2, Outcome::Success, false, Some(b1));

        let found = previous_with_coverage(&b2).unwrap();
        assert_eq!(found.owner(), 1);
    }

    #[test]
    fn test_exhausted_chain_returns_none() {
        let b1 = build(1, Outcome::Failure, true, None);
        let b2 = build(2, Outcome::Success, false, Some(b1));

        assert!(previous_with_coverage(&b2).is_none());
        assert_eq!(b2.number, 2);
    }

    #[test]
    fn test_start_build_itself_not_considered() {
        let b1 = build(1, Outcome::Success, true, None);
        assert!(previous_with_coverage(&b1).is_none());
    }
}
