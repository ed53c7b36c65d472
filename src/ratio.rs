//! Covered/total ratio value type

use serde::{Deserialize, Serialize};
use std::fmt;

/// A covered/total pair for one coverage metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub covered: u32,
    pub total: u32,
}

impl Ratio {
    /// Create a ratio, capping `covered` at `total`
    pub fn new(covered: u32, total: u32) -> Self {
        Self {
            covered: covered.min(total),
            total,
        }
    }

    /// Percentage covered, 0.0 when nothing was measurable
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.covered as f64 / self.total as f64) * 100.0
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.covered, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert!((Ratio::new(3, 4).percentage() - 75.0).abs() < 0.01);
        assert_eq!(Ratio::new(0, 0).percentage(), 0.0);
    }

    #[test]
    fn test_covered_capped_at_total() {
        let r = Ratio::new(5, 3);
        assert_eq!(r.covered, 3);
        assert_eq!(r.total, 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ratio::new(9, 10).to_string(), "9/10");
    }
}
