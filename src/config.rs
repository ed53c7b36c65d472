use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::targets::{CoverageMetric, CoverageTarget};

/// Health target configuration, usually `cloverage.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub healthy: Option<TargetSection>,
    #[serde(default)]
    pub unhealthy: Option<TargetSection>,
}

/// One `[healthy]` / `[unhealthy]` table: per-metric percentages, all optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetSection {
    #[serde(default)]
    pub method: Option<f64>,
    #[serde(default)]
    pub conditional: Option<f64>,
    #[serde(default)]
    pub statement: Option<f64>,
    #[serde(default)]
    pub element: Option<f64>,
}

impl TargetSection {
    fn get(&self, metric: CoverageMetric) -> Option<f64> {
        match metric {
            CoverageMetric::Method => self.method,
            CoverageMetric::Conditional => self.conditional,
            CoverageMetric::Statement => self.statement,
            CoverageMetric::Element => self.element,
        }
    }

    fn to_target(&self) -> CoverageTarget {
        let mut target = CoverageTarget::new();
        for metric in CoverageMetric::ALL {
            if let Some(pct) = self.get(metric) {
                target.set(metric, pct);
            }
        }
        target
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, section) in [("healthy", &self.healthy), ("unhealthy", &self.unhealthy)] {
            let Some(section) = section else { continue };
            for metric in CoverageMetric::ALL {
                if let Some(pct) = section.get(metric) {
                    if !(0.0..=100.0).contains(&pct) {
                        anyhow::bail!(
                            "[{}] {} = {} is out of range (expected 0-100)",
                            name,
                            metric.label().to_lowercase(),
                            pct
                        );
                    }
                }
            }
        }

        if let (Some(healthy), Some(unhealthy)) = (&self.healthy, &self.unhealthy) {
            for metric in CoverageMetric::ALL {
                if let (Some(h), Some(u)) = (healthy.get(metric), unhealthy.get(metric)) {
                    if h < u {
                        anyhow::bail!(
                            "healthy {} threshold ({}) is below the unhealthy one ({})",
                            metric.label().to_lowercase(),
                            h,
                            u
                        );
                    }
                }
            }
        }

        Ok(())
    }

    pub fn healthy_target(&self) -> Option<CoverageTarget> {
        self.healthy.as_ref().map(TargetSection::to_target)
    }

    pub fn unhealthy_target(&self) -> Option<CoverageTarget> {
        self.unhealthy.as_ref().map(TargetSection::to_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[healthy]
method = 70.0
statement = 80.0

[unhealthy]
method = 40.0
statement = 50.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        config.validate().unwrap();

        let healthy = config.healthy_target().unwrap();
        assert_eq!(healthy.get(CoverageMetric::Method), Some(70.0));
        assert_eq!(healthy.get(CoverageMetric::Statement), Some(80.0));
        assert!(!healthy.is_tracked(CoverageMetric::Conditional));
    }

    #[test]
    fn test_missing_sections_give_no_targets() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.healthy_target().is_none());
        assert!(config.unhealthy_target().is_none());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config: Config = toml::from_str(
            r#"
[healthy]
method = 40.0

[unhealthy]
method = 70.0
"#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let config: Config = toml::from_str("[healthy]\nstatement = 120.0").unwrap();
        assert!(config.validate().is_err());
    }
}
