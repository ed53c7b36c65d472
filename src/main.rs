use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use cloverage::config::Config;
use cloverage::{CoverageAction, CoverageMetric, HealthReport, Ratio, ReportCache};

const CONFIG_FILE: &str = "cloverage.toml";

#[derive(Parser)]
#[command(name = "cloverage")]
#[command(about = "Read Clover coverage reports and score build health")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: cloverage.toml, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a report summary and the build health score
    Check {
        /// Path to the clover.xml report
        report: PathBuf,

        /// Workspace directory used to resolve source paths in the report
        #[arg(long)]
        base_dir: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Exit with an error if the health score is below this value
        #[arg(long)]
        fail_under: Option<u32>,
    },

    /// Look up one package, file, or class by name
    Show {
        /// Path to the clover.xml report
        report: PathBuf,

        /// Package, file, or class name to look up
        name: String,

        /// Workspace directory used to resolve source paths in the report
        #[arg(long)]
        base_dir: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load(&path)?,
        None if std::path::Path::new(CONFIG_FILE).exists() => {
            Config::load(std::path::Path::new(CONFIG_FILE))?
        }
        None => Config::default(),
    };

    match cli.command {
        Commands::Check {
            report,
            base_dir,
            json,
            fail_under,
        } => cmd_check(&config, report, base_dir, json, fail_under),
        Commands::Show {
            report,
            name,
            base_dir,
        } => cmd_show(report, name, base_dir),
    }
}

#[derive(Serialize)]
struct CheckOutput {
    project: String,
    metrics: Vec<MetricLine>,
    health: Option<HealthReport>,
}

#[derive(Serialize)]
struct MetricLine {
    metric: CoverageMetric,
    ratio: Ratio,
    percentage: f64,
}

fn cmd_check(
    config: &Config,
    report: PathBuf,
    base_dir: Option<String>,
    json: bool,
    fail_under: Option<u32>,
) -> Result<()> {
    let cache = ReportCache::new(0, report, base_dir.as_deref());
    let action = CoverageAction::new(cache, config.healthy_target(), config.unhealthy_target());

    let Some(coverage) = action.result() else {
        anyhow::bail!("No coverage data available");
    };
    let health = action.build_health();

    if json {
        let output = CheckOutput {
            project: coverage.name.clone(),
            metrics: CoverageMetric::ALL
                .iter()
                .map(|&metric| {
                    let ratio = coverage.ratio(metric);
                    MetricLine {
                        metric,
                        ratio,
                        percentage: ratio.percentage(),
                    }
                })
                .collect(),
            health: health.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("\n{} {}\n", "Coverage:".bold(), coverage.name.cyan());
        for metric in CoverageMetric::ALL {
            let ratio = coverage.ratio(metric);
            println!(
                "  {:<13} {:>9}  {:>5.1}%",
                metric.label(),
                ratio.to_string(),
                ratio.percentage()
            );
        }

        match &health {
            Some(h) => {
                let score = format!("{}", h.score);
                let score = if h.score >= 80 {
                    score.green()
                } else if h.score >= 50 {
                    score.yellow()
                } else {
                    score.red()
                };
                println!("\n  {} {} ({})", "Health:".bold(), score, h.description);
            }
            None => println!("\n  {}", "No health targets configured".dimmed()),
        }
    }

    if let Some(min) = fail_under {
        match &health {
            Some(h) if h.score < min => {
                anyhow::bail!("Health score {} is below the required {}", h.score, min)
            }
            None => anyhow::bail!("No health score to check against --fail-under"),
            _ => {}
        }
    }

    Ok(())
}

fn cmd_show(report: PathBuf, name: String, base_dir: Option<String>) -> Result<()> {
    let cache = ReportCache::new(0, report, base_dir.as_deref());
    let action = CoverageAction::new(cache, None, None);

    if action.result().is_none() {
        anyhow::bail!("No coverage data available");
    }

    if let Some(package) = action.find_package_coverage(&name) {
        println!("{}", serde_json::to_string_pretty(&package)?);
    } else if let Some(file) = action.find_file_coverage(&name) {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else if let Some(class) = action.find_class_coverage(&name) {
        println!("{}", serde_json::to_string_pretty(&class)?);
    } else {
        anyhow::bail!("'{}' not found in the report", name);
    }

    Ok(())
}
