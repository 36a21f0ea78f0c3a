//! `transit run`: the full import pipeline.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use transit_core::{ErrorPolicy, PipelineConfig};
use transit_graph::{run_pipeline, GraphStore, MemoryGraph, PipelineReport, PipelineStep};

use crate::output;
use crate::settings::Settings;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run against an in-memory graph instead of Neo4j (validates the CSVs)
    #[arg(long)]
    pub in_memory: bool,

    /// Stop at the first failed or partially imported step
    #[arg(long)]
    pub halt: bool,

    /// DART dataset, overrides <data-dir>/DART_Dataset.csv
    #[arg(long)]
    pub dart: Option<PathBuf>,

    /// LUAS dataset, overrides <data-dir>/LUAS_Dataset.csv
    #[arg(long)]
    pub luas: Option<PathBuf>,

    /// Bus dataset, overrides <data-dir>/BUS_Dataset.csv
    #[arg(long)]
    pub bus: Option<PathBuf>,

    /// Encoding label of the CSV files
    #[arg(long)]
    pub encoding: Option<String>,

    /// Name of the root country node
    #[arg(long)]
    pub country: Option<String>,
}

impl RunArgs {
    fn configure(self, mut config: PipelineConfig) -> PipelineConfig {
        if self.halt {
            config.error_policy = ErrorPolicy::Halt;
        }
        if let Some(path) = self.dart {
            config.dart_file = Some(path);
        }
        if let Some(path) = self.luas {
            config.luas_file = Some(path);
        }
        if let Some(path) = self.bus {
            config.bus_file = Some(path);
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(country) = self.country {
            config.country = country;
        }
        config
    }
}

pub async fn execute(args: RunArgs, settings: Settings, json: bool) -> Result<()> {
    let in_memory = args.in_memory;
    let config = args.configure(settings.pipeline);

    let report = if in_memory {
        info!("Running against an in-memory graph");
        run_and_print(&MemoryGraph::new(), &config, json).await?
    } else {
        let client = super::connect(&settings.graph).await?;
        let report = run_and_print(&client, &config, json).await;
        client.close();
        report?
    };

    if let Some(step) = report.halted_at {
        bail!("Pipeline halted at step '{}'", step);
    }
    Ok(())
}

async fn run_and_print(store: &dyn GraphStore, config: &PipelineConfig, json: bool) -> Result<PipelineReport> {
    let report = run_pipeline(store, config).await?;

    if json {
        output::print_json(&report)?;
        return Ok(report);
    }

    if let Some(summary) = &report.summary {
        output::print_summary(summary);
        println!();
        output::print_degree_chart(&summary.degree_distribution);
        println!();
    }
    if report.steps.iter().any(|s| s.step == PipelineStep::Sample) {
        output::print_sample(&report.sample);
        println!();
    }
    if let Some(algorithms) = &report.algorithms {
        output::print_algorithm_report(algorithms);
        println!();
    }
    output::print_run_report(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = RunArgs {
            halt: true,
            luas: Some(PathBuf::from("/tmp/luas.csv")),
            encoding: Some("utf-8".to_string()),
            ..RunArgs::default()
        };
        let config = args.configure(PipelineConfig::default());
        assert_eq!(config.error_policy, ErrorPolicy::Halt);
        assert_eq!(config.luas_file, Some(PathBuf::from("/tmp/luas.csv")));
        assert_eq!(config.dart_file, None);
        assert_eq!(config.encoding, "utf-8");
        assert_eq!(config.country, "Ireland");
    }

    #[tokio::test]
    async fn test_in_memory_run_with_missing_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.pipeline.data_dir = dir.path().to_path_buf();

        let args = RunArgs {
            in_memory: true,
            halt: true,
            ..RunArgs::default()
        };
        // missing files are skips, which never halt
        execute(args, settings, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_reports_sample_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let header = "Station Name,Line,Station_ID,Location,Key Features/Attractions,Type (Terminus/Regular),Interchange,Zone,Daily Footfall,Facilities,Accessibility,Latitude,Longitude,Parking Availability,Nearby Landmarks,First Tram Time,Last Tram Time";
        std::fs::write(
            dir.path().join("LUAS_Dataset.csv"),
            format!("{header}\nTallaght,Red\nHeuston,Red\n"),
        )
        .unwrap();
        let config = PipelineConfig {
            data_dir: dir.path().to_path_buf(),
            ..PipelineConfig::default()
        };

        let report = run_and_print(&MemoryGraph::new(), &config, false).await.unwrap();
        assert!(report.is_success());
        assert!(!report.sample.is_empty());
        let path = report.algorithms.and_then(|a| a.path).unwrap();
        assert_eq!(path.path, vec!["Tallaght", "Heuston"]);
    }

    #[tokio::test]
    async fn test_in_memory_run_halts_on_bad_header() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DART_Dataset.csv"), "StationName\nPearse\n").unwrap();
        let mut settings = Settings::default();
        settings.pipeline.data_dir = dir.path().to_path_buf();

        let args = RunArgs {
            in_memory: true,
            halt: true,
            ..RunArgs::default()
        };
        assert!(execute(args, settings, true).await.is_err());
    }
}
