//! `transit explore`: connectivity test and graph-algorithm demonstration
//! against an already populated graph.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use transit_graph::queries::{run_algorithm_demo, AlgorithmReport};
use transit_graph::{GraphStore, Projection};

use crate::output;
use crate::settings::Settings;

#[derive(Args, Debug, Default)]
pub struct ExploreArgs {
    /// Start station, by name
    #[arg(long)]
    pub from: Option<String>,

    /// End station, by name
    #[arg(long)]
    pub to: Option<String>,

    /// Projection name
    #[arg(long)]
    pub projection: Option<String>,

    /// Drop an existing projection of the same name first
    #[arg(long)]
    pub replace: bool,

    /// Search by hop count instead of travel time
    #[arg(long)]
    pub unweighted: bool,
}

#[derive(Serialize)]
struct Exploration {
    connected: bool,
    algorithms: AlgorithmReport,
}

pub async fn execute(args: ExploreArgs, settings: &Settings, json: bool) -> Result<()> {
    let client = super::connect(&settings.graph).await?;
    if !json {
        println!("{}\n", "Connected successfully.".green());
    }
    let result = explore(&client, args, settings, json).await;
    client.close();
    result
}

async fn explore(store: &dyn GraphStore, args: ExploreArgs, settings: &Settings, json: bool) -> Result<()> {
    store.ping().await?;

    let pipeline = &settings.pipeline;
    let mut projection = Projection::stations(args.projection.unwrap_or_else(|| pipeline.projection.clone()));
    if args.unweighted {
        projection.weight_property = None;
    }
    let from = args.from.unwrap_or_else(|| pipeline.start_station.clone());
    let to = args.to.unwrap_or_else(|| pipeline.end_station.clone());

    let report = run_algorithm_demo(store, &projection, &from, &to, args.replace).await;

    if json {
        return output::print_json(&Exploration {
            connected: true,
            algorithms: report,
        });
    }
    output::print_algorithm_report(&report);
    Ok(())
}
