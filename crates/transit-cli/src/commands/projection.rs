//! `transit projection`: inspect and drop GDS projections.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use transit_graph::queries::drop_projection_if_exists;
use transit_graph::GraphStore;

use crate::output;
use crate::settings::Settings;

#[derive(Subcommand)]
pub enum ProjectionCommands {
    /// Check whether a projection exists
    Exists {
        /// Projection name, defaults to the configured one
        name: Option<String>,
    },

    /// Drop a projection if it exists
    Drop {
        /// Projection name, defaults to the configured one
        name: Option<String>,
    },
}

pub async fn execute(cmd: ProjectionCommands, settings: &Settings, json: bool) -> Result<()> {
    let client = super::connect(&settings.graph).await?;
    let result = run(&client, cmd, &settings.pipeline.projection, json).await;
    client.close();
    result
}

async fn run(store: &dyn GraphStore, cmd: ProjectionCommands, default_name: &str, json: bool) -> Result<()> {
    match cmd {
        ProjectionCommands::Exists { name } => {
            let name = name.as_deref().unwrap_or(default_name);
            let exists = store.projection_exists(name).await?;
            if json {
                return output::print_json(&json!({ "projection": name, "exists": exists }));
            }
            if exists {
                println!("Projection {} {}", name.cyan(), "exists".green());
            } else {
                println!("Projection {} {}", name.cyan(), "does not exist".yellow());
            }
        }
        ProjectionCommands::Drop { name } => {
            let name = name.as_deref().unwrap_or(default_name);
            let dropped = drop_projection_if_exists(store, name).await?;
            if json {
                return output::print_json(&json!({ "projection": name, "dropped": dropped }));
            }
            if dropped {
                println!("Projection {} {}", name.cyan(), "dropped".green());
            } else {
                println!("Projection {} {}", name.cyan(), "does not exist, nothing to drop".dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_graph::{MemoryGraph, Projection};

    #[tokio::test]
    async fn test_drop_is_guarded() {
        let graph = MemoryGraph::new();
        run(&graph, ProjectionCommands::Drop { name: None }, "luasGraph", false)
            .await
            .unwrap();

        graph.project_graph(&Projection::default()).await.unwrap();
        run(&graph, ProjectionCommands::Exists { name: None }, "luasGraph", true)
            .await
            .unwrap();
        run(&graph, ProjectionCommands::Drop { name: None }, "luasGraph", true)
            .await
            .unwrap();
        assert!(!graph.projection_exists("luasGraph").await.unwrap());
    }
}
