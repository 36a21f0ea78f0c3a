//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use transit_graph::{GraphClient, GraphConfig};

use crate::settings::{Overrides, Settings};

pub mod explore;
pub mod projection;
pub mod run;
pub mod stats;

/// Dublin public-transport knowledge graph
#[derive(Parser)]
#[command(name = "transit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML settings file
    #[arg(short, long, global = true, env = "TRANSIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bolt URI of the Neo4j server
    #[arg(long, global = true, env = "NEO4J_URI")]
    pub neo4j_uri: Option<String>,

    #[arg(long, global = true, env = "NEO4J_USER")]
    pub neo4j_user: Option<String>,

    #[arg(long, global = true, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub neo4j_password: Option<String>,

    #[arg(long, global = true, env = "NEO4J_DATABASE")]
    pub neo4j_database: Option<String>,

    /// Directory holding the dataset CSVs
    #[arg(long, global = true, env = "TRANSIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bootstrap, import every dataset, build relationships and summarize
    Run(run::RunArgs),

    /// Connectivity test, then graph projection and shortest path
    Explore(explore::ExploreArgs),

    /// Node and relationship counts, labels, types, most connected nodes
    Stats {
        /// Number of most connected nodes to show
        #[arg(long)]
        top: Option<usize>,
    },

    /// Degree distribution as a bar chart
    Degree {
        /// Number of nodes to chart
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Sample of relationships, optionally anchored on a label
    Sample {
        /// Node label, e.g. Station
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Check the connection and show graph size
    Status,

    /// Manage GDS graph projections
    #[command(subcommand)]
    Projection(projection::ProjectionCommands),
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            uri: self.neo4j_uri.clone(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            data_dir: self.data_dir.clone(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let mut settings = Settings::load(self.config.as_deref())?;
        settings.apply(self.overrides());
        let json = self.json;

        match self.command {
            Commands::Run(args) => run::execute(args, settings, json).await,
            Commands::Explore(args) => explore::execute(args, &settings, json).await,
            Commands::Stats { top } => {
                let client = connect(&settings.graph).await?;
                let top = top.unwrap_or(settings.pipeline.top_n);
                let result = stats::cmd_stats(&client, top, settings.pipeline.degree_limit, json).await;
                client.close();
                result
            }
            Commands::Degree { limit } => {
                let client = connect(&settings.graph).await?;
                let limit = limit.unwrap_or(settings.pipeline.degree_limit);
                let result = stats::cmd_degree(&client, limit, json).await;
                client.close();
                result
            }
            Commands::Sample { label, limit } => {
                let client = connect(&settings.graph).await?;
                let limit = limit.unwrap_or(settings.pipeline.sample_limit);
                let result = stats::cmd_sample(&client, label.as_deref(), limit, json).await;
                client.close();
                result
            }
            Commands::Status => stats::cmd_status(&settings.graph, json).await,
            Commands::Projection(cmd) => projection::execute(cmd, &settings, json).await,
        }
    }
}

/// Open the Neo4j connection pool.
pub async fn connect(config: &GraphConfig) -> Result<GraphClient> {
    GraphClient::connect(config)
        .await
        .with_context(|| format!("Could not connect to Neo4j at {}", config.uri))
}
