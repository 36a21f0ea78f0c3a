//! Individual analytics commands.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use transit_graph::queries::summarize;
use transit_graph::{GraphConfig, GraphCounts, GraphStore};

use crate::output;

pub async fn cmd_stats(store: &dyn GraphStore, top: usize, degree_limit: usize, json: bool) -> Result<()> {
    let summary = summarize(store, top, degree_limit).await?;
    if json {
        return output::print_json(&summary);
    }
    output::print_summary(&summary);
    Ok(())
}

pub async fn cmd_degree(store: &dyn GraphStore, limit: usize, json: bool) -> Result<()> {
    let entries = store.degree_distribution(limit).await?;
    if json {
        return output::print_json(&entries);
    }
    output::print_degree_chart(&entries);
    Ok(())
}

pub async fn cmd_sample(store: &dyn GraphStore, label: Option<&str>, limit: usize, json: bool) -> Result<()> {
    let rows = store.sample_subgraph(label, limit).await?;
    if json {
        return output::print_json(&rows);
    }
    output::print_sample(&rows);
    Ok(())
}

#[derive(Serialize)]
struct Status<'a> {
    uri: &'a str,
    database: &'a str,
    connected: bool,
    counts: Option<GraphCounts>,
    error: Option<String>,
}

/// Connection check. An unreachable server is reported, not an error.
pub async fn cmd_status(config: &GraphConfig, json: bool) -> Result<()> {
    let mut status = Status {
        uri: &config.uri,
        database: &config.database,
        connected: false,
        counts: None,
        error: None,
    };

    match super::connect(config).await {
        Ok(client) => {
            status.connected = true;
            match client.counts().await {
                Ok(counts) => status.counts = Some(counts),
                Err(e) => status.error = Some(format!("{:#}", e)),
            }
            client.close();
        }
        Err(e) => status.error = Some(format!("{:#}", e)),
    }

    if json {
        return output::print_json(&status);
    }

    println!("{}", "Knowledge Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  URI:           {}", status.uri);
    println!("  Database:      {}", status.database);
    if status.connected {
        println!("  Connection:    {}", "connected".green());
    } else {
        println!("  Connection:    {}", "unreachable".red());
    }
    if let Some(counts) = &status.counts {
        output::print_counts(counts);
    }
    if let Some(error) = &status.error {
        println!("  Error:         {}", error.red());
    }
    println!("{}", "─".repeat(40));
    Ok(())
}
