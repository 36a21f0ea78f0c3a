//! Graph bootstrap: lookup indexes, the root node and the category nodes.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use transit_core::Category;

use crate::GraphStore;

/// Cypher statements for index initialization.
///
/// Lookups only. No uniqueness constraints: categories and stations are
/// addressed by name, and a repeated bootstrap duplicates them.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE INDEX country_name IF NOT EXISTS FOR (c:Country) ON (c.name)",
    "CREATE INDEX category_name IF NOT EXISTS FOR (c:Category) ON (c.name)",
    "CREATE INDEX station_name IF NOT EXISTS FOR (s:Station) ON (s.name)",
    "CREATE INDEX route_number IF NOT EXISTS FOR (r:Route) ON (r.`Route Number`)",
];

/// Counts from a bootstrap run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub nodes_created: usize,
    pub relationships_created: usize,
}

/// Initialize lookup indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(store: &dyn GraphStore) -> Result<usize> {
    info!(backend = store.backend(), "Initializing graph schema...");
    let applied = store.prepare_schema().await?;
    info!("Graph schema initialized ({} statements)", applied);
    Ok(applied)
}

/// Create the root, the three categories, and link them.
///
/// Not idempotent: each call creates another root and another set of
/// categories.
pub async fn bootstrap(store: &dyn GraphStore, country: &str) -> Result<BootstrapReport> {
    let mut report = BootstrapReport::default();

    report.nodes_created += store
        .create_country(country)
        .await
        .with_context(|| format!("Failed to create country node '{}'", country))?;

    for category in Category::ALL {
        report.nodes_created += store
            .create_category(category)
            .await
            .with_context(|| format!("Failed to create category node {}", category))?;
    }

    report.relationships_created += store
        .link_categories(country, &Category::ALL)
        .await
        .context("Failed to link categories to country")?;

    info!(
        country,
        nodes = report.nodes_created,
        rels = report.relationships_created,
        "Bootstrap complete"
    );
    Ok(report)
}
