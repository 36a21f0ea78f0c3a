//! Relationship derivation between entities of one category.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use transit_core::{Category, RelationRule};

use crate::GraphStore;

/// Outcome of applying one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelateReport {
    pub rule: &'static str,
    pub rel_type: &'static str,
    pub relationships_created: usize,
}

/// Apply one rule: an edge for every ordered pair of distinct entities of
/// the rule's category that satisfy its predicate.
///
/// Nothing guards against existing edges; applying a rule twice doubles them.
pub async fn build_relationships(store: &dyn GraphStore, rule: &RelationRule) -> Result<RelateReport> {
    let created = store
        .relate(rule)
        .await
        .with_context(|| format!("Failed to build {} relationships ({})", rule.rel_type, rule.name))?;

    info!(rule = rule.name, rel_type = rule.rel_type, created, "Relationships built");
    Ok(RelateReport {
        rule: rule.name,
        rel_type: rule.rel_type,
        relationships_created: created,
    })
}

/// Apply every rule of `category` in order.
pub async fn relate_category(store: &dyn GraphStore, category: Category) -> Result<Vec<RelateReport>> {
    let mut reports = Vec::new();
    for rule in category.relation_rules() {
        reports.push(build_relationships(store, rule).await?);
    }
    Ok(reports)
}
