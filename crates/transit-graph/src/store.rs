//! The narrow interface between the pipeline and a graph backend.
//!
//! `GraphClient` implements it against Neo4j (see `neo4j.rs`);
//! `MemoryGraph` implements it in process for tests and dry runs.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use transit_core::{Category, MemberNode, RelationRule};

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

/// A node ranked by outbound relationship count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedNode {
    pub labels: Vec<String>,
    pub name: String,
    pub connections: i64,
}

/// A node ranked by total degree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeEntry {
    pub labels: Vec<String>,
    pub name: String,
    pub degree: i64,
}

impl DegreeEntry {
    /// Chart label: joined labels, or "No Label".
    pub fn label_text(&self) -> String {
        if self.labels.is_empty() {
            "No Label".to_string()
        } else {
            self.labels.join(" / ")
        }
    }
}

/// One `(n)-[r]-(m)` row of a subgraph sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleEdge {
    pub source_labels: Vec<String>,
    pub source: String,
    pub rel_type: String,
    pub target_labels: Vec<String>,
    pub target: String,
}

/// A named in-memory projection for graph algorithms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub name: String,
    pub node_label: String,
    pub rel_type: String,
    /// Relationship property used as cost; unweighted when `None`.
    pub weight_property: Option<String>,
    /// Cost of relationships that lack the weight property.
    pub default_weight: f64,
}

impl Projection {
    /// LUAS station network weighted by `travel_time`.
    pub fn stations(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_label: "Station".to_string(),
            rel_type: "CONNECTED_TO".to_string(),
            weight_property: Some("travel_time".to_string()),
            default_weight: 1.0,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::stations("luasGraph")
    }
}

/// Size of a created projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionStats {
    pub node_count: usize,
    pub relationship_count: usize,
}

/// Result of a shortest-path search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub total_cost: f64,
    /// Names of the nodes on the path, source first.
    pub path: Vec<String>,
}

/// Graph backend operations used by the pipeline and analytics.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Connectivity check.
    async fn ping(&self) -> Result<()>;

    /// Create lookup indexes; safe to repeat. Returns statements applied.
    async fn prepare_schema(&self) -> Result<usize>;

    /// Create the root node unconditionally. Returns nodes created.
    async fn create_country(&self, name: &str) -> Result<usize>;

    /// Create one category node. Returns nodes created.
    async fn create_category(&self, category: Category) -> Result<usize>;

    /// Link the named root to each named category. Returns relationships created.
    async fn link_categories(&self, country: &str, categories: &[Category]) -> Result<usize>;

    /// Create one record node under its category node, addressed by name.
    /// Returns nodes created, `0` when the category does not exist.
    async fn create_member(&self, node: &MemberNode) -> Result<usize>;

    /// Apply a relationship rule. Returns relationships created.
    async fn relate(&self, rule: &RelationRule) -> Result<usize>;

    async fn counts(&self) -> Result<GraphCounts>;

    /// Distinct node labels, sorted.
    async fn labels(&self) -> Result<Vec<String>>;

    /// Distinct relationship types, sorted.
    async fn relationship_types(&self) -> Result<Vec<String>>;

    /// Top `limit` nodes by outbound relationship count, descending.
    async fn most_connected(&self, limit: usize) -> Result<Vec<ConnectedNode>>;

    /// Top `limit` nodes by total degree, descending.
    async fn degree_distribution(&self, limit: usize) -> Result<Vec<DegreeEntry>>;

    /// Up to `limit` relationship rows, optionally anchored on a label.
    async fn sample_subgraph(&self, label: Option<&str>, limit: usize) -> Result<Vec<SampleEdge>>;

    async fn projection_exists(&self, name: &str) -> Result<bool>;

    /// Fails when a projection of that name already exists.
    async fn project_graph(&self, projection: &Projection) -> Result<ProjectionStats>;

    /// Fails when no projection of that name exists.
    async fn drop_projection(&self, name: &str) -> Result<()>;

    /// Dijkstra between two nodes addressed by `name` over a projection.
    /// `None` when either node is absent or no path exists.
    async fn shortest_path(
        &self,
        projection: &Projection,
        from: &str,
        to: &str,
    ) -> Result<Option<PathResult>>;
}

/// Strip a label to `[A-Za-z0-9_]` before it is interpolated into Cypher.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Backtick-quote an identifier (label, type or property key).
pub fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}
