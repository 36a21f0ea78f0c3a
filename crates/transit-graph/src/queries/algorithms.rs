//! Graph projections and shortest-path search.
//!
//! Failures here are reported, not propagated: a missing GDS plugin or a
//! stale projection should not end an otherwise successful run.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::store::{PathResult, Projection, ProjectionStats};
use crate::GraphStore;

/// Result of trying to create a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectionOutcome {
    Created(ProjectionStats),
    Failed { reason: String },
}

impl ProjectionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ProjectionOutcome::Created(_))
    }
}

/// Result of the projection + shortest-path demonstration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmReport {
    pub projection: ProjectionOutcome,
    pub from: String,
    pub to: String,
    pub path: Option<PathResult>,
    pub path_error: Option<String>,
}

impl AlgorithmReport {
    pub fn is_ok(&self) -> bool {
        self.projection.is_created() && self.path_error.is_none()
    }
}

/// Drop the projection only when it exists. Returns whether it was dropped.
pub async fn drop_projection_if_exists(store: &dyn GraphStore, name: &str) -> Result<bool> {
    let exists = store
        .projection_exists(name)
        .await
        .with_context(|| format!("Failed to check projection '{}'", name))?;
    if !exists {
        info!(projection = name, "Projection does not exist, nothing to drop");
        return Ok(false);
    }

    store
        .drop_projection(name)
        .await
        .with_context(|| format!("Failed to drop projection '{}'", name))?;
    info!(projection = name, "Projection dropped");
    Ok(true)
}

/// Create `projection`, first dropping a previous one when `replace` is set.
///
/// Without `replace` an existing projection of the same name makes this fail.
pub async fn ensure_projection(
    store: &dyn GraphStore,
    projection: &Projection,
    replace: bool,
) -> ProjectionOutcome {
    if replace {
        if let Err(e) = drop_projection_if_exists(store, &projection.name).await {
            warn!(projection = %projection.name, error = %e, "Could not replace projection");
            return ProjectionOutcome::Failed {
                reason: format!("{:#}", e),
            };
        }
    }

    match store.project_graph(projection).await {
        Ok(stats) => {
            info!(
                projection = %projection.name,
                nodes = stats.node_count,
                rels = stats.relationship_count,
                "Graph projection created"
            );
            ProjectionOutcome::Created(stats)
        }
        Err(e) => {
            warn!(projection = %projection.name, error = %e, "Graph projection failed");
            ProjectionOutcome::Failed {
                reason: format!("{:#}", e),
            }
        }
    }
}

/// Dijkstra between two named nodes over an existing projection.
pub async fn shortest_path(
    store: &dyn GraphStore,
    projection: &Projection,
    from: &str,
    to: &str,
) -> Result<Option<PathResult>> {
    let path = store
        .shortest_path(projection, from, to)
        .await
        .with_context(|| format!("Shortest path {} -> {} failed", from, to))?;

    match &path {
        Some(found) => info!(from, to, cost = found.total_cost, hops = found.path.len(), "Shortest path found"),
        None => info!(from, to, "No path found"),
    }
    Ok(path)
}

/// Project the graph, then search it. The search runs even when projecting
/// fails, since an earlier projection of the same name may still exist.
pub async fn run_algorithm_demo(
    store: &dyn GraphStore,
    projection: &Projection,
    from: &str,
    to: &str,
    replace: bool,
) -> AlgorithmReport {
    let outcome = ensure_projection(store, projection, replace).await;

    let (path, path_error) = match shortest_path(store, projection, from, to).await {
        Ok(path) => (path, None),
        Err(e) => {
            warn!(error = %e, "Shortest path search failed");
            (None, Some(format!("{:#}", e)))
        }
    };

    AlgorithmReport {
        projection: outcome,
        from: from.to_string(),
        to: to.to_string(),
        path,
        path_error,
    }
}
