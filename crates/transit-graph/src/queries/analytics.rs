//! Exploratory graph statistics.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::store::{ConnectedNode, DegreeEntry, GraphCounts};
use crate::GraphStore;

/// Everything the exploratory pass prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdaSummary {
    pub counts: GraphCounts,
    pub labels: Vec<String>,
    pub relationship_types: Vec<String>,
    pub most_connected: Vec<ConnectedNode>,
    pub degree_distribution: Vec<DegreeEntry>,
}

/// Gather counts, schema, the `top` most connected nodes and the
/// `degree_limit` highest degrees.
pub async fn summarize(store: &dyn GraphStore, top: usize, degree_limit: usize) -> Result<EdaSummary> {
    let counts = store.counts().await.context("Failed to count graph")?;
    let labels = store.labels().await.context("Failed to list node labels")?;
    let relationship_types = store
        .relationship_types()
        .await
        .context("Failed to list relationship types")?;
    let most_connected = store
        .most_connected(top)
        .await
        .context("Failed to rank connected nodes")?;
    let degree_distribution = store
        .degree_distribution(degree_limit)
        .await
        .context("Failed to compute degree distribution")?;

    info!(
        nodes = counts.nodes,
        rels = counts.relationships,
        labels = labels.len(),
        types = relationship_types.len(),
        "Graph summarized"
    );

    Ok(EdaSummary {
        counts,
        labels,
        relationship_types,
        most_connected,
        degree_distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::import::import_dataset;
    use crate::relate::relate_category;
    use crate::schema::bootstrap;
    use crate::MemoryGraph;
    use transit_core::Category;

    #[tokio::test]
    async fn test_summary_of_empty_graph() {
        let graph = MemoryGraph::new();
        let summary = summarize(&graph, 5, 20).await.unwrap();
        assert_eq!(summary.counts, GraphCounts::default());
        assert!(summary.labels.is_empty());
        assert!(summary.most_connected.is_empty());
        assert!(summary.degree_distribution.is_empty());
    }

    #[tokio::test]
    async fn test_summary_respects_limits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            LUAS_HEADER,
            &[
                luas_row("Tallaght", "Red", "No"),
                luas_row("Heuston", "Red", "No"),
                luas_row("Sandyford", "Green", "No"),
            ],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();
        import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap();
        relate_category(&graph, Category::Luas).await.unwrap();

        let summary = summarize(&graph, 2, 3).await.unwrap();
        assert_eq!(summary.counts.nodes, 7);
        assert_eq!(summary.labels, vec!["Category", "Country", "Station"]);
        assert_eq!(
            summary.relationship_types,
            vec!["CONNECTED_TO", "HAS_STATION", "HAS_TRANSPORT"]
        );
        assert_eq!(summary.most_connected.len(), 2);
        assert_eq!(summary.degree_distribution.len(), 3);
        assert!(summary
            .degree_distribution
            .windows(2)
            .all(|w| w[0].degree >= w[1].degree));
    }
}
