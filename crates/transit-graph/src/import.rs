//! CSV dataset import: one entity per data row, linked from its category.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use transit_core::dataset::{read_members, resolve_encoding};
use transit_core::Category;

use crate::GraphStore;

/// Why a dataset was not imported at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingFile,
}

/// A data row that was read but not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub line: u64,
    pub reason: String,
}

/// Result of importing one dataset file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub category: Category,
    pub path: PathBuf,
    pub rows_read: usize,
    pub nodes_created: usize,
    pub failures: Vec<RowFailure>,
    pub skipped: Option<SkipReason>,
}

impl ImportReport {
    fn new(category: Category, path: &Path) -> Self {
        Self {
            category,
            path: path.to_path_buf(),
            rows_read: 0,
            nodes_created: 0,
            failures: Vec::new(),
            skipped: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    /// Every row read was written.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_none() && self.failures.is_empty()
    }
}

/// Import the dataset of `category` from `path`.
///
/// A missing file is a skip, not an error. A header row without the
/// dataset's required columns fails the whole import before any write. Each
/// remaining row is written on its own; a failed row is recorded and the
/// import carries on, keeping the rows already written.
pub async fn import_dataset(
    store: &dyn GraphStore,
    category: Category,
    path: &Path,
    encoding: &str,
) -> Result<ImportReport> {
    let mut report = ImportReport::new(category, path);

    if !path.exists() {
        warn!(category = %category, path = %path.display(), "Dataset file not found, skipping import");
        report.skipped = Some(SkipReason::MissingFile);
        return Ok(report);
    }

    let encoding = resolve_encoding(encoding)?;
    let rows = read_members(category, path, encoding)
        .with_context(|| format!("Failed to read {} dataset {}", category, path.display()))?;

    for row in rows {
        report.rows_read += 1;
        let (line, member) = match row {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(category = %category, line = e.line, reason = %e.reason, "Skipping malformed row");
                report.failures.push(RowFailure {
                    line: e.line,
                    reason: e.reason,
                });
                continue;
            }
        };

        match store.create_member(&member).await {
            Ok(0) => {
                warn!(category = %category, line, name = %member.display_name(), "No category node to attach to");
                report.failures.push(RowFailure {
                    line,
                    reason: format!("category {} not found", category),
                });
            }
            Ok(created) => {
                debug!(category = %category, name = %member.display_name(), "Entity created");
                report.nodes_created += created;
            }
            Err(e) => {
                warn!(category = %category, line, name = %member.display_name(), error = %e, "Failed to write row");
                report.failures.push(RowFailure {
                    line,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    info!(
        category = %category,
        rows = report.rows_read,
        created = report.nodes_created,
        failed = report.failures.len(),
        "Dataset imported"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::relate::relate_category;
    use crate::schema::bootstrap;
    use crate::MemoryGraph;
    use transit_core::TransitError;

    #[tokio::test]
    async fn test_each_row_becomes_one_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            LUAS_HEADER,
            &[luas_row("Tallaght", "Red", "No"), luas_row("Heuston", "Red", "No")],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();

        let report = import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap();
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.nodes_created, 2);
        assert!(report.is_complete());

        let snapshot = graph.snapshot().await;
        let stations = snapshot.nodes_with_label("Station");
        assert_eq!(stations.len(), 2);
        for station in stations {
            assert_eq!(snapshot.in_degree(station, "HAS_STATION"), 1);
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped_without_writes() {
        let dir = tempfile::tempdir().unwrap();
        let graph = MemoryGraph::new();

        let report = import_dataset(&graph, Category::Dart, &dir.path().join("DART_Dataset.csv"), "latin1")
            .await
            .unwrap();
        assert_eq!(report.skipped, Some(SkipReason::MissingFile));
        assert_eq!(report.rows_read, 0);
        assert_eq!(graph.counts().await.unwrap().nodes, 0);
    }

    #[tokio::test]
    async fn test_header_mismatch_fails_before_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            "Station Name,Line",
            &["Tallaght,Red".to_string()],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();

        let err = import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransitError>(),
            Some(TransitError::MissingColumns { .. })
        ));
        assert!(graph.snapshot().await.nodes_with_label("Station").is_empty());
    }

    #[tokio::test]
    async fn test_rejected_row_does_not_stop_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            LUAS_HEADER,
            &[
                luas_row("Tallaght", "Red", "No"),
                luas_row("Heuston", "Red", "No"),
                luas_row("Abbey Street", "Red", "No"),
            ],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();
        graph.reject_member("Heuston").await;

        let report = import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.nodes_created, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 3);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_rows_without_category_are_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            LUAS_HEADER,
            &[luas_row("Tallaght", "Red", "No")],
        );
        let graph = MemoryGraph::new();

        let report = import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap();
        assert_eq!(report.nodes_created, 0);
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_report_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        // Pearse spans lines 2-3, line 4 is blank, Howth sits on line 5
        let path = write_csv(
            dir.path(),
            "DART_Dataset.csv",
            DART_HEADER,
            &[dart_row("Pearse", "DART,\nCommuter"), String::new(), dart_row("Howth", "DART")],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();
        graph.reject_member("Howth").await;

        let report = import_dataset(&graph, Category::Dart, &path, "latin1").await.unwrap();
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.nodes_created, 1);
        assert_eq!(
            report.failures,
            vec![RowFailure {
                line: 5,
                reason: "write rejected for 'Howth'".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_short_row_still_becomes_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "LUAS_Dataset.csv",
            LUAS_HEADER,
            &[
                luas_row("Tallaght", "Red", "No"),
                "Heuston".to_string(),
                luas_row("Abbey Street", "Red", "No"),
            ],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();

        let report = import_dataset(&graph, Category::Luas, &path, "latin1").await.unwrap();
        assert_eq!(report.nodes_created, 3);
        assert!(report.is_complete());

        // the missing Line reads as null, so Heuston joins no line
        relate_category(&graph, Category::Luas).await.unwrap();
        let snapshot = graph.snapshot().await;
        let heuston = snapshot
            .nodes
            .iter()
            .find(|n| n.display() == "Heuston")
            .unwrap();
        assert!(!heuston.properties.contains_key("Line"));
        assert_eq!(heuston.properties.len(), 1);

        let mut connected = snapshot.edges_of_type("CONNECTED_TO");
        connected.sort();
        assert_eq!(
            connected,
            vec![
                ("Abbey Street".to_string(), "Tallaght".to_string()),
                ("Tallaght".to_string(), "Abbey Street".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_every_member_has_one_category_edge() {
        let dir = tempfile::tempdir().unwrap();
        let dart = write_csv(
            dir.path(),
            "DART_Dataset.csv",
            DART_HEADER,
            &[dart_row("Pearse", "DART"), dart_row("Howth", "DART")],
        );
        let bus = write_csv(
            dir.path(),
            "BUS_Dataset.csv",
            BUS_HEADER,
            &[
                bus_row("1", "Santry", "Sandymount", "Trinity College"),
                bus_row("46A", "Phoenix Park", "Dun Laoghaire", "Dublin Zoo"),
            ],
        );
        let graph = MemoryGraph::new();
        bootstrap(&graph, "Ireland").await.unwrap();

        import_dataset(&graph, Category::Dart, &dart, "latin1").await.unwrap();
        import_dataset(&graph, Category::Bus, &bus, "latin1").await.unwrap();

        let snapshot = graph.snapshot().await;
        let stations = snapshot.nodes_with_label("Station");
        let routes = snapshot.nodes_with_label("Route");
        assert_eq!((stations.len(), routes.len()), (2, 2));
        for station in stations {
            assert_eq!(snapshot.in_degree(station, "HAS_STATION"), 1);
            assert_eq!(snapshot.in_degree(station, "HAS_ROUTE"), 0);
        }
        for route in routes {
            assert_eq!(snapshot.in_degree(route, "HAS_ROUTE"), 1);
            assert_eq!(snapshot.in_degree(route, "HAS_STATION"), 0);
        }
    }
}
