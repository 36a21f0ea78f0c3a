//! Neo4j connection client.

use std::time::Duration;

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
    /// Applied to the initial ping only; `0` waits forever.
    pub connect_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 200,
            connect_timeout_secs: 10,
        }
    }
}

/// Client for Neo4j operations.
///
/// Every call borrows a pooled connection for the duration of that single
/// query and returns it afterwards, failed or not.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the lazy pool, so a `RETURN 1` ping forces
    /// the bolt handshake here and an unreachable server fails fast.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections.max(1))
            .fetch_size(config.fetch_size.max(1))
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        let client = Self { graph };
        if config.connect_timeout_secs > 0 {
            tokio::time::timeout(Duration::from_secs(config.connect_timeout_secs), client.ping())
                .await
                .with_context(|| format!("Timed out connecting to Neo4j at {}", config.uri))??;
        } else {
            client.ping().await?;
        }

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(client)
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result stream")? {
            rows.push(row);
        }
        debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        if let Some(row) = rows.into_iter().next() {
            let val: T = row
                .get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    /// Execute a write that ends in `RETURN count(..) AS created`.
    pub async fn execute_counted(&self, query: Query) -> Result<usize> {
        let created: i64 = self.query_scalar(query, "created").await?.unwrap_or(0);
        Ok(created.max(0) as usize)
    }

    /// Release the connection pool.
    pub fn close(self) {
        drop(self.graph);
        info!("Neo4j connection closed");
    }
}
