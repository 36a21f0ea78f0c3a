//! # Transit Graph
//!
//! Neo4j knowledge graph of the Dublin public-transport datasets.
//!
//! Bootstraps the country and category nodes, imports the DART, LUAS and bus
//! CSVs, derives relationships between the imported entities, and runs the
//! exploratory and GDS queries on top. Everything goes through the
//! `GraphStore` trait, implemented for Neo4j and in memory.

pub mod client;
pub mod import;
pub mod memory;
pub mod neo4j;
pub mod pipeline;
pub mod queries;
pub mod relate;
pub mod schema;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use client::{GraphClient, GraphConfig};
pub use import::{import_dataset, ImportReport, RowFailure, SkipReason};
pub use memory::{MemoryGraph, MemorySnapshot};
pub use pipeline::{run_pipeline, PipelineReport, PipelineStep, StepOutcome, StepReport};
pub use relate::{build_relationships, relate_category, RelateReport};
pub use schema::{bootstrap, initialize_schema, BootstrapReport};
pub use store::{
    ConnectedNode, DegreeEntry, GraphCounts, GraphStore, PathResult, Projection, ProjectionStats,
    SampleEdge,
};
