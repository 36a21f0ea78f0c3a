//! Read-only analytics and graph-algorithm queries.

pub mod algorithms;
pub mod analytics;

pub use algorithms::{
    drop_projection_if_exists, ensure_projection, run_algorithm_demo, shortest_path, AlgorithmReport,
    ProjectionOutcome,
};
pub use analytics::{summarize, EdaSummary};
