//! # Transit Core
//!
//! Domain model for the Dublin public-transport knowledge graph.
//!
//! Holds the transport categories, the CSV record types of each dataset,
//! the relationship rules that derive edges between imported records, and
//! the pipeline configuration. Nothing here talks to a database.

pub mod category;
pub mod config;
pub mod dataset;
pub mod error;
pub mod property;
pub mod relation;

pub use category::Category;
pub use config::{ErrorPolicy, PipelineConfig};
pub use dataset::{MemberNode, TransitRecord};
pub use error::{TransitError, TransitResult};
pub use property::{PropValue, Properties};
pub use relation::{EdgeWeight, Predicate, RelationRule};
