//! CSV dataset records.
//!
//! Each dataset maps its CSV header row onto graph properties. The header
//! names are a strict contract: they must match exactly, punctuation and
//! spacing included.
//!
//! Fields are optional: a row shorter than the header still becomes an
//! entity, without the properties it lacks. An empty field is kept as an
//! empty string.

pub mod bus;
pub mod dart;
pub mod luas;
pub mod reader;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::Category;
use crate::property::{display_name, Properties};

pub use bus::BusRoute;
pub use dart::DartStation;
pub use luas::LuasStation;
pub use reader::{decode_file, read_dataset, read_members, resolve_encoding, ParsedRow, RowError, TextEncoding};

/// Field present in the row, empty or not. Used with `#[serde(default)]` so
/// that only fields past the end of a short row become `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// A CSV row type that becomes one graph entity under a category.
pub trait TransitRecord: DeserializeOwned {
    /// Category the entity is linked from.
    const CATEGORY: Category;

    /// Header names the CSV must contain.
    const HEADERS: &'static [&'static str];

    /// Graph properties, a direct rename/copy of the row's fields.
    fn properties(&self) -> Properties;
}

/// An entity ready to be written under its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberNode {
    pub category: Category,
    pub label: &'static str,
    pub properties: Properties,
}

impl MemberNode {
    pub fn from_record<R: TransitRecord>(record: &R) -> Self {
        Self {
            category: R::CATEGORY,
            label: R::CATEGORY.member_label(),
            properties: record.properties(),
        }
    }

    /// Name used in logs and analytics output.
    pub fn display_name(&self) -> String {
        display_name(&self.properties).unwrap_or_default()
    }
}
