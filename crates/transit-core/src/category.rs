//! Transport categories and the fixed graph vocabulary around them.
//!
//! ```cypher
//! (:Country {name: 'Ireland'})-[:HAS_TRANSPORT]->(:Category {name: 'DART'})
//! (:Category {name: 'DART'})-[:HAS_STATION]->(:Station)
//! (:Category {name: 'LUAS'})-[:HAS_STATION]->(:Station)
//! (:Category {name: 'BUS'})-[:HAS_ROUTE]->(:Route)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransitError;
use crate::property::{properties, Properties};

/// Label of the root entity.
pub const COUNTRY_LABEL: &str = "Country";
/// Label of the three grouping entities.
pub const CATEGORY_LABEL: &str = "Category";
/// Edge from the root to each category.
pub const HAS_TRANSPORT: &str = "HAS_TRANSPORT";
/// Name of the root entity unless configured otherwise.
pub const DEFAULT_COUNTRY: &str = "Ireland";

/// One of the three transport modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Dart,
    Luas,
    Bus,
}

impl Category {
    /// Pipeline order.
    pub const ALL: [Category; 3] = [Category::Dart, Category::Luas, Category::Bus];

    /// The `name` property, also used to address the category node.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Dart => "DART",
            Category::Luas => "LUAS",
            Category::Bus => "BUS",
        }
    }

    pub fn mode_type(&self) -> &'static str {
        match self {
            Category::Dart => "Rail",
            Category::Luas => "Tram",
            Category::Bus => "Road",
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            Category::Dart => "Irish Rail",
            Category::Luas => "Transdev",
            Category::Bus => "Dublin Bus",
        }
    }

    pub fn routes_count(&self) -> i64 {
        match self {
            Category::Dart => 1,
            Category::Luas => 2,
            Category::Bus => 130,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Dart => "Dublin Area Rapid Transit",
            Category::Luas => "Dublin Light Rail System",
            Category::Bus => "Dublin public bus service",
        }
    }

    /// Node label of the records imported under this category.
    pub fn member_label(&self) -> &'static str {
        match self {
            Category::Dart | Category::Luas => "Station",
            Category::Bus => "Route",
        }
    }

    /// Edge type from the category node to each of its records.
    pub fn membership_edge(&self) -> &'static str {
        match self {
            Category::Dart | Category::Luas => "HAS_STATION",
            Category::Bus => "HAS_ROUTE",
        }
    }

    /// Default CSV file name inside the data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Category::Dart => "DART_Dataset.csv",
            Category::Luas => "LUAS_Dataset.csv",
            Category::Bus => "BUS_Dataset.csv",
        }
    }

    /// Properties of the category node.
    pub fn properties(&self) -> Properties {
        let mut props = properties([
            ("name", self.name()),
            ("type", self.mode_type()),
            ("operator", self.operator()),
            ("description", self.description()),
        ]);
        props.insert("routes_count".to_string(), self.routes_count().into());
        props
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = TransitError;

    /// Parse from a category name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DART" => Ok(Category::Dart),
            "LUAS" => Ok(Category::Luas),
            "BUS" => Ok(Category::Bus),
            _ => Err(TransitError::UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropValue;

    #[test]
    fn test_category_properties() {
        let props = Category::Luas.properties();
        assert_eq!(props.get("name"), Some(&PropValue::from("LUAS")));
        assert_eq!(props.get("type"), Some(&PropValue::from("Tram")));
        assert_eq!(props.get("operator"), Some(&PropValue::from("Transdev")));
        assert_eq!(props.get("routes_count"), Some(&PropValue::Int(2)));
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("dart".parse::<Category>().unwrap(), Category::Dart);
        assert_eq!(" Bus ".parse::<Category>().unwrap(), Category::Bus);
        assert!("tram".parse::<Category>().is_err());
    }

    #[test]
    fn test_member_vocabulary() {
        assert_eq!(Category::Dart.member_label(), "Station");
        assert_eq!(Category::Luas.membership_edge(), "HAS_STATION");
        assert_eq!(Category::Bus.member_label(), "Route");
        assert_eq!(Category::Bus.membership_edge(), "HAS_ROUTE");
    }
}
