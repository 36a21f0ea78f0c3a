//! Relationship rules.
//!
//! A rule pairs every two distinct records of one category that satisfy a
//! predicate and creates one directed edge per ordered pair. Symmetric
//! predicates therefore yield edges in both directions.
//!
//! Predicates compare text exactly: list intersections split on `", "` and are
//! case and punctuation sensitive. A property missing on either side never
//! matches, the same way `null` comparisons behave in Cypher.

use serde::Serialize;

use crate::category::Category;
use crate::property::{PropValue, Properties};

/// Delimiter of the list-valued CSV fields.
pub const LIST_DELIMITER: &str = ", ";

/// Comparison between the properties of two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// `a.p = b.p`
    Equal { property: &'static str },
    /// Any token of `a.p` appears in `b.p`, both split on `delimiter`.
    SharedToken {
        property: &'static str,
        delimiter: &'static str,
    },
    /// `a.p = value AND b.p = value`
    BothEqual {
        property: &'static str,
        value: &'static str,
    },
    /// `a.p1 = b.p1 OR a.p2 = b.p2 ...`
    AnyEqual { properties: &'static [&'static str] },
}

impl Predicate {
    /// Evaluate the predicate for the ordered pair `(a, b)`.
    pub fn matches(&self, a: &Properties, b: &Properties) -> bool {
        match self {
            Predicate::Equal { property } => equal(a, b, property),
            Predicate::SharedToken { property, delimiter } => {
                match (text(a, property), text(b, property)) {
                    (Some(left), Some(right)) => {
                        let right: Vec<&str> = right.split(*delimiter).collect();
                        left.split(*delimiter).any(|token| right.contains(&token))
                    }
                    _ => false,
                }
            }
            Predicate::BothEqual { property, value } => {
                text(a, property) == Some(*value) && text(b, property) == Some(*value)
            }
            Predicate::AnyEqual { properties } => properties.iter().any(|p| equal(a, b, p)),
        }
    }

    /// Property keys the predicate reads.
    pub fn properties(&self) -> Vec<&'static str> {
        match self {
            Predicate::Equal { property }
            | Predicate::SharedToken { property, .. }
            | Predicate::BothEqual { property, .. } => vec![*property],
            Predicate::AnyEqual { properties } => properties.to_vec(),
        }
    }
}

fn text<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).and_then(PropValue::as_text)
}

fn equal(a: &Properties, b: &Properties, key: &str) -> bool {
    match (a.get(key), b.get(key)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Constant property set on every edge a rule creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeWeight {
    pub property: &'static str,
    pub value: i64,
}

/// A named relationship-building rule bound to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationRule {
    pub name: &'static str,
    pub category: Category,
    pub rel_type: &'static str,
    pub predicate: Predicate,
    pub weight: Option<EdgeWeight>,
}

/// Stations serviced by a common DART route.
pub const DART_SHARED_ROUTES: RelationRule = RelationRule {
    name: "dart_shared_routes",
    category: Category::Dart,
    rel_type: "CONNECTED_TO",
    predicate: Predicate::SharedToken {
        property: "routes_serviced",
        delimiter: LIST_DELIMITER,
    },
    weight: None,
};

/// Stations on the same LUAS line, one hop costs 5 minutes.
pub const LUAS_SHARED_LINE: RelationRule = RelationRule {
    name: "luas_shared_line",
    category: Category::Luas,
    rel_type: "CONNECTED_TO",
    predicate: Predicate::Equal { property: "Line" },
    weight: Some(EdgeWeight {
        property: "travel_time",
        value: 5,
    }),
};

/// Interchange stations, a change costs 10 minutes.
pub const LUAS_INTERCHANGE: RelationRule = RelationRule {
    name: "luas_interchange",
    category: Category::Luas,
    rel_type: "INTERCHANGE",
    predicate: Predicate::BothEqual {
        property: "Interchange",
        value: "Yes",
    },
    weight: Some(EdgeWeight {
        property: "travel_time",
        value: 10,
    }),
};

/// Bus routes passing a common landmark.
pub const BUS_SHARED_LANDMARK: RelationRule = RelationRule {
    name: "bus_shared_landmark",
    category: Category::Bus,
    rel_type: "SHARES_LANDMARK",
    predicate: Predicate::SharedToken {
        property: "Key Landmarks",
        delimiter: LIST_DELIMITER,
    },
    weight: None,
};

/// Bus routes with the same origin or the same destination.
pub const BUS_SHARED_ENDPOINT: RelationRule = RelationRule {
    name: "bus_shared_endpoint",
    category: Category::Bus,
    rel_type: "CONNECTED_TO",
    predicate: Predicate::AnyEqual {
        properties: &["From", "To"],
    },
    weight: None,
};

impl Category {
    /// Rules run after this category's import, in order.
    pub fn relation_rules(&self) -> &'static [RelationRule] {
        match self {
            Category::Dart => &[DART_SHARED_ROUTES],
            Category::Luas => &[LUAS_SHARED_LINE, LUAS_INTERCHANGE],
            Category::Bus => &[BUS_SHARED_LANDMARK, BUS_SHARED_ENDPOINT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::properties;

    #[test]
    fn test_equal_line() {
        let red = properties([("name", "Tallaght"), ("Line", "Red")]);
        let red2 = properties([("name", "Heuston"), ("Line", "Red")]);
        let green = properties([("name", "Dundrum"), ("Line", "Green")]);

        let p = LUAS_SHARED_LINE.predicate;
        assert!(p.matches(&red, &red2));
        assert!(p.matches(&red2, &red));
        assert!(!p.matches(&red, &green));
    }

    #[test]
    fn test_missing_property_never_matches() {
        let dart = properties([("name", "Pearse")]);
        let other = properties([("name", "Connolly")]);
        assert!(!LUAS_SHARED_LINE.predicate.matches(&dart, &other));
        assert!(!DART_SHARED_ROUTES.predicate.matches(&dart, &other));
        assert!(!BUS_SHARED_ENDPOINT.predicate.matches(&dart, &other));
    }

    #[test]
    fn test_shared_token_is_exact() {
        let a = properties([("Key Landmarks", "Trinity College, Spire")]);
        let b = properties([("Key Landmarks", "GPO, Spire")]);
        let c = properties([("Key Landmarks", "spire,GPO")]);

        let p = BUS_SHARED_LANDMARK.predicate;
        assert!(p.matches(&a, &b));
        // case and delimiter both differ
        assert!(!p.matches(&a, &c));
    }

    #[test]
    fn test_both_flagged() {
        let yes = properties([("Interchange", "Yes")]);
        let yes2 = properties([("Interchange", "Yes")]);
        let no = properties([("Interchange", "No")]);

        let p = LUAS_INTERCHANGE.predicate;
        assert!(p.matches(&yes, &yes2));
        assert!(!p.matches(&yes, &no));
        assert!(!p.matches(&no, &yes));
    }

    #[test]
    fn test_any_endpoint() {
        let a = properties([("From", "Ringsend"), ("To", "Tallaght")]);
        let b = properties([("From", "Howth"), ("To", "Tallaght")]);
        let c = properties([("From", "Howth"), ("To", "Swords")]);

        let p = BUS_SHARED_ENDPOINT.predicate;
        assert!(p.matches(&a, &b));
        assert!(p.matches(&b, &c));
        assert!(!p.matches(&a, &c));
    }

    #[test]
    fn test_rules_per_category() {
        assert_eq!(Category::Dart.relation_rules().len(), 1);
        let luas: Vec<_> = Category::Luas.relation_rules().iter().map(|r| r.rel_type).collect();
        assert_eq!(luas, vec!["CONNECTED_TO", "INTERCHANGE"]);
        assert!(Category::Bus
            .relation_rules()
            .iter()
            .all(|r| r.category == Category::Bus && r.weight.is_none()));
    }
}
