//! Dublin Bus route records.
//!
//! Route properties keep the CSV header names verbatim, spaces included.

use serde::Deserialize;

use super::TransitRecord;
use crate::category::Category;
use crate::property::{present_properties, Properties};

/// One row of `BUS_Dataset.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusRoute {
    #[serde(rename = "Route Number", default, deserialize_with = "super::present")]
    pub route_number: Option<String>,
    #[serde(rename = "From", default, deserialize_with = "super::present")]
    pub from: Option<String>,
    #[serde(rename = "To", default, deserialize_with = "super::present")]
    pub to: Option<String>,
    #[serde(rename = "Route Type", default, deserialize_with = "super::present")]
    pub route_type: Option<String>,
    #[serde(rename = "Frequency", default, deserialize_with = "super::present")]
    pub frequency: Option<String>,
    #[serde(rename = "Duration", default, deserialize_with = "super::present")]
    pub duration: Option<String>,
    #[serde(rename = "Key Landmarks", default, deserialize_with = "super::present")]
    pub key_landmarks: Option<String>,
    #[serde(rename = "Peak Hours", default, deserialize_with = "super::present")]
    pub peak_hours: Option<String>,
    #[serde(rename = "Operator", default, deserialize_with = "super::present")]
    pub operator: Option<String>,
    #[serde(rename = "Primary Areas Served", default, deserialize_with = "super::present")]
    pub primary_areas: Option<String>,
}

impl TransitRecord for BusRoute {
    const CATEGORY: Category = Category::Bus;

    const HEADERS: &'static [&'static str] = &[
        "Route Number",
        "From",
        "To",
        "Route Type",
        "Frequency",
        "Duration",
        "Key Landmarks",
        "Peak Hours",
        "Operator",
        "Primary Areas Served",
    ];

    fn properties(&self) -> Properties {
        present_properties([
            ("Route Number", &self.route_number),
            ("From", &self.from),
            ("To", &self.to),
            ("Route Type", &self.route_type),
            ("Frequency", &self.frequency),
            ("Duration", &self.duration),
            ("Key Landmarks", &self.key_landmarks),
            ("Peak Hours", &self.peak_hours),
            ("Operator", &self.operator),
            ("Primary Areas Served", &self.primary_areas),
        ])
    }
}
