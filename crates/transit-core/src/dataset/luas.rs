//! LUAS tram station records.

use serde::Deserialize;

use super::TransitRecord;
use crate::category::Category;
use crate::property::{present_properties, Properties};

/// One row of `LUAS_Dataset.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct LuasStation {
    #[serde(rename = "Station Name", default, deserialize_with = "super::present")]
    pub station_name: Option<String>,
    #[serde(rename = "Line", default, deserialize_with = "super::present")]
    pub line: Option<String>,
    #[serde(rename = "Station_ID", default, deserialize_with = "super::present")]
    pub station_id: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "super::present")]
    pub location: Option<String>,
    #[serde(rename = "Key Features/Attractions", default, deserialize_with = "super::present")]
    pub key_features: Option<String>,
    #[serde(rename = "Type (Terminus/Regular)", default, deserialize_with = "super::present")]
    pub station_type: Option<String>,
    /// `Yes` marks an interchange station.
    #[serde(rename = "Interchange", default, deserialize_with = "super::present")]
    pub interchange: Option<String>,
    #[serde(rename = "Zone", default, deserialize_with = "super::present")]
    pub zone: Option<String>,
    #[serde(rename = "Daily Footfall", default, deserialize_with = "super::present")]
    pub daily_footfall: Option<String>,
    #[serde(rename = "Facilities", default, deserialize_with = "super::present")]
    pub facilities: Option<String>,
    #[serde(rename = "Accessibility", default, deserialize_with = "super::present")]
    pub accessibility: Option<String>,
    #[serde(rename = "Latitude", default, deserialize_with = "super::present")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude", default, deserialize_with = "super::present")]
    pub longitude: Option<String>,
    #[serde(rename = "Parking Availability", default, deserialize_with = "super::present")]
    pub parking: Option<String>,
    #[serde(rename = "Nearby Landmarks", default, deserialize_with = "super::present")]
    pub nearby_landmarks: Option<String>,
    #[serde(rename = "First Tram Time", default, deserialize_with = "super::present")]
    pub first_tram: Option<String>,
    #[serde(rename = "Last Tram Time", default, deserialize_with = "super::present")]
    pub last_tram: Option<String>,
}

impl TransitRecord for LuasStation {
    const CATEGORY: Category = Category::Luas;

    const HEADERS: &'static [&'static str] = &[
        "Station Name",
        "Line",
        "Station_ID",
        "Location",
        "Key Features/Attractions",
        "Type (Terminus/Regular)",
        "Interchange",
        "Zone",
        "Daily Footfall",
        "Facilities",
        "Accessibility",
        "Latitude",
        "Longitude",
        "Parking Availability",
        "Nearby Landmarks",
        "First Tram Time",
        "Last Tram Time",
    ];

    fn properties(&self) -> Properties {
        present_properties([
            ("name", &self.station_name),
            ("Line", &self.line),
            ("Station_ID", &self.station_id),
            ("Location", &self.location),
            ("Key_Features_Attractions", &self.key_features),
            ("Type", &self.station_type),
            ("Interchange", &self.interchange),
            ("Zone", &self.zone),
            ("Daily_Footfall", &self.daily_footfall),
            ("Facilities", &self.facilities),
            ("Accessibility", &self.accessibility),
            ("Latitude", &self.latitude),
            ("Longitude", &self.longitude),
            ("Parking_Availability", &self.parking),
            ("Nearby_Landmarks", &self.nearby_landmarks),
            ("First_Tram_Time", &self.first_tram),
            ("Last_Tram_Time", &self.last_tram),
        ])
    }
}
