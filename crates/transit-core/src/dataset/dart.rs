//! DART station records.

use serde::Deserialize;

use super::TransitRecord;
use crate::category::Category;
use crate::property::{present_properties, Properties};

/// One row of `DART_Dataset.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct DartStation {
    #[serde(rename = "StationName", default, deserialize_with = "super::present")]
    pub station_name: Option<String>,
    #[serde(rename = "Operational", default, deserialize_with = "super::present")]
    pub operational: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "super::present")]
    pub location: Option<String>,
    #[serde(rename = "Station Address", default, deserialize_with = "super::present")]
    pub address: Option<String>,
    #[serde(rename = "Eircode", default, deserialize_with = "super::present")]
    pub eircode: Option<String>,
    #[serde(rename = "ATM", default, deserialize_with = "super::present")]
    pub atm: Option<String>,
    #[serde(rename = "Weekend Working", default, deserialize_with = "super::present")]
    pub weekend_working: Option<String>,
    #[serde(rename = "Wi-Fi & Internet Access", default, deserialize_with = "super::present")]
    pub wifi: Option<String>,
    #[serde(rename = "Refreshments", default, deserialize_with = "super::present")]
    pub refreshments: Option<String>,
    #[serde(rename = "Phone Charging", default, deserialize_with = "super::present")]
    pub phone_charging: Option<String>,
    #[serde(rename = "Ticket Vending Machine", default, deserialize_with = "super::present")]
    pub ticket_machine: Option<String>,
    #[serde(rename = "Smart Card Enabled", default, deserialize_with = "super::present")]
    pub smart_card_enabled: Option<String>,
    /// Comma-space separated route list, e.g. `"Howth - Greystones, Malahide - Bray"`.
    #[serde(rename = "Routes Serviced", default, deserialize_with = "super::present")]
    pub routes_serviced: Option<String>,
}

impl TransitRecord for DartStation {
    const CATEGORY: Category = Category::Dart;

    const HEADERS: &'static [&'static str] = &[
        "StationName",
        "Operational",
        "Location",
        "Station Address",
        "Eircode",
        "ATM",
        "Weekend Working",
        "Wi-Fi & Internet Access",
        "Refreshments",
        "Phone Charging",
        "Ticket Vending Machine",
        "Smart Card Enabled",
        "Routes Serviced",
    ];

    fn properties(&self) -> Properties {
        present_properties([
            ("name", &self.station_name),
            ("operational", &self.operational),
            ("location", &self.location),
            ("address", &self.address),
            ("eircode", &self.eircode),
            ("atm", &self.atm),
            ("weekend_working", &self.weekend_working),
            ("wifi", &self.wifi),
            ("refreshments", &self.refreshments),
            ("phone_charging", &self.phone_charging),
            ("ticket_machine", &self.ticket_machine),
            ("smart_card_enabled", &self.smart_card_enabled),
            ("routes_serviced", &self.routes_serviced),
        ])
    }
}
