//! CSV fixtures shared by the tests.

use std::path::{Path, PathBuf};

pub const DART_HEADER: &str = "StationName,Operational,Location,Station Address,Eircode,ATM,Weekend Working,Wi-Fi & Internet Access,Refreshments,Phone Charging,Ticket Vending Machine,Smart Card Enabled,Routes Serviced";

pub const LUAS_HEADER: &str = "Station Name,Line,Station_ID,Location,Key Features/Attractions,Type (Terminus/Regular),Interchange,Zone,Daily Footfall,Facilities,Accessibility,Latitude,Longitude,Parking Availability,Nearby Landmarks,First Tram Time,Last Tram Time";

pub const BUS_HEADER: &str = "Route Number,From,To,Route Type,Frequency,Duration,Key Landmarks,Peak Hours,Operator,Primary Areas Served";

pub fn dart_row(name: &str, routes: &str) -> String {
    format!("{name},Yes,Dublin,Main St,D01 X000,No,Yes,Yes,No,Yes,Yes,Yes,\"{routes}\"")
}

pub fn luas_row(name: &str, line: &str, interchange: &str) -> String {
    format!(
        "{name},{line},LS01,Dublin,Park,Regular,{interchange},1,1000,None,Yes,53.28,-6.37,No,Square,05:30,00:30"
    )
}

pub fn bus_row(route: &str, from: &str, to: &str, landmarks: &str) -> String {
    format!("{route},{from},{to},Radial,10 min,45 min,\"{landmarks}\",07:00-09:00,Dublin Bus,City")
}

/// Write a CSV file with `header` and `rows`, newline separated.
pub fn write_csv(dir: &Path, file: &str, header: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(file);
    let mut lines = vec![header.to_string()];
    lines.extend(rows.iter().cloned());
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}
