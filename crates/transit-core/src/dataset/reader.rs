//! CSV decoding.
//!
//! Files are read as bytes and decoded with a configurable encoding before
//! parsing; the datasets carry Irish place names with non-ASCII characters
//! and are published as latin1.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::Encoding;
use tracing::{debug, warn};

use super::{BusRoute, DartStation, LuasStation, MemberNode, TransitRecord};
use crate::category::Category;
use crate::error::{TransitError, TransitResult};

/// A data row that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the file.
    pub line: u64,
    pub reason: String,
}

/// Labels decoded as ISO-8859-1 proper rather than through the WHATWG table,
/// which maps them to windows-1252.
const LATIN1_LABELS: &[&str] = &["latin1", "latin-1", "latin_1", "iso-8859-1", "iso8859-1", "iso_8859-1", "l1"];

/// How file bytes become text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1: each byte is the code point of the same value, so 0x80 to
    /// 0x9F decode to C1 controls.
    Latin1,
    Whatwg(&'static Encoding),
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Whatwg(encoding) => encoding.name(),
        }
    }
}

/// Resolve an encoding label such as `latin1` or `utf-8`.
///
/// Latin-1 labels decode byte for byte; every other label goes through the
/// WHATWG label table (`cp1252` for windows-1252).
pub fn resolve_encoding(label: &str) -> TransitResult<TextEncoding> {
    let label = label.trim();
    if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        return Ok(TextEncoding::Latin1);
    }
    Encoding::for_label(label.as_bytes())
        .map(TextEncoding::Whatwg)
        .ok_or_else(|| TransitError::UnknownEncoding(label.to_string()))
}

/// Read the whole file and decode it to text.
pub fn decode_file(path: &Path, encoding: TextEncoding) -> TransitResult<String> {
    let bytes = std::fs::read(path)?;
    match encoding {
        TextEncoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(&bytes).into_owned()),
        TextEncoding::Whatwg(encoding) => {
            let (text, used, had_errors) = encoding.decode(&bytes);
            if had_errors {
                warn!(path = %path.display(), encoding = used.name(), "Malformed sequences replaced while decoding");
            }
            Ok(text.into_owned())
        }
    }
}

/// A decoded row with its 1-based line in the file, or why it did not decode.
pub type ParsedRow<R> = Result<(u64, R), RowError>;

/// Parse decoded CSV text into records of one dataset.
///
/// Fails as a whole when a required header is missing. Individual rows that
/// do not decode are returned as `Err(RowError)` so the caller can skip them.
/// A row shorter than the header decodes with its trailing fields absent.
pub fn parse_records<R: TransitRecord>(text: &str, path: &Path) -> TransitResult<Vec<ParsedRow<R>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    check_headers::<R>(&headers, path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let row = if record.len() < headers.len() {
                    let present: StringRecord = headers.iter().take(record.len()).collect();
                    record.deserialize::<R>(Some(&present))
                } else {
                    record.deserialize::<R>(Some(&headers))
                };
                rows.push(
                    row.map(|r| (line, r))
                        .map_err(|e| RowError { line, reason: e.to_string() }),
                );
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                rows.push(Err(RowError { line, reason: e.to_string() }));
            }
        }
    }

    debug!(path = %path.display(), rows = rows.len(), "Parsed CSV");
    Ok(rows)
}

/// Read and parse one dataset file.
pub fn read_dataset<R: TransitRecord>(
    path: &Path,
    encoding: TextEncoding,
) -> TransitResult<Vec<ParsedRow<R>>> {
    let text = decode_file(path, encoding)?;
    parse_records::<R>(&text, path)
}

/// Read the dataset of `category` into entities ready for writing.
pub fn read_members(
    category: Category,
    path: &Path,
    encoding: TextEncoding,
) -> TransitResult<Vec<ParsedRow<MemberNode>>> {
    match category {
        Category::Dart => Ok(to_members(read_dataset::<DartStation>(path, encoding)?)),
        Category::Luas => Ok(to_members(read_dataset::<LuasStation>(path, encoding)?)),
        Category::Bus => Ok(to_members(read_dataset::<BusRoute>(path, encoding)?)),
    }
}

fn to_members<R: TransitRecord>(rows: Vec<ParsedRow<R>>) -> Vec<ParsedRow<MemberNode>> {
    rows.into_iter()
        .map(|row| row.map(|(line, record)| (line, MemberNode::from_record(&record))))
        .collect()
}

fn check_headers<R: TransitRecord>(headers: &StringRecord, path: &Path) -> TransitResult<()> {
    let missing: Vec<String> = R::HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|h| h.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransitError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropValue;
    use std::io::Write;

    const LUAS_HEADER: &str = "Station Name,Line,Station_ID,Location,Key Features/Attractions,Type (Terminus/Regular),Interchange,Zone,Daily Footfall,Facilities,Accessibility,Latitude,Longitude,Parking Availability,Nearby Landmarks,First Tram Time,Last Tram Time";

    #[test]
    fn test_parse_dart_rows() {
        let text = "StationName,Operational,Location,Station Address,Eircode,ATM,Weekend Working,Wi-Fi & Internet Access,Refreshments,Phone Charging,Ticket Vending Machine,Smart Card Enabled,Routes Serviced\n\
                    Pearse,Yes,Dublin 2,Westland Row,D02 X292,Yes,Yes,Yes,Yes,No,Yes,Yes,\"Howth - Greystones, Malahide - Bray\"\n";
        let rows = parse_records::<DartStation>(text, Path::new("dart.csv")).unwrap();
        assert_eq!(rows.len(), 1);

        let (line, record) = rows[0].as_ref().unwrap();
        assert_eq!(*line, 2);
        let member = MemberNode::from_record(record);
        assert_eq!(member.label, "Station");
        assert_eq!(member.category, Category::Dart);
        assert_eq!(member.display_name(), "Pearse");
        assert_eq!(
            member.properties.get("routes_serviced"),
            Some(&PropValue::from("Howth - Greystones, Malahide - Bray"))
        );
        assert_eq!(member.properties.get("address"), Some(&PropValue::from("Westland Row")));
    }

    #[test]
    fn test_missing_columns_fail_whole_file() {
        let text = "Route Number,From,To\n46A,Phoenix Park,Dun Laoghaire\n";
        let err = parse_records::<BusRoute>(text, Path::new("bus.csv")).unwrap_err();
        match err {
            TransitError::MissingColumns { missing, .. } => {
                assert!(missing.contains(&"Key Landmarks".to_string()));
                assert!(!missing.contains(&"From".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_match_is_exact() {
        // "Station name" differs from "Station Name" by case only.
        let header = LUAS_HEADER.replace("Station Name", "Station name");
        let err = parse_records::<LuasStation>(&format!("{header}\n"), Path::new("luas.csv"))
            .unwrap_err();
        assert!(matches!(err, TransitError::MissingColumns { .. }));
    }

    #[test]
    fn test_short_row_keeps_present_fields() {
        let text = format!(
            "{LUAS_HEADER}\n\
             Tallaght,Red,R01,Tallaght,The Square,Terminus,No,4,9000,Parking,Step-free,53.28,-6.37,Yes,The Square,05:30,00:30\n\
             Heuston,Red\n\
             Dundrum,Green,G07,,Shopping,Regular,No,3,8000,Shops,Step-free,53.29,-6.24,Yes,Dundrum Town Centre,05:30,00:30\n"
        );
        let rows = parse_records::<LuasStation>(&text, Path::new("luas.csv")).unwrap();
        assert_eq!(rows.len(), 3);

        let (line, short) = rows[1].as_ref().unwrap();
        assert_eq!(*line, 3);
        let member = MemberNode::from_record(short);
        assert_eq!(member.display_name(), "Heuston");
        assert_eq!(member.properties.get("Line"), Some(&PropValue::from("Red")));
        assert!(!member.properties.contains_key("Interchange"));
        assert_eq!(member.properties.len(), 2);

        // an empty field is present, just empty
        let (_, full) = rows[2].as_ref().unwrap();
        let member = MemberNode::from_record(full);
        assert_eq!(member.properties.get("Location"), Some(&PropValue::from("")));
        assert_eq!(member.properties.len(), LuasStation::HEADERS.len());
    }

    #[test]
    fn test_rows_report_file_lines() {
        let text = format!(
            "{LUAS_HEADER}\n\
             \"Tallaght\",Red,R01,Tallaght,\"The Square,\nShopping\",Terminus,No,4,9000,Parking,Step-free,53.28,-6.37,Yes,The Square,05:30,00:30\n\
             \n\
             Heuston,Red\n"
        );
        let rows = parse_records::<LuasStation>(&text, Path::new("luas.csv")).unwrap();
        let lines: Vec<u64> = rows.iter().map(|r| r.as_ref().unwrap().0).collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn test_latin1_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("luas.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(LUAS_HEADER.as_bytes()).unwrap();
        file.write_all(b"\n").unwrap();
        // 0xFA is a u with an acute accent in latin1.
        file.write_all(b"Dundrum,Green,G07,D\xfan Droma,Shopping,Regular,No,3,8000,Shops,Step-free,53.29,-6.24,Yes,Dundrum Town Centre,05:30,00:30\n")
            .unwrap();
        drop(file);

        let encoding = resolve_encoding("latin1").unwrap();
        let members = read_members(Category::Luas, &path, encoding).unwrap();
        let (_, member) = members[0].as_ref().unwrap();
        assert_eq!(member.properties.get("Location"), Some(&PropValue::from("Dún Droma")));
    }

    #[test]
    fn test_latin1_is_not_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.csv");
        std::fs::write(&path, b"\x80\xe9").unwrap();

        assert_eq!(resolve_encoding("Latin1").unwrap(), TextEncoding::Latin1);
        let latin1 = decode_file(&path, resolve_encoding("latin1").unwrap()).unwrap();
        assert_eq!(latin1, "\u{80}é");

        let cp1252 = decode_file(&path, resolve_encoding("cp1252").unwrap()).unwrap();
        assert_eq!(cp1252, "€é");
    }

    #[test]
    fn test_unknown_encoding() {
        assert!(matches!(
            resolve_encoding("klingon"),
            Err(TransitError::UnknownEncoding(_))
        ));
    }
}
