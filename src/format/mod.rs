//! Pure projections over [`MatchRecord`]: normalized fields, a display
//! string, and a GeoJSON feature. Stateless, no concurrency concerns.

use crate::geocoder::MatchRecord;
use serde::Serialize;
use serde_json::{json, Value};

/// WGS84 point attached to a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Uppercased borough name; absent becomes empty.
pub fn format_borough(borough: Option<&str>) -> String {
    borough.map(str::to_uppercase).unwrap_or_default()
}

/// Borough-block-lot tax identifier, passed through unchanged. Backends
/// report it either as a typed field or nested under the reference
/// geocoder's verbose key in the passthrough map.
pub fn format_bbl(record: &MatchRecord) -> Option<String> {
    const BBL_KEY: &str = "BOROUGH BLOCK LOT (BBL)";
    if let Some(bbl) = &record.bbl {
        return Some(bbl.clone());
    }
    match record.extra.get(BBL_KEY) {
        Some(Value::String(bbl)) => Some(bbl.clone()),
        Some(Value::Object(map)) => map
            .get(BBL_KEY)
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Interpret a passthrough value as a coordinate: JSON numbers directly,
/// strings by parsing.
pub fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

/// Both axes or nothing. Typed fields win; otherwise the reference
/// geocoder's "Latitude"/"Longitude" passthrough keys are consulted.
pub fn coordinates(record: &MatchRecord) -> Option<Coordinates> {
    let latitude = record
        .latitude
        .or_else(|| record.extra.get("Latitude").and_then(coordinate_value))?;
    let longitude = record
        .longitude
        .or_else(|| record.extra.get("Longitude").and_then(coordinate_value))?;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Single-line rendering, e.g. `100 GOLD STREET, MANHATTAN 10038`. Absent
/// parts are omitted rather than padded.
pub fn display_string(record: &MatchRecord) -> String {
    let mut line = String::new();
    if let Some(house) = record.house_number_display.as_deref() {
        line.push_str(house.trim());
    }
    if let Some(street) = record.street_name.as_deref() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(street.trim());
    }
    let borough = format_borough(record.borough_name.as_deref());
    if !borough.trim().is_empty() {
        if !line.is_empty() {
            line.push_str(", ");
        }
        line.push_str(borough.trim());
    }
    if let Some(zip) = record.zip.as_deref() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(zip.trim());
    }
    line
}

/// RFC 7946 Point feature for a match; `None` without a usable coordinate
/// pair.
pub fn geojson_feature(record: &MatchRecord) -> Option<Value> {
    let point = coordinates(record)?;
    Some(json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [point.longitude, point.latitude],
        },
        "properties": {
            "borough": format_borough(record.borough_name.as_deref()),
            "borough_code": record.borough_code,
            "house_number": record.house_number_display,
            "street": record.street_name,
            "zip": record.zip,
            "bbl": format_bbl(record),
            "display": display_string(record),
        },
    }))
}
