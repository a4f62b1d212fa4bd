//! Boundary to the external geocoding engine.
//!
//! The resolution engine only relies on the contract expressed here: a probe
//! either yields a [`MatchRecord`] or fails, and an ambiguous street name is
//! a distinguished failure carrying the candidate exact spellings. Backends
//! that only expose a raw failure payload can adapt it through
//! [`GeocodeFailure::from_message`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker the reference geocoder embeds in its failure message when a street
/// name is not unique within a borough.
const SIMILAR_NAMES_MARKER: &str = "SIMILAR NAMES";

/// Which geocoder function a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeocodeFunction {
    /// Address point lookup ("AP").
    #[default]
    AddressPoint,
    /// Property-level lookup ("1B").
    PropertyLevel,
}

impl GeocodeFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            GeocodeFunction::AddressPoint => "AP",
            GeocodeFunction::PropertyLevel => "1B",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AP" => Some(GeocodeFunction::AddressPoint),
            "1B" => Some(GeocodeFunction::PropertyLevel),
            _ => None,
        }
    }
}

/// One fully-specified lookup handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub function: GeocodeFunction,
    pub house_number: String,
    pub street: String,
    pub borough_code: Option<u8>,
    pub zip: Option<String>,
}

/// Engine-returned match. The typed fields are the ones the resolution
/// engine and projector consume; everything else the backend reports rides
/// along untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borough_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borough_code: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MatchRecord {
    /// A record is only worth returning when the fields callers key on are
    /// all present: borough name, display house number, normalized street.
    pub fn is_resolved(&self) -> bool {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }
        present(&self.borough_name)
            && present(&self.house_number_display)
            && present(&self.street_name)
    }
}

/// Failure reported by the engine for a single lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeFailure {
    #[error("street name is not unique ({} candidates)", .street_names.len())]
    AmbiguousStreet { street_names: Vec<String> },
    #[error("geocoder failure: {message}")]
    Backend { message: String },
}

impl GeocodeFailure {
    /// Adapter for backends that only surface a message and an optional
    /// candidate list: the similar-names marker plus a non-empty list is the
    /// ambiguity signal, anything else is a plain backend failure.
    pub fn from_message(message: impl Into<String>, street_names: Vec<String>) -> Self {
        let message = message.into();
        if message.contains(SIMILAR_NAMES_MARKER) && !street_names.is_empty() {
            GeocodeFailure::AmbiguousStreet { street_names }
        } else {
            GeocodeFailure::Backend { message }
        }
    }
}

/// The external engine the resolution engine probes. Implementations must be
/// shareable across worker threads.
pub trait GeocodingEngine: Send + Sync {
    fn geocode(&self, request: &GeocodeRequest) -> Result<MatchRecord, GeocodeFailure>;
}
