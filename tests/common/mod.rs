use std::collections::HashMap;
use std::sync::Mutex;

use geosuggest::{GeocodeFailure, GeocodeRequest, GeocodingEngine, MatchRecord};

/// Scripted response for one (street, borough, zip) lookup.
#[derive(Debug, Clone)]
pub enum Script {
    Match(MatchRecord),
    Ambiguous(Vec<String>),
    Fail(String),
}

type ScriptKey = (String, Option<u8>, Option<String>);

/// In-memory geocoder scripted per lookup; anything unscripted fails like a
/// not-found address. Records every request it receives.
pub struct ScriptedEngine {
    scripts: HashMap<ScriptKey, Script>,
    calls: Mutex<Vec<GeocodeRequest>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_match(mut self, street: &str, borough_code: u8, record: MatchRecord) -> Self {
        self.scripts.insert(
            (street.to_uppercase(), Some(borough_code), None),
            Script::Match(record),
        );
        self
    }

    pub fn on_zip_match(mut self, street: &str, zip: &str, record: MatchRecord) -> Self {
        self.scripts.insert(
            (street.to_uppercase(), None, Some(zip.to_string())),
            Script::Match(record),
        );
        self
    }

    pub fn on_ambiguous(mut self, street: &str, borough_code: u8, names: &[&str]) -> Self {
        self.scripts.insert(
            (street.to_uppercase(), Some(borough_code), None),
            Script::Ambiguous(names.iter().map(|n| n.to_string()).collect()),
        );
        self
    }

    pub fn on_failure(mut self, street: &str, borough_code: u8, message: &str) -> Self {
        self.scripts.insert(
            (street.to_uppercase(), Some(borough_code), None),
            Script::Fail(message.to_string()),
        );
        self
    }

    pub fn calls(&self) -> Vec<GeocodeRequest> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

impl GeocodingEngine for ScriptedEngine {
    fn geocode(&self, request: &GeocodeRequest) -> Result<MatchRecord, GeocodeFailure> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(request.clone());

        let key = (
            request.street.to_uppercase(),
            request.borough_code,
            request.zip.clone(),
        );
        match self.scripts.get(&key) {
            Some(Script::Match(record)) => Ok(record.clone()),
            Some(Script::Ambiguous(names)) => Err(GeocodeFailure::AmbiguousStreet {
                street_names: names.clone(),
            }),
            Some(Script::Fail(message)) => Err(GeocodeFailure::Backend {
                message: message.clone(),
            }),
            None => Err(GeocodeFailure::Backend {
                message: "NOT FOUND".to_string(),
            }),
        }
    }
}

pub fn match_record(borough_code: u8, borough: &str, house: &str, street: &str) -> MatchRecord {
    MatchRecord {
        borough_name: Some(borough.to_string()),
        borough_code: Some(borough_code),
        house_number_display: Some(house.to_string()),
        street_name: Some(street.to_uppercase()),
        ..MatchRecord::default()
    }
}
