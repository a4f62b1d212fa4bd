//! Address suggestion engine for Geosupport-style geocoders.
//!
//! Given a partially-specified street address (house number, street name,
//! optional borough or ZIP), the engine probes an external geocoder under
//! different hypotheses, expands the geocoder's "similar names" signal into
//! one extra round of probes, and returns a deduplicated, sorted set of
//! matches. Whole-query results are memoized behind a bounded, time-expiring
//! cache, and probe fan-out runs with bounded parallelism and optional rate
//! limiting.
//!
//! The geocoder itself is a collaborator behind the [`GeocodingEngine`]
//! trait; any backend that can report a match record or a "similar street
//! names" failure can be plugged in.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use geosuggest::{
//!     GeocodeFailure, GeocodeRequest, GeocodingEngine, MatchRecord, SuggestConfig,
//!     SuggestionEngine,
//! };
//!
//! struct SingleBoroughEngine;
//!
//! impl GeocodingEngine for SingleBoroughEngine {
//!     fn geocode(&self, request: &GeocodeRequest) -> Result<MatchRecord, GeocodeFailure> {
//!         if request.borough_code == Some(1) {
//!             Ok(MatchRecord {
//!                 borough_name: Some("MANHATTAN".to_string()),
//!                 borough_code: Some(1),
//!                 house_number_display: Some(request.house_number.clone()),
//!                 street_name: Some(request.street.to_uppercase()),
//!                 ..MatchRecord::default()
//!             })
//!         } else {
//!             Err(GeocodeFailure::Backend {
//!                 message: "NOT FOUND".to_string(),
//!             })
//!         }
//!     }
//! }
//!
//! let engine = SuggestionEngine::new(Arc::new(SingleBoroughEngine), SuggestConfig::default());
//! let matches = engine.suggestions("100 Gold St")?;
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].borough_name.as_deref(), Some("MANHATTAN"));
//! # Ok::<(), geosuggest::SuggestError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod geocoder;
pub mod parser;
pub mod suggest;
pub mod telemetry;

pub use config::SuggestConfig;
pub use error::SuggestError;
pub use geocoder::{GeocodeFailure, GeocodeFunction, GeocodeRequest, GeocodingEngine, MatchRecord};
pub use parser::{AddressParser, ParsedAddress, RegexAddressParser};
pub use suggest::{ProbeOutcome, SuggestionEngine, SuggestionRequest};
