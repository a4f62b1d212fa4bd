use std::sync::Arc;

use tracing::warn;

use super::hypothesis::{Hypothesis, BOROUGH_CODES};
use super::limiter::RateLimiter;
use crate::geocoder::{GeocodeFailure, GeocodeFunction, GeocodeRequest, GeocodingEngine, MatchRecord};

/// Classified result of probing one hypothesis. Exactly one outcome per
/// probe; `NoMatch` and `EngineError` contribute nothing to the result set.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Match(MatchRecord),
    Ambiguous {
        street_names: Vec<String>,
        borough_code: Option<u8>,
    },
    NoMatch,
    EngineError,
}

/// Executes single hypotheses against the engine: validates the borough
/// code, waits for a rate-limiter slot, then classifies the engine's answer.
pub struct ProbeRunner<G> {
    engine: Arc<G>,
    function: GeocodeFunction,
    limiter: RateLimiter,
}

impl<G: GeocodingEngine> ProbeRunner<G> {
    pub fn new(engine: Arc<G>, function: GeocodeFunction, limiter: RateLimiter) -> Self {
        Self {
            engine,
            function,
            limiter,
        }
    }

    pub fn probe(&self, hypothesis: &Hypothesis) -> ProbeOutcome {
        if let Some(code) = hypothesis.borough_code {
            if !BOROUGH_CODES.contains(&code) {
                warn!(
                    borough_code = code,
                    street = %hypothesis.street,
                    "skipping probe with out-of-range borough code"
                );
                return ProbeOutcome::NoMatch;
            }
        }

        self.limiter.await_slot();
        let request = GeocodeRequest {
            function: self.function,
            house_number: hypothesis.house_number.clone(),
            street: hypothesis.street.clone(),
            borough_code: hypothesis.borough_code,
            zip: hypothesis.zip.clone(),
        };
        match self.engine.geocode(&request) {
            Ok(record) => ProbeOutcome::Match(record),
            Err(GeocodeFailure::AmbiguousStreet { street_names }) => ProbeOutcome::Ambiguous {
                street_names,
                borough_code: hypothesis.borough_code,
            },
            Err(failure @ GeocodeFailure::Backend { .. }) => {
                warn!(
                    street = %hypothesis.street,
                    error = %failure,
                    "geocoder failure absorbed"
                );
                ProbeOutcome::EngineError
            }
        }
    }
}
