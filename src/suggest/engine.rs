use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::hypothesis::{self, AmbiguousStreet, BOROUGH_CODES};
use super::limiter::RateLimiter;
use super::pool::WorkerPool;
use super::probe::{ProbeOutcome, ProbeRunner};
use crate::cache::{CacheKey, MemoryCache};
use crate::config::SuggestConfig;
use crate::error::SuggestError;
use crate::geocoder::{GeocodingEngine, MatchRecord};
use crate::parser::{AddressParser, RegexAddressParser};

/// One resolution call: the free-form input plus the caller's borough
/// override and execution mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub input: String,
    pub borough_code: Option<u8>,
    pub parallel: bool,
}

impl SuggestionRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            borough_code: None,
            parallel: true,
        }
    }

    pub fn with_borough(mut self, borough_code: u8) -> Self {
        self.borough_code = Some(borough_code);
        self
    }

    /// Probe hypotheses one at a time in submission order instead of fanning
    /// out across the worker pool.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn cache_key(&self) -> CacheKey {
        let mut parts = BTreeMap::new();
        parts.insert("input", Value::from(self.input.as_str()));
        parts.insert(
            "borough_code",
            self.borough_code.map(Value::from).unwrap_or(Value::Null),
        );
        parts.insert("parallel", Value::from(self.parallel));
        CacheKey::digest(&parts)
    }
}

/// Per-call accumulation: matches in arrival order plus the deduplicated
/// (spelling, borough) pairs awaiting the expansion round. Owned by one call
/// and never shared.
#[derive(Default)]
struct ResolutionState {
    matches: Vec<MatchRecord>,
    pending: Vec<AmbiguousStreet>,
}

impl ResolutionState {
    fn absorb(&mut self, outcomes: Vec<ProbeOutcome>, expand: bool) {
        for outcome in outcomes {
            match outcome {
                ProbeOutcome::Match(record) => self.matches.push(record),
                ProbeOutcome::Ambiguous {
                    street_names,
                    borough_code,
                } if expand => {
                    for street in street_names {
                        let candidate = AmbiguousStreet {
                            street,
                            borough_code,
                        };
                        if !self.pending.contains(&candidate) {
                            self.pending.push(candidate);
                        }
                    }
                }
                ProbeOutcome::Ambiguous { street_names, .. } => {
                    // Expansion is capped at one level; deeper ambiguity is
                    // the caller's loop to drive.
                    debug!(
                        candidates = street_names.len(),
                        "ignoring ambiguity raised during the expansion round"
                    );
                }
                ProbeOutcome::NoMatch | ProbeOutcome::EngineError => {}
            }
        }
    }

    fn finalize(mut self) -> Vec<MatchRecord> {
        self.matches.retain(MatchRecord::is_resolved);
        let mut unique: Vec<MatchRecord> = Vec::with_capacity(self.matches.len());
        for record in self.matches {
            if !unique.contains(&record) {
                unique.push(record);
            }
        }
        unique.sort_by(|a, b| a.borough_name.cmp(&b.borough_name));
        unique
    }
}

/// The resolution orchestrator: builds hypothesis rounds from a parsed
/// query, dispatches them through the worker pool (or sequentially),
/// expands the geocoder's similar-names signal exactly once, and memoizes
/// whole results per call arguments.
pub struct SuggestionEngine<G, P = RegexAddressParser> {
    prober: ProbeRunner<G>,
    parser: P,
    pool: WorkerPool,
    cache: MemoryCache<Vec<MatchRecord>>,
}

impl<G: GeocodingEngine> SuggestionEngine<G> {
    pub fn new(engine: Arc<G>, config: SuggestConfig) -> Self {
        Self::with_parser(engine, RegexAddressParser::new(), config)
    }
}

impl<G, P> SuggestionEngine<G, P>
where
    G: GeocodingEngine,
    P: AddressParser,
{
    pub fn with_parser(engine: Arc<G>, parser: P, config: SuggestConfig) -> Self {
        Self {
            prober: ProbeRunner::new(
                engine,
                config.function,
                RateLimiter::new(config.dispatch.min_probe_interval),
            ),
            parser,
            pool: WorkerPool::new(config.dispatch.workers),
            cache: MemoryCache::new(config.cache.max_entries, config.cache.ttl),
        }
    }

    /// Resolve a single free-form input with default options.
    pub fn suggestions(&self, input: &str) -> Result<Vec<MatchRecord>, SuggestError> {
        self.resolve(SuggestionRequest::new(input))
    }

    /// Resolve one request, consulting the memoized result first.
    ///
    /// An out-of-range borough override fails before any geocoder contact;
    /// an input missing its house number or street resolves to an empty set.
    pub fn resolve(&self, request: SuggestionRequest) -> Result<Vec<MatchRecord>, SuggestError> {
        if let Some(code) = request.borough_code {
            if !BOROUGH_CODES.contains(&code) {
                return Err(SuggestError::InvalidBoroughCode(code));
            }
        }

        let key = request.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!(input = %request.input, "returning memoized suggestions");
            return Ok(cached);
        }

        let results = self.resolve_uncached(&request);
        self.cache.set(key, results.clone());
        Ok(results)
    }

    /// Apply [`resolve`](Self::resolve) to a sequence of requests, failing
    /// fast on the first invalid one.
    pub fn resolve_batch(
        &self,
        requests: Vec<SuggestionRequest>,
    ) -> Result<Vec<Vec<MatchRecord>>, SuggestError> {
        requests.into_iter().map(|r| self.resolve(r)).collect()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn sweep_expired(&self) -> usize {
        self.cache.sweep_expired()
    }

    fn resolve_uncached(&self, request: &SuggestionRequest) -> Vec<MatchRecord> {
        let mut parsed = self.parser.parse(&request.input);
        if request.borough_code.is_some() {
            parsed.borough_code = request.borough_code;
        }

        let round_one = hypothesis::round_one(&parsed);
        if round_one.is_empty() {
            debug!(input = %request.input, "nothing to resolve without house number and street");
            return Vec::new();
        }

        debug!(
            hypotheses = round_one.len(),
            parallel = request.parallel,
            "dispatching initial probes"
        );
        let mut state = ResolutionState::default();
        state.absorb(self.dispatch(round_one, request.parallel), true);

        if !state.pending.is_empty() {
            let round_two = hypothesis::round_two(&parsed, &state.pending);
            debug!(
                hypotheses = round_two.len(),
                "expanding similar street names"
            );
            let outcomes = self.dispatch(round_two, request.parallel);
            state.absorb(outcomes, false);
        }

        state.finalize()
    }

    fn dispatch(
        &self,
        hypotheses: Vec<hypothesis::Hypothesis>,
        parallel: bool,
    ) -> Vec<ProbeOutcome> {
        if parallel {
            self.pool
                .run_all(hypotheses, |hypothesis| self.prober.probe(&hypothesis))
        } else {
            hypotheses.iter().map(|h| self.prober.probe(h)).collect()
        }
    }
}
