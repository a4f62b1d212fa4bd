//! Concurrent hypothesis resolution over the geocoder boundary.

mod engine;
mod hypothesis;
mod limiter;
mod pool;
mod probe;

pub use engine::{SuggestionEngine, SuggestionRequest};
pub use hypothesis::{round_one, round_two, AmbiguousStreet, Hypothesis, BOROUGH_CODES};
pub use limiter::RateLimiter;
pub use pool::WorkerPool;
pub use probe::{ProbeOutcome, ProbeRunner};
