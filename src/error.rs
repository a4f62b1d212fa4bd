/// Error surfaced by a resolution call.
///
/// A malformed borough override is the only condition that aborts a call
/// before any geocoder contact; everything the geocoder itself gets wrong is
/// absorbed into a smaller result set instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error("borough code must be between 1 and 5, got {0}")]
    InvalidBoroughCode(u8),
}
