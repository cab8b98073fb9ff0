use thiserror::Error;

/// Errors raised by generation and location entry points.
///
/// All of them describe invalid input; internal computation never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// The declared content pool holds no identifiers.
    #[error("content pool is empty: max_content_id must be at least 1")]
    EmptyContentPool,
    /// The locator was asked for a negative shell radius.
    #[error("search radius must be non-negative, got {0}")]
    NegativeSearchRadius(i64),
    /// The observer position contains NaN or infinity.
    #[error("observer position must be finite, got {0:?}")]
    NonFiniteObserver([f64; 3]),
    /// The observer is too far out to map onto a chunk coordinate.
    #[error("observer position {0:?} lies outside the addressable chunk range")]
    ObserverOutOfRange([f64; 3]),
    /// A requested chunk coordinate does not fit in 32 bits.
    #[error("chunk coordinate out of range: {0}")]
    CoordOutOfRange(String),
    /// The world configuration is unusable.
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
}
