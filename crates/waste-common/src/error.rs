/// Error types shared across the assistant crates.
///
/// These cover infrastructure failures (Redis, the external places provider)
/// that more than one crate may hit. Application-specific errors live in the
/// server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis unavailable, degrading gracefully")]
    RedisUnavailable,

    #[error("places provider error: {0}")]
    Places(#[from] crate::places::PlacesClientError),
}
