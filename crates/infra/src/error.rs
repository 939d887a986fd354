use thiserror::Error;

/// Storage collaborator failure.
///
/// In-memory implementations are infallible; database-backed ones surface
/// their transport failures through this type. The HTTP layer maps it to a
/// generic server error, never to anything a client could probe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
