use thiserror::Error;

/// Errors surfaced by collection loading and query materialization.
///
/// Cloneable so a load failure can be handed to every readiness waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("duplicate key {key:?} in collection {collection:?}")]
    DuplicateKey { collection: String, key: String },
    #[error("collection {0:?} load task terminated before signaling readiness")]
    LoadAborted(String),
}
