//! Minimal in-memory collection/query engine.
//!
//! Provides keyed collections with an all-or-nothing readiness signal and a
//! declarative left-join-and-project query that materializes once on demand.
//! There is no query planner, no incremental maintenance, and no persistence;
//! the whole surface is the four capabilities the benchmark harness consumes.

pub mod collection;
pub mod error;
pub mod query;

pub use collection::{Collection, CollectionLoader};
pub use error::EngineError;
pub use query::{JoinQuery, QueryBuilder};
