use std::{collections::HashMap, sync::Arc};

use tokio::sync::watch;
use tracing::debug;

use crate::error::EngineError;

/// Key extractor shared between a collection and the queries built over it.
pub(crate) type KeyFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Load progress broadcast to readiness waiters. All-or-nothing: there is no
/// observable partially-indexed state.
#[derive(Clone, Debug)]
enum LoadState {
    Loading,
    Ready,
    Failed(EngineError),
}

/// A named, keyed, in-memory collection of records.
///
/// Records are indexed on a task spawned at load time; [`Collection::ready`]
/// resolves once every initial record is indexed and queryable, or fails with
/// the load error (a duplicate key is a fatal configuration error).
pub struct Collection<R>(Arc<Inner<R>>);

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

struct Inner<R> {
    name: String,
    key_fn: KeyFn<R>,
    state: std::sync::Mutex<State<R>>,
    load_rx: watch::Receiver<LoadState>,
}

struct State<R> {
    records: Vec<R>,
    primary: HashMap<String, usize>,
    secondary: Vec<SecondaryIndex>,
}

/// Eager index over a foreign-key field: fk value -> record positions.
/// Purely a lookup accelerator; queries must produce identical results
/// whether or not one is registered.
struct SecondaryIndex {
    field: String,
    map: HashMap<String, Vec<usize>>,
}

/// Staged configuration for loading a [`Collection`], letting callers register
/// eager secondary indexes before the records go in.
pub struct CollectionLoader<R> {
    name: String,
    key_fn: KeyFn<R>,
    secondary: Vec<(String, KeyFn<R>)>,
}

impl<R: Send + Sync + 'static> CollectionLoader<R> {
    pub fn new(name: impl Into<String>, key_fn: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        Self { name: name.into(), key_fn: Arc::new(key_fn), secondary: Vec::new() }
    }

    /// Registers an eager secondary index on a foreign-key field.
    pub fn index_by(mut self, field: impl Into<String>, extractor: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.secondary.push((field.into(), Arc::new(extractor)));
        self
    }

    /// Consumes the initial records and returns the collection handle.
    /// Indexing happens on a spawned task; await [`Collection::ready`] before
    /// reading. Must be called within a tokio runtime.
    pub fn load(self, records: Vec<R>) -> Collection<R> {
        let (tx, rx) = watch::channel(LoadState::Loading);
        let inner = Arc::new(Inner {
            name: self.name,
            key_fn: self.key_fn,
            state: std::sync::Mutex::new(State { records: Vec::new(), primary: HashMap::new(), secondary: Vec::new() }),
            load_rx: rx,
        });

        let task_inner = inner.clone();
        let secondary_specs = self.secondary;
        tokio::spawn(async move {
            match index_records(&task_inner, records, &secondary_specs) {
                Ok(count) => {
                    debug!(collection = %task_inner.name, records = count, "collection ready");
                    let _ = tx.send(LoadState::Ready);
                }
                Err(e) => {
                    debug!(collection = %task_inner.name, error = %e, "collection load failed");
                    let _ = tx.send(LoadState::Failed(e));
                }
            }
        });

        Collection(inner)
    }
}

/// Builds the primary and secondary indexes, installing state only if every
/// record keys uniquely.
fn index_records<R>(inner: &Inner<R>, records: Vec<R>, secondary_specs: &[(String, KeyFn<R>)]) -> Result<usize, EngineError> {
    let mut primary = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        let key = (inner.key_fn)(record);
        if primary.insert(key.clone(), pos).is_some() {
            return Err(EngineError::DuplicateKey { collection: inner.name.clone(), key });
        }
    }

    let secondary = secondary_specs
        .iter()
        .map(|(field, extractor)| {
            let mut map: HashMap<String, Vec<usize>> = HashMap::new();
            for (pos, record) in records.iter().enumerate() {
                map.entry(extractor(record)).or_default().push(pos);
            }
            SecondaryIndex { field: field.clone(), map }
        })
        .collect();

    let count = records.len();
    let mut state = inner.state.lock().unwrap();
    state.records = records;
    state.primary = primary;
    state.secondary = secondary;
    Ok(count)
}

impl<R: Clone + Send + Sync + 'static> Collection<R> {
    /// Loads a collection with no secondary indexes.
    pub fn load(name: impl Into<String>, key_fn: impl Fn(&R) -> String + Send + Sync + 'static, records: Vec<R>) -> Self {
        CollectionLoader::new(name, key_fn).load(records)
    }

    /// Resolves once all initial records are indexed and queryable.
    /// A duplicate key or an aborted load task surfaces here.
    pub async fn ready(&self) -> Result<(), EngineError> {
        let mut rx = self.0.load_rx.clone();
        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                LoadState::Ready => return Ok(()),
                LoadState::Failed(e) => return Err(e),
                LoadState::Loading => {}
            }
            if rx.changed().await.is_err() {
                return Err(EngineError::LoadAborted(self.0.name.clone()));
            }
        }
    }

    pub fn name(&self) -> &str { &self.0.name }

    /// Number of indexed records. Meaningful once [`ready`](Self::ready) has resolved.
    pub fn len(&self) -> usize { self.0.state.lock().unwrap().records.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Looks up a record by its primary key.
    pub fn get(&self, key: &str) -> Option<R> {
        let state = self.0.state.lock().unwrap();
        state.primary.get(key).map(|&pos| state.records[pos].clone())
    }

    pub(crate) fn key_of(&self, record: &R) -> String { (self.0.key_fn)(record) }

    /// Runs `f` over the indexed records without cloning the backing vec.
    pub(crate) fn with_records<T>(&self, f: impl FnOnce(&[R]) -> T) -> T {
        let state = self.0.state.lock().unwrap();
        f(&state.records)
    }

    /// Snapshot of a secondary index, if one was registered for `field`.
    pub(crate) fn secondary_index(&self, field: &str) -> Option<HashMap<String, Vec<usize>>> {
        let state = self.0.state.lock().unwrap();
        state.secondary.iter().find(|ix| ix.field == field).map(|ix| ix.map.clone())
    }
}
