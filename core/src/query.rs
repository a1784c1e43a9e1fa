use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tracing::debug;

use crate::{
    collection::{Collection, KeyFn},
    error::EngineError,
};

type Projection<A, B, C, Out> = Arc<dyn Fn(&A, Option<&B>, Option<&C>) -> Out + Send + Sync>;

/// Entry point for building a declarative left-join-and-project query.
///
/// Building is free of side effects: no collection state is touched until
/// [`JoinQuery::preload`] runs.
pub struct QueryBuilder<A> {
    base: Collection<A>,
}

impl<A: Clone + Send + Sync + 'static> QueryBuilder<A> {
    pub fn from(base: &Collection<A>) -> Self { Self { base: base.clone() } }

    /// Left-joins a parent collection: `key(base_record)` is looked up against
    /// the parent's primary key. A base record with no match still appears,
    /// with the parent side `None`.
    pub fn left_join_parent<B: Clone + Send + Sync + 'static>(
        self,
        parent: &Collection<B>,
        field: impl Into<String>,
        key: impl Fn(&A) -> String + Send + Sync + 'static,
    ) -> ParentJoined<A, B> {
        ParentJoined { base: self.base, parent: parent.clone(), parent_field: field.into(), parent_key: Arc::new(key) }
    }
}

/// Builder state after the parent join is declared.
pub struct ParentJoined<A, B> {
    base: Collection<A>,
    parent: Collection<B>,
    parent_field: String,
    parent_key: KeyFn<A>,
}

impl<A: Clone + Send + Sync + 'static, B: Clone + Send + Sync + 'static> ParentJoined<A, B> {
    /// Left-joins a child collection: `foreign_key(child_record)` points back
    /// at the base primary key. A base record with k matching children fans
    /// out into k rows, or one row with the child side `None` when k == 0.
    /// If the child collection carries an eager index on `field`, preload uses
    /// it; the hint never changes the result set.
    pub fn left_join_children<C: Clone + Send + Sync + 'static>(
        self,
        children: &Collection<C>,
        field: impl Into<String>,
        foreign_key: impl Fn(&C) -> String + Send + Sync + 'static,
    ) -> ChildrenJoined<A, B, C> {
        ChildrenJoined {
            base: self.base,
            parent: self.parent,
            parent_field: self.parent_field,
            parent_key: self.parent_key,
            children: children.clone(),
            child_field: field.into(),
            child_key: Arc::new(foreign_key),
        }
    }
}

/// Builder state after both joins are declared.
pub struct ChildrenJoined<A, B, C> {
    base: Collection<A>,
    parent: Collection<B>,
    parent_field: String,
    parent_key: KeyFn<A>,
    children: Collection<C>,
    child_field: String,
    child_key: KeyFn<C>,
}

impl<A, B, C> ChildrenJoined<A, B, C>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Finishes the query with a projection over `(base, parent?, child?)`.
    pub fn select<Out>(self, projection: impl Fn(&A, Option<&B>, Option<&C>) -> Out + Send + Sync + 'static) -> JoinQuery<A, B, C, Out> {
        JoinQuery(Arc::new(QueryInner {
            base: self.base,
            parent: self.parent,
            parent_field: self.parent_field,
            parent_key: self.parent_key,
            children: self.children,
            child_field: self.child_field,
            child_key: self.child_key,
            projection: Arc::new(projection),
            rows: std::sync::Mutex::new(Vec::new()),
            loaded: AtomicBool::new(false),
        }))
    }
}

/// A point-in-time three-collection left join. Materializes once via
/// [`preload`](Self::preload); there is no incremental maintenance.
pub struct JoinQuery<A, B, C, Out>(Arc<QueryInner<A, B, C, Out>>);

impl<A, B, C, Out> Clone for JoinQuery<A, B, C, Out> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

struct QueryInner<A, B, C, Out> {
    base: Collection<A>,
    parent: Collection<B>,
    parent_field: String,
    parent_key: KeyFn<A>,
    children: Collection<C>,
    child_field: String,
    child_key: KeyFn<C>,
    projection: Projection<A, B, C, Out>,
    rows: std::sync::Mutex<Vec<Out>>,
    loaded: AtomicBool,
}

impl<A, B, C, Out> JoinQuery<A, B, C, Out>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// One-shot materialization of the full result set. Resolves only when
    /// every row is computed; waits out collection readiness first, so load
    /// failures surface here as well as at the readiness barrier.
    pub async fn preload(&self) -> Result<(), EngineError> {
        let inner = &self.0;
        inner.base.ready().await?;
        inner.parent.ready().await?;
        inner.children.ready().await?;

        // Group children by their foreign key, through the eager index when
        // one was registered for this field.
        let groups: HashMap<String, Vec<C>> = match inner.children.secondary_index(&inner.child_field) {
            Some(index) => inner.children.with_records(|recs| {
                index
                    .into_iter()
                    .map(|(key, positions)| (key, positions.into_iter().map(|pos| recs[pos].clone()).collect()))
                    .collect()
            }),
            None => inner.children.with_records(|recs| {
                let mut map: HashMap<String, Vec<C>> = HashMap::new();
                for rec in recs {
                    map.entry((inner.child_key)(rec)).or_default().push(rec.clone());
                }
                map
            }),
        };

        let rows = inner.base.with_records(|bases| {
            let mut rows = Vec::with_capacity(bases.len().max(groups.len()));
            for base in bases {
                let parent = inner.parent.get(&(inner.parent_key)(base));
                match groups.get(&inner.base.key_of(base)) {
                    Some(children) if !children.is_empty() => {
                        for child in children {
                            rows.push((inner.projection)(base, parent.as_ref(), Some(child)));
                        }
                    }
                    _ => rows.push((inner.projection)(base, parent.as_ref(), None)),
                }
            }
            rows
        });

        let count = rows.len();
        *inner.rows.lock().unwrap() = rows;
        inner.loaded.store(true, Ordering::SeqCst);
        debug!(base = %inner.base.name(), parent_on = %inner.parent_field, child_on = %inner.child_field, rows = count, "query materialized");
        Ok(())
    }

    /// Number of materialized rows. Zero until [`preload`](Self::preload) has resolved.
    pub fn len(&self) -> usize { self.0.rows.lock().unwrap().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn is_loaded(&self) -> bool { self.0.loaded.load(Ordering::SeqCst) }
}

impl<A, B, C, Out: Clone> JoinQuery<A, B, C, Out> {
    /// Snapshot of the materialized rows, in base-record insertion order.
    pub fn rows(&self) -> Vec<Out> { self.0.rows.lock().unwrap().clone() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionLoader;

    #[derive(Clone, Debug)]
    struct List {
        id: String,
        name: String,
    }

    #[derive(Clone, Debug)]
    struct Task {
        id: String,
        list_id: String,
        title: String,
    }

    #[derive(Clone, Debug)]
    struct Note {
        id: String,
        task_id: String,
    }

    fn list(id: &str, name: &str) -> List { List { id: id.into(), name: name.into() } }
    fn task(id: &str, list_id: &str, title: &str) -> Task { Task { id: id.into(), list_id: list_id.into(), title: title.into() } }
    fn note(id: &str, task_id: &str) -> Note { Note { id: id.into(), task_id: task_id.into() } }

    type Row = (String, Option<String>, Option<String>);

    fn build_query(lists: &Collection<List>, tasks: &Collection<Task>, notes: &Collection<Note>) -> JoinQuery<Task, List, Note, Row> {
        QueryBuilder::from(tasks)
            .left_join_parent(lists, "list_id", |t: &Task| t.list_id.clone())
            .left_join_children(notes, "task_id", |n: &Note| n.task_id.clone())
            .select(|t, l, n| (t.title.clone(), l.map(|l| l.name.clone()), n.map(|n| n.id.clone())))
    }

    #[tokio::test]
    async fn fan_out_and_null_sides() {
        let lists = Collection::load("lists", |l: &List| l.id.clone(), vec![list("l1", "inbox")]);
        let tasks = Collection::load(
            "tasks",
            |t: &Task| t.id.clone(),
            vec![task("t1", "l1", "water plants"), task("t2", "l1", "mow lawn"), task("t3", "l9", "orphaned")],
        );
        let notes = Collection::load("notes", |n: &Note| n.id.clone(), vec![note("n1", "t1"), note("n2", "t1"), note("n3", "t2")]);

        let query = build_query(&lists, &tasks, &notes);
        query.preload().await.unwrap();

        // t1 fans out into 2 rows, t2 into 1, t3 appears once with both sides null
        assert_eq!(query.len(), 4);
        let rows = query.rows();
        assert_eq!(rows[0], ("water plants".into(), Some("inbox".into()), Some("n1".into())));
        assert_eq!(rows[1], ("water plants".into(), Some("inbox".into()), Some("n2".into())));
        assert_eq!(rows[2], ("mow lawn".into(), Some("inbox".into()), Some("n3".into())));
        assert_eq!(rows[3], ("orphaned".into(), None, None));
    }

    #[tokio::test]
    async fn building_touches_no_state() {
        let lists = Collection::load("lists", |l: &List| l.id.clone(), vec![list("l1", "inbox")]);
        let tasks = Collection::load("tasks", |t: &Task| t.id.clone(), vec![task("t1", "l1", "a")]);
        let notes = Collection::load("notes", |n: &Note| n.id.clone(), Vec::new());

        let query = build_query(&lists, &tasks, &notes);
        assert!(!query.is_loaded());
        assert_eq!(query.len(), 0);

        query.preload().await.unwrap();
        assert!(query.is_loaded());
        assert_eq!(query.len(), 1);
    }

    #[tokio::test]
    async fn base_with_no_children_appears_once() {
        let lists = Collection::load("lists", |l: &List| l.id.clone(), vec![list("l1", "inbox")]);
        let tasks = Collection::load("tasks", |t: &Task| t.id.clone(), vec![task("t1", "l1", "a"), task("t2", "l1", "b")]);
        let notes = Collection::load("notes", |n: &Note| n.id.clone(), Vec::new());

        let query = build_query(&lists, &tasks, &notes);
        query.preload().await.unwrap();

        assert_eq!(query.len(), 2);
        assert!(query.rows().iter().all(|(_, list, note)| list.is_some() && note.is_none()));
    }

    #[tokio::test]
    async fn index_hint_does_not_change_results() {
        let lists = Collection::load("lists", |l: &List| l.id.clone(), vec![list("l1", "inbox"), list("l2", "chores")]);
        let tasks = Collection::load(
            "tasks",
            |t: &Task| t.id.clone(),
            vec![task("t1", "l1", "a"), task("t2", "l2", "b"), task("t3", "l1", "c")],
        );
        let note_records = vec![note("n1", "t2"), note("n2", "t2"), note("n3", "t3")];

        let plain = Collection::load("notes", |n: &Note| n.id.clone(), note_records.clone());
        let indexed = CollectionLoader::new("notes", |n: &Note| n.id.clone())
            .index_by("task_id", |n| n.task_id.clone())
            .load(note_records);

        let without = build_query(&lists, &tasks, &plain);
        let with = build_query(&lists, &tasks, &indexed);
        without.preload().await.unwrap();
        with.preload().await.unwrap();

        assert_eq!(without.rows(), with.rows());
    }

    #[tokio::test]
    async fn preload_surfaces_load_failure() {
        let lists = Collection::load("lists", |l: &List| l.id.clone(), vec![list("l1", "inbox"), list("l1", "dup")]);
        let tasks = Collection::load("tasks", |t: &Task| t.id.clone(), vec![task("t1", "l1", "a")]);
        let notes = Collection::load("notes", |n: &Note| n.id.clone(), Vec::new());

        let query = build_query(&lists, &tasks, &notes);
        let err = query.preload().await.unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKey { .. }));
    }
}
