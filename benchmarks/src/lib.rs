/// Grove benchmark suite for loam.
///
/// Measures one-shot materialization of a three-way left join
/// (issues ⟕ projects, issues ⟕ comments) over synthetic datasets at several
/// fixed sizes, reporting per-size timing statistics.
pub mod grove;
