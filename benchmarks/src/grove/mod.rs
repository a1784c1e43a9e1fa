//! Grove benchmark suite.
//!
//! Generates synthetic project/issue/comment datasets, loads them into keyed
//! collections, materializes a three-way left-join query, and records
//! wall-clock timing statistics across repeated trials at fixed dataset sizes.

pub mod config;
pub mod generator;
pub mod instrumentation;
pub mod report;
pub mod runner;
pub mod stats;
pub mod workload;

pub use config::{DatasetSize, HarnessConfig, HarnessConfigBuilder};
pub use generator::{Comment, Dataset, GenerateError, Issue, IssuePriority, IssueStatus, Project};
pub use instrumentation::Instrumentation;
pub use runner::{Runner, TrialOutcome, TrialRecord};
pub use stats::{summarize, StatsError, SummaryStats};
pub use workload::IssueDetailRow;
