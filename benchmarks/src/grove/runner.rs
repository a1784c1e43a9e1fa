//! Trial orchestration: generate → load → await-ready → timed query preload.

use std::time::Instant;

use anyhow::Result;
use loam_core::EngineError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grove::{
    config::{DatasetSize, HarnessConfig},
    generator,
    instrumentation::Instrumentation,
    report,
    stats::{self, SummaryStats},
    workload,
};

/// Raw measurement output of one trial: the size parameters and the ordered
/// per-iteration durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    pub size: DatasetSize,
    pub durations_ms: Vec<f64>,
}

/// One trial's raw record plus its aggregated statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub record: TrialRecord,
    pub stats: SummaryStats,
}

/// Drives trials for each configured dataset size, strictly sequentially.
pub struct Runner {
    config: HarnessConfig,
    instrumentation: Instrumentation,
}

impl Runner {
    pub fn new(config: HarnessConfig) -> Self {
        let instrumentation = if config.tracing_enabled { Instrumentation::enabled() } else { Instrumentation::disabled() };
        Self { config, instrumentation }
    }

    /// Runs one dataset size with the configured iteration count.
    pub async fn run_size(&self, size: &DatasetSize) -> Result<TrialOutcome> {
        self.run_trial(size, self.config.iterations).await
    }

    /// Runs `iterations` measured iterations at a fixed dataset size.
    ///
    /// Each iteration builds entirely fresh collections and a fresh query.
    /// The timed window opens strictly after the readiness barrier, so load
    /// cost is excluded; it closes when `preload` resolves. Any error aborts
    /// the whole size-run and propagates; no partial statistics are produced.
    pub async fn run_trial(&self, size: &DatasetSize, iterations: usize) -> Result<TrialOutcome> {
        let mut durations_ms = Vec::with_capacity(iterations);

        for iteration in 0..iterations {
            let dataset = self
                .instrumentation
                .phase("generate", &size.label, async { generator::generate(size.projects, size.issues, size.comments) })
                .await?;

            let (projects, issues, comments) =
                self.instrumentation.phase("load", &size.label, async { workload::load_collections(dataset) }).await;

            // synchronization barrier: all-or-nothing readiness per collection
            self.instrumentation
                .phase("await_ready", &size.label, async {
                    issues.ready().await?;
                    projects.ready().await?;
                    comments.ready().await?;
                    Ok::<_, EngineError>(())
                })
                .await?;

            let query = workload::issue_detail_query(&issues, &projects, &comments);

            let elapsed = self
                .instrumentation
                .phase("query", &size.label, async {
                    let start = Instant::now();
                    query.preload().await?;
                    Ok::<_, EngineError>(start.elapsed())
                })
                .await?;

            let ms = elapsed.as_secs_f64() * 1000.0;
            durations_ms.push(ms);
            debug!(size = %size.label, iteration, rows = query.len(), ms, "iteration recorded");
        }

        let stats = stats::summarize(&durations_ms)?;
        Ok(TrialOutcome { record: TrialRecord { size: size.clone(), durations_ms }, stats })
    }

    /// Runs the whole batch, printing the per-size narrative and the final
    /// summary table to stdout.
    ///
    /// The batch aborts on the first failing size and prints no partial
    /// summary for it; a failed size usually indicates a systemic problem.
    /// Callers wanting continue-on-failure semantics can drive
    /// [`run_size`](Self::run_size) per size instead.
    pub async fn run_all(&self) -> Result<Vec<TrialOutcome>> {
        let mut outcomes = Vec::with_capacity(self.config.sizes.len());

        for size in &self.config.sizes {
            println!("{}", report::announce(size, self.config.iterations));
            let outcome = self.run_size(size).await?;
            println!("{}", report::narrative(&outcome));
            outcomes.push(outcome);
        }

        print!("{}", report::summary_table(&outcomes));
        Ok(outcomes)
    }
}
