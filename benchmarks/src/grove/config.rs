//! Harness configuration.
//!
//! All run parameters live in an explicit config object scoped to one batch
//! invocation; there is no process-wide mutable state.

use serde::{Deserialize, Serialize};

/// One dataset size preset: how many of each record kind to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSize {
    pub label: String,
    pub projects: usize,
    pub issues: usize,
    pub comments: usize,
}

impl DatasetSize {
    pub fn new(label: impl Into<String>, projects: usize, issues: usize, comments: usize) -> Self {
        Self { label: label.into(), projects, issues, comments }
    }

    /// The fixed four-size batch run by the no-argument entry point.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::new("Small", 10, 50, 200),
            Self::new("Medium", 50, 250, 1000),
            Self::new("Large", 100, 500, 2000),
            Self::new("Very Large", 200, 1000, 5000),
        ]
    }
}

/// Complete harness configuration for one batch invocation.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Measured iterations per dataset size.
    pub iterations: usize,
    /// Emit a tracing span around each trial phase. Side-channel only; never
    /// alters control flow or results.
    pub tracing_enabled: bool,
    /// Dataset sizes, run strictly sequentially.
    pub sizes: Vec<DatasetSize>,
}

impl HarnessConfig {
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder { iterations: 5, tracing_enabled: false, sizes: DatasetSize::presets() }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self { Self::builder().build() }
}

/// Builder for [`HarnessConfig`] with the standard defaults.
pub struct HarnessConfigBuilder {
    iterations: usize,
    tracing_enabled: bool,
    sizes: Vec<DatasetSize>,
}

impl HarnessConfigBuilder {
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn tracing_enabled(mut self, enabled: bool) -> Self {
        self.tracing_enabled = enabled;
        self
    }

    pub fn sizes(mut self, sizes: Vec<DatasetSize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn build(self) -> HarnessConfig {
        HarnessConfig { iterations: self.iterations, tracing_enabled: self.tracing_enabled, sizes: self.sizes }
    }
}
