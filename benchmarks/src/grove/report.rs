//! Report formatting. Pure string rendering over trial outcomes; every figure
//! is computed upstream by the stats aggregator.

use std::fmt::Write;

use crate::grove::config::DatasetSize;
use crate::grove::runner::TrialOutcome;

/// One-line banner emitted before a size's trial starts.
pub fn announce(size: &DatasetSize, iterations: usize) -> String {
    format!(
        "Running {} ({} projects / {} issues / {} comments), {} iterations",
        size.label, size.projects, size.issues, size.comments, iterations
    )
}

/// Per-size narrative emitted once a trial completes.
pub fn narrative(outcome: &TrialOutcome) -> String {
    format!(
        "  {}: mean {:.3} ms, min {:.3} ms, max {:.3} ms, std dev {:.3} ms over {} iterations",
        outcome.record.size.label,
        outcome.stats.mean,
        outcome.stats.min,
        outcome.stats.max,
        outcome.stats.std_dev,
        outcome.record.durations_ms.len()
    )
}

/// Final aligned table across every size run in the batch.
pub fn summary_table(outcomes: &[TrialOutcome]) -> String {
    let mut out = String::new();
    writeln!(out, "\n=== Join Query Benchmark ===").unwrap();
    writeln!(out, "{:<12} {:>10} {:>10} {:>10} {:>12}", "Size", "Projects", "Issues", "Comments", "Avg (ms)").unwrap();
    writeln!(out, "{}", "-".repeat(58)).unwrap();
    for outcome in outcomes {
        let size = &outcome.record.size;
        writeln!(
            out,
            "{:<12} {:>10} {:>10} {:>10} {:>12.3}",
            size.label, size.projects, size.issues, size.comments, outcome.stats.mean
        )
        .unwrap();
    }
    writeln!(out, "{}", "-".repeat(58)).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grove::runner::TrialRecord;
    use crate::grove::stats::SummaryStats;

    fn outcome(label: &str, mean: f64) -> TrialOutcome {
        TrialOutcome {
            record: TrialRecord { size: DatasetSize::new(label, 10, 50, 200), durations_ms: vec![mean; 3] },
            stats: SummaryStats { mean, min: mean, max: mean, std_dev: 0.0 },
        }
    }

    #[test]
    fn announce_mentions_all_counts() {
        let line = announce(&DatasetSize::new("Small", 10, 50, 200), 5);
        assert!(line.contains("Small"));
        assert!(line.contains("10 projects"));
        assert!(line.contains("50 issues"));
        assert!(line.contains("200 comments"));
        assert!(line.contains("5 iterations"));
    }

    #[test]
    fn narrative_carries_all_stats() {
        let line = narrative(&outcome("Small", 1.5));
        assert!(line.contains("mean 1.500 ms"));
        assert!(line.contains("std dev 0.000 ms"));
        assert!(line.contains("3 iterations"));
    }

    #[test]
    fn table_has_one_row_per_size() {
        let table = summary_table(&[outcome("Small", 1.0), outcome("Medium", 2.0)]);
        let rows: Vec<_> = table.lines().filter(|l| l.starts_with("Small") || l.starts_with("Medium")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].contains("2.000"));
    }
}
