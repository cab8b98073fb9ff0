//! Generation metrics exported by worldtests.
//!
//! Reports are written as JSON so CI can diff throughput and determinism
//! results between commits.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations
    Pass,
    /// Test failed
    Fail,
}

/// Chunk generation throughput and layout statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Total chunks generated
    pub chunks_generated: usize,

    /// Total items placed
    pub items_placed: usize,

    /// Chunks classified core
    pub core_chunks: usize,

    /// Average generation time per chunk (microseconds)
    pub avg_gen_time_us: f64,

    /// Max generation time (microseconds)
    pub max_gen_time_us: u128,

    /// Chunks whose layout digest differed between rounds
    pub mismatched_chunks: usize,
}

impl GenerationMetrics {
    /// Fold one chunk's timing and shape into the totals.
    pub fn record(&mut self, items: usize, core: bool, gen_time_us: u128) {
        let n = self.chunks_generated as f64;
        self.avg_gen_time_us = (self.avg_gen_time_us * n + gen_time_us as f64) / (n + 1.0);
        self.max_gen_time_us = self.max_gen_time_us.max(gen_time_us);
        self.chunks_generated += 1;
        self.items_placed += items;
        if core {
            self.core_chunks += 1;
        }
    }
}

/// Top-level report written by a worldtest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test/benchmark identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Overall test result
    pub result: TestResult,

    /// Generation metrics
    pub generation: GenerationMetrics,
}

impl MetricsReport {
    /// Build a report stamped with the current time.
    pub fn new(test_name: impl Into<String>, generation: GenerationMetrics) -> Self {
        let result = if generation.mismatched_chunks == 0 {
            TestResult::Pass
        } else {
            TestResult::Fail
        };
        Self {
            test_name: test_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result,
            generation,
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_running_average() {
        let mut metrics = GenerationMetrics::default();
        metrics.record(2, true, 10);
        metrics.record(4, false, 30);
        assert_eq!(metrics.chunks_generated, 2);
        assert_eq!(metrics.items_placed, 6);
        assert_eq!(metrics.core_chunks, 1);
        assert_eq!(metrics.avg_gen_time_us, 20.0);
        assert_eq!(metrics.max_gen_time_us, 30);
    }

    #[test]
    fn mismatches_fail_the_report() {
        let metrics = GenerationMetrics {
            mismatched_chunks: 1,
            ..GenerationMetrics::default()
        };
        assert_eq!(MetricsReport::new("t", metrics).result, TestResult::Fail);
    }
}
