//! Per-report accumulation: reduces every suite's log to its summary and
//! collects the parallel sequences the chart renderer consumes.

use crate::config::BenchConfig;
use crate::error::Result;
use crate::logfile::{parse_log, RecordSchema};
use crate::stats::{decode_samples, summarize, Summary};
use crate::suite::Suite;
use serde::Serialize;
use std::fs;
use tracing::{debug, warn};

/// A suite that could not be aggregated, with the failure kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuiteFailure {
    pub label: String,
    pub kind: &'static str,
    pub message: String,
}

/// One comparison report: parallel sequences in suite-processing order.
/// Failed suites appear only in `failures`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Report {
    pub labels: Vec<String>,
    pub throughput_mbps: Vec<f64>,
    pub ciphertext_mb: Vec<f64>,
    pub raw_mb: Vec<f64>,
    pub failures: Vec<SuiteFailure>,
}

impl Report {
    fn push(&mut self, chart_label: String, summary: &Summary) {
        self.labels.push(chart_label);
        self.throughput_mbps.push(summary.throughput_mbps);
        self.ciphertext_mb.push(summary.ciphertext_mb);
        self.raw_mb.push(summary.raw_mb);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Assembles a [`Report`] from the log files named by the configuration.
pub struct ReportBuilder<'a> {
    cfg: &'a BenchConfig,
    schema: RecordSchema,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(cfg: &'a BenchConfig, schema: RecordSchema) -> Self {
        Self { cfg, schema }
    }

    /// Aggregate file-by-file. A malformed or missing log never aborts
    /// the remaining suites; the failure is recorded per suite instead.
    pub fn assemble(&self) -> Result<Report> {
        let mut report = Report::default();
        for suite in self.cfg.suites.suites()? {
            match self.summarize_suite(&suite) {
                Ok(summary) => {
                    report.push(suite.chart_label(self.cfg.label_marker), &summary);
                }
                Err(e) => {
                    warn!(suite = %suite.label(), kind = e.kind(), "skipping suite: {e}");
                    report.failures.push(SuiteFailure {
                        label: suite.label(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    fn summarize_suite(&self, suite: &Suite) -> Result<Summary> {
        let path = self.cfg.log_path(suite);
        let content = fs::read_to_string(&path)?;
        let label = suite.label();
        let (header, raw) = parse_log(&content, &label, &self.schema)?;
        if raw.len() as u64 != header.declared_samples {
            debug!(
                suite = %label,
                declared = header.declared_samples,
                actual = raw.len(),
                "declared sample count differs from record stream"
            );
        }
        let samples = decode_samples(&raw)?;
        summarize(&label, self.cfg.payload_mb, &samples)
    }
}
