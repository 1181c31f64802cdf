//! Per-suite sampling loop: strictly sequential samples, sequential
//! suites, one finalized log file per suite.

use crate::{payload, transfer};
use scpbench_core::stats::BYTES_PER_MB;
use scpbench_core::{BenchConfig, Generation, LogWriter, Result, Suite};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Drives the whole benchmark run described by a [`BenchConfig`].
pub struct Sampler<'a> {
    cfg: &'a BenchConfig,
    generation: Generation,
}

impl<'a> Sampler<'a> {
    pub fn new(cfg: &'a BenchConfig) -> Self {
        Self { cfg, generation: Generation::Prefixed }
    }

    /// Run every suite in catalog order. Sampling errors are fatal: a
    /// partial log for one suite cannot be mixed with complete logs for
    /// the others. Returns the finalized log paths.
    pub async fn run(&self) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.cfg.log_dir)?;
        let size_bytes = (self.cfg.payload_mb * BYTES_PER_MB) as u64;
        payload::create_payload(&self.cfg.payload_file, size_bytes)?;

        let suites = self.cfg.suites.suites()?;
        info!(
            suites = suites.len(),
            samples = self.cfg.samples,
            payload_mb = self.cfg.payload_mb,
            "starting benchmark run"
        );

        let mut written = Vec::with_capacity(suites.len());
        let mut outcome = Ok(());
        for suite in &suites {
            match self.run_suite(suite).await {
                Ok(path) => written.push(path),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        if let Err(e) = payload::remove_payload(&self.cfg.payload_file) {
            warn!("payload cleanup failed: {e}");
        }
        outcome?;
        info!(logs = written.len(), "benchmark run finished");
        Ok(written)
    }

    async fn run_suite(&self, suite: &Suite) -> Result<PathBuf> {
        info!(suite = %suite.label(), "sampling");
        let schema = self.generation.schema();
        let mut writer = LogWriter::create(
            &self.cfg.log_dir,
            &self.cfg.log_prefix,
            suite,
            &self.cfg.log_extension,
            self.cfg.samples,
            schema.clone(),
        )?;

        let progress_every = self.cfg.samples.div_ceil(10);
        for i in 0..self.cfg.samples {
            let sample =
                transfer::run_one_sample(self.cfg, suite, &self.cfg.payload_file, &schema).await?;
            writer.append_sample(sample.elapsed_secs, sample.ciphertext_bytes, sample.raw_bytes)?;

            // Let client and server processes wind down before the next copy
            tokio::time::sleep(Duration::from_millis(self.cfg.inter_sample_delay_ms)).await;

            // Per-sample removal keeps the remote directory from growing
            if let Err(e) = transfer::cleanup_remote(self.cfg).await {
                warn!(suite = %suite.label(), "{e}");
            }

            if progress_every > 0 && (i + 1) % progress_every == 0 {
                info!(suite = %suite.label(), collected = i + 1, of = self.cfg.samples, "progress");
            }
        }

        writer.finalize()
    }
}
