//! Benchmark configuration: transfer endpoint, sampling knobs, log
//! naming, and the suite catalog.

use crate::error::{Error, Result};
use crate::logfile::log_file_name;
use crate::suite::{Suite, SuiteCatalog};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Full configuration for a benchmark run and its report pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    pub log_level: String,
    /// Samples per suite.
    pub samples: u32,
    /// Transfer payload size; also the numerator of every throughput figure.
    pub payload_mb: f64,
    /// Local payload file created for the run.
    pub payload_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_prefix: String,
    pub log_extension: String,
    /// External transfer program (scp-compatible argument surface).
    pub transfer_program: String,
    /// Remote shell program used for cleanup (ssh-compatible).
    pub remote_shell_program: String,
    pub user: String,
    pub host: String,
    pub port: u16,
    pub identity_file: PathBuf,
    /// Pause between samples so remote processes fully terminate.
    pub inter_sample_delay_ms: u64,
    /// Optional per-sample watchdog; `None` waits indefinitely.
    pub sample_timeout_secs: Option<u64>,
    /// Marker for chart-label truncation of vendor-tagged names.
    pub label_marker: char,
    pub suites: SuiteCatalog,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            samples: 10,
            payload_mb: 100.0,
            payload_file: PathBuf::from("scpbench_payload"),
            log_dir: PathBuf::from("logs"),
            log_prefix: "scpbench".into(),
            log_extension: "log".into(),
            transfer_program: "scp".into(),
            remote_shell_program: "ssh".into(),
            user: "bench".into(),
            host: "localhost".into(),
            port: 22,
            identity_file: PathBuf::from("id_rsa_bench"),
            inter_sample_delay_ms: 50,
            sample_timeout_secs: None,
            label_marker: '@',
            suites: SuiteCatalog::default(),
        }
    }
}

impl BenchConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let cfg: Self =
            toml::from_str(&data).map_err(|e| Error::config(format!("toml parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SCPBENCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("SCPBENCH_LOG_LEVEL") {
            cfg.log_level = v;
        }
        if let Ok(v) = std::env::var("SCPBENCH_SAMPLES") {
            cfg.samples =
                v.parse().map_err(|_| Error::config(format!("invalid SCPBENCH_SAMPLES: {v}")))?;
        }
        if let Ok(v) = std::env::var("SCPBENCH_PAYLOAD_MB") {
            cfg.payload_mb =
                v.parse().map_err(|_| Error::config(format!("invalid SCPBENCH_PAYLOAD_MB: {v}")))?;
        }
        if let Ok(v) = std::env::var("SCPBENCH_LOG_DIR") {
            cfg.log_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SCPBENCH_HOST") {
            cfg.host = v;
        }
        if let Ok(v) = std::env::var("SCPBENCH_PORT") {
            cfg.port =
                v.parse().map_err(|_| Error::config(format!("invalid SCPBENCH_PORT: {v}")))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let allowed = ["trace", "debug", "info", "warn", "error"];
        if !allowed.contains(&self.log_level.as_str()) {
            return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
        }
        if self.samples == 0 {
            return Err(Error::config("samples must be at least 1"));
        }
        if !self.payload_mb.is_finite() || self.payload_mb <= 0.0 {
            return Err(Error::config(format!("payload_mb must be positive: {}", self.payload_mb)));
        }
        if self.port == 0 {
            return Err(Error::config("port must be non-zero"));
        }
        if self.log_prefix.is_empty() || self.log_extension.is_empty() {
            return Err(Error::config("log_prefix and log_extension must be non-empty"));
        }
        if self.user.is_empty() || self.host.is_empty() {
            return Err(Error::config("user and host must be non-empty"));
        }
        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let data =
            toml::to_string_pretty(self).map_err(|e| Error::config(format!("toml encode error: {e}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Permanent log path for one suite.
    pub fn log_path(&self, suite: &Suite) -> PathBuf {
        self.log_dir.join(log_file_name(&self.log_prefix, suite, &self.log_extension))
    }

    /// `user@host:` destination with no explicit remote path; the remote
    /// account's default directory receives the payload.
    pub fn destination(&self) -> String {
        format!("{}@{}:", self.user, self.host)
    }
}
