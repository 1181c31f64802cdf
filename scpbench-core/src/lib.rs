#![forbid(unsafe_code)]
//! Core of the scpbench secure-transport cipher benchmark: cipher-suite
//! catalog, benchmark configuration, the on-disk log format shared by
//! the sampling driver and the report pass, and the statistics that
//! reduce raw samples to comparable summaries.

pub mod config;
pub mod error;
pub mod logfile;
pub mod report;
pub mod stats;
pub mod suite;

pub use config::BenchConfig;
pub use error::{Error, Result};
pub use logfile::{Generation, LogHeader, LogWriter, RawSamples, RecordSchema};
pub use report::{Report, ReportBuilder, SuiteFailure};
pub use stats::{Samples, Summary};
pub use suite::{Category, Suite, SuiteCatalog, CHUNK_LENGTHS};
