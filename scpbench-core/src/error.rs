use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Error kinds produced across the benchmark pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
    #[error("malformed log: {0}")]
    MalformedLog(String),
    #[error("label mismatch: expected {expected:?}, found {found:?}")]
    LabelMismatch { expected: String, found: String },
    #[error("no usable timing samples for {label}")]
    EmptySampleSet { label: String },
    #[error("external transfer: {0}")]
    ExternalTool(String),
    #[error("remote cleanup: {0}")]
    RemoteCleanup(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedLog(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalTool(msg.into())
    }

    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::RemoteCleanup(msg.into())
    }

    /// Stable tag naming the error kind, used in per-suite failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::MalformedLog(_) => "malformed-log",
            Self::LabelMismatch { .. } => "label-mismatch",
            Self::EmptySampleSet { .. } => "empty-sample-set",
            Self::ExternalTool(_) => "external-tool",
            Self::RemoteCleanup(_) => "remote-cleanup",
        }
    }
}
