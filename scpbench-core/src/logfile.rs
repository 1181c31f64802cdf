//! On-disk benchmark log format: one file per cipher suite, a 3-line
//! header followed by repeating 3-line sample records.

use crate::error::{Error, Result};
use crate::suite::Suite;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header lines preceding the sample records.
pub const HEADER_LINES: usize = 3;

/// Lines per sample record.
pub const RECORD_LINES: usize = 3;

/// Literal line prefixes for one log-format generation. Each record line
/// must start with its field's prefix; the remainder is the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub time_prefix: &'static str,
    pub ciphertext_prefix: &'static str,
    pub raw_prefix: &'static str,
}

/// Known log-format generations. Prefix lengths changed between
/// generations, so the parser is configured with one rather than
/// hard-coding offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generation {
    /// Current layout with self-describing field prefixes.
    #[default]
    Prefixed,
    /// Legacy layout: bare values, one per line.
    Plain,
}

impl Generation {
    pub fn schema(self) -> RecordSchema {
        match self {
            Self::Prefixed => RecordSchema {
                time_prefix: "TIME:",
                ciphertext_prefix: "CIPHERTEXT_BYTES:",
                raw_prefix: "RAW_BYTES:",
            },
            Self::Plain => RecordSchema { time_prefix: "", ciphertext_prefix: "", raw_prefix: "" },
        }
    }
}

impl RecordSchema {
    fn strip<'a>(&self, line: &'a str, prefix: &str, field: &str, group: usize) -> Result<&'a str> {
        line.strip_prefix(prefix).ok_or_else(|| {
            Error::malformed(format!("record {group}: {field} line does not start with {prefix:?}"))
        })
    }
}

/// Decoded log header. The declared sample count is informational; the
/// record stream is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogHeader {
    pub cipher: String,
    pub declared_samples: u64,
    /// Opaque timestamp string, carried through unparsed.
    pub date: String,
}

/// Raw per-field value sequences, still textual. All three are the same
/// length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSamples {
    pub times: Vec<String>,
    pub ciphertext: Vec<String>,
    pub raw: Vec<String>,
}

impl RawSamples {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// File name for a suite's log: `<prefix>_<stem>.<extension>`.
pub fn log_file_name(prefix: &str, suite: &Suite, extension: &str) -> String {
    format!("{}_{}.{}", prefix, suite.file_stem(), extension)
}

/// Parse one log file's full text. `expected_label` guards against
/// reading another suite's log; a mismatch is [`Error::LabelMismatch`].
pub fn parse_log(
    content: &str,
    expected_label: &str,
    schema: &RecordSchema,
) -> Result<(LogHeader, RawSamples)> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    // The writer leaves a trailing newline; blank tail lines never count.
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() < HEADER_LINES {
        return Err(Error::malformed(format!(
            "expected a {HEADER_LINES}-line header, found {} line(s)",
            lines.len()
        )));
    }

    let cipher = lines[0].trim().to_string();
    if cipher != expected_label {
        return Err(Error::LabelMismatch { expected: expected_label.to_string(), found: cipher });
    }
    let declared_samples = lines[1]
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::malformed(format!("sample count is not an integer: {:?}", lines[1])))?;
    let date = lines[2].to_string();

    let body = &lines[HEADER_LINES..];
    if body.len() % RECORD_LINES != 0 {
        return Err(Error::malformed(format!(
            "{} record line(s) is not a multiple of {RECORD_LINES}",
            body.len()
        )));
    }

    let mut samples = RawSamples::default();
    for (group, record) in body.chunks_exact(RECORD_LINES).enumerate() {
        samples.times.push(schema.strip(record[0], schema.time_prefix, "time", group)?.to_string());
        samples
            .ciphertext
            .push(schema.strip(record[1], schema.ciphertext_prefix, "ciphertext", group)?.to_string());
        samples.raw.push(schema.strip(record[2], schema.raw_prefix, "raw", group)?.to_string());
    }

    Ok((LogHeader { cipher, declared_samples, date }, samples))
}

/// Sequential writer for one suite's log. Writes to a `.partial` working
/// file; [`LogWriter::finalize`] renames it to the permanent name.
#[derive(Debug)]
pub struct LogWriter {
    out: BufWriter<File>,
    working: PathBuf,
    permanent: PathBuf,
    schema: RecordSchema,
}

impl LogWriter {
    /// Create/truncate the working file and write the 3-line header.
    pub fn create(
        dir: &Path,
        prefix: &str,
        suite: &Suite,
        extension: &str,
        target_samples: u32,
        schema: RecordSchema,
    ) -> Result<Self> {
        let permanent = dir.join(log_file_name(prefix, suite, extension));
        let working = dir.join(format!("{}.partial", log_file_name(prefix, suite, extension)));
        let mut out = BufWriter::new(File::create(&working)?);
        writeln!(out, "{}", suite.label())?;
        writeln!(out, "{target_samples}")?;
        writeln!(out, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        Ok(Self { out, working, permanent, schema })
    }

    /// Append the 3-line record for one sample.
    pub fn append_sample(
        &mut self,
        elapsed_secs: f64,
        ciphertext_bytes: u64,
        raw_bytes: u64,
    ) -> Result<()> {
        writeln!(self.out, "{}{}", self.schema.time_prefix, elapsed_secs)?;
        writeln!(self.out, "{}{}", self.schema.ciphertext_prefix, ciphertext_bytes)?;
        writeln!(self.out, "{}{}", self.schema.raw_prefix, raw_bytes)?;
        Ok(())
    }

    /// Flush and rename the working file to its permanent name,
    /// returning that path.
    pub fn finalize(mut self) -> Result<PathBuf> {
        self.out.flush()?;
        drop(self.out);
        fs::rename(&self.working, &self.permanent)?;
        Ok(self.permanent)
    }

    pub fn working_path(&self) -> &Path {
        &self.working
    }
}
