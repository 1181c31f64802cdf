//! Reduction of raw per-sample sequences into per-suite summaries.

use crate::error::{Error, Result};
use crate::logfile::RawSamples;

/// Fixed linear scale: 1 MB = 1,000,000 bytes (not a binary multiple).
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// Numeric per-sample values decoded from a parsed log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    pub times: Vec<f64>,
    pub ciphertext: Vec<u64>,
    pub raw: Vec<u64>,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Aggregate result for one suite.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub label: String,
    /// Median transfer rate in MB/s.
    pub throughput_mbps: f64,
    /// Mean bytes on the wire, in MB.
    pub ciphertext_mb: f64,
    /// Mean logical payload bytes, in MB.
    pub raw_mb: f64,
}

/// Decode the parser's textual values. Numeric failures are reported as
/// malformed-log errors naming the offending field.
pub fn decode_samples(raw: &RawSamples) -> Result<Samples> {
    let mut samples = Samples::default();
    for value in &raw.times {
        let t = value
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::malformed(format!("time value is not numeric: {value:?}")))?;
        samples.times.push(t);
    }
    for value in &raw.ciphertext {
        let b = value
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::malformed(format!("ciphertext byte count is not an integer: {value:?}")))?;
        samples.ciphertext.push(b);
    }
    for value in &raw.raw {
        let b = value
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::malformed(format!("raw byte count is not an integer: {value:?}")))?;
        samples.raw.push(b);
    }
    Ok(samples)
}

/// Sorted-middle median; even-sized sets average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    Some(if n % 2 == 1 { sorted[n / 2] } else { (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0 })
}

/// Median transfer rate over the non-zero elapsed-time samples. Zero
/// elapsed values are measurement artifacts and never valid transfers;
/// if nothing survives the filter the suite has no usable samples.
pub fn throughput_median(payload_mb: f64, elapsed_secs: &[f64], label: &str) -> Result<f64> {
    let rates: Vec<f64> =
        elapsed_secs.iter().filter(|t| **t != 0.0).map(|t| payload_mb / *t).collect();
    median(&rates).ok_or_else(|| Error::EmptySampleSet { label: label.to_string() })
}

/// Arithmetic mean of the byte counts in MB. Unlike the timing path,
/// zero counts are legitimate samples and stay in.
pub fn mean_megabytes(byte_counts: &[u64]) -> f64 {
    if byte_counts.is_empty() {
        return 0.0;
    }
    byte_counts.iter().map(|b| *b as f64 / BYTES_PER_MB).sum::<f64>() / byte_counts.len() as f64
}

/// Reduce one suite's decoded samples to its summary.
pub fn summarize(label: &str, payload_mb: f64, samples: &Samples) -> Result<Summary> {
    Ok(Summary {
        label: label.to_string(),
        throughput_mbps: throughput_median(payload_mb, &samples.times, label)?,
        ciphertext_mb: mean_megabytes(&samples.ciphertext),
        raw_mb: mean_megabytes(&samples.raw),
    })
}
