//! Local transfer payload management.

use scpbench_core::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const CHUNK: usize = 64 * 1024;

/// Create/truncate the zero-filled payload file the transfer copies.
pub fn create_payload(path: &Path, size_bytes: u64) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let zeros = [0u8; CHUNK];
    let mut remaining = size_bytes;
    while remaining > 0 {
        let n = remaining.min(CHUNK as u64) as usize;
        out.write_all(&zeros[..n])?;
        remaining -= n as u64;
    }
    out.flush()?;
    Ok(())
}

/// Remove the payload once the whole run is over.
pub fn remove_payload(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    Ok(())
}
