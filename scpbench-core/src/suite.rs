//! Cipher-suite model and the catalog of suites under test.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Chunk lengths accepted by the chunked (experimental) cipher families.
pub const CHUNK_LENGTHS: [u32; 14] = [
    127, 128, 255, 256, 511, 512, 1023, 1024, 2047, 2048, 4095, 4096, 8191, 8192,
];

/// One transport configuration under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suite {
    /// Separate cipher and MAC algorithms.
    Standard { cipher: String, mac: String },
    /// Single combined authenticated-encryption name; carries no MAC.
    Aead { cipher: String },
    /// Experimental family parameterized by a chunk length.
    Chunked { family: String, chunk_len: u32 },
}

/// Disjoint suite categories, in catalog processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Standard,
    Aead,
    Chunked,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Aead => write!(f, "aead"),
            Self::Chunked => write!(f, "chunked"),
        }
    }
}

impl Suite {
    pub fn standard(cipher: impl Into<String>, mac: impl Into<String>) -> Self {
        Self::Standard { cipher: cipher.into(), mac: mac.into() }
    }

    pub fn aead(cipher: impl Into<String>) -> Self {
        Self::Aead { cipher: cipher.into() }
    }

    /// Chunk length must come from [`CHUNK_LENGTHS`].
    pub fn chunked(family: impl Into<String>, chunk_len: u32) -> Result<Self> {
        if !CHUNK_LENGTHS.contains(&chunk_len) {
            return Err(Error::config(format!("unsupported chunk length: {chunk_len}")));
        }
        Ok(Self::Chunked { family: family.into(), chunk_len })
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Standard { .. } => Category::Standard,
            Self::Aead { .. } => Category::Aead,
            Self::Chunked { .. } => Category::Chunked,
        }
    }

    /// Identity string written to (and expected in) the log header.
    pub fn label(&self) -> String {
        match self {
            Self::Standard { cipher, mac } => format!("{cipher}+{mac}"),
            Self::Aead { cipher } => cipher.clone(),
            Self::Chunked { family, chunk_len } => format!("{family}-{chunk_len}"),
        }
    }

    /// Fragment used in the log file name; standard suites join cipher
    /// and MAC with an underscore so the name stays collision-free.
    pub fn file_stem(&self) -> String {
        match self {
            Self::Standard { cipher, mac } => format!("{cipher}_{mac}"),
            _ => self.label(),
        }
    }

    /// Cipher algorithm handed to the transfer tool.
    pub fn cipher_name(&self) -> &str {
        match self {
            Self::Standard { cipher, .. } => cipher,
            Self::Aead { cipher } => cipher,
            Self::Chunked { family, .. } => family,
        }
    }

    /// MAC algorithm for standard suites, absent otherwise.
    pub fn mac_name(&self) -> Option<&str> {
        match self {
            Self::Standard { mac, .. } => Some(mac),
            _ => None,
        }
    }

    /// Chart-friendly label: everything after the first `marker` is
    /// dropped, the marker itself retained. Presentation only; the log
    /// header always carries the full [`Suite::label`].
    pub fn chart_label(&self, marker: char) -> String {
        let label = self.label();
        match label.find(marker) {
            Some(pos) => label[..pos + marker.len_utf8()].to_string(),
            None => label,
        }
    }
}

fn default_standard() -> Vec<(String, String)> {
    [
        ("aes128-ctr", "hmac-md5"),
        ("aes128-ctr", "hmac-md5-etm@openssh.com"),
        ("aes128-ctr", "umac-64-etm@openssh.com"),
        ("aes128-ctr", "hmac-sha1"),
        ("3des-cbc", "hmac-md5"),
        ("aes256-ctr", "hmac-sha2-512"),
        ("aes128-cbc", "hmac-sha1"),
        ("aes128-ctr", "hmac-ripemd160"),
    ]
    .into_iter()
    .map(|(c, m)| (c.to_string(), m.to_string()))
    .collect()
}

fn default_aead() -> Vec<String> {
    vec![
        "chacha20-poly1305@openssh.com".to_string(),
        "aes128-gcm@openssh.com".to_string(),
    ]
}

fn default_chunked_families() -> Vec<String> {
    vec!["im-aes128-gcm".to_string(), "im-chacha-poly".to_string()]
}

fn default_chunk_lengths() -> Vec<u32> {
    CHUNK_LENGTHS.to_vec()
}

/// Declarative suite catalog, usually loaded as the `[suites]` config
/// table. Defaults reproduce the full benchmark set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteCatalog {
    /// (cipher, mac) pairs.
    pub standard: Vec<(String, String)>,
    /// Combined authenticated-encryption names.
    pub aead: Vec<String>,
    /// Chunked family names; expanded per chunk length.
    pub chunked_families: Vec<String>,
    /// Chunk lengths to expand each family with.
    pub chunk_lengths: Vec<u32>,
}

impl Default for SuiteCatalog {
    fn default() -> Self {
        Self {
            standard: default_standard(),
            aead: default_aead(),
            chunked_families: default_chunked_families(),
            chunk_lengths: default_chunk_lengths(),
        }
    }
}

impl SuiteCatalog {
    /// Expand to the ordered suite list: standard, then aead, then
    /// chunked (chunk length outer, family inner, matching the original
    /// benchmark ordering).
    pub fn suites(&self) -> Result<Vec<Suite>> {
        let mut out = Vec::new();
        for (cipher, mac) in &self.standard {
            out.push(Suite::standard(cipher, mac));
        }
        for cipher in &self.aead {
            out.push(Suite::aead(cipher));
        }
        for len in &self.chunk_lengths {
            for family in &self.chunked_families {
                out.push(Suite::chunked(family, *len)?);
            }
        }
        Ok(out)
    }
}
