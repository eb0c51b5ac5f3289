//! On-disk layout of an event container (`.evs`).
//!
//! ```text
//! "EVS\x01"                         magic
//! u32 header_len | header JSON       ContainerHeader
//! block*                             baskets, see `compression`
//! footer JSON                        ContainerFooter (basket index + summary)
//! u64 footer_offset | u32 footer_len | "EVSE"
//! ```
//! All integers are little-endian. Basket payloads are compact JSON records, each
//! terminated by `\n`. The trailer is written last, so a container whose writer was
//! interrupted has no valid trailer.

use super::compression::CompressionSettings;
use crate::core::histogram::Histogram;
use crate::core::models::era::Era;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use thiserror::Error;

pub const MAGIC: [u8; 4] = *b"EVS\x01";
pub const TRAILER_MAGIC: [u8; 4] = *b"EVSE";
pub const FORMAT_VERSION: u32 = 1;
pub const TRAILER_LEN: u64 = 16;
pub const FILE_EXTENSION: &str = "evs";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Bad magic bytes {found:?}, not an event container")]
    BadMagic { found: [u8; 4] },
    #[error("Unsupported container format version {0} (expected {expected})", expected = FORMAT_VERSION)]
    UnsupportedVersion(u32),
    #[error("Corrupt container {section}: {source}")]
    CorruptMetadata {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("Invalid compression settings: {0}")]
    InvalidCompression(String),
}

/// Describes the content of a container. Written once, before any basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerHeader {
    pub format_version: u32,
    pub simulated: bool,
    pub extra_weights: bool,
    #[serde(default)]
    pub era: Option<Era>,
    pub compression: CompressionSettings,
}

impl ContainerHeader {
    pub fn new(simulated: bool, extra_weights: bool, era: Option<Era>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            simulated,
            extra_weights,
            era,
            compression: CompressionSettings::default(),
        }
    }

    pub fn with_compression(mut self, compression: CompressionSettings) -> Self {
        self.compression = compression;
        self
    }
}

/// Location and size of one basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketInfo {
    pub offset: u64,
    pub entries: u64,
    pub compressed_len: u32,
    pub uncompressed_len: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerFooter {
    pub entries: u64,
    pub baskets: Vec<BasketInfo>,
    #[serde(default)]
    pub summary: Option<Histogram>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub footer_offset: u64,
    pub footer_len: u32,
}

impl Trailer {
    pub fn to_bytes(&self) -> [u8; TRAILER_LEN as usize] {
        let mut out = [0u8; TRAILER_LEN as usize];
        out[0..8].copy_from_slice(&self.footer_offset.to_le_bytes());
        out[8..12].copy_from_slice(&self.footer_len.to_le_bytes());
        out[12..16].copy_from_slice(&TRAILER_MAGIC);
        out
    }

    /// `None` when the trailer magic is missing.
    pub fn from_bytes(b: &[u8; TRAILER_LEN as usize]) -> Option<Self> {
        if b[12..16] != TRAILER_MAGIC {
            return None;
        }
        let mut offset = [0u8; 8];
        offset.copy_from_slice(&b[0..8]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&b[8..12]);
        Some(Self {
            footer_offset: u64::from_le_bytes(offset),
            footer_len: u32::from_le_bytes(len),
        })
    }
}

/// Writes magic and header, returning the number of bytes written.
pub fn write_header(writer: &mut impl Write, header: &ContainerHeader) -> Result<u64, FormatError> {
    let json = serde_json::to_vec(header).map_err(|source| FormatError::CorruptMetadata {
        section: "header",
        source,
    })?;
    let len = u32::try_from(json.len())
        .map_err(|_| FormatError::Io(io::Error::other("container header too large")))?;
    writer.write_all(&MAGIC)?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    Ok(8 + json.len() as u64)
}

/// Reads and validates magic, version and header.
pub fn read_header(reader: &mut impl Read) -> Result<ContainerHeader, FormatError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic { found: magic });
    }

    let mut len = [0u8; 4];
    reader.read_exact(&mut len)?;
    // Only the bytes actually present are read.
    let len = u64::from(u32::from_le_bytes(len));
    let mut json = Vec::new();
    reader.take(len).read_to_end(&mut json)?;
    if json.len() as u64 != len {
        return Err(FormatError::Io(io::ErrorKind::UnexpectedEof.into()));
    }

    let header: ContainerHeader =
        serde_json::from_slice(&json).map_err(|source| FormatError::CorruptMetadata {
            section: "header",
            source,
        })?;
    if header.format_version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(header.format_version));
    }
    Ok(header)
}

pub fn encode_footer(footer: &ContainerFooter) -> Result<Vec<u8>, FormatError> {
    serde_json::to_vec(footer).map_err(|source| FormatError::CorruptMetadata {
        section: "footer",
        source,
    })
}

pub fn decode_footer(bytes: &[u8]) -> Result<ContainerFooter, FormatError> {
    serde_json::from_slice(bytes).map_err(|source| FormatError::CorruptMetadata {
        section: "footer",
        source,
    })
}
