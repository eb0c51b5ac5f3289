//! Basket compression.
//!
//! Every basket is written as one block with an 11-byte header:
//! ```text
//! bytes 0-1:   algorithm tag ("L4" = LZ4, "ZL" = zlib, "RW" = stored)
//! byte  2:     compression level the block was written with
//! bytes 3-6:   compressed size   (u32 little-endian)
//! bytes 7-10:  uncompressed size (u32 little-endian)
//! ```
//! The payload follows the header immediately. A block whose compressed form would
//! not be smaller than its input is stored raw.

use super::format::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

pub const BLOCK_HEADER_LEN: usize = 11;
pub const MAX_LEVEL: u8 = 9;
pub const DEFAULT_LEVEL: u8 = 4;
/// Upper bound on the LZ4 block expansion ratio.
const LZ4_MAX_EXPANSION: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Lz4,
    Zlib,
}

impl Algorithm {
    fn name(self) -> &'static str {
        match self {
            Algorithm::Lz4 => "lz4",
            Algorithm::Zlib => "zlib",
        }
    }
}

/// Algorithm and level applied to every basket of a container.
///
/// Level 0 disables compression. LZ4 has a single speed setting, so any non-zero
/// level selects it; for zlib the level is passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub algorithm: Algorithm,
    pub level: u8,
}

impl CompressionSettings {
    pub fn new(algorithm: Algorithm, level: u8) -> Result<Self, FormatError> {
        if level > MAX_LEVEL {
            return Err(FormatError::InvalidCompression(format!(
                "level {} exceeds maximum {}",
                level, MAX_LEVEL
            )));
        }
        Ok(Self { algorithm, level })
    }

    pub fn is_enabled(&self) -> bool {
        self.level > 0
    }
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Lz4,
            level: DEFAULT_LEVEL,
        }
    }
}

impl fmt::Display for CompressionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), self.level)
    }
}

/// Parses `algorithm[:level]`, e.g. `lz4:4` or `zlib`.
impl FromStr for CompressionSettings {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, level) = match s.trim().split_once(':') {
            Some((name, level)) => (name, Some(level)),
            None => (s.trim(), None),
        };
        let algorithm = match name.to_ascii_lowercase().as_str() {
            "lz4" => Algorithm::Lz4,
            "zlib" => Algorithm::Zlib,
            other => {
                return Err(FormatError::InvalidCompression(format!(
                    "unknown algorithm '{}'",
                    other
                )));
            }
        };
        let level = match level {
            Some(level) => level.trim().parse::<u8>().map_err(|_| {
                FormatError::InvalidCompression(format!("invalid level '{}'", level))
            })?,
            None => DEFAULT_LEVEL,
        };
        Self::new(algorithm, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Raw,
    Lz4,
    Zlib,
}

impl BlockTag {
    pub fn as_bytes(self) -> &'static [u8; 2] {
        match self {
            BlockTag::Raw => b"RW",
            BlockTag::Lz4 => b"L4",
            BlockTag::Zlib => b"ZL",
        }
    }

    pub fn from_bytes(tag: [u8; 2]) -> Result<Self, FormatError> {
        match &tag {
            b"RW" => Ok(BlockTag::Raw),
            b"L4" => Ok(BlockTag::Lz4),
            b"ZL" => Ok(BlockTag::Zlib),
            _ => Err(FormatError::Compression(format!(
                "unsupported block tag {:?}",
                String::from_utf8_lossy(&tag)
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub tag: BlockTag,
    pub level: u8,
    pub compressed_len: u32,
    pub uncompressed_len: u32,
}

impl BlockHeader {
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_LEN] {
        let mut out = [0u8; BLOCK_HEADER_LEN];
        out[0..2].copy_from_slice(self.tag.as_bytes());
        out[2] = self.level;
        out[3..7].copy_from_slice(&self.compressed_len.to_le_bytes());
        out[7..11].copy_from_slice(&self.uncompressed_len.to_le_bytes());
        out
    }

    pub fn from_bytes(b: &[u8; BLOCK_HEADER_LEN]) -> Result<Self, FormatError> {
        Ok(Self {
            tag: BlockTag::from_bytes([b[0], b[1]])?,
            level: b[2],
            compressed_len: u32::from_le_bytes([b[3], b[4], b[5], b[6]]),
            uncompressed_len: u32::from_le_bytes([b[7], b[8], b[9], b[10]]),
        })
    }
}

fn block_len(len: usize) -> Result<u32, FormatError> {
    u32::try_from(len)
        .map_err(|_| FormatError::Compression(format!("block of {} bytes is too large", len)))
}

/// Compresses one basket payload according to `settings`.
pub fn compress_block(
    settings: &CompressionSettings,
    data: &[u8],
) -> Result<(BlockHeader, Vec<u8>), FormatError> {
    let uncompressed_len = block_len(data.len())?;

    let compressed = if settings.is_enabled() {
        match settings.algorithm {
            Algorithm::Lz4 => Some((BlockTag::Lz4, lz4_flex::block::compress(data))),
            Algorithm::Zlib => Some((BlockTag::Zlib, compress_zlib(data, settings.level)?)),
        }
    } else {
        None
    };

    let (tag, payload) = match compressed {
        Some((tag, payload)) if payload.len() < data.len() => (tag, payload),
        _ => (BlockTag::Raw, data.to_vec()),
    };

    let header = BlockHeader {
        tag,
        level: settings.level,
        compressed_len: block_len(payload.len())?,
        uncompressed_len,
    };
    Ok((header, payload))
}

/// Restores a basket payload and checks its length against the block header.
pub fn decompress_block(header: &BlockHeader, payload: &[u8]) -> Result<Vec<u8>, FormatError> {
    let expected = header.uncompressed_len as usize;
    let out = match header.tag {
        BlockTag::Raw => payload.to_vec(),
        BlockTag::Lz4 => {
            if expected > payload.len().saturating_mul(LZ4_MAX_EXPANSION) {
                return Err(FormatError::Compression(format!(
                    "lz4: {} bytes cannot expand to {}",
                    payload.len(),
                    expected
                )));
            }
            lz4_flex::block::decompress(payload, expected)
                .map_err(|e| FormatError::Compression(format!("lz4: {}", e)))?
        }
        BlockTag::Zlib => decompress_zlib(payload, expected)?,
    };

    if out.len() != expected {
        return Err(FormatError::Compression(format!(
            "expected {} uncompressed bytes, got {}",
            expected,
            out.len()
        )));
    }
    Ok(out)
}

fn compress_zlib(data: &[u8], level: u8) -> Result<Vec<u8>, FormatError> {
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    let zlib_err = |e: std::io::Error| FormatError::Compression(format!("zlib: {}", e));
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(u32::from(level)));
    encoder.write_all(data).map_err(zlib_err)?;
    encoder.finish().map_err(zlib_err)
}

fn decompress_zlib(data: &[u8], expected: usize) -> Result<Vec<u8>, FormatError> {
    use flate2::read::ZlibDecoder;

    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| FormatError::Compression(format!("zlib: {}", e)))?;
    Ok(out)
}
