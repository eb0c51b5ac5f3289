use super::compression::{BLOCK_HEADER_LEN, BlockHeader, decompress_block};
use super::format::{self, ContainerFooter, ContainerHeader, FormatError, TRAILER_LEN, Trailer};
use crate::core::histogram::Histogram;
use crate::core::models::event::EventRecord;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open input '{path}': {source}", path = path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input '{path}' does not match the expected schema: {reason}", path = path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("Input '{path}' is truncated or was never finalized", path = path.display())]
    Truncated { path: PathBuf },

    #[error("Invalid container '{path}': {source}", path = path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("Entry {index} is out of range (source holds {len} entries)")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("Corrupt record {index} in '{path}': {reason}", path = path.display())]
    CorruptRecord {
        path: PathBuf,
        index: u64,
        reason: String,
    },

    #[error("Record {index} in '{path}' carries no generator weights", path = path.display())]
    MissingWeights { path: PathBuf, index: u64 },
}

/// A decompressed basket with the byte offset of every record in it.
struct DecodedBasket {
    index: usize,
    data: Vec<u8>,
    record_starts: Vec<usize>,
}

impl DecodedBasket {
    fn record(&self, i: usize) -> &[u8] {
        // Every record ends with '\n', which is excluded.
        &self.data[self.record_starts[i]..self.record_starts[i + 1] - 1]
    }
}

/// Random-access reader over one event container.
///
/// Only the header and footer are read on open; baskets are decompressed on demand
/// and the last one is kept, so reading in ascending order decodes each basket once.
pub struct ContainerReader {
    path: PathBuf,
    file: BufReader<File>,
    header: ContainerHeader,
    footer: ContainerFooter,
    /// `basket_starts[i]` = first entry of basket `i`; one extra element holds the total.
    basket_starts: Vec<u64>,
    cached: Option<DecodedBasket>,
}

impl ContainerReader {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let format_err = |source: FormatError| SourceError::Format {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_len = file
            .metadata()
            .map_err(|source| SourceError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        let mut file = BufReader::new(file);

        let header = format::read_header(&mut file).map_err(|e| match e {
            FormatError::Io(ref io) if io.kind() == io::ErrorKind::UnexpectedEof => {
                SourceError::Truncated {
                    path: path.to_path_buf(),
                }
            }
            other => format_err(other),
        })?;
        let header_end = file.stream_position().map_err(|e| format_err(e.into()))?;

        let truncated = || SourceError::Truncated {
            path: path.to_path_buf(),
        };
        if file_len < header_end + TRAILER_LEN {
            return Err(truncated());
        }

        let mut trailer = [0u8; TRAILER_LEN as usize];
        file.seek(SeekFrom::Start(file_len - TRAILER_LEN))
            .and_then(|_| file.read_exact(&mut trailer))
            .map_err(|e| format_err(e.into()))?;
        let trailer = Trailer::from_bytes(&trailer).ok_or_else(truncated)?;

        let footer_end = trailer
            .footer_offset
            .checked_add(u64::from(trailer.footer_len))
            .ok_or_else(truncated)?;
        if trailer.footer_offset < header_end || footer_end != file_len - TRAILER_LEN {
            return Err(truncated());
        }

        let mut footer = vec![0u8; trailer.footer_len as usize];
        file.seek(SeekFrom::Start(trailer.footer_offset))
            .and_then(|_| file.read_exact(&mut footer))
            .map_err(|e| format_err(e.into()))?;
        let footer = format::decode_footer(&footer).map_err(format_err)?;

        let basket_starts = basket_offsets(&footer, header_end..trailer.footer_offset)
            .map_err(|reason| SourceError::CorruptRecord {
                path: path.to_path_buf(),
                index: footer.entries,
                reason: reason.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            header,
            footer,
            basket_starts,
            cached: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn footer(&self) -> &ContainerFooter {
        &self.footer
    }

    pub fn summary(&self) -> Option<&Histogram> {
        self.footer.summary.as_ref()
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.footer.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the record at `index`.
    pub fn read_entry(&mut self, index: u64) -> Result<EventRecord, SourceError> {
        if index >= self.len() {
            return Err(SourceError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let basket = self.basket_starts.partition_point(|&start| start <= index) - 1;
        let local = (index - self.basket_starts[basket]) as usize;

        let decoded = match self.cached.take() {
            Some(cached) if cached.index == basket => cached,
            _ => self.load_basket(basket)?,
        };

        let record =
            serde_json::from_slice(decoded.record(local)).map_err(|e| SourceError::CorruptRecord {
                path: self.path.clone(),
                index,
                reason: e.to_string(),
            });
        self.cached = Some(decoded);
        record
    }

    fn load_basket(&mut self, basket: usize) -> Result<DecodedBasket, SourceError> {
        let info = self.footer.baskets[basket];
        let format_err = |path: &Path, source: FormatError| SourceError::Format {
            path: path.to_path_buf(),
            source,
        };

        let mut raw_header = [0u8; BLOCK_HEADER_LEN];
        self.file
            .seek(SeekFrom::Start(info.offset))
            .and_then(|_| self.file.read_exact(&mut raw_header))
            .map_err(|e| format_err(&self.path, e.into()))?;
        let block = BlockHeader::from_bytes(&raw_header).map_err(|e| format_err(&self.path, e))?;

        if block.compressed_len != info.compressed_len
            || block.uncompressed_len != info.uncompressed_len
        {
            return Err(self.corrupt(
                self.basket_starts[basket],
                "basket header disagrees with container index",
            ));
        }

        let mut payload = vec![0u8; block.compressed_len as usize];
        self.file
            .read_exact(&mut payload)
            .map_err(|e| format_err(&self.path, e.into()))?;
        let data = decompress_block(&block, &payload).map_err(|e| format_err(&self.path, e))?;

        let mut record_starts = vec![0];
        record_starts.extend(
            data.iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i + 1),
        );
        if record_starts.len() as u64 != info.entries + 1
            || record_starts.last().copied() != Some(data.len())
        {
            return Err(self.corrupt(
                self.basket_starts[basket],
                "basket record count disagrees with container index",
            ));
        }

        trace!(
            "Decoded basket {} of {:?} ({} entries)",
            basket, self.path, info.entries
        );

        Ok(DecodedBasket {
            index: basket,
            data,
            record_starts,
        })
    }

    fn corrupt(&self, index: u64, reason: &str) -> SourceError {
        SourceError::CorruptRecord {
            path: self.path.clone(),
            index,
            reason: reason.to_string(),
        }
    }
}

/// First entry of every basket plus the container total, after checking the footer
/// index against the byte range between header and footer.
fn basket_offsets(footer: &ContainerFooter, data: Range<u64>) -> Result<Vec<u64>, &'static str> {
    let mut starts = Vec::with_capacity(footer.baskets.len() + 1);
    let mut total = 0u64;
    starts.push(total);

    for basket in &footer.baskets {
        let end = basket
            .offset
            .checked_add(BLOCK_HEADER_LEN as u64 + u64::from(basket.compressed_len));
        if basket.offset < data.start || end.is_none_or(|end| end > data.end) {
            return Err("basket lies outside the data region");
        }
        // Each record ends with a newline, so a basket holds at most one per byte.
        if basket.entries > u64::from(basket.uncompressed_len) {
            return Err("basket declares more entries than it has bytes");
        }
        total = total
            .checked_add(basket.entries)
            .ok_or("basket entry counts overflow")?;
        starts.push(total);
    }

    if total != footer.entries {
        return Err("basket entry counts do not add up to the container total");
    }
    Ok(starts)
}
