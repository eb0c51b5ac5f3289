use super::compression::{BLOCK_HEADER_LEN, compress_block};
use super::format::{
    self, BasketInfo, ContainerFooter, ContainerHeader, FormatError, Trailer,
};
use super::traits::{EventSink, SinkFactory};
use crate::core::histogram::Histogram;
use crate::core::models::event::EventRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Uncompressed bytes buffered before a basket is flushed.
pub const DEFAULT_BASKET_SIZE: usize = 32_000;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Output already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Container format error: {0}")]
    Format(#[from] FormatError),

    #[error("Failed to encode event record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("A summary histogram has already been written")]
    SummaryAlreadyWritten,
}

/// Writes an event container, one basket at a time.
pub struct ContainerWriter {
    path: PathBuf,
    out: BufWriter<File>,
    header: ContainerHeader,
    basket_size: usize,
    position: u64,
    buffer: Vec<u8>,
    buffered_entries: u64,
    footer: ContainerFooter,
}

impl ContainerWriter {
    /// Creates the container file and writes its header.
    ///
    /// Fails with [`SinkError::AlreadyExists`] if anything exists at `path`; an
    /// existing file is never touched.
    pub fn create(
        path: &Path,
        header: ContainerHeader,
        basket_size: usize,
    ) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => SinkError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => SinkError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        let mut out = BufWriter::new(file);
        let position = format::write_header(&mut out, &header)?;
        debug!(
            "Opened output container {:?} ({})",
            path, header.compression
        );

        Ok(Self {
            path: path.to_path_buf(),
            out,
            header,
            basket_size: basket_size.max(1),
            position,
            buffer: Vec::with_capacity(basket_size),
            buffered_entries: 0,
            footer: ContainerFooter::default(),
        })
    }

    fn io_err(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn flush_basket(&mut self) -> Result<(), SinkError> {
        if self.buffered_entries == 0 {
            return Ok(());
        }

        let (block, payload) = compress_block(&self.header.compression, &self.buffer)?;
        self.out
            .write_all(&block.to_bytes())
            .and_then(|_| self.out.write_all(&payload))
            .map_err(|e| self.io_err(e))?;

        trace!(
            "Flushed basket of {} entries at offset {} ({} -> {} bytes)",
            self.buffered_entries, self.position, block.uncompressed_len, block.compressed_len
        );

        self.footer.baskets.push(BasketInfo {
            offset: self.position,
            entries: self.buffered_entries,
            compressed_len: block.compressed_len,
            uncompressed_len: block.uncompressed_len,
        });
        self.position += (BLOCK_HEADER_LEN + payload.len()) as u64;
        self.buffer.clear();
        self.buffered_entries = 0;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.flush_basket()?;

        let footer = format::encode_footer(&self.footer)?;
        let trailer = Trailer {
            footer_offset: self.position,
            footer_len: u32::try_from(footer.len())
                .map_err(|_| self.io_err(io::Error::other("container footer too large")))?,
        };

        self.out
            .write_all(&footer)
            .and_then(|_| self.out.write_all(&trailer.to_bytes()))
            .and_then(|_| self.out.flush())
            .and_then(|_| self.out.get_ref().sync_all())
            .map_err(|e| self.io_err(e))
    }

    fn remove_file(path: &Path) -> Result<(), SinkError> {
        fs::remove_file(path).map_err(|source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl EventSink for ContainerWriter {
    fn append(&mut self, record: &EventRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.buffer, record).map_err(SinkError::Encode)?;
        self.buffer.push(b'\n');
        self.buffered_entries += 1;
        self.footer.entries += 1;

        if self.buffer.len() >= self.basket_size {
            self.flush_basket()?;
        }
        Ok(())
    }

    fn write_summary(&mut self, histogram: &Histogram) -> Result<(), SinkError> {
        if self.footer.summary.is_some() {
            return Err(SinkError::SummaryAlreadyWritten);
        }
        self.footer.summary = Some(histogram.clone());
        Ok(())
    }

    fn entries(&self) -> u64 {
        self.footer.entries
    }

    fn close(mut self) -> Result<(), SinkError> {
        match self.finish() {
            Ok(()) => {
                debug!(
                    "Closed {:?}: {} entries in {} baskets",
                    self.path,
                    self.footer.entries,
                    self.footer.baskets.len()
                );
                Ok(())
            }
            Err(e) => {
                let path = self.path.clone();
                drop(self);
                if let Err(cleanup) = Self::remove_file(&path) {
                    warn!("Could not remove unfinished container {:?}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    fn abandon(self) -> Result<(), SinkError> {
        let path = self.path.clone();
        drop(self);
        debug!("Removing abandoned container {:?}", path);
        Self::remove_file(&path)
    }
}

/// Opens [`ContainerWriter`]s that share one header and basket size.
#[derive(Debug, Clone)]
pub struct ContainerSinkFactory {
    header: ContainerHeader,
    basket_size: usize,
}

impl ContainerSinkFactory {
    pub fn new(header: ContainerHeader, basket_size: usize) -> Self {
        Self {
            header,
            basket_size,
        }
    }
}

impl SinkFactory for ContainerSinkFactory {
    type Sink = ContainerWriter;

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open(&self, path: &Path) -> Result<Self::Sink, SinkError> {
        ContainerWriter::create(path, self.header.clone(), self.basket_size)
    }
}
