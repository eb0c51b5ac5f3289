use super::writer::SinkError;
use crate::core::histogram::Histogram;
use crate::core::models::event::EventRecord;
use std::path::Path;

/// Destination for the events that survive a skim.
///
/// A sink receives records one at a time, at most one summary histogram, and is then
/// either closed (finalizing the output) or abandoned (discarding it).
pub trait EventSink {
    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or the write fails.
    fn append(&mut self, record: &EventRecord) -> Result<(), SinkError>;

    /// Stores the summary histogram of the unit.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::SummaryAlreadyWritten`] on a second call.
    fn write_summary(&mut self, histogram: &Histogram) -> Result<(), SinkError>;

    /// Number of records appended so far.
    fn entries(&self) -> u64;

    /// Flushes all buffered output and finalizes the sink.
    ///
    /// An empty sink closes into a valid, empty output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or finalizing fails.
    fn close(self) -> Result<(), SinkError>
    where
        Self: Sized;

    /// Discards everything written so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the partial output cannot be removed.
    fn abandon(self) -> Result<(), SinkError>
    where
        Self: Sized;
}

/// Creates sinks at output paths.
pub trait SinkFactory {
    type Sink: EventSink;

    /// Whether an output already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Opens a new sink at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::AlreadyExists`] if `path` is taken, or an I/O error.
    fn open(&self, path: &Path) -> Result<Self::Sink, SinkError>;
}
