use super::reader::{ContainerReader, SourceError};
use crate::core::models::era::Era;
use crate::core::models::event::EventRecord;
use std::path::Path;
use tracing::debug;

/// What a run expects from every input container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaRequirements {
    /// Inputs must be simulated samples.
    pub simulated: bool,
    /// Inputs must carry the scale-variation weights on every record.
    pub extra_weights: bool,
    /// Inputs that declare an era must declare this one.
    pub era: Option<Era>,
}

impl SchemaRequirements {
    fn check(&self, reader: &ContainerReader) -> Result<(), SourceError> {
        let header = reader.header();
        let schema_err = |reason: String| SourceError::Schema {
            path: reader.path().to_path_buf(),
            reason,
        };

        if self.simulated && !header.simulated {
            return Err(schema_err(
                "simulated run requested but the container holds collision data".into(),
            ));
        }
        if self.extra_weights && !header.extra_weights {
            return Err(schema_err(
                "scale-variation weights requested but the container does not carry them".into(),
            ));
        }
        if let (Some(wanted), Some(found)) = (self.era, header.era) {
            if wanted != found {
                return Err(schema_err(format!(
                    "container was written for era {} but era {} was requested",
                    found, wanted
                )));
            }
        }
        Ok(())
    }
}

/// A group of input containers read as one sequence of events.
///
/// Entry `i` of the sequence is found through cumulative per-file entry offsets, so
/// only the container that holds it is touched.
pub struct EventSource {
    readers: Vec<ContainerReader>,
    /// `offsets[i]` = global index of the first entry of file `i`; one extra element holds the total.
    offsets: Vec<u64>,
    requirements: SchemaRequirements,
}

impl EventSource {
    /// Opens every file of the group and validates it against `requirements`.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be opened or does not match the schema.
    pub fn open<P: AsRef<Path>>(
        paths: &[P],
        requirements: SchemaRequirements,
    ) -> Result<Self, SourceError> {
        let mut readers = Vec::with_capacity(paths.len());
        let mut offsets = Vec::<u64>::with_capacity(paths.len() + 1);
        offsets.push(0);

        for path in paths {
            let reader = ContainerReader::open(path.as_ref())?;
            requirements.check(&reader)?;
            debug!(
                "Added {:?} to event source ({} entries)",
                reader.path(),
                reader.len()
            );
            let total = offsets
                .last()
                .copied()
                .unwrap_or(0)
                .checked_add(reader.len())
                .ok_or_else(|| SourceError::CorruptRecord {
                    path: reader.path().to_path_buf(),
                    index: reader.len(),
                    reason: "entry count overflows the group total".into(),
                })?;
            offsets.push(total);
            readers.push(reader);
        }

        Ok(Self {
            readers,
            offsets,
            requirements,
        })
    }

    /// Total number of events over all files.
    #[inline]
    pub fn len(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.readers.iter().map(|r| r.path())
    }

    /// Reads the event at global `index`.
    pub fn get(&mut self, index: u64) -> Result<EventRecord, SourceError> {
        if index >= self.len() {
            return Err(SourceError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let file = self.offsets.partition_point(|&start| start <= index) - 1;
        let local = index - self.offsets[file];
        let reader = &mut self.readers[file];
        let record = reader.read_entry(local)?;

        if self.requirements.extra_weights && record.weights.is_none() {
            return Err(SourceError::MissingWeights {
                path: reader.path().to_path_buf(),
                index: local,
            });
        }
        Ok(record)
    }
}
