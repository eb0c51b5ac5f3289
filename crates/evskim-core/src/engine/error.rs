use thiserror::Error;

use crate::core::io::reader::SourceError;
use crate::core::io::writer::SinkError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Input error: {source}")]
    Source {
        #[from]
        source: SourceError,
    },

    #[error("Output error: {source}")]
    Sink {
        #[from]
        source: SinkError,
    },
}
