//! Provides input/output functionality for event containers.
//!
//! An event container (`.evs`) stores event records in compressed baskets, followed
//! by an index of those baskets and an optional summary histogram. This module
//! contains the on-disk format, basket compression, a random-access reader, a
//! chained multi-file [`source::EventSource`], and the writer behind the
//! trait-based sink interface.

pub mod compression;
pub mod format;
pub mod reader;
pub mod source;
pub mod traits;
pub mod writer;
