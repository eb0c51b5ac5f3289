//! # Core Module
//!
//! This module provides the stateless building blocks of the skimming engine: the event
//! data model, relativistic kinematics, the weight-summary histogram and the event
//! container format.
//!
//! ## Architecture
//!
//! - **Event Representation** ([`models`]) - Event records, muon candidates, generator weights and eras
//! - **Kinematics** ([`utils`]) - Four-momentum algebra for transverse momentum and invariant mass
//! - **Summary Histograms** ([`histogram`]) - Fixed-binning integer histograms
//! - **File I/O** ([`io`]) - The compressed `.evs` container: reading, writing and chaining
//!
//! ## Key Capabilities
//!
//! - **Lossless pass-through** of record fields the engine does not interpret
//! - **Lazy, basket-wise decompression** with a one-basket cache per input file
//! - **LZ4 or zlib compression** selected per output container

pub mod histogram;
pub mod io;
pub mod models;
pub mod utils;
