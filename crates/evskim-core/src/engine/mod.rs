//! # Engine Module
//!
//! The stateful layer of evskim: it decides which events survive, counts generator
//! weights, and drives input groups through to finished output units.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run flags, selection cuts and output settings
//! - **Selection** ([`selection`]) - The dimuon pair criterion and the pass-through mode
//! - **Weight Tally** ([`tally`]) - Signed event counts per scale variation
//! - **Driver** ([`driver`]) - The per-group lifecycle: scan, skip, process, finalize
//! - **Naming** ([`naming`]) - Sequential output paths
//! - **State Tracking** ([`state`]) - Driver states, group outcomes and run reports
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod driver;
pub mod error;
pub mod naming;
pub mod progress;
pub mod selection;
pub mod state;
pub mod tally;
