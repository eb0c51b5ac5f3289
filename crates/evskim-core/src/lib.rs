//! # evskim Core Library
//!
//! Skims collider event files: every input group is read as one event sequence, events
//! are kept when they contain a qualifying dimuon pair, and the
//! survivors are written to a compressed `.evs` container together with a summary of
//! generator weight signs.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`EventRecord`, `MuonCollection`,
//!   `EventWeights`), four-momentum kinematics, the fixed-bin `Histogram`, and the `.evs`
//!   container format with its readers and writers.
//!
//! - **[`engine`]: The Logic Core.** Selection, weight tallying and the `SkimDriver` that
//!   moves each input group through its lifecycle into an output unit.
//!
//! - **[`workflows`]: The Public API.** Complete runs built from the two layers below,
//!   such as [`workflows::skim::run`].

pub mod core;
pub mod engine;
pub mod workflows;
