//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and [`core`](crate::core)
//! layers together into complete runs.
//!
//! - **Skim Workflow** ([`skim`]) - Runs every input group through the selection and weight
//!   tally and writes one `.evs` output unit per group.

pub mod skim;
