//! # Core Models Module
//!
//! Data structures describing one collision event as the engine sees it.
//!
//! ## Key Components
//!
//! - [`event`] - The event record with its opaque pass-through fields
//! - [`muon`] - Muon candidates stored as index-aligned arrays
//! - [`weights`] - The nominal generator weight and its six scale variations
//! - [`era`] - Data-taking period tags
//!
//! ```ignore
//! use evskim::core::models::{event::EventRecord, muon::{Muon, MuonCollection}};
//!
//! let muons = MuonCollection::from_candidates(&[
//!     Muon::new(20.0, 0.0, 3.0, 20.3, 0.15),
//!     Muon::new(-9.0, 1.0, 0.5, 9.1, 0.05),
//! ]);
//! let record = EventRecord::new(muons).with_field("run", 316_187);
//! ```

pub mod era;
pub mod event;
pub mod muon;
pub mod weights;
