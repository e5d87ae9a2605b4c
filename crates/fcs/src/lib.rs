//! Beat-oriented Ethernet FCS engine.
//!
//! Computes a running CRC-32 (Ethernet / ISO-HDLC: reflected polynomial
//! `0xEDB88320`, seed `0xFFFFFFFF`, final complement) over packets delivered
//! as 8-byte *beats* with a per-byte presence mask. The checksum of a packet
//! is emitted together with its last beat, after a fixed pipeline latency of
//! `N` steps, under one-deep-buffer backpressure.
//!
//! # Components
//!
//! | Item | Role |
//! |------|------|
//! | [`crc::byte_step`] | One-byte bit-serial reduction |
//! | [`crc::block_update`] | Masked fold over a group of bytes |
//! | [`link::CrcLink`] | Running CRC across beats, packet boundary detection |
//! | [`pipeline::Pipeline`] | `N`-slot shift pipeline keeping data and CRC aligned |
//! | [`flow::Flow`] | Acceptance / advance / emission handshake |
//! | [`Engine`] | The cycle-accurate state machine |
//!
//! # Example
//!
//! ```rust
//! use fcs::{Beat, FcsEngine};
//!
//! let mut engine = FcsEngine::default();
//! let beat = Beat::full([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08], true);
//!
//! // Accepted on the first step, emitted two steps later.
//! assert!(engine.step(Some(beat), true).accepted);
//! assert!(engine.step(None, true).emitted.is_none());
//! let out = engine.step(None, true).emitted.unwrap();
//!
//! assert_eq!(out.beat, beat);
//! assert_eq!(out.fcs(), Some(fcs::Crc32::compute(&beat.data)));
//! ```
//!
//! # no_std Support
//!
//! The crate is `no_std`. The `std` feature (default) adds environment
//! overrides in [`config::get`].

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod beat;
pub mod config;
pub mod crc;
mod engine;
pub mod error;
pub mod flow;
pub mod link;
pub mod pipeline;
mod stats;

pub use beat::{BEAT_BYTES, Beat};
pub use config::EngineConfig;
pub use crc::Crc32;
pub use engine::{Engine, FcsEngine, Output, SingleStageEngine, Step};
pub use error::Error;
pub use stats::Stats;
pub use traits::Checksum;
