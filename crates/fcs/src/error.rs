//! Error types.
//!
//! The engine's step function is infallible; errors only arise at the
//! edges: parsing configuration text and building beats from slices.

use core::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
  #[error("empty configuration value")]
  Empty,
  #[error("invalid crc_init: {0}")]
  InvalidSeed(#[source] ParseIntError),
  #[error("crc_init does not fit in 32 bits")]
  SeedOverflow,
  #[error("invalid crc_enable flag")]
  InvalidFlag,
  #[error("beat holds at most 8 bytes, got {len}")]
  BeatTooLong { len: usize },
}
