//! CRC-32 (Ethernet / ISO-HDLC) arithmetic.
//!
//! Everything here is pure: the engine's stages call [`stage_update`], which
//! is [`block_update`] restricted to one slice of a beat, which folds
//! [`byte_step`] over the present bytes.
//!
//! # Split Equivalence
//!
//! Folding bytes `0..4` and then `4..8` (seeded by the first result) yields
//! the same register as folding `0..8` at once, for every presence mask.
//! This is what lets a beat be evaluated across pipeline stages without
//! changing the checksum.
//!
//! ```
//! use fcs::crc::{CRC_INIT, block_update};
//!
//! let data = [0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE];
//! let mask = 0b1011_0110;
//!
//! let whole = block_update(CRC_INIT, &data, mask);
//! let (lo, hi) = data.split_at(4);
//! let split = block_update(block_update(CRC_INIT, lo, mask & 0x0F), hi, mask >> 4);
//! assert_eq!(whole, split);
//! ```

use traits::Checksum;

use crate::beat::BEAT_BYTES;

#[cfg(test)]
mod proptests;

/// Reflected form of polynomial `0x04C11DB7`.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Standard Ethernet seed.
pub const CRC_INIT: u32 = 0xFFFF_FFFF;

/// Final complement applied to the register.
pub const XOROUT: u32 = 0xFFFF_FFFF;

/// Reduce one byte into the CRC register, least-significant bit first.
///
/// For each data bit: if `register & 1` differs from the bit, the register
/// shifts right and absorbs the polynomial; otherwise it only shifts. XORing
/// the whole byte in up front and testing the register's low bit is the same
/// recurrence, evaluated without branches.
#[inline]
#[must_use]
pub const fn byte_step(mut crc: u32, byte: u8) -> u32 {
  crc ^= byte as u32;

  let mut bit = 0;
  while bit < 8 {
    let mask = 0u32.wrapping_sub(crc & 1);
    crc = (crc >> 1) ^ (POLYNOMIAL & mask);
    bit += 1;
  }

  crc
}

/// Fold [`byte_step`] over `bytes` in ascending order, skipping absent bytes.
///
/// Bit `i` of `present` governs `bytes[i]`. At most eight bytes are
/// considered; mask bits beyond `bytes.len()` are ignored.
#[inline]
#[must_use]
pub fn block_update(seed: u32, bytes: &[u8], present: u8) -> u32 {
  bytes
    .iter()
    .take(BEAT_BYTES)
    .enumerate()
    .filter(|&(i, _)| (present >> i) & 1 != 0)
    .fold(seed, |crc, (_, &byte)| byte_step(crc, byte))
}

/// Evaluate stage `stage` of a beat split into `S` equal slices.
///
/// Stage `s` folds bytes `s * w .. (s + 1) * w` where `w = BEAT_BYTES / S`;
/// a stage index past the end leaves the register untouched.
///
/// `S` must divide [`BEAT_BYTES`]; other shapes fail to compile:
///
/// ```compile_fail
/// let _ = fcs::crc::stage_update::<3>(0, &[0; 8], 0xFF, 0);
/// ```
///
/// ```compile_fail
/// let _ = fcs::crc::stage_update::<16>(0, &[0; 8], 0xFF, 0);
/// ```
///
/// ```compile_fail
/// let _ = fcs::crc::stage_update::<0>(0, &[0; 8], 0xFF, 0);
/// ```
#[inline]
#[must_use]
pub fn stage_update<const S: usize>(seed: u32, data: &[u8; BEAT_BYTES], present: u8, stage: usize) -> u32 {
  const { assert!(S >= 1 && S <= BEAT_BYTES && BEAT_BYTES % S == 0, "stage count must divide the beat width") };
  let width = BEAT_BYTES / S;
  let Some(chunk) = data.chunks_exact(width).nth(stage) else {
    return seed;
  };
  let shift = u32::try_from(stage * width).unwrap_or(u32::MAX);
  block_update(seed, chunk, present.checked_shr(shift).unwrap_or(0))
}

/// Standard test input for the CRC-32 check value.
const CHECK_INPUT: &[u8] = b"123456789";

// Verified at compile time: CRC-32/ISO-HDLC check value 0xCBF43926.
#[allow(clippy::indexing_slicing)]
const _: () = {
  let mut crc = CRC_INIT;
  let mut i = 0;
  while i < CHECK_INPUT.len() {
    crc = byte_step(crc, CHECK_INPUT[i]);
    i += 1;
  }
  assert!(crc ^ XOROUT == 0xCBF4_3926);
};

/// Software CRC-32 over a contiguous byte stream.
///
/// This is the packet-level checksum the engine must reproduce: feeding the
/// present bytes of every beat of a packet through one `Crc32` gives the
/// value emitted with the packet's last beat.
///
/// # Example
///
/// ```
/// use fcs::{Checksum, Crc32};
///
/// assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
///
/// let mut hasher = Crc32::new();
/// hasher.update(b"1234");
/// hasher.update(b"56789");
/// assert_eq!(hasher.finalize(), 0xCBF4_3926);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
  state: u32,
  initial: u32,
}

impl Crc32 {
  /// One-shot checksum with the standard seed.
  #[inline]
  #[must_use]
  pub fn compute(data: &[u8]) -> u32 {
    <Self as Checksum>::checksum(data)
  }

  /// Raw register value (before the final complement).
  #[inline]
  #[must_use]
  pub const fn state(&self) -> u32 {
    self.state
  }
}

impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    <Self as Checksum>::new()
  }
}

impl Checksum for Crc32 {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self::with_initial(CRC_INIT)
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self { state: initial, initial }
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.state = data.iter().fold(self.state, |crc, &byte| byte_step(crc, byte));
  }

  #[inline]
  fn finalize(&self) -> u32 {
    self.state ^ XOROUT
  }

  #[inline]
  fn reset(&mut self) {
    self.state = self.initial;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Bit-at-a-time form: compare register LSB against each data bit.
  fn byte_step_literal(mut state: u32, byte: u8) -> u32 {
    for bit in 0..8 {
      let data_bit = u32::from((byte >> bit) & 1);
      if (state & 1) ^ data_bit == 1 {
        state = (state >> 1) ^ POLYNOMIAL;
      } else {
        state >>= 1;
      }
    }
    state
  }

  #[test]
  fn byte_step_matches_bit_serial_definition() {
    for state in [0u32, 1, 0x8000_0000, 0xFFFF_FFFF, 0x1234_5678, 0xDEAD_BEEF] {
      for byte in 0u8..=255 {
        assert_eq!(byte_step(state, byte), byte_step_literal(state, byte), "state={state:#x} byte={byte:#x}");
      }
    }
  }

  #[test]
  fn single_zero_byte() {
    assert_eq!(byte_step(CRC_INIT, 0x00) ^ XOROUT, 0xD202_EF8D);
  }

  #[test]
  fn block_update_skips_absent_bytes() {
    let data = [0xAA, 0x01, 0xBB, 0x02, 0xCC, 0x03, 0xDD, 0x04];
    let masked = block_update(CRC_INIT, &data, 0b1010_1010);
    let dense = block_update(CRC_INIT, &[0x01, 0x02, 0x03, 0x04], 0x0F);
    assert_eq!(masked, dense);
  }

  #[test]
  fn empty_mask_is_identity() {
    let data = [0xFFu8; 8];
    for seed in [0u32, CRC_INIT, 0x0BAD_F00D] {
      assert_eq!(block_update(seed, &data, 0), seed);
    }
  }

  #[test]
  fn mask_bits_past_slice_are_ignored() {
    let data = [0x11, 0x22, 0x33];
    assert_eq!(block_update(CRC_INIT, &data, 0xFF), block_update(CRC_INIT, &data, 0x07));
  }

  #[test]
  fn split_equivalence_exhaustive_masks() {
    let data = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
    for mask in 0u8..=255 {
      let whole = block_update(CRC_INIT, &data, mask);
      let first = stage_update::<2>(CRC_INIT, &data, mask, 0);
      let second = stage_update::<2>(first, &data, mask, 1);
      assert_eq!(whole, second, "mask={mask:#010b}");
      assert_eq!(stage_update::<1>(CRC_INIT, &data, mask, 0), whole);
    }
  }

  fn fold_stages<const S: usize>(seed: u32, data: &[u8; BEAT_BYTES], mask: u8) -> u32 {
    (0..S).fold(seed, |crc, stage| stage_update::<S>(crc, data, mask, stage))
  }

  #[test]
  fn every_dividing_stage_count_covers_the_beat() {
    let data = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
    for mask in 0u8..=255 {
      let whole = block_update(CRC_INIT, &data, mask);
      assert_eq!(fold_stages::<1>(CRC_INIT, &data, mask), whole, "S=1 mask={mask:#010b}");
      assert_eq!(fold_stages::<2>(CRC_INIT, &data, mask), whole, "S=2 mask={mask:#010b}");
      assert_eq!(fold_stages::<4>(CRC_INIT, &data, mask), whole, "S=4 mask={mask:#010b}");
      assert_eq!(fold_stages::<8>(CRC_INIT, &data, mask), whole, "S=8 mask={mask:#010b}");
    }
  }

  #[test]
  fn single_byte_stages_fold_one_lane_each() {
    let data = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];
    for stage in 0..BEAT_BYTES {
      let lane = data.get(stage).copied().unwrap_or_default();
      assert_eq!(stage_update::<8>(CRC_INIT, &data, 0xFF, stage), byte_step(CRC_INIT, lane));
      assert_eq!(stage_update::<8>(CRC_INIT, &data, !(1 << stage), stage), CRC_INIT);
    }
  }

  #[test]
  fn stage_past_end_is_identity() {
    let data = [0x5Au8; 8];
    assert_eq!(stage_update::<2>(0x1234, &data, 0xFF, 2), 0x1234);
    assert_eq!(stage_update::<1>(0x1234, &data, 0xFF, 1), 0x1234);
    assert_eq!(stage_update::<8>(0x1234, &data, 0xFF, 8), 0x1234);
  }

  #[test]
  fn hasher_check_value_and_reset() {
    let mut h = Crc32::new();
    h.update(b"123456789");
    assert_eq!(h.finalize(), 0xCBF4_3926);
    assert_eq!(h.finalize(), 0xCBF4_3926);

    h.reset();
    assert_eq!(h.state(), CRC_INIT);
    assert_eq!(h.finalize(), 0);
  }

  #[test]
  fn hasher_incremental() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let oneshot = Crc32::compute(data);
    assert_eq!(oneshot, 0x414F_A339);

    for split in 0..=data.len() {
      let (a, b) = data.split_at(split);
      let mut h = Crc32::new();
      h.update(a);
      h.update(b);
      assert_eq!(h.finalize(), oneshot, "mismatch at split {split}");
    }
  }

  #[test]
  fn hasher_with_initial_resumes() {
    let (a, b) = b"123456789".split_at(4);
    let mut first = Crc32::new();
    first.update(a);

    let mut resumed = Crc32::with_initial(first.state());
    resumed.update(b);
    assert_eq!(resumed.finalize(), 0xCBF4_3926);
  }
}
