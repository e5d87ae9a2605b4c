//! Beat records.
//!
//! A beat carries up to [`BEAT_BYTES`] bytes plus a presence mask (`keep`):
//! bit `i` set means `data[i]` is meaningful and participates in the
//! checksum. A packet is a run of beats ending in exactly one beat with
//! `last` set; there is no packet id.
//!
//! Validity is not a field: an idle input is `None` in
//! [`Engine::step`](crate::Engine::step).

use crate::error::Error;

/// Bytes per beat.
pub const BEAT_BYTES: usize = 8;

/// Presence mask with every byte present.
pub const FULL_MASK: u8 = 0xFF;

/// One unit of transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Beat {
  /// Payload bytes, byte 0 first on the wire.
  pub data: [u8; BEAT_BYTES],
  /// Per-byte presence mask.
  pub keep: u8,
  /// Marks the final beat of a packet.
  pub last: bool,
}

impl Beat {
  #[inline]
  #[must_use]
  pub const fn new(data: [u8; BEAT_BYTES], keep: u8, last: bool) -> Self {
    Self { data, keep, last }
  }

  /// Beat with every byte present.
  #[inline]
  #[must_use]
  pub const fn full(data: [u8; BEAT_BYTES], last: bool) -> Self {
    Self::new(data, FULL_MASK, last)
  }

  /// Pack up to eight bytes into the low lanes of a beat.
  ///
  /// Lanes past `bytes.len()` are zero and absent.
  ///
  /// # Errors
  ///
  /// Returns [`Error::BeatTooLong`] if `bytes` holds more than eight bytes.
  pub fn from_slice(bytes: &[u8], last: bool) -> Result<Self, Error> {
    if bytes.len() > BEAT_BYTES {
      return Err(Error::BeatTooLong { len: bytes.len() });
    }
    let mut data = [0u8; BEAT_BYTES];
    for (dst, &src) in data.iter_mut().zip(bytes) {
      *dst = src;
    }
    Ok(Self::new(data, lane_mask(bytes.len()), last))
  }

  /// Iterate the present bytes in lane order.
  pub fn present_bytes(&self) -> impl Iterator<Item = u8> + '_ {
    let keep = self.keep;
    self
      .data
      .iter()
      .enumerate()
      .filter(move |&(i, _)| (keep >> i) & 1 != 0)
      .map(|(_, &b)| b)
  }

  /// Number of present bytes.
  #[inline]
  #[must_use]
  pub const fn present_len(&self) -> u32 {
    self.keep.count_ones()
  }

  /// Cut a packet payload into beats.
  ///
  /// Every beat but the last is full; the last carries the remainder with a
  /// low-lane mask. An empty payload yields one empty last beat.
  ///
  /// ```
  /// use fcs::Beat;
  ///
  /// let beats: Vec<Beat> = Beat::segment(b"0123456789").collect();
  /// assert_eq!(beats.len(), 2);
  /// assert_eq!(beats[0].keep, 0xFF);
  /// assert_eq!(beats[1].keep, 0b0000_0011);
  /// assert!(beats[1].last && !beats[0].last);
  /// ```
  pub fn segment(payload: &[u8]) -> Segments<'_> {
    Segments { rest: payload, done: false }
  }
}

/// Mask with the low `len` lanes present.
#[inline]
#[must_use]
pub const fn lane_mask(len: usize) -> u8 {
  if len >= BEAT_BYTES {
    FULL_MASK
  } else {
    ((1u16 << len) - 1) as u8
  }
}

/// Iterator returned by [`Beat::segment`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
  rest: &'a [u8],
  done: bool,
}

impl Iterator for Segments<'_> {
  type Item = Beat;

  fn next(&mut self) -> Option<Beat> {
    if self.done {
      return None;
    }
    let take = self.rest.len().min(BEAT_BYTES);
    let (head, tail) = self.rest.split_at(take);
    self.rest = tail;
    let last = tail.is_empty();
    self.done = last;
    Beat::from_slice(head, last).ok()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.done {
      return (0, Some(0));
    }
    let n = self.rest.len().div_ceil(BEAT_BYTES).max(1);
    (n, Some(n))
  }
}

impl ExactSizeIterator for Segments<'_> {}

impl core::iter::FusedIterator for Segments<'_> {}
