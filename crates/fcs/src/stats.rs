//! Forwarding counters.

use crate::beat::Beat;

/// Counters over emitted beats.
///
/// Counting happens when the consumer takes a beat, in both computing and
/// bypass mode. Counters wrap on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stats {
  /// Beats emitted.
  pub beats: u64,
  /// Last beats emitted.
  pub packets: u64,
  /// Present bytes emitted.
  pub bytes: u64,
}

impl Stats {
  #[inline]
  pub(crate) fn record(&mut self, beat: &Beat) {
    self.beats = self.beats.wrapping_add(1);
    self.bytes = self.bytes.wrapping_add(u64::from(beat.present_len()));
    if beat.last {
      self.packets = self.packets.wrapping_add(1);
    }
  }
}
