//! Cross-beat / cross-packet CRC linking.
//!
//! [`CrcLink`] holds the running register of the packet in flight and knows
//! whether the next beat starts a new packet. A beat's evaluation reads
//! [`CrcLink::seed`] and, once its last stage completes, hands the result
//! back through [`CrcLink::commit`]:
//!
//! | `packet_start` | `last` | seed | after commit |
//! |----------------|--------|------|--------------|
//! | true  | any   | `crc_init` | |
//! | false | any   | running    | |
//! | any   | false | | running = result, `packet_start = false` |
//! | any   | true  | | running = `crc_init`, `packet_start = true` |
//!
//! The value emitted for a last beat is the result passed to `commit`, i.e.
//! captured before the reset.

/// Running CRC register plus packet-boundary flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrcLink {
  running: u32,
  packet_start: bool,
}

impl CrcLink {
  /// Link state right after reinitialization.
  #[inline]
  #[must_use]
  pub const fn new(crc_init: u32) -> Self {
    Self {
      running: crc_init,
      packet_start: true,
    }
  }

  /// Register value the next beat must fold from.
  #[inline]
  #[must_use]
  pub const fn seed(&self, crc_init: u32) -> u32 {
    if self.packet_start { crc_init } else { self.running }
  }

  /// Record the fully evaluated register of a beat.
  ///
  /// In bypass mode `value` is simply the beat's seed, so the register is
  /// held within a packet and reset at its boundary.
  #[inline]
  pub fn commit(&mut self, value: u32, last: bool, crc_init: u32) {
    if last {
      self.running = crc_init;
      self.packet_start = true;
    } else {
      self.running = value;
      self.packet_start = false;
    }
  }

  /// Return to the post-reset condition.
  #[inline]
  pub fn reinitialize(&mut self, crc_init: u32) {
    *self = Self::new(crc_init);
  }

  /// True when the next accepted beat begins a packet.
  #[inline]
  #[must_use]
  pub const fn packet_start(&self) -> bool {
    self.packet_start
  }

  /// Register accumulated for the packet in flight.
  #[inline]
  #[must_use]
  pub const fn running(&self) -> u32 {
    self.running
  }
}

impl Default for CrcLink {
  #[inline]
  fn default() -> Self {
    Self::new(crate::crc::CRC_INIT)
  }
}
