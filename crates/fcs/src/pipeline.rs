//! Fixed-depth alignment pipeline.
//!
//! `N` slots, slot 0 at the head and slot `N - 1` doubling as the output
//! register. Every advance pops the tail, shifts the rest down by one and
//! writes a new head, so each entry spends exactly `N` advances between
//! being pushed and being popped. Entries carry their beat, flags and the
//! CRC register evaluated so far; the caller's `evaluate` hook runs the
//! stage belonging to each slot as entries arrive in it.

use crate::beat::Beat;

/// Snapshot held at one pipeline depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entry {
  pub beat: Beat,
  /// A beat was accepted on the step that pushed this entry.
  pub valid: bool,
  /// `crc_enable` as sampled when the beat was accepted.
  pub compute: bool,
  /// Intermediate register, final once the last stage has run.
  pub crc: u32,
}

impl Entry {
  /// Bubble pushed on steps that accept nothing.
  pub const EMPTY: Self = Self {
    beat: Beat::new([0; 8], 0, false),
    valid: false,
    compute: false,
    crc: 0,
  };

  #[inline]
  #[must_use]
  pub const fn accepted(beat: Beat, compute: bool) -> Self {
    Self {
      beat,
      valid: true,
      compute,
      crc: 0,
    }
  }

  /// Valid entry carrying the last beat of a packet.
  #[inline]
  #[must_use]
  pub const fn is_last(&self) -> bool {
    self.valid && self.beat.last
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline<const N: usize> {
  slots: [Entry; N],
}

impl<const N: usize> Pipeline<N> {
  pub const DEPTH: usize = N;

  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    const { assert!(N >= 1, "pipeline needs at least one slot") };
    Self { slots: [Entry::EMPTY; N] }
  }

  /// Output register contents, valid or not.
  #[inline]
  #[must_use]
  pub fn tail(&self) -> Option<&Entry> {
    self.slots.last()
  }

  /// Output register when it holds a valid entry.
  #[inline]
  #[must_use]
  pub fn output(&self) -> Option<&Entry> {
    self.tail().filter(|e| e.valid)
  }

  /// Shift by one slot and return the popped tail.
  ///
  /// `evaluate(depth, entry)` runs for every entry after it lands at
  /// `depth`, deepest first, with the new head evaluated last. A stage at
  /// depth 0 therefore observes everything the deeper stages produced on
  /// this same advance.
  pub fn advance(&mut self, head: Entry, mut evaluate: impl FnMut(usize, &mut Entry)) -> Entry {
    let popped = self.tail().copied().unwrap_or_default();
    self.slots.rotate_right(1);

    for (depth, slot) in self.slots.iter_mut().enumerate().skip(1).rev() {
      evaluate(depth, slot);
    }
    if let Some(first) = self.slots.first_mut() {
      *first = head;
      evaluate(0, first);
    }

    popped
  }

  /// Drop every entry.
  #[inline]
  pub fn clear(&mut self) {
    self.slots = [Entry::EMPTY; N];
  }

  /// Entries from head to tail.
  #[inline]
  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entry> {
    self.slots.iter()
  }

  /// Number of valid entries in flight.
  #[inline]
  #[must_use]
  pub fn occupancy(&self) -> usize {
    self.slots.iter().filter(|e| e.valid).count()
  }
}

impl<const N: usize> Default for Pipeline<N> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
