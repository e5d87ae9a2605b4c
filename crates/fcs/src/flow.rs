//! Valid/ready handshake for a pipeline with a one-deep output register.
//!
//! The pipeline may advance whenever its output register is empty or the
//! consumer takes the register's contents this step. Acceptance is gated by
//! the same permission, so a beat is never accepted on a step that cannot
//! shift it in.

/// Handshake outcome of one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flow {
  /// Pipeline shifts by one slot this step (upstream readiness).
  pub advance: bool,
  /// An input beat is accepted.
  pub input_fire: bool,
  /// The output register is taken by the consumer.
  pub output_fire: bool,
}

impl Flow {
  #[inline]
  #[must_use]
  pub const fn evaluate(input_valid: bool, output_valid: bool, downstream_ready: bool) -> Self {
    let advance = may_advance(output_valid, downstream_ready);
    Self {
      advance,
      input_fire: input_valid && advance,
      output_fire: output_valid && downstream_ready,
    }
  }
}

/// Permission to shift: stall only on a valid, untaken output.
#[inline]
#[must_use]
pub const fn may_advance(output_valid: bool, downstream_ready: bool) -> bool {
  !output_valid || downstream_ready
}
