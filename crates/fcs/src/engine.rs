//! The cycle-accurate FCS engine.
//!
//! One call to [`Engine::step`] is one clock cycle:
//!
//! 1. The handshake ([`Flow`]) is resolved from the input's presence, the
//!    output register and the consumer's readiness.
//! 2. If the consumer takes the output register, it is emitted.
//! 3. If the pipeline may advance, every entry moves one slot deeper and
//!    runs the CRC stage of its new depth; the accepted beat (or a bubble)
//!    becomes the head.
//!
//! With `N = 2` the beat accepted on step `t + 1` is seeded from the beat
//! accepted on step `t`, whose second stage completes during the same
//! advance. Deeper splits cannot forward in one step, so only `N = 1` and
//! `N = 2` are accepted.

use tracing::{debug, trace};

use crate::{
  beat::Beat,
  config::{self, EngineConfig},
  crc::stage_update,
  flow::{Flow, may_advance},
  link::CrcLink,
  pipeline::{Entry, Pipeline},
  stats::Stats,
};

/// Reference design: two 4-byte stages.
pub type FcsEngine = Engine<2>;

/// One 8-byte stage.
pub type SingleStageEngine = Engine<1>;

/// A beat leaving the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Output {
  /// The forwarded beat, unchanged.
  pub beat: Beat,
  /// Final FCS (complemented register) on a computed last beat, else zero.
  pub checksum: u32,
  /// Checksum computation was enabled when the beat was accepted.
  pub computed: bool,
}

impl Output {
  #[inline]
  fn from_entry(entry: &Entry) -> Self {
    let checksum = if entry.is_last() && entry.compute { !entry.crc } else { 0 };
    Self {
      beat: entry.beat,
      checksum,
      computed: entry.compute,
    }
  }

  /// The packet's checksum, present only on a computed last beat.
  #[inline]
  #[must_use]
  pub const fn fcs(&self) -> Option<u32> {
    if self.beat.last && self.computed { Some(self.checksum) } else { None }
  }

  /// [`fcs`](Self::fcs) in wire order (least significant byte first).
  #[inline]
  #[must_use]
  pub const fn fcs_bytes(&self) -> Option<[u8; 4]> {
    match self.fcs() {
      Some(fcs) => Some(fcs.to_le_bytes()),
      None => None,
    }
  }
}

/// Result of one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
  /// The input beat was taken this step.
  pub accepted: bool,
  /// The output register was taken by the consumer this step.
  pub emitted: Option<Output>,
}

/// Pipelined CRC-32 engine with `N` evaluation stages and latency `N`.
#[derive(Clone, Debug)]
pub struct Engine<const N: usize> {
  config: EngineConfig,
  link: CrcLink,
  pipeline: Pipeline<N>,
  stats: Stats,
  packet_beats: u64,
}

impl<const N: usize> Engine<N> {
  /// Pipeline depth, equal to the acceptance-to-emission latency in advances.
  pub const DEPTH: usize = N;

  #[must_use]
  pub fn new(config: EngineConfig) -> Self {
    const { assert!(N == 1 || N == 2, "supported stage counts are 1 and 2") };
    debug!(depth = N, crc_init = config.crc_init, crc_enable = config.crc_enable, "fcs engine created");
    Self {
      config,
      link: CrcLink::new(config.crc_init),
      pipeline: Pipeline::new(),
      stats: Stats::default(),
      packet_beats: 0,
    }
  }

  /// Engine configured from [`config::get`] (defaults plus environment overrides).
  #[must_use]
  pub fn from_env() -> Self {
    Self::new(config::get())
  }

  #[inline]
  #[must_use]
  pub const fn config(&self) -> EngineConfig {
    self.config
  }

  /// Replace the standing configuration; effective from the next step.
  pub fn set_config(&mut self, config: EngineConfig) {
    if config != self.config {
      debug!(crc_init = config.crc_init, crc_enable = config.crc_enable, "fcs configuration updated");
    }
    self.config = config;
  }

  pub fn set_crc_init(&mut self, crc_init: u32) {
    self.set_config(self.config.with_crc_init(crc_init));
  }

  pub fn set_crc_enable(&mut self, crc_enable: bool) {
    self.set_config(self.config.with_crc_enable(crc_enable));
  }

  /// Readiness presented to the producer for a step in which the consumer
  /// signals `downstream_ready`.
  #[inline]
  #[must_use]
  pub fn ready(&self, downstream_ready: bool) -> bool {
    may_advance(self.pipeline.output().is_some(), downstream_ready)
  }

  /// Contents of the output register, if valid.
  #[inline]
  #[must_use]
  pub fn output(&self) -> Option<Output> {
    self.pipeline.output().map(Output::from_entry)
  }

  /// Advance one cycle.
  ///
  /// `input` is the producer's beat (`None` when idle). A beat offered while
  /// [`ready`](Self::ready) is false is not taken; the producer must hold it
  /// and offer it again.
  pub fn step(&mut self, input: Option<Beat>, downstream_ready: bool) -> Step {
    let flow = Flow::evaluate(input.is_some(), self.pipeline.output().is_some(), downstream_ready);

    let tail = self.pipeline.output().copied();
    let emitted = match tail {
      Some(entry) if flow.output_fire => Some(self.emit(&entry)),
      _ => None,
    };

    if flow.advance {
      let head = match input {
        Some(beat) if flow.input_fire => Entry::accepted(beat, self.config.crc_enable),
        _ => Entry::EMPTY,
      };
      let crc_init = self.config.crc_init;
      let link = &mut self.link;
      self.pipeline.advance(head, |depth, entry| evaluate_stage::<N>(link, crc_init, depth, entry));
    }

    Step {
      accepted: flow.input_fire,
      emitted,
    }
  }

  /// Hard reset: empty pipeline, next beat starts a packet, counters cleared.
  pub fn reinitialize(&mut self) {
    self.link.reinitialize(self.config.crc_init);
    self.pipeline.clear();
    self.stats = Stats::default();
    self.packet_beats = 0;
    debug!(depth = N, "fcs engine reinitialized");
  }

  #[inline]
  #[must_use]
  pub const fn stats(&self) -> Stats {
    self.stats
  }

  #[inline]
  pub fn reset_stats(&mut self) {
    self.stats = Stats::default();
  }

  /// True when the next beat to complete its evaluation starts a packet.
  #[inline]
  #[must_use]
  pub const fn is_packet_start(&self) -> bool {
    self.link.packet_start()
  }

  /// Running register of the packet in flight.
  #[inline]
  #[must_use]
  pub const fn running_state(&self) -> u32 {
    self.link.running()
  }

  #[inline]
  #[must_use]
  pub const fn pipeline(&self) -> &Pipeline<N> {
    &self.pipeline
  }

  fn emit(&mut self, entry: &Entry) -> Output {
    let out = Output::from_entry(entry);
    self.stats.record(&entry.beat);
    self.packet_beats = self.packet_beats.wrapping_add(1);

    if entry.beat.last {
      if let Some(fcs) = out.fcs() {
        trace!(fcs = format_args!("{fcs:#010x}"), beats = self.packet_beats, "packet checksum emitted");
      }
      self.packet_beats = 0;
    }
    out
  }
}

impl<const N: usize> Default for Engine<N> {
  fn default() -> Self {
    Self::new(EngineConfig::default())
  }
}

/// Run the CRC stage for `depth` on an entry that just arrived there.
///
/// Depth 0 seeds from the link; the deepest stage commits its result back.
#[inline]
fn evaluate_stage<const N: usize>(link: &mut CrcLink, crc_init: u32, depth: usize, entry: &mut Entry) {
  if !entry.valid {
    return;
  }
  if depth == 0 {
    entry.crc = link.seed(crc_init);
  }
  if entry.compute {
    entry.crc = stage_update::<N>(entry.crc, &entry.beat.data, entry.beat.keep, depth);
  }
  if depth + 1 == N {
    link.commit(entry.crc, entry.beat.last, crc_init);
  }
}
