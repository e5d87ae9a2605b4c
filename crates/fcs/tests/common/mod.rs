//! Shared stimulus driver for the integration tests.

#![allow(dead_code)]

use crc_fast::CrcAlgorithm;
use fcs::{Beat, Engine, Output};

/// What happened while driving an engine.
#[derive(Debug, Default)]
pub struct Trace {
  pub outputs: Vec<Output>,
  /// Advance count at which each beat was accepted.
  pub accepted_at: Vec<u64>,
  /// Advance count at which each beat was emitted.
  pub emitted_at: Vec<u64>,
  /// Wall-clock step at which each beat was accepted / emitted.
  pub accepted_step: Vec<u64>,
  pub emitted_step: Vec<u64>,
}

/// Pattern value for `step`, cycling through `pattern`. Turns permanently
/// true after 32 walks so every run terminates.
fn pattern_at(pattern: &[bool], step: usize) -> bool {
  if pattern.is_empty() || step >= pattern.len() * 32 {
    return true;
  }
  pattern[step % pattern.len()]
}

/// Push `beats` through `engine`, holding each beat until accepted.
///
/// `offer[i]` says whether the producer presents its beat on step `i`,
/// `ready[i]` whether the consumer accepts output on step `i`.
pub fn drive<const N: usize>(engine: &mut Engine<N>, beats: &[Beat], offer: &[bool], ready: &[bool]) -> Trace {
  let mut trace = Trace::default();
  let mut advances = 0u64;
  let mut next = 0usize;
  let mut step = 0usize;

  while trace.outputs.len() < beats.len() {
    let input = if pattern_at(offer, step) { beats.get(next).copied() } else { None };
    let downstream_ready = pattern_at(ready, step);

    if engine.ready(downstream_ready) {
      advances += 1;
    }
    let s = engine.step(input, downstream_ready);

    if s.accepted {
      trace.accepted_at.push(advances);
      trace.accepted_step.push(step as u64);
      next += 1;
    }
    if let Some(out) = s.emitted {
      trace.emitted_at.push(advances);
      trace.emitted_step.push(step as u64);
      trace.outputs.push(out);
    }

    step += 1;
    assert!(step < 100_000, "engine did not drain");
  }

  trace
}

/// Assemble `(data, keep)` groups into beats, marking each group's final beat last.
pub fn packets_to_beats(packets: &[Vec<([u8; 8], u8)>]) -> Vec<Beat> {
  let mut beats = Vec::new();
  for packet in packets {
    for (i, &(data, keep)) in packet.iter().enumerate() {
      beats.push(Beat::new(data, keep, i + 1 == packet.len()));
    }
  }
  beats
}

/// Golden CRC-32 of each packet, computed over present bytes only.
pub fn expected_fcs(packets: &[Vec<([u8; 8], u8)>]) -> Vec<u32> {
  packets
    .iter()
    .map(|packet| {
      let bytes: Vec<u8> = packet
        .iter()
        .flat_map(|&(data, keep)| Beat::new(data, keep, false).present_bytes().collect::<Vec<_>>())
        .collect();
      crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, &bytes) as u32
    })
    .collect()
}

pub fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut out = vec![0u8; len];
  let mut x = seed | 1;
  for b in &mut out {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *b = (x as u8).wrapping_add((x >> 8) as u8);
  }
  out
}
