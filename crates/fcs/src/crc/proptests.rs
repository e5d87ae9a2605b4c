extern crate std;

use crc_fast::CrcAlgorithm;
use proptest::prelude::*;

use super::*;

proptest! {
  #[test]
  fn crc32_matches_crc_fast_rust(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    let ours = Crc32::compute(&data);
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, &data) as u32;
    prop_assert_eq!(ours, reference);
  }

  #[test]
  fn crc32_streaming_matches_crc_fast_rust(data in proptest::collection::vec(any::<u8>(), 0..=4096), chunk in 1usize..=257) {
    let mut ours = Crc32::new();
    let mut reference = crc_fast::Digest::new(CrcAlgorithm::Crc32IsoHdlc);

    for part in data.chunks(chunk) {
      ours.update(part);
      reference.update(part);
    }

    prop_assert_eq!(ours.finalize(), reference.finalize() as u32);
  }

  #[test]
  fn split_stages_match_single_fold(seed in any::<u32>(), data in any::<[u8; 8]>(), mask in any::<u8>()) {
    let whole = block_update(seed, &data, mask);
    let (lo, hi) = data.split_at(4);
    let split = block_update(block_update(seed, lo, mask & 0x0F), hi, mask >> 4);
    prop_assert_eq!(whole, split);

    let staged = stage_update::<2>(stage_update::<2>(seed, &data, mask, 0), &data, mask, 1);
    prop_assert_eq!(whole, staged);
  }

  #[test]
  fn masked_fold_matches_dense_crc(data in any::<[u8; 8]>(), mask in any::<u8>()) {
    let present: std::vec::Vec<u8> = data
      .iter()
      .enumerate()
      .filter(|&(i, _)| (mask >> i) & 1 != 0)
      .map(|(_, &b)| b)
      .collect();

    let ours = block_update(CRC_INIT, &data, mask) ^ XOROUT;
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, &present) as u32;
    prop_assert_eq!(ours, reference);
  }
}

#[test]
fn test_vectors_crc32() {
  assert_eq!(Crc32::compute(b"123456789"), 0xCBF4_3926);
}
