//! Big-endian bit groups. Bits are stored one per `u8`, MSB first.

/// Folds up to 64 bits into an unsigned integer, most significant bit first.
pub fn bits_to_uint(bits: &[u8]) -> u64 {
    debug_assert!(bits.len() <= 64);
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit & 1))
}

/// Packs bits into bytes, eight at a time, MSB first. A trailing partial
/// group is ignored.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|byte| bits_to_uint(byte) as u8)
        .collect()
}
