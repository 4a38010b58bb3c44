//! Key-to-Shard Routing
//!
//! Every key is routed to exactly one shard by hashing its bytes with
//! 32-bit FNV-1a and reducing the hash modulo the shard count.
//!
//! FNV-1a is used purely for distribution. It is fast on short keys and
//! gives the same index on every platform and every run, unlike
//! `std::hash::DefaultHasher` whose output is not stable across releases.

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// Computes the 32-bit FNV-1a hash of `data`.
///
/// Overflow wraps, which is the intended modular arithmetic of the hash.
#[inline]
pub fn fnv1a_32(data: &[u8]) -> u32 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Returns the shard a key belongs to.
///
/// `shard_count` must be non-zero; the store guarantees this at construction.
#[inline]
pub fn shard_index(key: &str, shard_count: usize) -> usize {
    fnv1a_32(key.as_bytes()) as usize % shard_count
}
