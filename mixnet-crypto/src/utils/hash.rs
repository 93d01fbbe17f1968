// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Hashing utilities

use sha3::Digest;
use sha3::Sha3_256;

/**
 * Hashing [context][`crate::context::Context`] dependency.
 *
 * Allows retrieving a hasher instance in some [Context][`crate::context::Context`].
 */
pub trait Hasher: Digest + Clone + Send + Sync {
    /// Identifier of this hash function; appears verbatim in the
    /// Fiat-Shamir session prefix.
    const NAME: &'static str;

    /// Returns a fresh hasher instance.
    fn hasher() -> Self;
}

/// SHA3-256, the hash function used by all shipped contexts.
pub type Hasher256 = Sha3_256;

impl Hasher for Sha3_256 {
    const NAME: &'static str = "sha3-256";

    fn hasher() -> Self {
        Sha3_256::new()
    }
}

/// Hashes `data` and returns the first 32 bytes of the digest.
///
/// All shipped hashers have at least 256-bit output, so this never pads.
#[must_use]
pub fn digest32<H: Hasher>(data: &[u8]) -> [u8; 32] {
    let mut hasher = H::hasher();
    hasher.update(data);
    let digest = hasher.finalize();

    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest32_deterministic() {
        let a = digest32::<Hasher256>(b"transcript");
        let b = digest32::<Hasher256>(b"transcript");
        let c = digest32::<Hasher256>(b"transcript!");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
