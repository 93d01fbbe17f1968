// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Safe-prime group parameter sets
//!
//! A parameter set fixes a safe prime `p = 2q + 1` and a generator of the
//! subgroup of squares, which has prime order `q`. Parameters are assumed
//! given: they are either published constants or the output of an external
//! parameter generation ceremony, and both `p` and `q` of every shipped set
//! have been verified prime.

use core::fmt::Debug;
use std::sync::OnceLock;

use num_bigint::BigUint;

/**
 * A safe-prime group parameter set.
 *
 * The group carrier types ([`ModPElement`][`super::ModPElement`],
 * [`ModPScalar`][`super::ModPScalar`]) are generic over an implementation
 * of this trait, so values from different parameter sets cannot be mixed.
 */
pub trait ModPParams: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Identifier of this parameter set; appears verbatim in the
    /// Fiat-Shamir session prefix.
    const NAME: &'static str;

    /// The modulus as an uppercase hexadecimal string.
    const MODULUS_HEX: &'static str;

    /// A generator of the subgroup of squares.
    const GENERATOR: u32;

    /// The parsed `(p, q)` pair, computed once per process.
    fn primes() -> &'static (BigUint, BigUint);

    /// The safe prime `p`.
    fn modulus() -> &'static BigUint {
        &Self::primes().0
    }

    /// The subgroup order `q = (p - 1) / 2`.
    fn order() -> &'static BigUint {
        &Self::primes().1
    }

    /// Fixed element encoding width: the byte length of `p`.
    fn element_bytes() -> usize {
        byte_len(Self::modulus())
    }

    /// Fixed scalar encoding width: the byte length of `q`.
    fn scalar_bytes() -> usize {
        byte_len(Self::order())
    }
}

/// Byte length of a non-negative integer, at least 1.
fn byte_len(value: &BigUint) -> usize {
    let bits = value.bits().max(1);
    usize::try_from((bits + 7) / 8).expect("parameter width fits usize")
}

/// Parses a modulus constant and derives the subgroup order.
fn parse_primes(hex: &str) -> (BigUint, BigUint) {
    let p = BigUint::parse_bytes(hex.as_bytes(), 16).expect("valid modulus constant");
    let q = (&p - 1u32) >> 1;
    (p, q)
}

/**
 * A 512-bit safe prime group, used where statements must fit small
 * test-vector sizes. Externally generated; `p` and `(p - 1) / 2` are
 * verified primes. The generator is `4 = 2^2`, a square.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePrime512;

impl ModPParams for SafePrime512 {
    const NAME: &'static str = "modp-512";

    const MODULUS_HEX: &'static str =
        "D5333D5F0D93D815D90940A9F2878C5E8C0FFF83C5AD4DEBABE2BBCB80C15294\
         910EFA7B6D5EA6D63FC8FEEC66AFBB1A38780F27B958F9EE9EBD59A3D6584F43";

    const GENERATOR: u32 = 4;

    fn primes() -> &'static (BigUint, BigUint) {
        static PRIMES: OnceLock<(BigUint, BigUint)> = OnceLock::new();
        PRIMES.get_or_init(|| parse_primes(Self::MODULUS_HEX))
    }
}

/**
 * The 2048-bit MODP group of RFC 3526 (group 14). Its modulus is a safe
 * prime and `2` generates the subgroup of squares (`p ≡ 7 mod 8`).
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePrime2048;

impl ModPParams for SafePrime2048 {
    const NAME: &'static str = "modp-2048";

    const MODULUS_HEX: &'static str =
        "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
         020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
         4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
         EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
         98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
         9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
         E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
         3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF";

    const GENERATOR: u32 = 2;

    fn primes() -> &'static (BigUint, BigUint) {
        static PRIMES: OnceLock<(BigUint, BigUint)> = OnceLock::new();
        PRIMES.get_or_init(|| parse_primes(Self::MODULUS_HEX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_shapes() {
        assert_eq!(SafePrime512::modulus().bits(), 512);
        assert_eq!(SafePrime512::order().bits(), 511);
        assert_eq!(SafePrime512::element_bytes(), 64);
        assert_eq!(SafePrime512::scalar_bytes(), 64);

        assert_eq!(SafePrime2048::modulus().bits(), 2048);
        assert_eq!(SafePrime2048::order().bits(), 2047);
        assert_eq!(SafePrime2048::element_bytes(), 256);
        assert_eq!(SafePrime2048::scalar_bytes(), 256);
    }

    #[test]
    fn test_generators_have_order_q() {
        for (g, p, q) in [
            (
                BigUint::from(SafePrime512::GENERATOR),
                SafePrime512::modulus(),
                SafePrime512::order(),
            ),
            (
                BigUint::from(SafePrime2048::GENERATOR),
                SafePrime2048::modulus(),
                SafePrime2048::order(),
            ),
        ] {
            assert_eq!(g.modpow(q, p), BigUint::from(1u32));
            assert_ne!(g, BigUint::from(1u32));
        }
    }
}
