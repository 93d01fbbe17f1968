// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Fiat-Shamir seed and challenge derivation
//!
//! Every non-interactive proof in this crate replaces the verifier's
//! public coins by values derived here. The derivation is anchored in a
//! *global prefix* `ρ`, the hash of a byte tree holding the protocol
//! version, the session identifier, the security parameters and the
//! names of the PRG, group and hash function. Given challenge data `d`
//! (a byte tree), the challenger produces
//!
//! - a PRG seed `PRG(H(ρ ‖ encode(d)))`, used to derive batching vectors,
//! - an integer challenge of `n_v` bits from the same construction.
//!
//! Both are pure functions of the prefix and the data, so provers and
//! verifiers that agree on the session parameters derive identical
//! values.

use core::marker::PhantomData;

use num_bigint::BigUint;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::context::Context;
use crate::traits::groups::{CryptographicGroup, GroupScalar};
use crate::utils::error::Error;
use crate::utils::hash::{digest32, Hasher};
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VSerializable};

/// Byte length of a PRG seed.
pub const SEED_BYTES: usize = 32;

/// Name of the batching PRG; appears verbatim in the session prefix.
pub const PRG_NAME: &str = "chacha20";

/**
 * Session-wide parameters of the Fiat-Shamir transcript.
 *
 * The challenge bit length `n_v`, the batching component bit length `n_e`
 * and the statistical security parameter `n_r` are constants of the whole
 * session and appear verbatim in the transcript prefix, together with the
 * identifiers of the PRG, the group and the hash function.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Protocol version string.
    pub version: String,
    /// Session identifier.
    pub sid: String,
    /// Auxiliary session identifier.
    pub auxsid: String,
    /// Statistical security parameter in bits.
    pub n_r: u32,
    /// Challenge bit length.
    pub n_v: u32,
    /// Batching component bit length.
    pub n_e: u32,
    /// PRG identifier.
    pub prg_name: String,
    /// Group identifier.
    pub group_name: String,
    /// Hash function identifier.
    pub hash_name: String,
}

impl SessionParams {
    /// Construct parameters for the given session identifiers with the
    /// default security constants of context `C`.
    #[must_use]
    pub fn new<C: Context>(sid: &str, auxsid: &str) -> Self {
        SessionParams {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sid: sid.to_string(),
            auxsid: auxsid.to_string(),
            n_r: 100,
            n_v: 256,
            n_e: 256,
            prg_name: PRG_NAME.to_string(),
            group_name: C::G::NAME.to_string(),
            hash_name: C::Hasher::NAME.to_string(),
        }
    }

    /// The combined random-oracle session identifier, `sid.auxsid`.
    #[must_use]
    pub fn rosid(&self) -> String {
        format!("{}.{}", self.sid, self.auxsid)
    }

    /// The canonical byte tree hashed into the global prefix.
    #[must_use]
    pub fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            ByteTree::string_leaf(&self.version),
            ByteTree::string_leaf(&self.rosid()),
            ByteTree::u32_leaf(self.n_r),
            ByteTree::u32_leaf(self.n_v),
            ByteTree::u32_leaf(self.n_e),
            ByteTree::string_leaf(&self.prg_name),
            ByteTree::string_leaf(&self.group_name),
            ByteTree::string_leaf(&self.hash_name),
        ])
    }
}

/**
 * Random-oracle challenger bound to a session prefix.
 *
 * # Examples
 * ```
 * use mixnet_crypto::context::P256Ctx as Ctx;
 * use mixnet_crypto::utils::serialization::ByteTree;
 * use mixnet_crypto::zkp::challenger::{Challenger, SessionParams};
 *
 * let challenger = Challenger::<Ctx>::new(SessionParams::new::<Ctx>("sid", "default"));
 * let data = ByteTree::leaf(vec![1, 2, 3]);
 *
 * // identical data yields identical seeds
 * assert_eq!(challenger.seed(&data), challenger.seed(&data));
 * ```
 */
#[derive(Debug, Clone)]
pub struct Challenger<C: Context> {
    params: SessionParams,
    prefix: [u8; 32],
    _marker: PhantomData<C>,
}

impl<C: Context> Challenger<C> {
    /// Construct a challenger, deriving the global prefix
    /// `ρ = H(version ‖ rosid ‖ n_r ‖ n_v ‖ n_e ‖ prg ‖ group ‖ hash)`.
    #[must_use]
    pub fn new(params: SessionParams) -> Self {
        let prefix = digest32::<C::Hasher>(&params.to_tree().ser());
        Challenger {
            params,
            prefix,
            _marker: PhantomData,
        }
    }

    /// The session parameters this challenger is bound to.
    #[must_use]
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// The global prefix `ρ`.
    #[must_use]
    pub fn rho(&self) -> &[u8] {
        &self.prefix
    }

    /// Hash the prefix and the challenge data into a PRG state.
    fn oracle(&self, data: &ByteTree) -> ChaCha20Rng {
        let mut input = Vec::with_capacity(self.prefix.len() + data.encoded_len());
        input.extend_from_slice(&self.prefix);
        input.extend_from_slice(&data.ser());

        ChaCha20Rng::from_seed(digest32::<C::Hasher>(&input))
    }

    /// Derive a PRG seed from the given challenge data.
    #[must_use]
    pub fn seed(&self, data: &ByteTree) -> [u8; SEED_BYTES] {
        let mut prg = self.oracle(data);
        let mut seed = [0u8; SEED_BYTES];
        prg.fill_bytes(&mut seed);
        seed
    }

    /// Derive the integer challenge of `n_v` bits from the given
    /// challenge data.
    #[must_use]
    pub fn scalar_integer(&self, data: &ByteTree) -> BigUint {
        let mut prg = self.oracle(data);
        bit_integer(&mut prg, self.params.n_v)
    }

    /// Expand a seed into the batching vector: `n` non-negative integers
    /// of `n_e` bits each, drawn from a single PRG stream.
    #[must_use]
    pub fn batching_integers(&self, seed: &[u8; SEED_BYTES], n: usize) -> Vec<BigUint> {
        let mut prg = ChaCha20Rng::from_seed(*seed);
        (0..n).map(|_| bit_integer(&mut prg, self.params.n_e)).collect()
    }

    /// Expand a seed into the batching vector as scalars of context `C`.
    #[must_use]
    pub fn batching_vector(&self, seed: &[u8; SEED_BYTES], n: usize) -> Vec<C::Scalar> {
        self.batching_integers(seed, n)
            .iter()
            .map(|e| scalar_from_integer::<C>(e))
            .collect()
    }

    /// Validate an integer challenge and convert it into the scalar
    /// field.
    ///
    /// # Errors
    ///
    /// - `MalformedChallenge` if the integer exceeds `n_v` bits
    pub fn challenge_scalar(&self, challenge: &BigUint) -> Result<C::Scalar, Error> {
        if challenge.bits() > u64::from(self.params.n_v) {
            return Err(Error::MalformedChallenge(format!(
                "challenge of {} bits exceeds n_v = {}",
                challenge.bits(),
                self.params.n_v
            )));
        }
        Ok(scalar_from_integer::<C>(challenge))
    }
}

/// Convert a non-negative integer into the scalar field of context `C`.
#[must_use]
pub fn scalar_from_integer<C: Context>(value: &BigUint) -> C::Scalar {
    C::Scalar::from_be_bytes_reduced(&value.to_bytes_be())
}

/// Draw a non-negative integer of exactly `bits` random bits from `rng`.
///
/// Used both for PRG-derived batching components and for the prover's
/// blinding exponents of bounded bit length.
#[must_use]
pub fn bit_integer<R: RngCore>(rng: &mut R, bits: u32) -> BigUint {
    let n_bytes = usize::try_from((bits + 7) / 8).expect("bit width fits usize");
    let mut bytes = vec![0u8; n_bytes];
    rng.fill_bytes(&mut bytes);

    let surplus = 8 * n_bytes as u32 - bits;
    if let Some(first) = bytes.first_mut() {
        *first &= 0xFF >> surplus;
    }
    BigUint::from_bytes_be(&bytes)
}

/// Draw a blinding exponent of `bits` bits and reduce it into the scalar
/// field of context `C`.
#[must_use]
pub fn bit_scalar<C: Context, R: CRng>(rng: &mut R, bits: u32) -> C::Scalar {
    scalar_from_integer::<C>(&bit_integer(rng, bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModP512Ctx as MCtx;
    use crate::context::P256Ctx as PCtx;

    #[test]
    fn test_prefix_binds_parameters() {
        let a = Challenger::<PCtx>::new(SessionParams::new::<PCtx>("sid", "default"));
        let b = Challenger::<PCtx>::new(SessionParams::new::<PCtx>("sid", "default"));
        assert_eq!(a.rho(), b.rho());

        let mut params = SessionParams::new::<PCtx>("sid", "default");
        params.n_e = 128;
        let c = Challenger::<PCtx>::new(params);
        assert_ne!(a.rho(), c.rho());

        let d = Challenger::<PCtx>::new(SessionParams::new::<PCtx>("sid", "other"));
        assert_ne!(a.rho(), d.rho());
    }

    #[test]
    fn test_seed_and_challenge_are_pure() {
        let challenger = Challenger::<MCtx>::new(SessionParams::new::<MCtx>("sid", "default"));
        let data = ByteTree::node(vec![ByteTree::leaf(vec![42]), ByteTree::u32_leaf(7)]);

        assert_eq!(challenger.seed(&data), challenger.seed(&data));
        assert_eq!(
            challenger.scalar_integer(&data),
            challenger.scalar_integer(&data)
        );

        let other = ByteTree::node(vec![ByteTree::leaf(vec![43]), ByteTree::u32_leaf(7)]);
        assert_ne!(challenger.seed(&data), challenger.seed(&other));
    }

    #[test]
    fn test_challenge_respects_bit_length() {
        let mut params = SessionParams::new::<PCtx>("sid", "default");
        params.n_v = 100;
        let challenger = Challenger::<PCtx>::new(params);

        for i in 0..16u32 {
            let data = ByteTree::u32_leaf(i);
            let v = challenger.scalar_integer(&data);
            assert!(v.bits() <= 100);
        }
    }

    #[test]
    fn test_batching_vector_shape() {
        let challenger = Challenger::<PCtx>::new(SessionParams::new::<PCtx>("sid", "default"));
        let seed = challenger.seed(&ByteTree::leaf(vec![1]));

        let ints = challenger.batching_integers(&seed, 50);
        assert_eq!(ints.len(), 50);
        assert!(ints.iter().all(|e| e.bits() <= 256));

        // same seed, same vector
        assert_eq!(ints, challenger.batching_integers(&seed, 50));

        let scalars = challenger.batching_vector(&seed, 50);
        assert_eq!(scalars.len(), 50);
    }

    #[test]
    fn test_challenge_scalar_range_check() {
        let mut params = SessionParams::new::<PCtx>("sid", "default");
        params.n_v = 8;
        let challenger = Challenger::<PCtx>::new(params);

        assert!(challenger.challenge_scalar(&BigUint::from(255u32)).is_ok());
        assert!(challenger.challenge_scalar(&BigUint::from(256u32)).is_err());
    }

    #[test]
    fn test_bit_integer_masks_surplus() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        for bits in [1u32, 7, 8, 9, 100, 256, 612] {
            for _ in 0..8 {
                let value = bit_integer(&mut rng, bits);
                assert!(value.bits() <= u64::from(bits));
            }
        }
    }
}
