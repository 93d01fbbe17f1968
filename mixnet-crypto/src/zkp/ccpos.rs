// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Commitment-consistent proof of shuffle
//!
//! Variant of the shuffle proof used with precomputation: the permutation
//! commitment `u` has been produced (and separately proved through
//! [`posc`][`crate::zkp::posc`]) before the ciphertexts arrive, so only
//! the re-encryption relation remains to be proved online. The instance
//! is `(u, w, w')` and the witness `(π, r, s)`, where `r` opens `u` and
//! `w'_i = Enc_pk(1; s_i) · w_{π^{-1}(i)}`.

use rayon::prelude::*;
use tracing::debug;

use crate::context::Context;
use crate::cryptosystem::elgamal::{Ciphertext, PublicKey};
use crate::groups::arrays::{ElementArrayOps, ScalarArrayOps};
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::DistGroupOps;
use crate::traits::groups::DistScalarOps;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::traits::groups::ReplGroupOps;
use crate::traits::groups::ReplScalarOps;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VDeserializable, VSerializable};
use crate::zkp::challenger::{bit_scalar, Challenger};
use crate::zkp::permutation::Permutation;
use crate::zkp::shuffle::{challenge_data, ciphertext_exp_prod};

/**
 * Prover and verifier for the commitment-consistent proof of shuffle.
 *
 * Unlike [`Shuffler`][`crate::zkp::shuffle::Shuffler`], which commits to a
 * permutation inside the proof, this protocol takes the permutation
 * commitment as part of the instance. Consistency with the committed
 * permutation is obtained by batching both the commitment and the input
 * ciphertexts with the same vector `e`: the verifier aggregates
 * `A = ∏ u_i^{e_i}` and `B = ∏ w_i^{e_i}` and the prover shows it can
 * open both against the permuted batching vector.
 */
pub struct CCShuffler<C: Context, const W: usize> {
    /// List of independent generators matching the size of the input ciphertexts
    h_generators: Vec<C::Element>,
    /// Public key under which the input ciphertexts are encrypted
    pk: PublicKey<C>,
}

impl<C: Context, const W: usize> CCShuffler<C, W> {
    /// Construct a `CCShuffler` with the given values.
    pub fn new(h_generators: Vec<C::Element>, pk: PublicKey<C>) -> Self {
        Self { h_generators, pk }
    }

    /// Shuffle the input ciphertexts with the previously committed
    /// permutation and prove consistency with its commitment.
    ///
    /// `pi` and `r` must be the permutation and commitment exponents that
    /// produced `u` during precomputation.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the input ciphertexts are zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    pub fn shuffle<R: CRng>(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        u: &[C::Element],
        pi: &Permutation,
        r: &[C::Scalar],
        challenger: &Challenger<C>,
        rng: &mut R,
    ) -> Result<(Vec<Ciphertext<C, W>>, CCPoSProof<C, W>), Error> {
        if ciphertexts.is_empty() {
            return Err(Error::EmptyShuffle);
        }
        if ciphertexts.len() != self.h_generators.len() {
            return Err(Error::MismatchedShuffleLength);
        }
        let n = ciphertexts.len();
        debug!(n, width = W, "commitment-consistent shuffle");

        let s: Vec<[C::Scalar; W]> = (0..n).map(|_| <[C::Scalar; W]>::random(rng)).collect();

        let w_permuted = pi.apply_inverse(ciphertexts)?;
        let s_permuted = pi.apply_inverse(&s)?;
        let shuffled: Vec<Ciphertext<C, W>> = w_permuted
            .into_par_iter()
            .zip(s_permuted.into_par_iter())
            .map(|(w, s)| w.re_encrypt(s, &self.pk.y))
            .collect();

        let proof = self.prove(ciphertexts, &shuffled, u, pi, r, &s, challenger, rng)?;
        Ok((shuffled, proof))
    }

    /// Compute a commitment-consistent proof for an explicit witness.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the instance is zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    /// - `MalformedChallenge` if the derived challenge is out of range
    #[allow(clippy::too_many_arguments)]
    #[allow(clippy::similar_names)]
    pub fn prove<R: CRng>(
        &self,
        w: &[Ciphertext<C, W>],
        wp: &[Ciphertext<C, W>],
        u: &[C::Element],
        pi: &Permutation,
        r: &[C::Scalar],
        s: &[[C::Scalar; W]],
        challenger: &Challenger<C>,
        rng: &mut R,
    ) -> Result<CCPoSProof<C, W>, Error> {
        let n = w.len();
        if n == 0 {
            return Err(Error::EmptyShuffle);
        }
        if [wp.len(), self.h_generators.len(), u.len(), pi.len(), r.len(), s.len()]
            .iter()
            .any(|len| *len != n)
        {
            return Err(Error::MismatchedShuffleLength);
        }

        let params = challenger.params();
        let g = C::generator();

        let seed = challenger.seed(&self.seed_data(u, w, wp));
        let e = challenger.batching_vector(&seed, n);
        let ipe: Vec<C::Scalar> = pi.apply_inverse(&e)?.into_iter().cloned().collect();

        // Randomizers for the openings of A and B
        let alpha = C::G::random_scalar(rng);
        let epsilon_bits = params.n_e + params.n_v + params.n_r;
        let epsilon: Vec<C::Scalar> = (0..n)
            .map(|_| bit_scalar::<C, R>(rng, epsilon_bits))
            .collect();
        let phi = <[C::Scalar; W]>::random(rng);

        // A' = g^alpha * prod h_i^{eps_i}
        let big_a_prime = g.exp(&alpha).mul(&self.h_generators.exp_prod(&epsilon)?);

        // B' = pk^{-phi} * prod w'_i^{eps_i}
        let big_b_prime =
            Ciphertext::<C, W>(ciphertext_exp_prod(wp, &epsilon)?).re_encrypt(&phi.neg(), &self.pk.y);

        let commitments = CCPoSCommitments {
            big_a_prime,
            big_b_prime,
        };

        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        let a = r.inner_product(&ipe)?;
        let f = s
            .iter()
            .zip(e.iter())
            .fold(<[C::Scalar; W]>::zero(), |acc, (s_i, e_i)| {
                acc.add(&s_i.dist_mul(e_i))
            });

        let responses = CCPoSResponses {
            k_a: v.mul(&a).add(&alpha),
            k_e_n: ipe.mul_add(&v, &epsilon)?,
            k_f: v.repl_mul(&f).add(&phi),
        };

        Ok(CCPoSProof {
            commitments,
            responses,
        })
    }

    /// The batched instance values `A = ∏ u_i^{e_i}` and
    /// `B = ∏ w_i^{e_i}`.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if `e` does not match the instance
    pub fn compute_ab(
        &self,
        u: &[C::Element],
        w: &[Ciphertext<C, W>],
        e: &[C::Scalar],
    ) -> Result<(C::Element, [[C::Element; W]; 2]), Error> {
        let big_a = u.exp_prod(e)?;
        let big_b = ciphertext_exp_prod(w, e)?;
        Ok((big_a, big_b))
    }

    /// Verify the given commitment-consistent proof.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the input ciphertexts are zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    ///
    /// Returns `true` if the proof is valid, `false` otherwise.
    pub fn verify(
        &self,
        w: &[Ciphertext<C, W>],
        wp: &[Ciphertext<C, W>],
        u: &[C::Element],
        proof: &CCPoSProof<C, W>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        self.verify_parts(w, wp, u, &proof.commitments, &proof.responses, challenger)
    }

    /// Verify a proof given as its separately stored parts. Both
    /// acceptance equations are always evaluated.
    ///
    /// # Errors
    ///
    /// See [`verify`][`Self::verify`].
    #[allow(clippy::similar_names)]
    pub fn verify_parts(
        &self,
        w: &[Ciphertext<C, W>],
        wp: &[Ciphertext<C, W>],
        u: &[C::Element],
        commitments: &CCPoSCommitments<C, W>,
        responses: &CCPoSResponses<C, W>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        let n = w.len();
        if n == 0 {
            return Err(Error::EmptyShuffle);
        }
        if [wp.len(), self.h_generators.len(), u.len(), responses.k_e_n.len()]
            .iter()
            .any(|len| *len != n)
        {
            return Err(Error::MismatchedShuffleLength);
        }

        let g = C::generator();

        let seed = challenger.seed(&self.seed_data(u, w, wp));
        let e = challenger.batching_vector(&seed, n);
        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        let (big_a, big_b) = self.compute_ab(u, w, &e)?;

        // A^v * A' == g^{k_A} * prod h_i^{k_{E,i}}
        let lhs_a = big_a.exp(&v).mul(&commitments.big_a_prime);
        let rhs_a = g
            .exp(&responses.k_a)
            .mul(&self.h_generators.exp_prod(&responses.k_e_n)?);
        let verdict_a = lhs_a.equals(&rhs_a);

        // B^v * B' == pk^{-k_F} * prod w'_i^{k_{E,i}}
        let lhs_b = big_b
            .map(|uv| uv.dist_exp(&v))
            .mul(&commitments.big_b_prime.0);
        let neg_k_f = responses.k_f.neg();
        let pk_term = [g, self.pk.y.clone()].map(|gy| gy.repl_exp(&neg_k_f));
        let rhs_b = pk_term.mul(&ciphertext_exp_prod(wp, &responses.k_e_n)?);
        let verdict_b = lhs_b.equals(&rhs_b);

        let verdict = verdict_a && verdict_b;
        debug!(n, verdict_a, verdict_b, "verified commitment-consistent proof");
        Ok(verdict)
    }

    /// Decode proof commitments, substituting identity elements for
    /// malformed input so that verification proceeds to a deterministic
    /// reject.
    #[must_use]
    pub fn decode_commitments(&self, tree: &ByteTree) -> CCPoSCommitments<C, W> {
        CCPoSCommitments::from_tree_checked(tree)
            .unwrap_or_else(|_| CCPoSCommitments::trivial())
    }

    /// Decode responses from their byte tree; `None` leads to a reject.
    #[must_use]
    pub fn decode_responses(&self, tree: &ByteTree) -> Option<CCPoSResponses<C, W>> {
        CCPoSResponses::from_tree_sized(tree, self.h_generators.len()).ok()
    }

    /// The challenge data binding the instance.
    fn seed_data(
        &self,
        u: &[C::Element],
        w: &[Ciphertext<C, W>],
        wp: &[Ciphertext<C, W>],
    ) -> ByteTree {
        ByteTree::node(vec![
            C::generator().to_tree(),
            self.h_generators.to_vec().to_tree(),
            u.to_vec().to_tree(),
            self.pk.to_tree(),
            w.to_vec().to_tree(),
            wp.to_vec().to_tree(),
        ])
    }
}

/**
 * Commitment-consistent proof of shuffle.
 */
#[derive(Debug, PartialEq, Clone)]
pub struct CCPoSProof<C: Context, const W: usize> {
    /// Proof commitments
    pub commitments: CCPoSCommitments<C, W>,
    /// Challenge responses
    pub responses: CCPoSResponses<C, W>,
}

impl<C: Context, const W: usize> VSerializable for CCPoSProof<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![self.commitments.to_tree(), self.responses.to_tree()])
    }
}

impl<C: Context, const W: usize> VDeserializable for CCPoSProof<C, W> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [commitments, responses] = children else {
            return Err(Error::ByteTreeError(format!(
                "proof node of {} children, expected 2",
                children.len()
            )));
        };
        let responses = CCPoSResponses::from_tree(responses)?;
        Ok(CCPoSProof {
            commitments: CCPoSCommitments::from_tree_checked(commitments)?,
            responses,
        })
    }
}

/// Commitments for the commitment-consistent shuffle proof
#[derive(Debug, PartialEq, Clone)]
pub struct CCPoSCommitments<C: Context, const W: usize> {
    /// Proof commitment `big_a_prime`
    pub(crate) big_a_prime: C::Element,

    /// Proof commitment `big_b_prime`
    pub(crate) big_b_prime: Ciphertext<C, W>,
}

impl<C: Context, const W: usize> CCPoSCommitments<C, W> {
    /// The all-identity commitments substituted for malformed prover
    /// messages.
    pub(crate) fn trivial() -> Self {
        CCPoSCommitments {
            big_a_prime: C::Element::one(),
            big_b_prime: Ciphertext(<[[C::Element; W]; 2]>::one()),
        }
    }

    /// Decode commitments, verifying group membership.
    pub(crate) fn from_tree_checked(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [a_prime, b_prime] = children else {
            return Err(Error::ByteTreeError(format!(
                "commitment node of {} children, expected 2",
                children.len()
            )));
        };
        Ok(CCPoSCommitments {
            big_a_prime: C::Element::from_tree(a_prime)?,
            big_b_prime: Ciphertext::from_tree(b_prime)?,
        })
    }
}

impl<C: Context, const W: usize> VSerializable for CCPoSCommitments<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.big_a_prime.to_tree(),
            self.big_b_prime.to_tree(),
        ])
    }
}

/**
 * Responses to the challenge in the commitment-consistent shuffle proof
 */
#[derive(Debug, PartialEq, Clone)]
pub struct CCPoSResponses<C: Context, const W: usize> {
    /// Response `k_a`
    pub(crate) k_a: C::Scalar,

    /// Responses `k_e_n`
    pub(crate) k_e_n: Vec<C::Scalar>,

    /// Responses `k_f`
    pub(crate) k_f: [C::Scalar; W],
}

impl<C: Context, const W: usize> CCPoSResponses<C, W> {
    /// Decode responses for an instance of size `n`.
    pub(crate) fn from_tree_sized(tree: &ByteTree, n: usize) -> Result<Self, Error> {
        let responses = Self::from_tree(tree)?;
        if responses.k_e_n.len() != n {
            return Err(Error::ByteTreeError(
                "response array of wrong length".to_string(),
            ));
        }
        Ok(responses)
    }
}

impl<C: Context, const W: usize> VSerializable for CCPoSResponses<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.k_a.to_tree(),
            self.k_e_n.to_tree(),
            self.k_f.to_tree(),
        ])
    }
}

impl<C: Context, const W: usize> VDeserializable for CCPoSResponses<C, W> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [k_a, k_e, k_f] = children else {
            return Err(Error::ByteTreeError(format!(
                "response node of {} children, expected 3",
                children.len()
            )));
        };
        Ok(CCPoSResponses {
            k_a: C::Scalar::from_tree(k_a)?,
            k_e_n: Vec::<C::Scalar>::from_tree(k_e)?,
            k_f: <[C::Scalar; W]>::from_tree(k_f)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::array;

    use super::*;
    use crate::context::ModP512Ctx as MCtx;
    use crate::context::P256Ctx as PCtx;
    use crate::cryptosystem::elgamal::KeyPair;
    use crate::zkp::challenger::SessionParams;
    use crate::zkp::permutation;
    use crate::zkp::shuffle::Shuffler;

    fn setup<C: Context, const W: usize>(
        n: usize,
    ) -> (
        KeyPair<C>,
        Vec<Ciphertext<C, W>>,
        CCShuffler<C, W>,
        Challenger<C>,
    ) {
        let mut rng = C::get_rng();
        let keypair = KeyPair::<C>::generate(&mut rng);

        let messages: Vec<[C::Element; W]> = (0..n)
            .map(|_| array::from_fn(|_| C::random_element()))
            .collect();
        let ciphertexts: Vec<Ciphertext<C, W>> = messages
            .iter()
            .map(|m| keypair.pkey.encrypt(m, &mut rng))
            .collect();

        let challenger = Challenger::<C>::new(SessionParams::new::<C>("test", "default"));
        let generators = C::G::ind_generators(n, challenger.rho()).unwrap();
        let shuffler = CCShuffler::<C, W>::new(generators, keypair.pkey.clone());

        (keypair, ciphertexts, shuffler, challenger)
    }

    #[test]
    fn test_ccpos_p256() {
        test_ccpos::<PCtx, 1>(1);
        test_ccpos::<PCtx, 1>(10);
        test_ccpos::<PCtx, 3>(5);
    }

    #[test]
    fn test_ccpos_modp() {
        test_ccpos::<MCtx, 1>(4);
        test_ccpos::<MCtx, 2>(7);
    }

    fn test_ccpos<C: Context, const W: usize>(n: usize) {
        let mut rng = C::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<C, W>(n);

        // precomputation: commit to a permutation
        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<C, _>(&pi, &shuffler.h_generators, &mut rng).unwrap();

        let (shuffled, proof) = shuffler
            .shuffle(&ciphertexts, &u, &pi, &r, &challenger, &mut rng)
            .unwrap();

        let ok = shuffler
            .verify(&ciphertexts, &shuffled, &u, &proof, &challenger)
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_ccpos_rejects_mismatched_commitment() {
        let mut rng = PCtx::get_rng();
        let n = 6;
        let (_, ciphertexts, shuffler, challenger) = setup::<PCtx, 1>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<PCtx, _>(&pi, &shuffler.h_generators, &mut rng).unwrap();

        let (shuffled, proof) = shuffler
            .shuffle(&ciphertexts, &u, &pi, &r, &challenger, &mut rng)
            .unwrap();

        // a different commitment (from another precomputation) must reject
        let pi2 = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u2, _) =
            permutation::commit::<PCtx, _>(&pi2, &shuffler.h_generators, &mut rng).unwrap();
        assert!(!shuffler
            .verify(&ciphertexts, &shuffled, &u2, &proof, &challenger)
            .unwrap());
    }

    #[test]
    fn test_ccpos_equivalence_with_pos() {
        // one witness (pi, r, s), two proofs: CCPoS accepts iff the PoS
        // built from the same witness accepts
        let mut rng = PCtx::get_rng();
        let n = 8;
        let (keypair, ciphertexts, shuffler, challenger) = setup::<PCtx, 2>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<PCtx, _>(&pi, &shuffler.h_generators, &mut rng).unwrap();
        let s: Vec<[<PCtx as Context>::Scalar; 2]> = (0..n)
            .map(|_| <[<PCtx as Context>::Scalar; 2]>::random(&mut rng))
            .collect();

        let w_permuted = pi.apply_inverse(&ciphertexts).unwrap();
        let s_permuted = pi.apply_inverse(&s).unwrap();
        let shuffled: Vec<Ciphertext<PCtx, 2>> = w_permuted
            .into_iter()
            .zip(s_permuted)
            .map(|(w, s)| w.re_encrypt(s, &keypair.pkey.y))
            .collect();

        let cc_proof = shuffler
            .prove(&ciphertexts, &shuffled, &u, &pi, &r, &s, &challenger, &mut rng)
            .unwrap();
        assert!(shuffler
            .verify(&ciphertexts, &shuffled, &u, &cc_proof, &challenger)
            .unwrap());

        let pos = Shuffler::<PCtx, 2>::new(shuffler.h_generators.clone(), keypair.pkey);
        let pos_proof = pos
            .prove(
                &ciphertexts,
                &shuffled,
                u.clone(),
                &pi,
                &r,
                &s,
                &challenger,
                &mut rng,
            )
            .unwrap();
        assert!(pos
            .verify(&ciphertexts, &shuffled, &pos_proof, &challenger)
            .unwrap());

        // mismatched u between phases rejects on both sides
        let pi2 = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u2, _) =
            permutation::commit::<PCtx, _>(&pi2, &shuffler.h_generators, &mut rng).unwrap();
        assert!(!shuffler
            .verify(&ciphertexts, &shuffled, &u2, &cc_proof, &challenger)
            .unwrap());
        let mut pos_mismatched = pos_proof.clone();
        pos_mismatched.u_n = u2;
        assert!(!pos
            .verify(&ciphertexts, &shuffled, &pos_mismatched, &challenger)
            .unwrap());
    }

    #[test]
    fn test_ccpos_serialization_and_tampering() {
        let mut rng = MCtx::get_rng();
        let n = 5;
        let (_, ciphertexts, shuffler, challenger) = setup::<MCtx, 1>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<MCtx, _>(&pi, &shuffler.h_generators, &mut rng).unwrap();
        let (shuffled, proof) = shuffler
            .shuffle(&ciphertexts, &u, &pi, &r, &challenger, &mut rng)
            .unwrap();

        let back = CCPoSProof::<MCtx, 1>::deser(&proof.ser()).unwrap();
        assert_eq!(proof, back);
        assert!(shuffler
            .verify(&ciphertexts, &shuffled, &u, &back, &challenger)
            .unwrap());

        // tampering with a response rejects
        let mut tampered = proof.clone();
        tampered.responses.k_a = tampered
            .responses
            .k_a
            .add(&<MCtx as Context>::Scalar::one());
        assert!(!shuffler
            .verify(&ciphertexts, &shuffled, &u, &tampered, &challenger)
            .unwrap());

        // malformed commitments decode to identities and reject
        let garbage = ByteTree::leaf(vec![0]);
        let substituted = shuffler.decode_commitments(&garbage);
        assert_eq!(substituted, CCPoSCommitments::trivial());
        assert!(!shuffler
            .verify_parts(
                &ciphertexts,
                &shuffled,
                &u,
                &substituted,
                &proof.responses,
                &challenger,
            )
            .unwrap());
    }
}
