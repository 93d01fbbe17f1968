// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof of shuffle of commitments
//!
//! Proves that an array of permutation commitments `u` commits to *some*
//! permutation of the independent generators `h`, without revealing it.
//! This is the offline half of the precomputation flow: once `u` is proved
//! well-formed here, the online phase only needs the cheaper
//! [commitment-consistent][`crate::zkp::ccpos`] proof.
//!
//! The protocol is the shuffle proof without its ciphertext limb: the same
//! bridging commitments and blinders, and the acceptance relations for
//! `A`, `B`, `C` and `D`.

use rayon::prelude::*;
use tracing::debug;

use crate::context::Context;
use crate::groups::arrays::{ElementArrayOps, ScalarArrayOps};
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VDeserializable, VSerializable};
use crate::zkp::challenger::{bit_scalar, Challenger};
use crate::zkp::permutation::Permutation;
use crate::zkp::shuffle::challenge_data;

/**
 * Prover and verifier for the proof of a shuffle of commitments.
 *
 * The instance is the permutation commitment array `u`; the witness is
 * the permutation `π` and the commitment exponents `r` such that
 * `u_{π(i)} = g^{r_i} · h_i`.
 */
pub struct CommitmentShuffler<C: Context> {
    /// List of independent generators matching the size of the commitment
    h_generators: Vec<C::Element>,
}

impl<C: Context> CommitmentShuffler<C> {
    /// Construct a `CommitmentShuffler` over the given generators.
    pub fn new(h_generators: Vec<C::Element>) -> Self {
        Self { h_generators }
    }

    /// The independent generators of this instance.
    pub fn h_generators(&self) -> &[C::Element] {
        &self.h_generators
    }

    /// Compute a proof of shuffle of commitments for the witness
    /// `(pi, r)` opening `u`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the instance is zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    /// - `MalformedChallenge` if the derived challenge is out of range
    #[allow(clippy::many_single_char_names)]
    #[allow(clippy::similar_names)]
    pub fn prove<R: CRng>(
        &self,
        u: &[C::Element],
        pi: &Permutation,
        r: &[C::Scalar],
        challenger: &Challenger<C>,
        rng: &mut R,
    ) -> Result<PoSCProof<C>, Error> {
        let n = u.len();
        if n == 0 {
            return Err(Error::EmptyShuffle);
        }
        if [self.h_generators.len(), pi.len(), r.len()]
            .iter()
            .any(|len| *len != n)
        {
            return Err(Error::MismatchedShuffleLength);
        }

        let params = challenger.params();
        let g = C::generator();
        let h0 = &self.h_generators[0];

        let seed = challenger.seed(&self.seed_data(u));
        let e = challenger.batching_vector(&seed, n);
        let ipe: Vec<C::Scalar> = pi.apply_inverse(&e)?.into_iter().cloned().collect();

        // Bridging commitments, as in the full shuffle proof
        let b: Vec<C::Scalar> = (0..n).map(|_| C::G::random_scalar(rng)).collect();
        let (x, d) = b.rec_lin(&ipe)?;
        let y = ipe.prods();

        let big_b_n: Vec<C::Element> = x
            .par_iter()
            .zip(y.par_iter())
            .map(|(x_i, y_i)| g.exp(x_i).mul(&h0.exp(y_i)))
            .collect();

        let alpha = C::G::random_scalar(rng);
        let beta: Vec<C::Scalar> = (0..n).map(|_| C::G::random_scalar(rng)).collect();
        let gamma = C::G::random_scalar(rng);
        let delta = C::G::random_scalar(rng);
        let epsilon_bits = params.n_e + params.n_v + params.n_r;
        let epsilon: Vec<C::Scalar> = (0..n)
            .map(|_| bit_scalar::<C, R>(rng, epsilon_bits))
            .collect();

        let big_a_prime = g.exp(&alpha).mul(&self.h_generators.exp_prod(&epsilon)?);

        let xp = x.shift_push(C::Scalar::zero());
        let yp = y.shift_push(C::Scalar::one());
        let exponent_g = beta.add(&xp.mul(&epsilon)?)?;
        let exponent_h = yp.mul(&epsilon)?;
        let big_b_prime_n: Vec<C::Element> = exponent_g
            .par_iter()
            .zip(exponent_h.par_iter())
            .map(|(e_g, e_h)| g.exp(e_g).mul(&h0.exp(e_h)))
            .collect();

        let big_c_prime = g.exp(&gamma);
        let big_d_prime = g.exp(&delta);

        let commitments = PoSCCommitments {
            big_b_n,
            big_a_prime,
            big_b_prime_n,
            big_c_prime,
            big_d_prime,
        };

        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        let a = r.inner_product(&ipe)?;
        let c = r.sum();

        let responses = PoSCResponses {
            k_a: v.mul(&a).add(&alpha),
            k_b_n: b.mul_add(&v, &beta)?,
            k_c: v.mul(&c).add(&gamma),
            k_d: v.mul(&d).add(&delta),
            k_e_n: ipe.mul_add(&v, &epsilon)?,
        };

        Ok(PoSCProof {
            commitments,
            responses,
        })
    }

    /// Verify the given proof of shuffle of commitments.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the instance is zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    ///
    /// Returns `true` if the proof is valid, `false` otherwise.
    pub fn verify(
        &self,
        u: &[C::Element],
        proof: &PoSCProof<C>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        self.verify_parts(u, &proof.commitments, &proof.responses, challenger)
    }

    /// Verify a proof given as its separately stored parts. All four
    /// acceptance equations are always evaluated.
    ///
    /// # Errors
    ///
    /// See [`verify`][`Self::verify`].
    #[allow(clippy::similar_names)]
    pub fn verify_parts(
        &self,
        u: &[C::Element],
        commitments: &PoSCCommitments<C>,
        responses: &PoSCResponses<C>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        let n = u.len();
        if n == 0 {
            return Err(Error::EmptyShuffle);
        }
        if [
            self.h_generators.len(),
            commitments.big_b_n.len(),
            commitments.big_b_prime_n.len(),
            responses.k_b_n.len(),
            responses.k_e_n.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err(Error::MismatchedShuffleLength);
        }

        let g = C::generator();
        let h0 = &self.h_generators[0];

        let seed = challenger.seed(&self.seed_data(u));
        let e = challenger.batching_vector(&seed, n);
        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        let big_a = u.exp_prod(&e)?;
        let big_c = u.prod().mul(&self.h_generators.prod().inv());
        let big_d = commitments.big_b_n[n - 1].mul(&h0.exp(&e.prod()).inv());

        // A^v * A' == g^{k_A} * prod h_i^{k_{E,i}}
        let lhs_a = big_a.exp(&v).mul(&commitments.big_a_prime);
        let rhs_a = g
            .exp(&responses.k_a)
            .mul(&self.h_generators.exp_prod(&responses.k_e_n)?);
        let verdict_a = lhs_a.equals(&rhs_a);

        // B_i^v * B'_i == g^{k_{B,i}} * shiftPush(B, h_0)_i^{k_{E,i}}
        let lhs_b = commitments
            .big_b_n
            .exp_scalar(&v)
            .mul(&commitments.big_b_prime_n)?;
        let b_shift = commitments.big_b_n.shift_push(h0.clone());
        let g_k_b: Vec<C::Element> = responses.k_b_n.par_iter().map(|k| g.exp(k)).collect();
        let rhs_b = g_k_b.mul(&b_shift.exp(&responses.k_e_n)?)?;
        let verdict_b = lhs_b.equals_all(&rhs_b);

        // C^v * C' == g^{k_C}
        let verdict_c = big_c
            .exp(&v)
            .mul(&commitments.big_c_prime)
            .equals(&g.exp(&responses.k_c));

        // D^v * D' == g^{k_D}
        let verdict_d = big_d
            .exp(&v)
            .mul(&commitments.big_d_prime)
            .equals(&g.exp(&responses.k_d));

        let verdict = verdict_a && verdict_b && verdict_c && verdict_d;
        debug!(
            n,
            verdict_a, verdict_b, verdict_c, verdict_d, "verified proof of shuffle of commitments"
        );
        Ok(verdict)
    }

    /// Decode a permutation commitment from its byte tree, substituting
    /// the trivial commitment of the identity permutation on malformed
    /// input.
    #[must_use]
    pub fn decode_permutation_commitment(&self, tree: &ByteTree) -> Vec<C::Element> {
        let n = self.h_generators.len();
        C::G::to_element_array(n, &mut tree.reader(), true)
            .unwrap_or_else(|_| self.h_generators.clone())
    }

    /// Decode proof commitments, substituting identity elements for
    /// malformed input.
    #[must_use]
    pub fn decode_commitments(&self, tree: &ByteTree) -> PoSCCommitments<C> {
        let n = self.h_generators.len();
        PoSCCommitments::from_tree_sized(tree, n).unwrap_or_else(|_| PoSCCommitments::trivial(n))
    }

    /// Decode responses from their byte tree; `None` leads to a reject.
    #[must_use]
    pub fn decode_responses(&self, tree: &ByteTree) -> Option<PoSCResponses<C>> {
        PoSCResponses::from_tree_sized(tree, self.h_generators.len()).ok()
    }

    /// The challenge data binding the instance: generator, independent
    /// generators and the permutation commitment.
    fn seed_data(&self, u: &[C::Element]) -> ByteTree {
        ByteTree::node(vec![
            C::generator().to_tree(),
            self.h_generators.to_vec().to_tree(),
            u.to_vec().to_tree(),
        ])
    }
}

/**
 * Proof of a shuffle of commitments.
 */
#[derive(Debug, PartialEq, Clone)]
pub struct PoSCProof<C: Context> {
    /// Proof commitments
    pub commitments: PoSCCommitments<C>,
    /// Challenge responses
    pub responses: PoSCResponses<C>,
}

impl<C: Context> VSerializable for PoSCProof<C> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![self.commitments.to_tree(), self.responses.to_tree()])
    }
}

impl<C: Context> VDeserializable for PoSCProof<C> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [commitments, responses] = children else {
            return Err(Error::ByteTreeError(format!(
                "proof node of {} children, expected 2",
                children.len()
            )));
        };

        let commitments = PoSCCommitments::from_tree_any(commitments)?;
        let n = commitments.big_b_n.len();
        Ok(PoSCProof {
            commitments,
            responses: PoSCResponses::from_tree_sized(responses, n)?,
        })
    }
}

/// Commitments for the proof of shuffle of commitments
#[derive(Debug, PartialEq, Clone)]
pub struct PoSCCommitments<C: Context> {
    /// Bridging commitments
    pub(crate) big_b_n: Vec<C::Element>,

    /// Proof commitment `big_a_prime`
    pub(crate) big_a_prime: C::Element,

    /// Proof commitments `big_b_prime_n`
    pub(crate) big_b_prime_n: Vec<C::Element>,

    /// Proof commitment `big_c_prime`
    pub(crate) big_c_prime: C::Element,

    /// Proof commitment `big_d_prime`
    pub(crate) big_d_prime: C::Element,
}

impl<C: Context> PoSCCommitments<C> {
    /// The all-identity commitments substituted for malformed prover
    /// messages.
    pub(crate) fn trivial(n: usize) -> Self {
        PoSCCommitments {
            big_b_n: vec![C::Element::one(); n],
            big_a_prime: C::Element::one(),
            big_b_prime_n: vec![C::Element::one(); n],
            big_c_prime: C::Element::one(),
            big_d_prime: C::Element::one(),
        }
    }

    /// Decode commitments for an instance of size `n`, verifying group
    /// membership of every element.
    pub(crate) fn from_tree_sized(tree: &ByteTree, n: usize) -> Result<Self, Error> {
        let decoded = Self::from_tree_any(tree)?;
        if decoded.big_b_n.len() != n || decoded.big_b_prime_n.len() != n {
            return Err(Error::ByteTreeError(
                "commitment arrays of wrong length".to_string(),
            ));
        }
        Ok(decoded)
    }

    /// Decode commitments inferring the instance size from the tree.
    fn from_tree_any(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [b, a_prime, b_prime, c_prime, d_prime] = children else {
            return Err(Error::ByteTreeError(format!(
                "commitment node of {} children, expected 5",
                children.len()
            )));
        };
        let n = b.as_node()?.len();

        Ok(PoSCCommitments {
            big_b_n: C::G::to_element_array(n, &mut b.reader(), true)?,
            big_a_prime: C::Element::from_tree(a_prime)?,
            big_b_prime_n: C::G::to_element_array(n, &mut b_prime.reader(), true)?,
            big_c_prime: C::Element::from_tree(c_prime)?,
            big_d_prime: C::Element::from_tree(d_prime)?,
        })
    }
}

impl<C: Context> VSerializable for PoSCCommitments<C> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.big_b_n.to_tree(),
            self.big_a_prime.to_tree(),
            self.big_b_prime_n.to_tree(),
            self.big_c_prime.to_tree(),
            self.big_d_prime.to_tree(),
        ])
    }
}

/**
 * Responses to the challenge in the proof of shuffle of commitments
 */
#[derive(Debug, PartialEq, Clone)]
pub struct PoSCResponses<C: Context> {
    /// Response `k_a`
    pub(crate) k_a: C::Scalar,

    /// Responses `k_b_n`
    pub(crate) k_b_n: Vec<C::Scalar>,

    /// Response `k_c`
    pub(crate) k_c: C::Scalar,

    /// Response `k_d`
    pub(crate) k_d: C::Scalar,

    /// Responses `k_e_n`
    pub(crate) k_e_n: Vec<C::Scalar>,
}

impl<C: Context> PoSCResponses<C> {
    /// Decode responses for an instance of size `n`.
    pub(crate) fn from_tree_sized(tree: &ByteTree, n: usize) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [k_a, k_b, k_c, k_d, k_e] = children else {
            return Err(Error::ByteTreeError(format!(
                "response node of {} children, expected 5",
                children.len()
            )));
        };

        let k_b_n = Vec::<C::Scalar>::from_tree(k_b)?;
        let k_e_n = Vec::<C::Scalar>::from_tree(k_e)?;
        if k_b_n.len() != n || k_e_n.len() != n {
            return Err(Error::ByteTreeError(
                "response arrays of wrong length".to_string(),
            ));
        }

        Ok(PoSCResponses {
            k_a: C::Scalar::from_tree(k_a)?,
            k_b_n,
            k_c: C::Scalar::from_tree(k_c)?,
            k_d: C::Scalar::from_tree(k_d)?,
            k_e_n,
        })
    }
}

impl<C: Context> VSerializable for PoSCResponses<C> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.k_a.to_tree(),
            self.k_b_n.to_tree(),
            self.k_c.to_tree(),
            self.k_d.to_tree(),
            self.k_e_n.to_tree(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModP512Ctx as MCtx;
    use crate::context::P256Ctx as PCtx;
    use crate::zkp::challenger::SessionParams;
    use crate::zkp::permutation;

    fn setup<C: Context>(n: usize) -> (CommitmentShuffler<C>, Challenger<C>) {
        let challenger = Challenger::<C>::new(SessionParams::new::<C>("test", "default"));
        let generators = C::G::ind_generators(n, challenger.rho()).unwrap();
        (CommitmentShuffler::<C>::new(generators), challenger)
    }

    #[test]
    fn test_posc_p256() {
        test_posc::<PCtx>(1);
        test_posc::<PCtx>(2);
        test_posc::<PCtx>(10);
    }

    #[test]
    fn test_posc_modp() {
        test_posc::<MCtx>(1);
        test_posc::<MCtx>(7);
    }

    fn test_posc<C: Context>(n: usize) {
        let mut rng = C::get_rng();
        let (shuffler, challenger) = setup::<C>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<C, _>(&pi, shuffler.h_generators(), &mut rng).unwrap();

        let proof = shuffler.prove(&u, &pi, &r, &challenger, &mut rng).unwrap();
        assert!(shuffler.verify(&u, &proof, &challenger).unwrap());
    }

    #[test]
    fn test_posc_rejects_invalid_commitment() {
        let mut rng = PCtx::get_rng();
        let n = 6;
        let (shuffler, challenger) = setup::<PCtx>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<PCtx, _>(&pi, shuffler.h_generators(), &mut rng).unwrap();
        let proof = shuffler.prove(&u, &pi, &r, &challenger, &mut rng).unwrap();

        // the proof does not transfer to a different commitment
        let pi2 = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u2, _) =
            permutation::commit::<PCtx, _>(&pi2, shuffler.h_generators(), &mut rng).unwrap();
        assert!(!shuffler.verify(&u2, &proof, &challenger).unwrap());

        // tampered response rejects
        let mut tampered = proof.clone();
        tampered.responses.k_d = tampered
            .responses
            .k_d
            .add(&<PCtx as Context>::Scalar::one());
        assert!(!shuffler.verify(&u, &tampered, &challenger).unwrap());
    }

    #[test]
    fn test_posc_serialization_and_substitution() {
        let mut rng = MCtx::get_rng();
        let n = 5;
        let (shuffler, challenger) = setup::<MCtx>(n);

        let pi = Permutation::random(n, challenger.params().n_r, &mut rng);
        let (u, r) =
            permutation::commit::<MCtx, _>(&pi, shuffler.h_generators(), &mut rng).unwrap();
        let proof = shuffler.prove(&u, &pi, &r, &challenger, &mut rng).unwrap();

        let back = PoSCProof::<MCtx>::deser(&proof.ser()).unwrap();
        assert_eq!(proof, back);
        assert!(shuffler.verify(&u, &back, &challenger).unwrap());

        // malformed commitment tree substitutes identities and rejects
        let garbage = ByteTree::leaf(vec![9, 9]);
        let substituted = shuffler.decode_commitments(&garbage);
        assert_eq!(substituted, PoSCCommitments::trivial(n));
        assert!(!shuffler
            .verify_parts(&u, &substituted, &proof.responses, &challenger)
            .unwrap());
    }
}
