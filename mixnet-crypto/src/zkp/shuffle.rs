// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Shuffler for the Terelius-Wikstrom proof of shuffle

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
use crate::zkp::permutation::{self, Permutation};

/**
 * Shuffler for the Terelius-Wikstrom proof of shuffle
 *
 * Given a list of ciphertexts `w = w_1, w_2 .. w_N` encrypted under public
 * key `pk`, the function [`shuffle`][`Self::shuffle`]:
 *
 * - Re-encrypts and permutes the ciphertexts producing a list `w' = w'_1, w'_2 .. w'_N`
 * - Computes a corresponding proof of shuffle
 *
 * Conversely, given lists of ciphertexts `w` and `w'` encrypted under
 * public key `pk` and a proof of shuffle, the function
 * [`verify`][`Self::verify`] checks the proof.
 *
 * The proof requires `N` independent generators of the group that prover
 * and verifier must derive from the session prefix; these `h_generators`
 * and the public key `pk` are passed to the `Shuffler` constructor. All
 * challenges come from the [`Challenger`], so both parties must hold
 * challengers built from the same session parameters.
 *
 * # Examples
 * ```
 * use mixnet_crypto::context::{Context, P256Ctx as Ctx};
 * use mixnet_crypto::cryptosystem::elgamal::{Ciphertext, KeyPair};
 * use mixnet_crypto::traits::groups::CryptographicGroup;
 * use mixnet_crypto::zkp::challenger::{Challenger, SessionParams};
 * use mixnet_crypto::zkp::shuffle::Shuffler;
 *
 * const W: usize = 2;
 *
 * let mut rng = Ctx::get_rng();
 * let keypair: KeyPair<Ctx> = KeyPair::generate(&mut rng);
 *
 * let messages: Vec<[_; W]> = (0..3)
 *     .map(|_| std::array::from_fn(|_| Ctx::random_element()))
 *     .collect();
 * let ciphertexts: Vec<Ciphertext<Ctx, W>> = messages
 *     .iter()
 *     .map(|m| keypair.pkey.encrypt(m, &mut rng))
 *     .collect();
 *
 * let challenger = Challenger::<Ctx>::new(SessionParams::new::<Ctx>("doc", "default"));
 * let generators = <Ctx as Context>::G::ind_generators(3, challenger.rho()).unwrap();
 *
 * let shuffler = Shuffler::<Ctx, W>::new(generators, keypair.pkey);
 * let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();
 *
 * let ok = shuffler.verify(&ciphertexts, &shuffled, &proof, &challenger).unwrap();
 * assert!(ok);
 * ```
 */
pub struct Shuffler<C: Context, const W: usize> {
    /// List of independent generators matching the size of the input ciphertexts
    h_generators: Vec<C::Element>,
    /// Public key under which the input ciphertexts are encrypted
    pk: PublicKey<C>,
}

impl<C: Context, const W: usize> Shuffler<C, W> {
    /// Construct a Shuffler with the given values.
    pub fn new(h_generators: Vec<C::Element>, pk: PublicKey<C>) -> Self {
        Self { h_generators, pk }
    }

    /// The independent generators of this instance.
    pub fn h_generators(&self) -> &[C::Element] {
        &self.h_generators
    }

    /// Shuffle the input ciphertexts and compute a corresponding proof.
    ///
    /// The input ciphertexts are re-encrypted with fresh exponents and
    /// permuted with a fresh permutation, both drawn from `rng`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the input ciphertexts are zero length
    /// - `MismatchedShuffleLength` on a length mismatch between ciphertexts and generators
    ///
    /// Returns the shuffled ciphertexts of width `W` and the proof of shuffle.
    pub fn shuffle<R: CRng>(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        challenger: &Challenger<C>,
        rng: &mut R,
    ) -> Result<(Vec<Ciphertext<C, W>>, ShuffleProof<C, W>), Error> {
        if ciphertexts.is_empty() {
            return Err(Error::EmptyShuffle);
        }
        if ciphertexts.len() != self.h_generators.len() {
            return Err(Error::MismatchedShuffleLength);
        }
        let n = ciphertexts.len();
        debug!(n, width = W, "shuffling ciphertexts");

        let pi = Permutation::random(n, challenger.params().n_r, rng);
        let (u, r) = permutation::commit::<C, R>(&pi, &self.h_generators, rng)?;

        let s: Vec<[C::Scalar; W]> = (0..n).map(|_| <[C::Scalar; W]>::random(rng)).collect();

        let w_permuted = pi.apply_inverse(ciphertexts)?;
        let s_permuted = pi.apply_inverse(&s)?;
        let shuffled: Vec<Ciphertext<C, W>> = w_permuted
            .into_par_iter()
            .zip(s_permuted.into_par_iter())
            .map(|(w, s)| w.re_encrypt(s, &self.pk.y))
            .collect();

        let proof = self.prove(ciphertexts, &shuffled, u, &pi, &r, &s, challenger, rng)?;

        Ok((shuffled, proof))
    }

    /// Compute a proof of shuffle for an explicit witness.
    ///
    /// The witness consists of the permutation `pi`, the commitment
    /// exponents `r` opening the permutation commitment `u`, and the
    /// re-encryption exponents `s` relating `w` to `wp`.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the instance is zero length
    /// - `MismatchedShuffleLength` on any length mismatch
    /// - `MalformedChallenge` if the derived challenge is out of range
    #[allow(clippy::too_many_arguments)]
    #[allow(clippy::many_single_char_names)]
    #[allow(clippy::similar_names)]
    pub fn prove<R: CRng>(
        &self,
        w: &[Ciphertext<C, W>],
        wp: &[Ciphertext<C, W>],
        u: Vec<C::Element>,
        pi: &Permutation,
        r: &[C::Scalar],
        s: &[[C::Scalar; W]],
        challenger: &Challenger<C>,
        rng: &mut R,
    ) -> Result<ShuffleProof<C, W>, Error> {
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
        let h0 = &self.h_generators[0];

        // Batching vector e and its inverse permutation e'
        let seed = challenger.seed(&self.seed_data(&u, w, wp));
        let e = challenger.batching_vector(&seed, n);
        let ipe: Vec<C::Scalar> = pi.apply_inverse(&e)?.into_iter().cloned().collect();

        // Bridging commitments B_i = g^{x_i} * h_0^{y_i} where x follows
        // the recurrence over b and e', and y holds the cumulative
        // products of e'.
        let b: Vec<C::Scalar> = (0..n).map(|_| C::G::random_scalar(rng)).collect();
        let (x, d) = b.rec_lin(&ipe)?;
        let y = ipe.prods();

        let big_b_n: Vec<C::Element> = x
            .par_iter()
            .zip(y.par_iter())
            .map(|(x_i, y_i)| g.exp(x_i).mul(&h0.exp(y_i)))
            .collect();

        // Proof commitments. The blinders for e' have bounded bit length;
        // everything else is uniform in the field.
        let alpha = C::G::random_scalar(rng);
        let beta: Vec<C::Scalar> = (0..n).map(|_| C::G::random_scalar(rng)).collect();
        let gamma = C::G::random_scalar(rng);
        let delta = C::G::random_scalar(rng);
        let epsilon_bits = params.n_e + params.n_v + params.n_r;
        let epsilon: Vec<C::Scalar> = (0..n)
            .map(|_| bit_scalar::<C, R>(rng, epsilon_bits))
            .collect();
        let phi = <[C::Scalar; W]>::random(rng);

        // A' = g^alpha * prod h_i^{eps_i}
        let big_a_prime = g.exp(&alpha).mul(&self.h_generators.exp_prod(&epsilon)?);

        // B'_i = g^{beta_i + x'_i eps_i} * h_0^{y'_i eps_i}, with x', y'
        // the shifted recurrences (B'_0 opens against B_0 = h_0).
        let xp = x.shift_push(C::Scalar::zero());
        let yp = y.shift_push(C::Scalar::one());
        let exponent_g = beta.add(&xp.mul(&epsilon)?)?;
        let exponent_h = yp.mul(&epsilon)?;
        let big_b_prime_n: Vec<C::Element> = exponent_g
            .par_iter()
            .zip(exponent_h.par_iter())
            .map(|(e_g, e_h)| g.exp(e_g).mul(&h0.exp(e_h)))
            .collect();

        // C' = g^gamma, D' = g^delta
        let big_c_prime = g.exp(&gamma);
        let big_d_prime = g.exp(&delta);

        // F' = pk^{-phi} * prod w'_i^{eps_i}
        let wp_epsilon = ciphertext_exp_prod(wp, &epsilon)?;
        let big_f_prime = Ciphertext::<C, W>(wp_epsilon).re_encrypt(&phi.neg(), &self.pk.y);

        let commitments = ShuffleCommitments {
            big_b_n,
            big_a_prime,
            big_b_prime_n,
            big_c_prime,
            big_d_prime,
            big_f_prime,
        };

        // Challenge
        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        // Responses
        let a = r.inner_product(&ipe)?;
        let c = r.sum();
        let f = s
            .iter()
            .zip(e.iter())
            .fold(<[C::Scalar; W]>::zero(), |acc, (s_i, e_i)| {
                acc.add(&s_i.dist_mul(e_i))
            });

        let k_a = v.mul(&a).add(&alpha);
        let k_b_n = b.mul_add(&v, &beta)?;
        let k_c = v.mul(&c).add(&gamma);
        let k_d = v.mul(&d).add(&delta);
        let k_e_n = ipe.mul_add(&v, &epsilon)?;
        let k_f = v.repl_mul(&f).add(&phi);

        let responses = ShuffleResponses {
            k_a,
            k_b_n,
            k_c,
            k_d,
            k_e_n,
            k_f,
        };

        Ok(ShuffleProof {
            u_n: u,
            commitments,
            responses,
        })
    }

    /// Verify the given proof of shuffle with respect to the original and
    /// shuffled ciphertexts.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the input ciphertexts are zero length
    /// - `MismatchedShuffleLength` on a length mismatch between the
    ///   ciphertext lists, the generators, or the proof arrays
    ///
    /// Returns `true` if the proof is valid, `false` otherwise.
    pub fn verify(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        shuffled: &[Ciphertext<C, W>],
        proof: &ShuffleProof<C, W>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        self.verify_parts(
            ciphertexts,
            shuffled,
            &proof.u_n,
            &proof.commitments,
            &proof.responses,
            challenger,
        )
    }

    /// Verify a proof given as its separately stored parts (permutation
    /// commitment, proof commitments, responses).
    ///
    /// All five acceptance equations are always evaluated; the verdict
    /// never short-circuits, so a transcript yields the same verdict and
    /// the same intermediate values on every run.
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
        commitments: &ShuffleCommitments<C, W>,
        responses: &ShuffleResponses<C, W>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        let n = w.len();
        if n == 0 {
            return Err(Error::EmptyShuffle);
        }
        if [
            wp.len(),
            self.h_generators.len(),
            u.len(),
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

        let seed = challenger.seed(&self.seed_data(u, w, wp));
        let e = challenger.batching_vector(&seed, n);
        let v_int = challenger.scalar_integer(&challenge_data(&seed, &commitments.to_tree()));
        let v = challenger.challenge_scalar(&v_int)?;

        // Batched instance values
        let big_a = u.exp_prod(&e)?;
        let big_f = ciphertext_exp_prod(w, &e)?;
        let big_c = u.prod().mul(&self.h_generators.prod().inv());
        let big_d = commitments.big_b_n[n - 1].mul(&h0.exp(&e.prod()).inv());

        // A^v * A' == g^{k_A} * prod h_i^{k_{E,i}}
        let lhs_a = big_a.exp(&v).mul(&commitments.big_a_prime);
        let rhs_a = g.exp(&responses.k_a).mul(&self.h_generators.exp_prod(&responses.k_e_n)?);
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

        // F^v * F' == pk^{-k_F} * prod w'_i^{k_{E,i}}
        let lhs_f = big_f
            .map(|uv| uv.dist_exp(&v))
            .mul(&commitments.big_f_prime.0);
        let neg_k_f = responses.k_f.neg();
        let pk_term = [g, self.pk.y.clone()].map(|gy| gy.repl_exp(&neg_k_f));
        let rhs_f = pk_term.mul(&ciphertext_exp_prod(wp, &responses.k_e_n)?);
        let verdict_f = lhs_f.equals(&rhs_f);

        let verdict = verdict_a && verdict_b && verdict_c && verdict_d && verdict_f;
        debug!(
            n,
            verdict_a, verdict_b, verdict_c, verdict_d, verdict_f, "verified proof of shuffle"
        );
        Ok(verdict)
    }

    /// Decode a permutation commitment from its byte tree.
    ///
    /// A malformed or non-member commitment is replaced by the trivial
    /// commitment of the identity permutation (the generators
    /// themselves), so verification proceeds deterministically and
    /// rejects.
    #[must_use]
    pub fn decode_permutation_commitment(&self, tree: &ByteTree) -> Vec<C::Element> {
        let n = self.h_generators.len();
        C::G::to_element_array(n, &mut tree.reader(), true)
            .unwrap_or_else(|_| self.h_generators.clone())
    }

    /// Decode proof commitments from their byte tree.
    ///
    /// Malformed input is replaced, in every field, by identity elements;
    /// the transcript is still consumed in full and verification then
    /// rejects.
    #[must_use]
    pub fn decode_commitments(&self, tree: &ByteTree) -> ShuffleCommitments<C, W> {
        let n = self.h_generators.len();
        ShuffleCommitments::from_tree_sized(tree, n)
            .unwrap_or_else(|_| ShuffleCommitments::trivial(n))
    }

    /// Decode responses from their byte tree; `None` leads to a reject.
    #[must_use]
    pub fn decode_responses(&self, tree: &ByteTree) -> Option<ShuffleResponses<C, W>> {
        ShuffleResponses::from_tree_sized(tree, self.h_generators.len()).ok()
    }

    /// The challenge data binding the instance: generator, independent
    /// generators, permutation commitment, public key and both ciphertext
    /// lists.
    fn seed_data(&self, u: &[C::Element], w: &[Ciphertext<C, W>], wp: &[Ciphertext<C, W>]) -> ByteTree {
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

/// The challenge data for the second round: the PRG seed and the prover
/// commitments.
pub(crate) fn challenge_data(seed: &[u8], commitments: &ByteTree) -> ByteTree {
    ByteTree::node(vec![ByteTree::leaf(seed.to_vec()), commitments.clone()])
}

/// Componentwise power product over a list of ciphertexts:
/// `∏ cts_i ^ exps_i` in `(G^W)^2`.
pub(crate) fn ciphertext_exp_prod<C: Context, const W: usize>(
    ciphertexts: &[Ciphertext<C, W>],
    exponents: &[C::Scalar],
) -> Result<[[C::Element; W]; 2], Error> {
    if ciphertexts.len() != exponents.len() {
        return Err(Error::MismatchedArrayLengths(
            ciphertexts.len(),
            exponents.len(),
        ));
    }

    let mut parts: Vec<[C::Element; W]> = Vec::with_capacity(2);
    for part in 0..2 {
        let mut components: Vec<C::Element> = Vec::with_capacity(W);
        for slot in 0..W {
            let bases: Vec<C::Element> = ciphertexts
                .iter()
                .map(|ct| ct.0[part][slot].clone())
                .collect();
            components.push(bases.exp_prod(exponents)?);
        }
        parts.push(components.try_into().expect("components.len() == W"));
    }
    Ok(parts.try_into().expect("parts.len() == 2"))
}

/**
 * Terelius-Wikstrom proof of shuffle.
 *
 * Given lists of ciphertexts `w` and `w'` encrypted under public key `pk`,
 * proves that `w'` is a permutation of re-encryptions of `w`. Equivalently,
 * the list of plaintexts corresponding to `w'` is a permutation of the
 * plaintexts corresponding to `w`.
 *
 * The permutation commitment, the proof commitments and the responses are
 * held as separate parts because they are stored, transported and hashed
 * separately.
 */
#[derive(Debug, PartialEq, Clone)]
pub struct ShuffleProof<C: Context, const W: usize> {
    /// Pedersen permutation commitment
    pub u_n: Vec<C::Element>,
    /// Proof commitments
    pub commitments: ShuffleCommitments<C, W>,
    /// Challenge responses
    pub responses: ShuffleResponses<C, W>,
}

impl<C: Context, const W: usize> VSerializable for ShuffleProof<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.u_n.to_tree(),
            self.commitments.to_tree(),
            self.responses.to_tree(),
        ])
    }
}

impl<C: Context, const W: usize> VDeserializable for ShuffleProof<C, W> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [u, commitments, responses] = children else {
            return Err(Error::ByteTreeError(format!(
                "proof node of {} children, expected 3",
                children.len()
            )));
        };
        let n = u.as_node()?.len();

        Ok(ShuffleProof {
            u_n: C::G::to_element_array(n, &mut u.reader(), true)?,
            commitments: ShuffleCommitments::from_tree_sized(commitments, n)?,
            responses: ShuffleResponses::from_tree_sized(responses, n)?,
        })
    }
}

/// Commitments for the shuffle proof
///
/// Includes the bridging commitments and the proof commitments.
#[derive(Debug, PartialEq, Clone)]
pub struct ShuffleCommitments<C: Context, const W: usize> {
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

    /// Proof commitment `big_f_prime`
    pub(crate) big_f_prime: Ciphertext<C, W>,
}

impl<C: Context, const W: usize> ShuffleCommitments<C, W> {
    /// The all-identity commitments substituted for malformed prover
    /// messages.
    pub(crate) fn trivial(n: usize) -> Self {
        ShuffleCommitments {
            big_b_n: vec![C::Element::one(); n],
            big_a_prime: C::Element::one(),
            big_b_prime_n: vec![C::Element::one(); n],
            big_c_prime: C::Element::one(),
            big_d_prime: C::Element::one(),
            big_f_prime: Ciphertext(<[[C::Element; W]; 2]>::one()),
        }
    }

    /// Decode commitments for an instance of size `n`, verifying group
    /// membership of every element.
    pub(crate) fn from_tree_sized(tree: &ByteTree, n: usize) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [b, a_prime, b_prime, c_prime, d_prime, f_prime] = children else {
            return Err(Error::ByteTreeError(format!(
                "commitment node of {} children, expected 6",
                children.len()
            )));
        };

        Ok(ShuffleCommitments {
            big_b_n: C::G::to_element_array(n, &mut b.reader(), true)?,
            big_a_prime: C::Element::from_tree(a_prime)?,
            big_b_prime_n: C::G::to_element_array(n, &mut b_prime.reader(), true)?,
            big_c_prime: C::Element::from_tree(c_prime)?,
            big_d_prime: C::Element::from_tree(d_prime)?,
            big_f_prime: Ciphertext::from_tree(f_prime)?,
        })
    }
}

impl<C: Context, const W: usize> VSerializable for ShuffleCommitments<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.big_b_n.to_tree(),
            self.big_a_prime.to_tree(),
            self.big_b_prime_n.to_tree(),
            self.big_c_prime.to_tree(),
            self.big_d_prime.to_tree(),
            self.big_f_prime.to_tree(),
        ])
    }
}

/**
 * Responses to the challenge in the shuffle proof
 */
#[derive(Debug, PartialEq, Clone)]
pub struct ShuffleResponses<C: Context, const W: usize> {
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

    /// Responses `k_f`
    pub(crate) k_f: [C::Scalar; W],
}

impl<C: Context, const W: usize> ShuffleResponses<C, W> {
    /// Decode responses for an instance of size `n`.
    pub(crate) fn from_tree_sized(tree: &ByteTree, n: usize) -> Result<Self, Error> {
        let children = tree.as_node()?;
        let [k_a, k_b, k_c, k_d, k_e, k_f] = children else {
            return Err(Error::ByteTreeError(format!(
                "response node of {} children, expected 6",
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

        Ok(ShuffleResponses {
            k_a: C::Scalar::from_tree(k_a)?,
            k_b_n,
            k_c: C::Scalar::from_tree(k_c)?,
            k_d: C::Scalar::from_tree(k_d)?,
            k_e_n,
            k_f: <[C::Scalar; W]>::from_tree(k_f)?,
        })
    }
}

impl<C: Context, const W: usize> VSerializable for ShuffleResponses<C, W> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![
            self.k_a.to_tree(),
            self.k_b_n.to_tree(),
            self.k_c.to_tree(),
            self.k_d.to_tree(),
            self.k_e_n.to_tree(),
            self.k_f.to_tree(),
        ])
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

    fn setup<C: Context, const W: usize>(
        n: usize,
    ) -> (
        KeyPair<C>,
        Vec<Ciphertext<C, W>>,
        Shuffler<C, W>,
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
        let shuffler = Shuffler::<C, W>::new(generators, keypair.pkey.clone());

        (keypair, ciphertexts, shuffler, challenger)
    }

    #[test]
    fn test_shuffle_p256() {
        test_shuffle::<PCtx, 1>(1);
        test_shuffle::<PCtx, 1>(2);
        test_shuffle::<PCtx, 1>(10);
        test_shuffle::<PCtx, 3>(3);
        test_shuffle::<PCtx, 3>(10);
    }

    #[test]
    fn test_shuffle_p256_large() {
        test_shuffle::<PCtx, 1>(100);
    }

    #[test]
    fn test_shuffle_modp() {
        test_shuffle::<MCtx, 1>(1);
        test_shuffle::<MCtx, 1>(3);
        test_shuffle::<MCtx, 2>(10);
    }

    #[test]
    fn test_shuffle_modp_large() {
        test_shuffle::<MCtx, 1>(100);
    }

    fn test_shuffle<C: Context, const W: usize>(n: usize) {
        let mut rng = C::get_rng();
        let (keypair, ciphertexts, shuffler, challenger) = setup::<C, W>(n);

        let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();
        let ok = shuffler
            .verify(&ciphertexts, &shuffled, &proof, &challenger)
            .unwrap();
        assert!(ok);

        // the multiset of plaintexts is preserved
        let mut original: Vec<Vec<u8>> = ciphertexts
            .iter()
            .map(|c| keypair.decrypt(c).to_vec().ser())
            .collect();
        let mut decrypted: Vec<Vec<u8>> = shuffled
            .iter()
            .map(|c| keypair.decrypt(c).to_vec().ser())
            .collect();
        original.sort();
        decrypted.sort();
        assert_eq!(original, decrypted);
    }

    #[test]
    fn test_shuffle_invalid_p256() {
        test_shuffle_invalid::<PCtx, 2>();
    }

    #[test]
    fn test_shuffle_invalid_modp() {
        test_shuffle_invalid::<MCtx, 2>();
    }

    fn test_shuffle_invalid<C: Context, const W: usize>() {
        let mut rng = C::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<C, W>(10);

        let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();
        assert!(shuffler
            .verify(&ciphertexts, &shuffled, &proof, &challenger)
            .unwrap());

        // against unrelated inputs the proof fails
        let (_, other, _, _) = setup::<C, W>(10);
        assert!(!shuffler.verify(&other, &shuffled, &proof, &challenger).unwrap());

        // mismatched lengths are an error, not a reject
        let err = shuffler.verify(&ciphertexts[1..], &shuffled, &proof, &challenger);
        assert!(err.is_err());

        // swapping two output ciphertexts must reject
        let mut swapped = shuffled.clone();
        swapped.swap(0, 1);
        assert!(!shuffler
            .verify(&ciphertexts, &swapped, &proof, &challenger)
            .unwrap());
    }

    #[test]
    fn test_shuffle_session_binding() {
        let mut rng = PCtx::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<PCtx, 3>(5);

        let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();

        // a challenger for another session must reject the proof
        let other = Challenger::<PCtx>::new(SessionParams::new::<PCtx>("test", "other"));
        assert!(!shuffler
            .verify(&ciphertexts, &shuffled, &proof, &other)
            .unwrap());
    }

    #[test]
    fn test_shuffle_tampered_responses() {
        let mut rng = PCtx::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<PCtx, 1>(6);

        let (shuffled, mut proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();

        proof.responses.k_c = proof.responses.k_c.add(&<PCtx as Context>::Scalar::one());
        assert!(!shuffler
            .verify(&ciphertexts, &shuffled, &proof, &challenger)
            .unwrap());
    }

    #[test]
    fn test_shuffle_serialization() {
        let mut rng = MCtx::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<MCtx, 3>(4);

        let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();

        let proof_back = ShuffleProof::<MCtx, 3>::deser(&proof.ser()).unwrap();
        assert_eq!(proof, proof_back);

        let shuffled_back =
            Vec::<Ciphertext<MCtx, 3>>::deser(&shuffled.ser()).unwrap();
        assert!(shuffler
            .verify(&ciphertexts, &shuffled_back, &proof_back, &challenger)
            .unwrap());
    }

    #[test]
    fn test_decode_with_identity_substitution() {
        let mut rng = PCtx::get_rng();
        let (_, ciphertexts, shuffler, challenger) = setup::<PCtx, 1>(4);

        let (shuffled, proof) = shuffler.shuffle(&ciphertexts, &challenger, &mut rng).unwrap();

        // a garbage commitment tree decodes to the trivial commitments
        let garbage = ByteTree::leaf(vec![1, 2, 3]);
        let substituted = shuffler.decode_commitments(&garbage);
        assert_eq!(substituted, ShuffleCommitments::trivial(4));

        // and the resulting transcript verifies to reject, not error
        let verdict = shuffler
            .verify_parts(
                &ciphertexts,
                &shuffled,
                &proof.u_n,
                &substituted,
                &proof.responses,
                &challenger,
            )
            .unwrap();
        assert!(!verdict);

        // a malformed permutation commitment falls back to the trivial
        // commitment of the identity permutation
        let fallback = shuffler.decode_permutation_commitment(&garbage);
        assert!(fallback.equals_all(shuffler.h_generators()));
    }

    #[test]
    fn test_empty_shuffle() {
        let (_, _, shuffler, challenger) = setup::<PCtx, 1>(3);
        let mut rng = PCtx::get_rng();
        let empty: Vec<Ciphertext<PCtx, 1>> = vec![];
        assert!(shuffler.shuffle(&empty, &challenger, &mut rng).is_err());
    }
}
