// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Permutation sampling, application and commitment

use num_bigint::BigUint;

use crate::context::Context;
use crate::traits::groups::{CryptographicGroup, GroupElement};
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VDeserializable, VSerializable};
use crate::zkp::challenger::bit_integer;

/**
 * A permutation and its inverse in vector form
 *
 * The vector values correspond to values in [one-line
 * notation](https://en.wikipedia.org/wiki/Permutation#One-line_notation):
 * applying the permutation moves the element at position `i` to position
 * `permutation[i]`.
 *
 * # Examples
 * ```
 * use mixnet_crypto::context::P256Ctx as Ctx;
 * use mixnet_crypto::zkp::permutation::Permutation;
 *
 * let mut rng = <Ctx as mixnet_crypto::context::Context>::get_rng();
 * let data = vec!['A', 'B', 'C', 'D', 'E'];
 * let permutation = Permutation::random(data.len(), 100, &mut rng);
 *
 * let permuted: Vec<char> = permutation.apply(&data).unwrap().into_iter().copied().collect();
 * let back: Vec<char> = permutation.apply_inverse(&permuted).unwrap().into_iter().copied().collect();
 *
 * assert_eq!(data, back);
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    /// The permutation vector.
    pub permutation: Vec<usize>,

    /// The inverse permutation vector.
    pub inverse: Vec<usize>,
}

impl Permutation {
    /// The identity permutation of the given size.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let permutation: Vec<usize> = (0..size).collect();
        let inverse = permutation.clone();
        Permutation {
            permutation,
            inverse,
        }
    }

    /// Generate a uniformly random permutation.
    ///
    /// Every index is assigned a random prefix of
    /// `n_r + 2·⌈log₂ size⌉` bits and the indices are ordered by prefix
    /// with a stable sort, so ties retain input order. By a union bound
    /// the statistical distance from the uniform distribution is at most
    /// `2^{-n_r}`.
    #[must_use]
    pub fn random<R: CRng>(size: usize, n_r: u32, rng: &mut R) -> Self {
        let bits = n_r + 2 * ceil_log2(size);

        let mut prefixed: Vec<(BigUint, usize)> = (0..size)
            .map(|index| (bit_integer(rng, bits), index))
            .collect();
        prefixed.sort_by(|a, b| a.0.cmp(&b.0));

        let permutation: Vec<usize> = prefixed.into_iter().map(|(_, index)| index).collect();
        Self::from_table(permutation)
    }

    /// Build a permutation from its vector, computing the inverse.
    fn from_table(permutation: Vec<usize>) -> Self {
        let mut inverse = vec![0usize; permutation.len()];
        for (i, v) in permutation.iter().enumerate() {
            inverse[*v] = i;
        }
        Permutation {
            permutation,
            inverse,
        }
    }

    /// The inverse of this permutation.
    #[must_use]
    pub fn inv(&self) -> Self {
        Permutation {
            permutation: self.inverse.clone(),
            inverse: self.permutation.clone(),
        }
    }

    /// The length of the permutation and inverse permutation
    #[must_use]
    pub fn len(&self) -> usize {
        // does not matter which field we choose, they are of equal size
        self.permutation.len()
    }

    /// Check if this is the empty permutation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Apply the permutation to the given slice.
    ///
    /// # Errors
    ///
    /// - `MismatchedPermutationLength` if the target slice length does not match the permutation length
    ///
    /// Returns a new vector with the permuted elements.
    pub fn apply<'a, T>(&self, target: &'a [T]) -> Result<Vec<&'a T>, Error> {
        let size = self.permutation.len();

        if target.len() != size {
            return Err(Error::MismatchedPermutationLength);
        }

        let mut permuted = vec![];
        permuted.resize_with(size, || {
            // Safe due to the above check ensuring target is not empty if size > 0
            &target[0]
        });

        // The element at original index `i` (target[i]) moves to the position `self.permutation[i]`.
        for (i, v_ref) in target.iter().enumerate() {
            permuted[self.permutation[i]] = v_ref;
        }

        Ok(permuted)
    }

    /// Apply the inverse permutation to the given slice.
    ///
    /// # Errors
    ///
    /// - `MismatchedPermutationLength` if the target slice length does not match the permutation length
    ///
    /// Returns a new vector with the permuted elements.
    pub fn apply_inverse<'a, T>(&self, target: &'a [T]) -> Result<Vec<&'a T>, Error> {
        let size = self.inverse.len();

        if target.len() != size {
            return Err(Error::MismatchedPermutationLength);
        }

        let mut permuted = vec![];
        permuted.resize_with(size, || {
            // Safe due to the above check ensuring target is not empty if size > 0
            &target[0]
        });

        // The element at original index `i` (target[i]) moves to the position `self.inverse[i]`.
        for (i, v_ref) in target.iter().enumerate() {
            permuted[self.inverse[i]] = v_ref;
        }

        Ok(permuted)
    }

    /// Decode a permutation of the given size from its byte tree.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` / `DecodingError` if the tree is not a node of
    ///   `size` 4-byte indices forming a bijection on `{0, ..., size-1}`
    pub fn from_tree_sized(size: usize, tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        if children.len() != size {
            return Err(Error::DecodingError(format!(
                "permutation of {} entries, expected {size}",
                children.len()
            )));
        }

        let mut permutation = Vec::with_capacity(size);
        let mut seen = vec![false; size];
        for child in children {
            let value = child.reader().read_int()? as usize;
            if value >= size {
                return Err(Error::DecodingError(format!(
                    "permutation index {value} out of range"
                )));
            }
            if seen[value] {
                return Err(Error::DecodingError(format!(
                    "duplicate permutation index {value}"
                )));
            }
            seen[value] = true;
            permutation.push(value);
        }
        Ok(Self::from_table(permutation))
    }
}

impl VSerializable for Permutation {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(
            self.permutation
                .iter()
                .map(|v| ByteTree::u32_leaf(u32::try_from(*v).expect("index fits u32")))
                .collect(),
        )
    }
}

impl VDeserializable for Permutation {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let size = tree.as_node()?.len();
        Permutation::from_tree_sized(size, tree)
    }
}

/**
 * Compute the Pedersen permutation commitment `u` of a permutation under
 * the independent generators `h`, with fresh commitment exponents `r`:
 * `u_{π(i)} = g^{r_i} · h_i`.
 *
 * Returns the pair `(u, r)`; `r` is part of the prover's witness and must
 * stay private.
 *
 * # Errors
 *
 * - `MismatchedPermutationLength` if `h` and the permutation differ in length
 */
pub fn commit<C: Context, R: CRng>(
    permutation: &Permutation,
    h_generators: &[C::Element],
    rng: &mut R,
) -> Result<(Vec<C::Element>, Vec<C::Scalar>), Error> {
    let g = C::generator();

    let r: Vec<C::Scalar> = (0..h_generators.len())
        .map(|_| C::G::random_scalar(rng))
        .collect();

    let committed: Vec<C::Element> = r
        .iter()
        .zip(h_generators.iter())
        .map(|(r_i, h_i)| g.exp(r_i).mul(h_i))
        .collect();

    let u: Vec<C::Element> = permutation
        .apply(&committed)?
        .into_iter()
        .cloned()
        .collect();

    Ok((u, r))
}

/// Ceiling of the base-2 logarithm, with `ceil_log2(0) = ceil_log2(1) = 0`.
fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}
