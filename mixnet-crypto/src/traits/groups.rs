// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Traits for cyclic groups of prime order, their elements and scalars.
//!
//! A [`CryptographicGroup`] bundles an element type, a scalar type and a
//! hash function. Elements and scalars never exist apart from their group:
//! the group is a zero-sized carrier type, so values of different groups
//! have different types and cannot be mixed (the carrier "back-reference"
//! is the type parameter itself). Length mismatches between arrays of the
//! same carrier remain runtime errors, see
//! [`arrays`][`crate::groups::arrays`].

use core::fmt::Debug;

use crate::utils::error::Error;
use crate::utils::hash::Hasher;
use crate::utils::rng;
use crate::utils::serialization::{ByteTreeReader, FSer, VSer};

/**
 * An element of a cyclic group of prime order.
 *
 * The group operation is written multiplicatively.
 */
pub trait GroupElement: Sized + Clone + Debug + PartialEq + Send + Sync {
    /// The scalar type acting on this element through
    /// [`exp`][`Self::exp`].
    type Scalar: GroupScalar;

    /// The identity element.
    fn one() -> Self;

    /// Group operation.
    fn mul(&self, other: &Self) -> Self;

    /// Group inverse.
    fn inv(&self) -> Self;

    /// Exponentiation by a scalar.
    fn exp(&self, scalar: &Self::Scalar) -> Self;

    /// Equality of elements.
    fn equals(&self, other: &Self) -> bool;

    /// A uniformly random element.
    fn random<R: rng::CRng>(rng: &mut R) -> Self;
}

/**
 * An element of the scalar field `Z_q` associated with a group of prime
 * order `q`.
 */
pub trait GroupScalar: Sized + Clone + Debug + PartialEq + Send + Sync {
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// A uniformly random scalar.
    fn random<R: rng::CRng>(rng: &mut R) -> Self;

    /// Field addition.
    fn add(&self, other: &Self) -> Self;

    /// Field subtraction.
    fn sub(&self, other: &Self) -> Self;

    /// Field multiplication.
    fn mul(&self, other: &Self) -> Self;

    /// Additive inverse.
    fn neg(&self) -> Self;

    /// Multiplicative inverse, `None` for zero.
    fn inv(&self) -> Option<Self>;

    /// Equality of scalars.
    fn equals(&self, other: &Self) -> bool;

    /// The scalar represented by a big-endian unsigned integer, reduced
    /// modulo the field order. This is how challenge and batching integers
    /// enter the field.
    fn from_be_bytes_reduced(bytes: &[u8]) -> Self;
}

/**
 * A cyclic group of prime order, usable as the carrier of the shuffle
 * proofs in [`zkp`][`crate::zkp`].
 *
 * Implementations are zero-sized types; all group parameters are static.
 */
pub trait CryptographicGroup: 'static {
    /// The group element type.
    type Element: GroupElement<Scalar = Self::Scalar> + FSer + VSer;

    /// The group scalar type.
    type Scalar: GroupScalar + FSer + VSer + From<u32>;

    /// The hash function associated with this group.
    type Hasher: Hasher;

    /// Identifier of this group; appears verbatim in the Fiat-Shamir
    /// session prefix.
    const NAME: &'static str;

    /// The distinguished generator.
    fn generator() -> Self::Element;

    /// The generator raised to the given scalar.
    fn g_exp(scalar: &Self::Scalar) -> Self::Element {
        Self::generator().exp(scalar)
    }

    /// A uniformly random element.
    fn random_element<R: rng::CRng>(rng: &mut R) -> Self::Element {
        Self::Element::random(rng)
    }

    /// A uniformly random scalar.
    fn random_scalar<R: rng::CRng>(rng: &mut R) -> Self::Scalar {
        Self::Scalar::random(rng)
    }

    /// True if `element` is a member of the prime-order group. Decoding
    /// through [`VDeserializable`][`crate::utils::serialization::VDeserializable`]
    /// only produces members; this is the check that the unsafe decoding
    /// path defers.
    fn is_member(element: &Self::Element) -> bool;

    /// Decode a single element checking syntactic validity only (field
    /// ranges, point-on-curve), without the subgroup membership check.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` / `DecodingError` if the tree is not a
    ///   syntactically valid element
    fn element_unchecked(reader: &mut ByteTreeReader<'_>) -> Result<Self::Element, Error>;

    /// Decode `n` elements from a node of `n` children. In safe mode each
    /// element's membership in the group is verified (in parallel); in
    /// unsafe mode only syntactic validity is checked and the caller
    /// commits to calling [`verify_unsafe`][`Self::verify_unsafe`] later.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` / `DecodingError` on malformed input
    fn to_element_array(
        n: usize,
        reader: &mut ByteTreeReader<'_>,
        safe: bool,
    ) -> Result<Vec<Self::Element>, Error> {
        if reader.remaining() != n {
            return Err(Error::ByteTreeError(format!(
                "expected node of {n} elements, found {}",
                reader.remaining()
            )));
        }
        let mut elements = Vec::with_capacity(n);
        for _ in 0..n {
            let mut child = reader.next_child()?;
            elements.push(Self::element_unchecked(&mut child)?);
        }
        if safe {
            Self::verify_unsafe(&elements)?;
        }
        Ok(elements)
    }

    /// Verify group membership of elements decoded through the unsafe
    /// path. Work is partitioned over a fork-join pool; the reported
    /// failure is the first one in array order.
    ///
    /// # Errors
    ///
    /// - `DecodingError` naming the index of the first non-member
    fn verify_unsafe(elements: &[Self::Element]) -> Result<(), Error> {
        use rayon::prelude::*;

        let failed = elements
            .par_iter()
            .enumerate()
            .filter(|(_, element)| !Self::is_member(element))
            .map(|(i, _)| i)
            .min();

        match failed {
            Some(i) => Err(Error::DecodingError(format!(
                "element {i} is not a group member"
            ))),
            None => Ok(()),
        }
    }

    /// Derive `count` independent generators from the session prefix.
    ///
    /// The derivation is deterministic and one-shot per session: it binds
    /// the tag `"generators"`, the prefix, and an index counter through
    /// the random oracle. No party may know discrete logarithms between
    /// the results.
    ///
    /// # Errors
    ///
    /// - `HashToElementError` if the hash-to-group primitive fails
    fn ind_generators(count: usize, prefix: &[u8]) -> Result<Vec<Self::Element>, Error>;
}

/**
 * Broadcast operations of a single element against a product of elements:
 * `self` is replicated across all components. `P` is the element product
 * and `S` the matching scalar product.
 */
pub trait ReplGroupOps<P, S> {
    /// The product type produced.
    type Output;

    /// `(self * p_0, self * p_1, ...)`
    fn repl_mul(&self, other: &P) -> Self::Output;

    /// `(self ^ s_0, self ^ s_1, ...)`
    fn repl_exp(&self, scalars: &S) -> Self::Output;

    /// True if every component equals `self`.
    fn repl_equals(&self, other: &P) -> bool;
}

/**
 * Broadcast operations of a product of elements against a single value:
 * the single value is distributed over all components.
 */
pub trait DistGroupOps<T: GroupElement> {
    /// The product type produced.
    type Output;

    /// `(p_0 * other, p_1 * other, ...)`
    fn dist_mul(&self, other: &T) -> Self::Output;

    /// `(p_0 ^ scalar, p_1 ^ scalar, ...)`
    fn dist_exp(&self, scalar: &T::Scalar) -> Self::Output;

    /// True if every component equals `other`.
    fn dist_equals(&self, other: &T) -> bool;
}

/**
 * Broadcast operations of a single scalar against a product of scalars.
 */
pub trait ReplScalarOps<P> {
    /// The product type produced.
    type Output;

    /// `(self + s_0, self + s_1, ...)`
    fn repl_add(&self, other: &P) -> Self::Output;

    /// `(self - s_0, self - s_1, ...)`
    fn repl_sub(&self, other: &P) -> Self::Output;

    /// `(self * s_0, self * s_1, ...)`
    fn repl_mul(&self, other: &P) -> Self::Output;

    /// True if every component equals `self`.
    fn repl_equals(&self, other: &P) -> bool;
}

/**
 * Broadcast operations of a product of scalars against a single scalar.
 */
pub trait DistScalarOps<T: GroupScalar> {
    /// The product type produced.
    type Output;

    /// `(s_0 + other, s_1 + other, ...)`
    fn dist_add(&self, other: &T) -> Self::Output;

    /// `(s_0 - other, s_1 - other, ...)`
    fn dist_sub(&self, other: &T) -> Self::Output;

    /// `(s_0 * other, s_1 * other, ...)`
    fn dist_mul(&self, other: &T) -> Self::Output;

    /// True if every component equals `other`.
    fn dist_equals(&self, other: &T) -> bool;
}
