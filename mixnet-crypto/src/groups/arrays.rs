// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Batched array algebra for elements and scalars
//!
//! The shuffle proofs manipulate length-`N` sequences of group elements
//! and scalars through a small operation vocabulary. This module provides
//! that vocabulary as extension traits over slices. Heavy operations
//! partition their work over a rayon fork-join pool; partitioning never
//! affects the result, which is always identical to sequential evaluation.
//!
//! Arrays are plain owned `Vec`s. The acquisition/release contract for
//! array storage is Rust ownership itself: every exit path, including
//! error paths, releases the backing storage when the vector is dropped.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::traits::groups::{GroupElement, GroupScalar};
use crate::utils::error::Error;
use crate::utils::serialization::FSerializable;

/// Number of bases processed per block of the simultaneous
/// multi-exponentiation; each block precomputes `2^WINDOW` subset products.
const WINDOW: usize = 4;

/// Batch size above which pointwise exponentiations fork.
const PAR_THRESHOLD: usize = 8;

/**
 * Batched operations over slices of group elements.
 */
pub trait ElementArrayOps<E: GroupElement> {
    /// Componentwise product of two equal-length arrays.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn mul(&self, other: &[E]) -> Result<Vec<E>, Error>;

    /// Componentwise inverse.
    fn inv(&self) -> Vec<E>;

    /// Componentwise exponentiation by an equal-length scalar array.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn exp(&self, exponents: &[E::Scalar]) -> Result<Vec<E>, Error>;

    /// Exponentiation of every component by one scalar.
    fn exp_scalar(&self, exponent: &E::Scalar) -> Vec<E>;

    /// The power product `∏ bases_i ^ exponents_i`.
    ///
    /// Computed by deterministic simultaneous multi-exponentiation; the
    /// result equals the naive left-to-right product.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn exp_prod(&self, exponents: &[E::Scalar]) -> Result<E, Error>;

    /// The product of all components (the identity for an empty array).
    fn prod(&self) -> E;

    /// Pointwise equality of two arrays; false on length mismatch.
    fn equals_all(&self, other: &[E]) -> bool;

    /// Lexicographic comparison by canonical fixed-width encodings.
    fn compare_to(&self, other: &[E]) -> Ordering;

    /// Drop the last component and prepend `head`.
    fn shift_push(&self, head: E) -> Vec<E>;
}

impl<E> ElementArrayOps<E> for [E]
where
    E: GroupElement + FSerializable,
    E::Scalar: FSerializable,
{
    fn mul(&self, other: &[E]) -> Result<Vec<E>, Error> {
        check_lengths(self.len(), other.len())?;
        Ok(self
            .par_iter()
            .zip(other.par_iter())
            .map(|(a, b)| a.mul(b))
            .collect())
    }

    fn inv(&self) -> Vec<E> {
        self.par_iter().map(GroupElement::inv).collect()
    }

    fn exp(&self, exponents: &[E::Scalar]) -> Result<Vec<E>, Error> {
        check_lengths(self.len(), exponents.len())?;
        if self.len() < PAR_THRESHOLD {
            return Ok(self
                .iter()
                .zip(exponents.iter())
                .map(|(base, exponent)| base.exp(exponent))
                .collect());
        }
        Ok(self
            .par_iter()
            .zip(exponents.par_iter())
            .map(|(base, exponent)| base.exp(exponent))
            .collect())
    }

    fn exp_scalar(&self, exponent: &E::Scalar) -> Vec<E> {
        self.par_iter().map(|base| base.exp(exponent)).collect()
    }

    fn exp_prod(&self, exponents: &[E::Scalar]) -> Result<E, Error> {
        check_lengths(self.len(), exponents.len())?;

        let partials: Vec<E> = self
            .par_chunks(WINDOW)
            .zip(exponents.par_chunks(WINDOW))
            .map(|(bases, exps)| block_exp_prod(bases, exps))
            .collect();

        Ok(partials
            .into_iter()
            .fold(E::one(), |acc, next| acc.mul(&next)))
    }

    fn prod(&self) -> E {
        self.par_iter()
            .cloned()
            .reduce(E::one, |acc, next| acc.mul(&next))
    }

    fn equals_all(&self, other: &[E]) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.equals(b))
    }

    fn compare_to(&self, other: &[E]) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            let ordering = a.ser_f().cmp(&b.ser_f());
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.len().cmp(&other.len())
    }

    fn shift_push(&self, head: E) -> Vec<E> {
        let mut shifted = Vec::with_capacity(self.len());
        shifted.push(head);
        shifted.extend_from_slice(&self[..self.len().saturating_sub(1)]);
        shifted
    }
}

/// Simultaneous exponentiation of one block of at most [`WINDOW`] bases.
///
/// Precomputes all subset products of the block, then scans the exponent
/// bits from most to least significant, squaring once per bit and
/// multiplying in the subset selected by the current bit column.
fn block_exp_prod<E>(bases: &[E], exponents: &[E::Scalar]) -> E
where
    E: GroupElement,
    E::Scalar: FSerializable,
{
    debug_assert!(!bases.is_empty() && bases.len() <= WINDOW);

    let mut table = vec![E::one(); 1 << bases.len()];
    for (j, base) in bases.iter().enumerate() {
        let stride = 1 << j;
        for mask in stride..(stride << 1) {
            table[mask] = table[mask - stride].mul(base);
        }
    }

    let exponent_bytes: Vec<Vec<u8>> = exponents.iter().map(FSerializable::ser_f).collect();
    let bits = 8 * <E::Scalar as FSerializable>::size_bytes();

    let mut acc = E::one();
    for bit in (0..bits).rev() {
        acc = acc.mul(&acc);
        let mut mask = 0usize;
        for (j, bytes) in exponent_bytes.iter().enumerate() {
            if bit_at(bytes, bit) {
                mask |= 1 << j;
            }
        }
        if mask != 0 {
            acc = acc.mul(&table[mask]);
        }
    }
    acc
}

/// Bit `index` (little-endian bit order) of a big-endian byte string.
fn bit_at(bytes: &[u8], index: usize) -> bool {
    let byte = bytes[bytes.len() - 1 - index / 8];
    (byte >> (index % 8)) & 1 == 1
}

/**
 * Batched operations over slices of scalars.
 */
pub trait ScalarArrayOps<S: GroupScalar> {
    /// Componentwise sum of two equal-length arrays.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn add(&self, other: &[S]) -> Result<Vec<S>, Error>;

    /// Componentwise product of two equal-length arrays.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn mul(&self, other: &[S]) -> Result<Vec<S>, Error>;

    /// Multiplication of every component by one scalar.
    fn mul_scalar(&self, scalar: &S) -> Vec<S>;

    /// Componentwise additive inverse.
    fn neg(&self) -> Vec<S>;

    /// The sum of all components (zero for an empty array).
    fn sum(&self) -> S;

    /// The product of all components (one for an empty array).
    fn prod(&self) -> S;

    /// The inner product `Σ self_i · other_i`.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn inner_product(&self, other: &[S]) -> Result<S, Error>;

    /// Cumulative products `(s_0, s_0·s_1, s_0·s_1·s_2, ...)`.
    fn prods(&self) -> Vec<S>;

    /// The linear recurrence `x_0 = self_0`, `x_i = self_i + e_i·x_{i-1}`,
    /// returned together with its last value.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    /// - `EmptyArray` if the arrays are empty
    fn rec_lin(&self, e: &[S]) -> Result<(Vec<S>, S), Error>;

    /// `v·self + other`, componentwise.
    ///
    /// # Errors
    ///
    /// - `MismatchedArrayLengths` if lengths differ
    fn mul_add(&self, v: &S, other: &[S]) -> Result<Vec<S>, Error>;

    /// Drop the last component and prepend `head`.
    fn shift_push(&self, head: S) -> Vec<S>;
}

impl<S: GroupScalar> ScalarArrayOps<S> for [S] {
    fn add(&self, other: &[S]) -> Result<Vec<S>, Error> {
        check_lengths(self.len(), other.len())?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| a.add(b))
            .collect())
    }

    fn mul(&self, other: &[S]) -> Result<Vec<S>, Error> {
        check_lengths(self.len(), other.len())?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| a.mul(b))
            .collect())
    }

    fn mul_scalar(&self, scalar: &S) -> Vec<S> {
        self.iter().map(|a| a.mul(scalar)).collect()
    }

    fn neg(&self) -> Vec<S> {
        self.iter().map(GroupScalar::neg).collect()
    }

    fn sum(&self) -> S {
        self.iter().fold(S::zero(), |acc, next| acc.add(next))
    }

    fn prod(&self) -> S {
        self.iter().fold(S::one(), |acc, next| acc.mul(next))
    }

    fn inner_product(&self, other: &[S]) -> Result<S, Error> {
        check_lengths(self.len(), other.len())?;
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(S::zero(), |acc, (a, b)| acc.add(&a.mul(b))))
    }

    fn prods(&self) -> Vec<S> {
        let mut cumulative = Vec::with_capacity(self.len());
        let mut acc = S::one();
        for value in self {
            acc = acc.mul(value);
            cumulative.push(acc.clone());
        }
        cumulative
    }

    fn rec_lin(&self, e: &[S]) -> Result<(Vec<S>, S), Error> {
        check_lengths(self.len(), e.len())?;
        let first = self.first().ok_or(Error::EmptyArray)?;

        let mut x = Vec::with_capacity(self.len());
        x.push(first.clone());
        for i in 1..self.len() {
            let chained = self[i].add(&e[i].mul(&x[i - 1]));
            x.push(chained);
        }
        let last = x[x.len() - 1].clone();
        Ok((x, last))
    }

    fn mul_add(&self, v: &S, other: &[S]) -> Result<Vec<S>, Error> {
        check_lengths(self.len(), other.len())?;
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| v.mul(a).add(b))
            .collect())
    }

    fn shift_push(&self, head: S) -> Vec<S> {
        let mut shifted = Vec::with_capacity(self.len());
        shifted.push(head);
        shifted.extend_from_slice(&self[..self.len().saturating_sub(1)]);
        shifted
    }
}

fn check_lengths(a: usize, b: usize) -> Result<(), Error> {
    if a == b {
        Ok(())
    } else {
        Err(Error::MismatchedArrayLengths(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::context::ModP512Ctx as MCtx;
    use crate::context::P256Ctx as PCtx;
    use crate::traits::groups::CryptographicGroup;
    use crate::utils::error::ErrorKind;

    #[test]
    fn test_element_array_ops_p256() {
        test_element_array_ops::<PCtx>();
    }

    #[test]
    fn test_element_array_ops_modp() {
        test_element_array_ops::<MCtx>();
    }

    #[test]
    fn test_scalar_array_ops_p256() {
        test_scalar_array_ops::<PCtx>();
    }

    #[test]
    fn test_scalar_array_ops_modp() {
        test_scalar_array_ops::<MCtx>();
    }

    #[test]
    fn test_exp_prod_matches_naive_p256() {
        test_exp_prod_matches_naive::<PCtx>();
    }

    #[test]
    fn test_exp_prod_matches_naive_modp() {
        test_exp_prod_matches_naive::<MCtx>();
    }

    fn random_elements<C: Context>(n: usize) -> Vec<C::Element> {
        let mut rng = C::get_rng();
        (0..n).map(|_| C::G::random_element(&mut rng)).collect()
    }

    fn random_scalars<C: Context>(n: usize) -> Vec<C::Scalar> {
        let mut rng = C::get_rng();
        (0..n).map(|_| C::G::random_scalar(&mut rng)).collect()
    }

    fn test_element_array_ops<C: Context>() {
        use crate::traits::groups::GroupElement;

        let xs = random_elements::<C>(9);
        let ys = random_elements::<C>(9);
        let es = random_scalars::<C>(9);

        let products = xs.mul(&ys).unwrap();
        for i in 0..xs.len() {
            assert!(products[i].equals(&xs[i].mul(&ys[i])));
        }

        let powers = xs.exp(&es).unwrap();
        for i in 0..xs.len() {
            assert!(powers[i].equals(&xs[i].exp(&es[i])));
        }

        let ones = xs.mul(&xs.inv()).unwrap();
        assert!(ones.iter().all(|x| x.equals(&C::Element::one())));

        let shifted = xs.shift_push(C::Element::one());
        assert!(shifted[0].equals(&C::Element::one()));
        assert!(shifted[1..].equals_all(&xs[..xs.len() - 1]));

        assert_eq!(xs.compare_to(&xs), std::cmp::Ordering::Equal);
        assert_ne!(xs.compare_to(&ys), std::cmp::Ordering::Equal);

        let err = xs.mul(&ys[..5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
    }

    fn test_scalar_array_ops<C: Context>() {
        use crate::traits::groups::GroupScalar;

        let a = random_scalars::<C>(7);
        let b = random_scalars::<C>(7);
        let v = C::random_scalar();

        let sums = a.add(&b).unwrap();
        for i in 0..a.len() {
            assert!(sums[i].equals(&a[i].add(&b[i])));
        }

        // inner product matches the fold
        let expected = a
            .iter()
            .zip(b.iter())
            .fold(C::Scalar::zero(), |acc, (x, y)| acc.add(&x.mul(y)));
        assert!(a.inner_product(&b).unwrap().equals(&expected));

        // cumulative products
        let cumulative = a.prods();
        let mut acc = C::Scalar::one();
        for i in 0..a.len() {
            acc = acc.mul(&a[i]);
            assert!(cumulative[i].equals(&acc));
        }
        assert!(cumulative[a.len() - 1].equals(&a.prod()));

        // recurrence: x_0 = a_0, x_i = a_i + e_i * x_{i-1}
        let e = random_scalars::<C>(7);
        let (x, d) = a.rec_lin(&e).unwrap();
        assert!(x[0].equals(&a[0]));
        for i in 1..a.len() {
            assert!(x[i].equals(&a[i].add(&e[i].mul(&x[i - 1]))));
        }
        assert!(d.equals(&x[a.len() - 1]));

        // mul_add
        let k = a.mul_add(&v, &b).unwrap();
        for i in 0..a.len() {
            assert!(k[i].equals(&v.mul(&a[i]).add(&b[i])));
        }

        let empty: Vec<C::Scalar> = vec![];
        assert!(empty.rec_lin(&[]).is_err());
    }

    fn test_exp_prod_matches_naive<C: Context>() {
        use crate::traits::groups::GroupElement;

        for n in [1usize, 2, 3, 4, 5, 9, 33] {
            let bases = random_elements::<C>(n);
            let exps = random_scalars::<C>(n);

            let fast = bases.exp_prod(&exps).unwrap();
            let naive = bases
                .iter()
                .zip(exps.iter())
                .fold(C::Element::one(), |acc, (b, e)| acc.mul(&b.exp(e)));

            assert!(fast.equals(&naive), "exp_prod mismatch at n = {n}");
        }
    }
}
