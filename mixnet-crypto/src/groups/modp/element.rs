// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupElement implementations for safe-prime groups

use core::marker::PhantomData;

use num_bigint::BigUint;
use num_bigint::RandBigInt;
use num_traits::One;
use num_traits::Zero;

use crate::groups::modp::params::ModPParams;
use crate::groups::modp::scalar::ModPScalar;
use crate::traits::groups::GroupElement;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{
    ByteTree, FDeserializable, FSerializable, VDeserializable, VSerializable,
};

/**
 * A [`GroupElement`] implementation for the subgroup of squares modulo the
 * safe prime of parameter set `P`.
 *
 * The wrapped integer is always in `[1, p)`. Values produced by
 * constructors or decoding are canonical; the subgroup membership check
 * `x^q ≡ 1 (mod p)` is performed on decoding unless explicitly deferred
 * through the unsafe array path.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPElement<P: ModPParams> {
    value: BigUint,
    _params: PhantomData<P>,
}

impl<P: ModPParams> ModPElement<P> {
    /// Wrap a canonical representative. Callers must guarantee
    /// `0 < value < p`.
    pub(crate) fn new(value: BigUint) -> Self {
        debug_assert!(!value.is_zero() && value < *P::modulus());
        ModPElement {
            value,
            _params: PhantomData,
        }
    }

    /// The canonical integer representative in `[1, p)`.
    #[must_use]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Exponentiation by a raw non-negative integer.
    pub(crate) fn exp_int(&self, exponent: &BigUint) -> Self {
        ModPElement::new(self.value.modpow(exponent, P::modulus()))
    }

    /// True if `self` lies in the prime-order subgroup of squares.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.value.modpow(P::order(), P::modulus()).is_one()
    }

    /// Decode from fixed-width bytes checking only the range `0 < v < p`.
    ///
    /// # Errors
    ///
    /// - `DecodingError` on wrong width or out-of-range value
    pub(crate) fn from_bytes_unchecked(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() != P::element_bytes() {
            return Err(Error::DecodingError(format!(
                "element of {} bytes, expected {}",
                buffer.len(),
                P::element_bytes()
            )));
        }
        let value = BigUint::from_bytes_be(buffer);
        if value.is_zero() || value >= *P::modulus() {
            return Err(Error::DecodingError(
                "element representative out of range".to_string(),
            ));
        }
        Ok(ModPElement {
            value,
            _params: PhantomData,
        })
    }
}

impl<P: ModPParams> GroupElement for ModPElement<P> {
    type Scalar = ModPScalar<P>;

    fn one() -> Self {
        ModPElement::new(BigUint::one())
    }

    fn mul(&self, other: &Self) -> Self {
        ModPElement::new((&self.value * &other.value) % P::modulus())
    }

    fn inv(&self) -> Self {
        // p is prime, so x^{p-2} is the inverse of x
        let exponent = P::modulus() - 2u32;
        self.exp_int(&exponent)
    }

    fn exp(&self, scalar: &Self::Scalar) -> Self {
        self.exp_int(scalar.value())
    }

    fn equals(&self, other: &Self) -> bool {
        self.value == other.value
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        // A uniform square: draw r uniform in [1, p) and square it.
        let upper = P::modulus() - 1u32;
        let r = rng.gen_biguint_below(&upper) + 1u32;
        ModPElement::new(r.modpow(&BigUint::from(2u32), P::modulus()))
    }
}

impl<P: ModPParams> FSerializable for ModPElement<P> {
    fn size_bytes() -> usize {
        P::element_bytes()
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        let bytes = self.value.to_bytes_be();
        buffer.resize(buffer.len() + (P::element_bytes() - bytes.len()), 0);
        buffer.extend_from_slice(&bytes);
    }
}

impl<P: ModPParams> FDeserializable for ModPElement<P> {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let element = Self::from_bytes_unchecked(buffer)?;
        if !element.is_square() {
            return Err(Error::DecodingError(
                "element is not a subgroup member".to_string(),
            ));
        }
        Ok(element)
    }
}

impl<P: ModPParams> VSerializable for ModPElement<P> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::leaf(self.ser_f())
    }
}

impl<P: ModPParams> VDeserializable for ModPElement<P> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        Self::deser_f(tree.as_leaf()?)
    }
}
