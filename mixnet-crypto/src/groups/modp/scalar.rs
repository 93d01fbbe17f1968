// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupScalar implementations for safe-prime groups

use core::marker::PhantomData;

use num_bigint::BigUint;
use num_bigint::RandBigInt;
use num_traits::{One, Zero};

use crate::groups::modp::params::ModPParams;
use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{
    ByteTree, FDeserializable, FSerializable, VDeserializable, VSerializable,
};

/**
 * A [`GroupScalar`] implementation for the field `Z_q` associated with the
 * safe-prime group of parameter set `P`.
 *
 * The wrapped integer is always reduced into `[0, q)`.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPScalar<P: ModPParams> {
    value: BigUint,
    _params: PhantomData<P>,
}

impl<P: ModPParams> ModPScalar<P> {
    /// Wrap a reduced representative. Callers must guarantee `value < q`.
    pub(crate) fn new(value: BigUint) -> Self {
        debug_assert!(value < *P::order());
        ModPScalar {
            value,
            _params: PhantomData,
        }
    }

    /// The canonical integer representative in `[0, q)`.
    #[must_use]
    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

impl<P: ModPParams> GroupScalar for ModPScalar<P> {
    fn zero() -> Self {
        ModPScalar::new(BigUint::zero())
    }

    fn one() -> Self {
        ModPScalar::new(BigUint::one())
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        ModPScalar::new(rng.gen_biguint_below(P::order()))
    }

    fn add(&self, other: &Self) -> Self {
        ModPScalar::new((&self.value + &other.value) % P::order())
    }

    fn sub(&self, other: &Self) -> Self {
        ModPScalar::new((&self.value + (P::order() - &other.value)) % P::order())
    }

    fn mul(&self, other: &Self) -> Self {
        ModPScalar::new((&self.value * &other.value) % P::order())
    }

    fn neg(&self) -> Self {
        ModPScalar::new((P::order() - &self.value) % P::order())
    }

    fn inv(&self) -> Option<Self> {
        if self.value.is_zero() {
            return None;
        }
        // q is prime, so x^{q-2} is the inverse of x
        let exponent = P::order() - 2u32;
        Some(ModPScalar::new(
            self.value.modpow(&exponent, P::order()),
        ))
    }

    fn equals(&self, other: &Self) -> bool {
        self.value == other.value
    }

    fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        ModPScalar::new(BigUint::from_bytes_be(bytes) % P::order())
    }
}

impl<P: ModPParams> From<u32> for ModPScalar<P> {
    fn from(u: u32) -> ModPScalar<P> {
        ModPScalar::new(BigUint::from(u) % P::order())
    }
}

impl<P: ModPParams> FSerializable for ModPScalar<P> {
    fn size_bytes() -> usize {
        P::scalar_bytes()
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        let bytes = self.value.to_bytes_be();
        buffer.resize(buffer.len() + (P::scalar_bytes() - bytes.len()), 0);
        buffer.extend_from_slice(&bytes);
    }
}

impl<P: ModPParams> FDeserializable for ModPScalar<P> {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() != P::scalar_bytes() {
            return Err(Error::DecodingError(format!(
                "scalar of {} bytes, expected {}",
                buffer.len(),
                P::scalar_bytes()
            )));
        }
        let value = BigUint::from_bytes_be(buffer);
        if value >= *P::order() {
            return Err(Error::DecodingError(
                "scalar representative out of range".to_string(),
            ));
        }
        Ok(ModPScalar::new(value))
    }
}

impl<P: ModPParams> VSerializable for ModPScalar<P> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::leaf(self.ser_f())
    }
}

impl<P: ModPParams> VDeserializable for ModPScalar<P> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        Self::deser_f(tree.as_leaf()?)
    }
}
