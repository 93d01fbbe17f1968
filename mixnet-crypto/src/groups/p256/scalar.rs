// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupScalar implementations for P-256 group

use std::ops::Neg;
use std::sync::OnceLock;

use num_bigint::BigUint;
use p256::elliptic_curve::{Field, PrimeField};
use p256::{FieldBytes, Scalar};

use crate::traits::groups::GroupScalar;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{
    ByteTree, FDeserializable, FSerializable, VDeserializable, VSerializable,
};

/// The group order as an integer, for reductions of oracle-derived values.
fn order() -> &'static BigUint {
    static ORDER: OnceLock<BigUint> = OnceLock::new();
    ORDER.get_or_init(|| {
        BigUint::parse_bytes(
            b"FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
            16,
        )
        .expect("valid order constant")
    })
}

/**
 * A [`GroupScalar`] implementation for the P-256 group.
 */
#[derive(Debug, Clone, Copy)]
pub struct P256Scalar(pub Scalar);

impl P256Scalar {
    /// Create a new `P256Scalar` from a p256 [Scalar](https://docs.rs/p256/latest/p256/struct.Scalar.html).
    #[must_use]
    pub fn new(scalar: Scalar) -> Self {
        P256Scalar(scalar)
    }
}

#[allow(clippy::arithmetic_side_effects)]
impl GroupScalar for P256Scalar {
    fn zero() -> Self {
        P256Scalar(Scalar::ZERO)
    }

    fn one() -> Self {
        P256Scalar(Scalar::ONE)
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        P256Scalar(Scalar::random(&mut *rng))
    }

    fn add(&self, other: &Self) -> Self {
        P256Scalar(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        P256Scalar(self.0 - other.0)
    }

    fn mul(&self, other: &Self) -> Self {
        P256Scalar(self.0 * other.0)
    }

    fn neg(&self) -> Self {
        P256Scalar(self.0.neg())
    }

    fn inv(&self) -> Option<Self> {
        // p256::Scalar::invert returns a CtOption<Scalar>
        let inverted = self.0.invert();
        if inverted.is_some().into() {
            Some(P256Scalar(inverted.unwrap()))
        } else {
            None
        }
    }

    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        let reduced = BigUint::from_bytes_be(bytes) % order();
        let reduced_bytes = reduced.to_bytes_be();

        let mut repr = [0u8; 32];
        repr[32 - reduced_bytes.len()..].copy_from_slice(&reduced_bytes);

        let scalar = Scalar::from_repr(FieldBytes::from(repr));
        P256Scalar(Option::from(scalar).expect("reduced value is canonical"))
    }
}

impl From<u32> for P256Scalar {
    fn from(u: u32) -> P256Scalar {
        let scalar: Scalar = u.into();

        P256Scalar(scalar)
    }
}

impl PartialEq for P256Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
impl Eq for P256Scalar {}

impl FSerializable for P256Scalar {
    fn size_bytes() -> usize {
        32
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        let bytes = self.0.to_bytes();
        buffer.extend_from_slice(&bytes);
    }
}

impl FDeserializable for P256Scalar {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let bytes = <[u8; 32]>::try_from(buffer).map_err(|_| {
            Error::DecodingError(format!("scalar of {} bytes, expected 32", buffer.len()))
        })?;

        let scalar = Scalar::from_repr(bytes.into()).map(P256Scalar);
        if scalar.is_some().into() {
            Ok(scalar.expect("scalar.is_some() == true"))
        } else {
            Err(Error::DecodingError(
                "scalar representative out of range".to_string(),
            ))
        }
    }
}

impl VSerializable for P256Scalar {
    fn to_tree(&self) -> ByteTree {
        ByteTree::leaf(self.ser_f())
    }
}

impl VDeserializable for P256Scalar {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        Self::deser_f(tree.as_leaf()?)
    }
}
