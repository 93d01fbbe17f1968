// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupElement implementations for the P-256 group

use p256::elliptic_curve::group::Group;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::Field;
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};

use crate::groups::p256::scalar::P256Scalar;
use crate::traits::groups::GroupElement;
use crate::utils::error::Error;
use crate::utils::rng;
use crate::utils::serialization::{
    ByteTree, FDeserializable, FSerializable, VDeserializable, VSerializable,
};

/// Byte length of one affine coordinate.
const COORDINATE_BYTES: usize = 32;

/// Reserved coordinate encoding for the identity element.
const IDENTITY_COORDINATE: [u8; COORDINATE_BYTES] = [0xFF; COORDINATE_BYTES];

/**
 * A [`GroupElement`] implementation for the P-256 group.
 *
 * The group has prime order and cofactor 1, so every on-curve point is a
 * member. Elements encode as their two fixed-width affine coordinates; the
 * identity, which has no affine representation, uses the reserved
 * all-`0xFF` coordinate pair.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct P256Element(pub ProjectivePoint);

impl P256Element {
    /// Create a new `P256Element` from a p256 [ProjectivePoint](https://docs.rs/p256/latest/p256/struct.ProjectivePoint.html).
    #[must_use]
    pub fn new(point: ProjectivePoint) -> Self {
        P256Element(point)
    }
}

impl GroupElement for P256Element {
    type Scalar = P256Scalar;

    fn one() -> Self {
        P256Element(ProjectivePoint::IDENTITY)
    }

    fn mul(&self, other: &Self) -> Self {
        // curve arithmetic
        #[allow(clippy::arithmetic_side_effects)]
        P256Element(self.0 + other.0)
    }

    fn inv(&self) -> Self {
        // curve arithmetic
        #[allow(clippy::arithmetic_side_effects)]
        P256Element(-self.0)
    }

    fn exp(&self, scalar: &Self::Scalar) -> Self {
        // curve arithmetic
        #[allow(clippy::arithmetic_side_effects)]
        P256Element(self.0 * scalar.0)
    }

    fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        // The generator has full group order, so a uniform exponent gives
        // a uniform element.
        let k = Scalar::random(&mut *rng);
        #[allow(clippy::arithmetic_side_effects)]
        P256Element(ProjectivePoint::GENERATOR * k)
    }
}

impl FSerializable for P256Element {
    fn size_bytes() -> usize {
        2 * COORDINATE_BYTES
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        if bool::from(self.0.is_identity()) {
            buffer.extend_from_slice(&IDENTITY_COORDINATE);
            buffer.extend_from_slice(&IDENTITY_COORDINATE);
            return;
        }

        let encoded = self.0.to_affine().to_encoded_point(false);
        let x = encoded.x().expect("non-identity point has coordinates");
        let y = encoded.y().expect("non-identity point has coordinates");
        buffer.extend_from_slice(x);
        buffer.extend_from_slice(y);
    }
}

impl FDeserializable for P256Element {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() != 2 * COORDINATE_BYTES {
            return Err(Error::DecodingError(format!(
                "element of {} bytes, expected {}",
                buffer.len(),
                2 * COORDINATE_BYTES
            )));
        }
        let (x, y) = buffer.split_at(COORDINATE_BYTES);

        if x == IDENTITY_COORDINATE && y == IDENTITY_COORDINATE {
            return Ok(P256Element(ProjectivePoint::IDENTITY));
        }

        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(x),
            FieldBytes::from_slice(y),
            false,
        );
        let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        point
            .map(|affine| P256Element(ProjectivePoint::from(affine)))
            .ok_or_else(|| Error::DecodingError("point not on curve".to_string()))
    }
}

impl VSerializable for P256Element {
    fn to_tree(&self) -> ByteTree {
        let bytes = self.ser_f();
        let (x, y) = bytes.split_at(COORDINATE_BYTES);
        ByteTree::node(vec![
            ByteTree::leaf(x.to_vec()),
            ByteTree::leaf(y.to_vec()),
        ])
    }
}

impl VDeserializable for P256Element {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        if children.len() != 2 {
            return Err(Error::ByteTreeError(format!(
                "element node of {} children, expected 2",
                children.len()
            )));
        }
        let x = children[0].as_leaf()?;
        let y = children[1].as_leaf()?;
        if x.len() != COORDINATE_BYTES || y.len() != COORDINATE_BYTES {
            return Err(Error::DecodingError(
                "coordinate leaf of wrong width".to_string(),
            ));
        }

        let mut buffer = Vec::with_capacity(2 * COORDINATE_BYTES);
        buffer.extend_from_slice(x);
        buffer.extend_from_slice(y);
        Self::deser_f(&buffer)
    }
}
