// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! CryptographicGroup implementations for the P-256 group

use p256::elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use p256::{NistP256, ProjectivePoint};
use rayon::prelude::*;

use crate::groups::p256::element::P256Element;
use crate::groups::p256::scalar::P256Scalar;
use crate::traits::groups::CryptographicGroup;
use crate::utils::error::Error;
use crate::utils::hash;
use crate::utils::serialization::{ByteTreeReader, VDeserializable};

/// Domain separation tag for independent generator derivation.
const GENERATORS_DST: &[&[u8]] = &[b"generators-p256"];

/// P-256 implementation of [`CryptographicGroup`]
pub struct P256Group;

impl CryptographicGroup for P256Group {
    type Element = P256Element;
    type Scalar = P256Scalar;
    type Hasher = hash::Hasher256;

    const NAME: &'static str = "p256";

    fn generator() -> Self::Element {
        P256Element::new(ProjectivePoint::GENERATOR)
    }

    fn g_exp(scalar: &Self::Scalar) -> Self::Element {
        // curve arithmetic
        #[allow(clippy::arithmetic_side_effects)]
        P256Element::new(ProjectivePoint::GENERATOR * scalar.0)
    }

    // The curve has prime order and cofactor 1, so on-curve implies
    // membership; decoding already rejects off-curve points.
    fn is_member(_element: &Self::Element) -> bool {
        true
    }

    fn element_unchecked(reader: &mut ByteTreeReader<'_>) -> Result<Self::Element, Error> {
        P256Element::from_tree(reader.tree())
    }

    /// # Errors
    ///
    /// - `HashToElementError` if `NistP256::hash_from_bytes` returns error
    fn ind_generators(count: usize, prefix: &[u8]) -> Result<Vec<Self::Element>, Error> {
        (0..count)
            .into_par_iter()
            .map(|i| {
                let index = u64::try_from(i).expect("index fits u64").to_be_bytes();
                let inputs: &[&[u8]] = &[b"generators", prefix, &index];
                let point = NistP256::hash_from_bytes::<ExpandMsgXmd<Self::Hasher>>(
                    inputs,
                    GENERATORS_DST,
                )
                .map_err(|e| Error::HashToElementError(e.to_string()))?;
                Ok(P256Element::new(point))
            })
            .collect()
    }
}
