// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Group over the subgroup of squares modulo a safe prime

pub use element::ModPElement;
pub use group::ModPGroup;
pub use params::{ModPParams, SafePrime2048, SafePrime512};
pub use scalar::ModPScalar;

/// Safe-prime implementation of [`GroupElement`](crate::traits::groups::GroupElement)
pub mod element;

/// Safe-prime implementation of [`CryptographicGroup`](crate::traits::groups::CryptographicGroup)
pub mod group;

/// Safe-prime group parameter sets
pub mod params;

/// Safe-prime implementation of [`GroupScalar`](crate::traits::groups::GroupScalar)
pub mod scalar;

#[cfg(test)]
mod tests;
