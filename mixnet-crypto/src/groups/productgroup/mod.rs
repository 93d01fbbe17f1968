// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Product implementations of [`GroupElement`](crate::traits::groups::GroupElement)
//! and [`GroupScalar`](crate::traits::groups::GroupScalar).
//!
//! A product group `G^k` is represented as the array type `[T; k]`; all
//! operations apply componentwise, and the broadcast traits
//! [`DistGroupOps`](crate::traits::groups::DistGroupOps) /
//! [`ReplGroupOps`](crate::traits::groups::ReplGroupOps) (and their scalar
//! counterparts) cover the mixed single/product shapes. The byte tree of a
//! product value is a node holding the trees of its components in order.
//! Ciphertexts of width `w` live in `(G^w)^2`, so no code in this crate
//! distinguishes width 1 from width `w`.

/// Componentwise element implementations for `[T; N]`.
pub mod element;

/// Componentwise scalar implementations for `[T; N]`.
pub mod scalar;

#[cfg(test)]
mod tests;
