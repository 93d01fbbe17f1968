// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Group arithmetic backends, generic product groups and array algebra
//!
//! # [`modp`]
//!
//! Subgroup of squares modulo a safe prime, backed by the
//! [num-bigint](https://github.com/rust-num/num-bigint) crate. Two
//! parameter sets ship: a 512-bit group and the 2048-bit MODP group of
//! RFC 3526.
//!
//! # [`p256`]
//!
//! Group over curve P-256, backed by the [p256](https://github.com/RustCrypto/elliptic-curves/tree/master/p256) crate
//!
//! # [`productgroup`]
//!
//! Product implementations of [`GroupElement`][`crate::traits::groups::GroupElement`] and [`GroupScalar`][`crate::traits::groups::GroupScalar`],
//! and their broadcast variants [`DistGroupOps`][`crate::traits::groups::DistGroupOps`], [`ReplGroupOps`][`crate::traits::groups::ReplGroupOps`] and
//! [`DistScalarOps`][`crate::traits::groups::DistScalarOps`], [`ReplScalarOps`][`crate::traits::groups::ReplScalarOps`].
//!
//! Product groups are represented as arrays with type `[T; N]`
//!
//! # [`arrays`]
//!
//! Batched operations over slices of elements and scalars: componentwise
//! arithmetic, simultaneous multi-exponentiation, inner products,
//! cumulative products and the recurrence used by the bridging
//! commitments of the shuffle proof.

/// Batched array algebra for elements and scalars
pub mod arrays;

/// Group over the subgroup of squares modulo a safe prime
pub mod modp;

/// Group over curve P-256, backed by the [p256](https://github.com/RustCrypto/elliptic-curves/tree/master/p256) crate
pub mod p256;

/// Generic product groups for elements and scalars
pub mod productgroup;

pub use modp::ModPGroup;
pub use p256::P256Group;
