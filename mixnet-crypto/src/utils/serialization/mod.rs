// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Challenge and transport serialization.
//!
//! This module defines and implements serialization traits suitable for
//! challenge generation and proof storage. All values serialize through the
//! [byte tree][`crate::utils::serialization::bytetree`] codec, a
//! self-describing binary format: a tree is either a *leaf* carrying a byte
//! string or a *node* carrying an ordered sequence of children. Two trait
//! families are defined:
//!
//! - [`variable`][`crate::utils::serialization::variable`]: types that serialize
//!   to a byte tree of content-dependent shape.
//!
//! - [`fixed`][`crate::utils::serialization::fixed`]: types whose instances all
//!   serialize to byte strings of equal and fixed length. Fixed-width
//!   encodings are what leaf payloads of algebraic values are made of, and
//!   what the batched exponentiation code uses as its bit source.
//!
//! * NOTE: Every random-oracle input passes through this codec, so the
//!   encoding of a value must be a function of its logical content alone.
//!   Changes to implementations can break challenge derivation entirely.
//!   **In particular, serialization inconsistencies can cause otherwise
//!   valid proofs to fail.**

pub use bytetree::{ByteTree, ByteTreeReader};
pub use fixed::{FDeserializable, FSer, FSerializable};
pub use variable::{VDeserializable, VSer, VSerializable};

pub mod bytetree;

#[deny(clippy::indexing_slicing)]
pub mod fixed;

#[deny(clippy::indexing_slicing)]
pub mod variable;
