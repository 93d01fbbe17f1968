// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Public key cryptosystems.
//!
//! # [`ElGamal`][`crate::cryptosystem::elgamal`]
//!
//! The `ElGamal` cryptosystem over a [context][`crate::context::Context`]
//! group, with ciphertexts of arbitrary width. Re-encryption — multiplying
//! a ciphertext by an encryption of the identity — is what the
//! [shuffle][`crate::zkp::shuffle`] applies between permutations.

/// `ElGamal` cryptosystem.
pub mod elgamal;
