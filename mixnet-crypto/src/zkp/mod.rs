// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Zero knowledge proofs
//!
//! # [Challenger][`crate::zkp::challenger`]
//!
//! Derives PRG seeds and integer challenges from a session-bound
//! transcript prefix. All proofs below are made non-interactive through
//! it.
//!
//! # [Permutation][`crate::zkp::permutation`]
//!
//! Uniform permutation sampling and Pedersen permutation commitments.
//!
//! # [Shuffle][`crate::zkp::shuffle`]
//!
//! Terelius-Wikstrom proof of shuffle: proves that a list of output
//! ciphertexts is a permuted re-encryption of a list of input
//! ciphertexts.
//!
//! # [Commitment-consistent shuffle][`crate::zkp::ccpos`]
//!
//! Proves the re-encryption relation against a permutation commitment
//! fixed during a precomputation phase.
//!
//! # [Shuffle of commitments][`crate::zkp::posc`]
//!
//! Proves that an array of permutation commitments commits to some
//! permutation of the independent generators; the soundness half of the
//! precomputation phase.

/// Commitment-consistent proof of shuffle.
pub mod ccpos;

/// Fiat-Shamir seed and challenge derivation.
pub mod challenger;

/// Permutation sampling and commitment.
pub mod permutation;

/// Proof of shuffle of commitments.
pub mod posc;

/// Terelius-Wikstrom proof of shuffle.
pub mod shuffle;
