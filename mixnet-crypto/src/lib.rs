// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Cryptographic core for a verifiable mix-net

#![doc = include_str!("../README.md")]

/// Defines implementation choices for key cryptographic functionalities.
pub mod context;
pub mod cryptosystem;
pub mod groups;
/// Proof-directory layout and the standalone session verifier.
pub mod proofdir;
/// Abstractions for group arithmetic, elements and scalars.
pub mod traits;
/// Utilities such as random number generation, hashing, serialization and error handling.
pub mod utils;
pub mod zkp;
