// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Error type for this library

use thiserror::Error;

/**
 * Coarse classification of errors.
 *
 * Decode failures are recoverable for a verifier (they lead to identity
 * substitution or a `MalformedInput` verdict), whereas arithmetic and
 * protocol errors indicate a bug or a misbehaving caller and must never be
 * swallowed by this crate.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed byte tree, wrong length, out-of-range integer, point not on curve.
    Format,
    /// Mismatched array lengths or values from incompatible carriers.
    Arithmetic,
    /// A witness or challenge violates the protocol preconditions.
    Protocol,
}

/**
 * Error type for the mixnet-crypto crate.
 *
 * This error type is used to represent all possible errors that can occur
 * within this crate.
 */
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed byte tree input for [`crate::utils::serialization`] functionality
    #[error("byte tree: {0}")]
    ByteTreeError(String),

    /// A value failed to decode as a group element, scalar or permutation
    #[error("decoding: {0}")]
    DecodingError(String),

    /// A session file in a proof directory is missing or unreadable
    #[error("proof directory: {0}")]
    SessionFileError(String),

    /// Filesystem access to a proof directory failed
    #[error("io: {0}")]
    IoError(#[from] std::io::Error),

    /// Occurs when two arrays of different lengths are combined
    #[error("mismatched array lengths: {0} != {1}")]
    MismatchedArrayLengths(usize, usize),

    /// Occurs when an operation requires a non-empty array
    #[error("empty array")]
    EmptyArray,

    /// Occurs when a permutation is applied to a slice of mismatched length
    #[error("mismatched permutation length")]
    MismatchedPermutationLength,

    /// Occurs when shuffling zero ciphertexts
    #[error("empty shuffle")]
    EmptyShuffle,

    /// Occurs when there is a length mismatch in shuffle data
    #[error("mismatched shuffle length")]
    MismatchedShuffleLength,

    /// Occurs when a Fiat-Shamir challenge is out of range
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// Occurs when a prover witness does not satisfy the claimed relation shape
    #[error("invalid witness: {0}")]
    InvalidWitness(String),

    /// Occurs when hashing to a curve point fails
    #[error("hash to element: {0}")]
    HashToElementError(String),
}

impl Error {
    /// The [`ErrorKind`] this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ByteTreeError(_)
            | Error::DecodingError(_)
            | Error::SessionFileError(_)
            | Error::IoError(_)
            | Error::HashToElementError(_) => ErrorKind::Format,
            Error::MismatchedArrayLengths(_, _)
            | Error::EmptyArray
            | Error::MismatchedPermutationLength
            | Error::MismatchedShuffleLength => ErrorKind::Arithmetic,
            Error::EmptyShuffle | Error::MalformedChallenge(_) | Error::InvalidWitness(_) => {
                ErrorKind::Protocol
            }
        }
    }

    /// True if this error is recoverable at a decode boundary (verifier side).
    #[must_use]
    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::ByteTreeError("bad tag".into()).kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Error::MismatchedArrayLengths(2, 3).kind(),
            ErrorKind::Arithmetic
        );
        assert_eq!(
            Error::MalformedChallenge("negative".into()).kind(),
            ErrorKind::Protocol
        );
        assert!(Error::DecodingError("x".into()).is_format());
        assert!(!Error::EmptyShuffle.is_format());
    }
}
