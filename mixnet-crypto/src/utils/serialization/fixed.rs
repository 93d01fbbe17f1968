// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Fixed length serialization

use crate::utils::error::Error;

/**
 * A type all of whose instances serialize to byte strings of equal, fixed
 * length.
 *
 * Algebraic values (group elements, scalars) implement this; their leaf
 * payloads in byte trees are exactly these fixed-width strings, and the
 * simultaneous exponentiation code uses them as its deterministic bit
 * source. Integers are big-endian, padded to the byte length of their
 * modulus; since all encoded values are non-negative and strictly below the
 * modulus, the encoding coincides with the two's-complement encoding at
 * this width.
 */
pub trait FSerializable {
    /// The fixed byte length of the encoding.
    fn size_bytes() -> usize;

    /// Append the fixed-width encoding to `buffer`.
    fn ser_into(&self, buffer: &mut Vec<u8>);

    /// The fixed-width encoding.
    fn ser_f(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(Self::size_bytes());
        self.ser_into(&mut buffer);
        buffer
    }
}

/**
 * A type that deserializes from a fixed-width byte string.
 */
pub trait FDeserializable: Sized {
    /// Decode a value from its fixed-width encoding.
    ///
    /// # Errors
    ///
    /// - `DecodingError` if the buffer has the wrong length or does not
    ///   represent a valid instance
    fn deser_f(buffer: &[u8]) -> Result<Self, Error>;
}

/// Convenience alias for types implementing both directions.
pub trait FSer: FSerializable + FDeserializable {}
impl<T: FSerializable + FDeserializable> FSer for T {}

impl FSerializable for u32 {
    fn size_bytes() -> usize {
        4
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.to_be_bytes());
    }
}

impl FDeserializable for u32 {
    fn deser_f(buffer: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 4] = buffer
            .try_into()
            .map_err(|_| Error::DecodingError(format!("u32 from {} bytes", buffer.len())))?;
        Ok(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_fixed_round_trip() {
        let value = 0x0102_0304u32;
        let bytes = value.ser_f();
        assert_eq!(bytes.len(), u32::size_bytes());
        assert_eq!(u32::deser_f(&bytes).unwrap(), value);
        assert!(u32::deser_f(&[1, 2, 3]).is_err());
    }
}
