// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Variable length serialization through byte trees

use crate::utils::error::Error;
use crate::utils::serialization::bytetree::ByteTree;

/**
 * A type that serializes to a byte tree.
 *
 * The tree must be a function of the value's logical content alone; see the
 * [module notes][`crate::utils::serialization`] on why this matters.
 */
pub trait VSerializable {
    /// The canonical byte tree for this value.
    fn to_tree(&self) -> ByteTree;

    /// The canonical wire encoding for this value.
    fn ser(&self) -> Vec<u8> {
        self.to_tree().ser()
    }
}

/**
 * A type that deserializes from a byte tree.
 *
 * Decoding performs full validation: a returned value is always a valid
 * instance (for group elements this includes subgroup membership). Partial
 * or deferred validation is available only through
 * [`CryptographicGroup::to_element_array`][`crate::traits::groups::CryptographicGroup::to_element_array`].
 */
pub trait VDeserializable: Sized {
    /// Decode a value from its canonical byte tree.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if the tree has the wrong shape
    /// - `DecodingError` if the payload does not represent a valid instance
    fn from_tree(tree: &ByteTree) -> Result<Self, Error>;

    /// Decode a value from its canonical wire encoding.
    ///
    /// # Errors
    ///
    /// See [`from_tree`][`Self::from_tree`] and [`ByteTree::parse`].
    fn deser(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_tree(&ByteTree::parse(bytes)?)
    }
}

/// Convenience alias for types implementing both directions.
pub trait VSer: VSerializable + VDeserializable {}
impl<T: VSerializable + VDeserializable> VSer for T {}

impl VSerializable for u32 {
    fn to_tree(&self) -> ByteTree {
        ByteTree::u32_leaf(*self)
    }
}

impl VDeserializable for u32 {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let bytes = tree.as_leaf()?;
        let bytes: [u8; 4] = bytes
            .try_into()
            .map_err(|_| Error::ByteTreeError(format!("u32 leaf of {} bytes", bytes.len())))?;
        Ok(u32::from_be_bytes(bytes))
    }
}

impl VSerializable for String {
    fn to_tree(&self) -> ByteTree {
        ByteTree::string_leaf(self)
    }
}

impl VDeserializable for String {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let bytes = tree.as_leaf()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::ByteTreeError(format!("invalid utf-8 leaf: {e}")))
    }
}

impl<T: VSerializable> VSerializable for Vec<T> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(self.iter().map(VSerializable::to_tree).collect())
    }
}

impl<T: VDeserializable> VDeserializable for Vec<T> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        tree.as_node()?.iter().map(T::from_tree).collect()
    }
}

impl<T: VSerializable, const N: usize> VSerializable for [T; N] {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(self.iter().map(VSerializable::to_tree).collect())
    }
}

impl<T: VDeserializable, const N: usize> VDeserializable for [T; N] {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        if children.len() != N {
            return Err(Error::ByteTreeError(format!(
                "expected node of {N} children, found {}",
                children.len()
            )));
        }
        let items: Vec<T> = children.iter().map(T::from_tree).collect::<Result<_, _>>()?;
        Ok(items
            .try_into()
            .unwrap_or_else(|_| unreachable!("length checked above")))
    }
}
