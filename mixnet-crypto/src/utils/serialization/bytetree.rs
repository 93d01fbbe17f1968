// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! The byte tree codec
//!
//! Wire format: one tag byte (`0x00` leaf, `0x01` node), one 4-byte
//! big-endian length (byte count for a leaf, child count for a node),
//! followed by the payload. A leaf payload is an opaque byte string; a node
//! payload is the concatenation of the encodings of its children.
//!
//! The encoding is canonical: equal trees encode to equal bytes, and
//! parsing rejects any input with trailing or missing bytes. This is what
//! makes the codec usable both as proof storage and as random-oracle input.

use crate::utils::error::Error;

/// Tag byte marking a leaf.
const LEAF_TAG: u8 = 0x00;

/// Tag byte marking a node.
const NODE_TAG: u8 = 0x01;

/// Parsing rejects trees nested deeper than this.
const MAX_DEPTH: usize = 64;

/**
 * A byte tree: either a leaf carrying a byte string, or a node carrying an
 * ordered sequence of children.
 *
 * # Examples
 * ```
 * use mixnet_crypto::utils::serialization::ByteTree;
 *
 * let tree = ByteTree::node(vec![
 *     ByteTree::leaf(vec![1, 2, 3]),
 *     ByteTree::u32_leaf(7),
 * ]);
 * let bytes = tree.ser();
 * let back = ByteTree::parse(&bytes).unwrap();
 * assert_eq!(tree, back);
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteTree {
    /// A leaf carrying opaque bytes.
    Leaf(Vec<u8>),
    /// A node carrying an ordered sequence of children.
    Node(Vec<ByteTree>),
}

impl ByteTree {
    /// Construct a leaf with the given payload.
    #[must_use]
    pub fn leaf(bytes: Vec<u8>) -> Self {
        ByteTree::Leaf(bytes)
    }

    /// Construct a node with the given children.
    #[must_use]
    pub fn node(children: Vec<ByteTree>) -> Self {
        ByteTree::Node(children)
    }

    /// Construct the canonical leaf for a 32-bit integer: 4 bytes, big-endian.
    #[must_use]
    pub fn u32_leaf(value: u32) -> Self {
        ByteTree::Leaf(value.to_be_bytes().to_vec())
    }

    /// Construct the canonical leaf for a boolean list: one byte per entry,
    /// `0x01` for true and `0x00` for false.
    #[must_use]
    pub fn booleans_leaf(values: &[bool]) -> Self {
        ByteTree::Leaf(values.iter().map(|b| u8::from(*b)).collect())
    }

    /// Construct the canonical leaf for a UTF-8 string.
    #[must_use]
    pub fn string_leaf(value: &str) -> Self {
        ByteTree::Leaf(value.as_bytes().to_vec())
    }

    /// The payload of this leaf.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a node
    pub fn as_leaf(&self) -> Result<&[u8], Error> {
        match self {
            ByteTree::Leaf(bytes) => Ok(bytes),
            ByteTree::Node(_) => Err(Error::ByteTreeError("expected leaf, found node".into())),
        }
    }

    /// The children of this node.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a leaf
    pub fn as_node(&self) -> Result<&[ByteTree], Error> {
        match self {
            ByteTree::Node(children) => Ok(children),
            ByteTree::Leaf(_) => Err(Error::ByteTreeError("expected node, found leaf".into())),
        }
    }

    /// A [`ByteTreeReader`] positioned at this tree.
    #[must_use]
    pub fn reader(&self) -> ByteTreeReader<'_> {
        ByteTreeReader { tree: self, pos: 0 }
    }

    /// Serialize this tree to its canonical wire encoding.
    #[must_use]
    pub fn ser(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        self.ser_into(&mut buffer);
        buffer
    }

    /// Total byte length of the wire encoding.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            ByteTree::Leaf(bytes) => 5 + bytes.len(),
            ByteTree::Node(children) => {
                5 + children.iter().map(ByteTree::encoded_len).sum::<usize>()
            }
        }
    }

    fn ser_into(&self, buffer: &mut Vec<u8>) {
        match self {
            ByteTree::Leaf(bytes) => {
                buffer.push(LEAF_TAG);
                buffer.extend_from_slice(&u32_len(bytes.len()).to_be_bytes());
                buffer.extend_from_slice(bytes);
            }
            ByteTree::Node(children) => {
                buffer.push(NODE_TAG);
                buffer.extend_from_slice(&u32_len(children.len()).to_be_bytes());
                for child in children {
                    child.ser_into(buffer);
                }
            }
        }
    }

    /// Parse a tree from its wire encoding. The input must contain exactly
    /// one tree, with no trailing bytes.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` on an unknown tag, truncated input, trailing bytes,
    ///   or nesting deeper than an implementation bound
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let (tree, consumed) = Self::parse_at(bytes, 0, 0)?;
        if consumed != bytes.len() {
            return Err(Error::ByteTreeError(format!(
                "{} trailing bytes after tree",
                bytes.len() - consumed
            )));
        }
        Ok(tree)
    }

    /// Parse one tree starting at `offset`, returning it together with the
    /// offset one past its encoding.
    fn parse_at(bytes: &[u8], offset: usize, depth: usize) -> Result<(Self, usize), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::ByteTreeError("tree nested too deeply".into()));
        }

        let tag = *bytes
            .get(offset)
            .ok_or_else(|| Error::ByteTreeError("missing tag byte".into()))?;
        let length_bytes = bytes
            .get(offset + 1..offset + 5)
            .ok_or_else(|| Error::ByteTreeError("missing length prefix".into()))?;
        let length = u32::from_be_bytes(
            length_bytes
                .try_into()
                .expect("slice of verified length 4"),
        ) as usize;

        match tag {
            LEAF_TAG => {
                let payload = bytes.get(offset + 5..offset + 5 + length).ok_or_else(|| {
                    Error::ByteTreeError(format!("leaf payload truncated, need {length} bytes"))
                })?;
                Ok((ByteTree::Leaf(payload.to_vec()), offset + 5 + length))
            }
            NODE_TAG => {
                let mut children = Vec::with_capacity(length.min(1024));
                let mut position = offset + 5;
                for _ in 0..length {
                    let (child, next) = Self::parse_at(bytes, position, depth + 1)?;
                    children.push(child);
                    position = next;
                }
                Ok((ByteTree::Node(children), position))
            }
            other => Err(Error::ByteTreeError(format!("unknown tag byte {other:#04x}"))),
        }
    }
}

/// Converts a length to the 4-byte wire representation.
///
/// Lengths beyond `u32::MAX` cannot be represented in the wire format; they
/// are unreachable for any array this crate produces.
#[allow(clippy::cast_possible_truncation)]
fn u32_len(len: usize) -> u32 {
    debug_assert!(len <= u32::MAX as usize);
    len as u32
}

/**
 * A cursor over a parsed [`ByteTree`].
 *
 * Over a node the reader yields children in order via
 * [`next_child`][`Self::next_child`]; over a leaf it yields payload bytes
 * via [`read_bytes`][`Self::read_bytes`] and the typed readers. In both
 * cases [`remaining`][`Self::remaining`] reports what has not been
 * consumed yet.
 */
#[derive(Debug, Clone)]
pub struct ByteTreeReader<'a> {
    tree: &'a ByteTree,
    pos: usize,
}

impl<'a> ByteTreeReader<'a> {
    /// The tree this reader is positioned at.
    #[must_use]
    pub fn tree(&self) -> &'a ByteTree {
        self.tree
    }

    /// Number of unread children (node) or unread payload bytes (leaf).
    #[must_use]
    pub fn remaining(&self) -> usize {
        let total = match self.tree {
            ByteTree::Leaf(bytes) => bytes.len(),
            ByteTree::Node(children) => children.len(),
        };
        total.saturating_sub(self.pos)
    }

    /// A reader over the next child of this node.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a leaf or all children were consumed
    pub fn next_child(&mut self) -> Result<ByteTreeReader<'a>, Error> {
        let children = self.tree.as_node()?;
        let child = children
            .get(self.pos)
            .ok_or_else(|| Error::ByteTreeError("no children remaining".into()))?;
        self.pos += 1;
        Ok(child.reader())
    }

    /// Read `n` bytes from this leaf.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a node or fewer than `n` bytes remain
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let bytes = self.tree.as_leaf()?;
        let slice = bytes.get(self.pos..self.pos + n).ok_or_else(|| {
            Error::ByteTreeError(format!("leaf exhausted, wanted {n} more bytes"))
        })?;
        self.pos += n;
        Ok(slice)
    }

    /// Read a 32-bit big-endian integer from this leaf.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a node or fewer than 4 bytes remain
    pub fn read_int(&mut self) -> Result<u32, Error> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes(
            bytes.try_into().expect("slice of verified length 4"),
        ))
    }

    /// Read `n` booleans from this leaf, one byte each; any byte other than
    /// `0x00` or `0x01` is malformed.
    ///
    /// # Errors
    ///
    /// - `ByteTreeError` if this tree is a node, fewer than `n` bytes remain,
    ///   or a byte is not a valid boolean
    pub fn read_booleans(&mut self, n: usize) -> Result<Vec<bool>, Error> {
        let bytes = self.read_bytes(n)?;
        bytes
            .iter()
            .map(|b| match b {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(Error::ByteTreeError(format!(
                    "invalid boolean byte {other:#04x}"
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_round_trip() {
        let tree = ByteTree::leaf(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let bytes = tree.ser();
        assert_eq!(bytes, vec![0x00, 0, 0, 0, 4, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(ByteTree::parse(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_node_round_trip() {
        let tree = ByteTree::node(vec![
            ByteTree::leaf(vec![]),
            ByteTree::node(vec![ByteTree::u32_leaf(258)]),
            ByteTree::leaf(vec![7]),
        ]);
        let bytes = tree.ser();
        assert_eq!(ByteTree::parse(&bytes).unwrap(), tree);
        assert_eq!(bytes.len(), tree.encoded_len());
    }

    #[test]
    fn test_parse_rejects_trailing_bytes() {
        let mut bytes = ByteTree::leaf(vec![1, 2]).ser();
        bytes.push(0);
        assert!(ByteTree::parse(&bytes).is_err());
    }

    #[test]
    fn test_parse_rejects_truncation_and_bad_tag() {
        let bytes = ByteTree::leaf(vec![1, 2, 3]).ser();
        let (truncated, _) = bytes.split_at(bytes.len() - 1);
        assert!(ByteTree::parse(truncated).is_err());
        assert!(ByteTree::parse(&[0x02, 0, 0, 0, 0]).is_err());
        assert!(ByteTree::parse(&[0x00, 0, 0]).is_err());
    }

    #[test]
    fn test_parse_rejects_deep_nesting() {
        let mut tree = ByteTree::leaf(vec![]);
        for _ in 0..200 {
            tree = ByteTree::node(vec![tree]);
        }
        assert!(ByteTree::parse(&tree.ser()).is_err());
    }

    #[test]
    fn test_reader_children() {
        let tree = ByteTree::node(vec![ByteTree::u32_leaf(1), ByteTree::u32_leaf(2)]);
        let mut reader = tree.reader();
        assert_eq!(reader.remaining(), 2);

        let mut first = reader.next_child().unwrap();
        assert_eq!(first.read_int().unwrap(), 1);
        let mut second = reader.next_child().unwrap();
        assert_eq!(second.read_int().unwrap(), 2);

        assert_eq!(reader.remaining(), 0);
        assert!(reader.next_child().is_err());
    }

    #[test]
    fn test_reader_leaf_cursor() {
        let tree = ByteTree::leaf(vec![0, 0, 0, 9, 0xAA, 0xBB]);
        let mut reader = tree.reader();
        assert_eq!(reader.read_int().unwrap(), 9);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_bytes(2).unwrap(), &[0xAA, 0xBB]);
        assert!(reader.read_bytes(1).is_err());
    }

    #[test]
    fn test_reader_booleans() {
        let tree = ByteTree::booleans_leaf(&[true, false, true]);
        let values = tree.reader().read_booleans(3).unwrap();
        assert_eq!(values, vec![true, false, true]);

        let bad = ByteTree::leaf(vec![0, 2, 1]);
        assert!(bad.reader().read_booleans(3).is_err());
    }
}
