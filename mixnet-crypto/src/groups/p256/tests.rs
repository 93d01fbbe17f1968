// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Tests for the P-256 group backend

use crate::groups::p256::{P256Element, P256Group, P256Scalar};
use crate::traits::groups::{CryptographicGroup, GroupElement, GroupScalar};
use crate::utils::rng::Rng;
use crate::utils::serialization::{
    ByteTree, FDeserializable, FSerializable, VDeserializable, VSerializable,
};

#[test]
fn test_group_laws() {
    let mut rng = rand::rngs::OsRng::rng();

    let a = P256Element::random(&mut rng);
    let b = P256Element::random(&mut rng);
    let c = P256Element::random(&mut rng);
    let one = P256Element::one();

    assert!(a.mul(&b).mul(&c).equals(&a.mul(&b.mul(&c))));
    assert!(a.mul(&one).equals(&a));
    assert!(a.mul(&a.inv()).equals(&one));

    let x = P256Scalar::random(&mut rng);
    let y = P256Scalar::random(&mut rng);
    assert!(a.exp(&x).mul(&a.exp(&y)).equals(&a.exp(&x.add(&y))));
}

#[test]
fn test_scalar_field() {
    let mut rng = rand::rngs::OsRng::rng();

    let x = P256Scalar::random(&mut rng);
    let y = P256Scalar::random(&mut rng);

    assert!(x.add(&y).sub(&y).equals(&x));
    assert!(x.add(&x.neg()).equals(&P256Scalar::zero()));
    assert!(P256Scalar::zero().inv().is_none());
    assert!(x.mul(&x.inv().unwrap()).equals(&P256Scalar::one()));

    // reduction of a 512-bit integer stays consistent with field ops
    let wide = [0xABu8; 64];
    let reduced = P256Scalar::from_be_bytes_reduced(&wide);
    let round = P256Scalar::deser_f(&reduced.ser_f()).unwrap();
    assert!(reduced.equals(&round));
}

#[test]
fn test_element_serialization() {
    let mut rng = rand::rngs::OsRng::rng();

    let a = P256Element::random(&mut rng);
    let bytes = a.ser_f();
    assert_eq!(bytes.len(), P256Element::size_bytes());
    assert_eq!(P256Element::deser_f(&bytes).unwrap(), a);

    let back = P256Element::deser(&a.ser()).unwrap();
    assert_eq!(a, back);
}

#[test]
fn test_identity_encoding_round_trip() {
    let one = P256Element::one();
    let bytes = one.ser_f();
    assert!(bytes.iter().all(|b| *b == 0xFF));
    assert_eq!(P256Element::deser_f(&bytes).unwrap(), one);
    assert_eq!(P256Element::deser(&one.ser()).unwrap(), one);
}

#[test]
fn test_decoding_rejects_off_curve_points() {
    // (1, 1) is not on P-256
    let mut buffer = vec![0u8; 64];
    buffer[31] = 1;
    buffer[63] = 1;
    assert!(P256Element::deser_f(&buffer).is_err());

    let tree = ByteTree::node(vec![
        ByteTree::leaf(buffer[..32].to_vec()),
        ByteTree::leaf(buffer[32..].to_vec()),
    ]);
    assert!(P256Element::from_tree(&tree).is_err());
}

#[test]
fn test_ind_generators_deterministic() {
    let a = P256Group::ind_generators(5, b"prefix").unwrap();
    let b = P256Group::ind_generators(5, b"prefix").unwrap();
    let c = P256Group::ind_generators(5, b"another").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);

    // pairwise distinct, none the identity or the standard generator
    for (i, g) in a.iter().enumerate() {
        assert!(!g.equals(&P256Element::one()));
        assert!(!g.equals(&P256Group::generator()));
        for h in &a[..i] {
            assert!(!g.equals(h));
        }
    }
}
