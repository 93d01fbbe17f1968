// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Tests for the safe-prime group backend

use num_bigint::BigUint;

use crate::groups::modp::{ModPElement, ModPGroup, ModPParams, SafePrime2048, SafePrime512};
use crate::traits::groups::{CryptographicGroup, GroupElement, GroupScalar};
use crate::utils::rng::Rng;
use crate::utils::serialization::{
    FDeserializable, FSerializable, VDeserializable, VSerializable,
};

type G512 = ModPGroup<SafePrime512>;
type G2048 = ModPGroup<SafePrime2048>;

#[test]
fn test_group_laws_512() {
    test_group_laws::<SafePrime512>();
}

#[test]
fn test_group_laws_2048() {
    test_group_laws::<SafePrime2048>();
}

fn test_group_laws<P: ModPParams>() {
    let mut rng = rand::rngs::OsRng::rng();
    let a = ModPElement::<P>::random(&mut rng);
    let b = ModPElement::<P>::random(&mut rng);
    let c = ModPElement::<P>::random(&mut rng);
    let one = ModPElement::<P>::one();

    assert!(a.mul(&b).mul(&c).equals(&a.mul(&b.mul(&c))));
    assert!(a.mul(&one).equals(&a));
    assert!(a.mul(&a.inv()).equals(&one));

    // a^{x} * a^{y} = a^{x+y}
    let x = <ModPElement<P> as GroupElement>::Scalar::random(&mut rng);
    let y = <ModPElement<P> as GroupElement>::Scalar::random(&mut rng);
    assert!(a.exp(&x).mul(&a.exp(&y)).equals(&a.exp(&x.add(&y))));
}

#[test]
fn test_scalar_field_512() {
    let mut rng = rand::rngs::OsRng::rng();
    type S = <G512 as CryptographicGroup>::Scalar;

    let x = S::random(&mut rng);
    let y = S::random(&mut rng);

    assert!(x.add(&y).sub(&y).equals(&x));
    assert!(x.mul(&S::one()).equals(&x));
    assert!(x.add(&x.neg()).equals(&S::zero()));
    assert!(S::zero().inv().is_none());

    let inv = x.inv().unwrap();
    assert!(x.mul(&inv).equals(&S::one()));

    // reduction wraps mod q
    let q_bytes = SafePrime512::order().to_bytes_be();
    assert!(S::from_be_bytes_reduced(&q_bytes).equals(&S::zero()));
}

#[test]
fn test_element_serialization() {
    let mut rng = rand::rngs::OsRng::rng();

    let a = ModPElement::<SafePrime512>::random(&mut rng);
    let bytes = a.ser_f();
    assert_eq!(bytes.len(), SafePrime512::element_bytes());
    assert_eq!(ModPElement::<SafePrime512>::deser_f(&bytes).unwrap(), a);

    let back = ModPElement::<SafePrime512>::deser(&a.ser()).unwrap();
    assert_eq!(a, back);
}

#[test]
fn test_element_decoding_rejects_non_members() {
    // zero, p, and a non-square must all be rejected
    let width = SafePrime512::element_bytes();

    let zero = vec![0u8; width];
    assert!(ModPElement::<SafePrime512>::deser_f(&zero).is_err());

    let p_bytes = SafePrime512::modulus().to_bytes_be();
    assert!(ModPElement::<SafePrime512>::deser_f(&p_bytes).is_err());

    // 2 generates the full group for this parameter set, so it is not a
    // square (the generator of the squares is 4)
    let mut two = vec![0u8; width];
    two[width - 1] = 2;
    let err = ModPElement::<SafePrime512>::deser_f(&two);
    assert!(err.is_err());
}

#[test]
fn test_verify_unsafe_reports_first_failure() {
    let mut rng = rand::rngs::OsRng::rng();

    let mut elements: Vec<ModPElement<SafePrime512>> =
        (0..8).map(|_| ModPElement::random(&mut rng)).collect();
    assert!(G512::verify_unsafe(&elements).is_ok());

    // a generator of the full group is not a subgroup member
    let two = ModPElement::new(BigUint::from(2u32));
    elements[3] = two.clone();
    elements[6] = two;
    let err = G512::verify_unsafe(&elements).unwrap_err();
    assert!(err.to_string().contains("element 3"));
}

#[test]
fn test_to_element_array_safe_and_unsafe() {
    let mut rng = rand::rngs::OsRng::rng();

    let elements: Vec<ModPElement<SafePrime512>> =
        (0..5).map(|_| ModPElement::random(&mut rng)).collect();
    let tree = elements.to_tree();

    let safe = G512::to_element_array(5, &mut tree.reader(), true).unwrap();
    assert_eq!(safe, elements);

    let unsafe_decoded = G512::to_element_array(5, &mut tree.reader(), false).unwrap();
    assert_eq!(unsafe_decoded, elements);

    // wrong count
    assert!(G512::to_element_array(4, &mut tree.reader(), true).is_err());

    // a syntactically valid non-member passes unsafe decoding but fails
    // the safe path
    let mut trees = tree.as_node().unwrap().to_vec();
    let mut two = vec![0u8; SafePrime512::element_bytes()];
    two[SafePrime512::element_bytes() - 1] = 2;
    trees[0] = crate::utils::serialization::ByteTree::leaf(two);
    let tampered = crate::utils::serialization::ByteTree::node(trees);

    assert!(G512::to_element_array(5, &mut tampered.reader(), false).is_ok());
    assert!(G512::to_element_array(5, &mut tampered.reader(), true).is_err());
}

#[test]
fn test_ind_generators_deterministic() {
    let a = G2048::ind_generators(4, b"prefix").unwrap();
    let b = G2048::ind_generators(4, b"prefix").unwrap();
    let c = G2048::ind_generators(4, b"other prefix").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.iter().all(ModPElement::is_square));
}
