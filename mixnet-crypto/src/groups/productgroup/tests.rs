// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Tests for product group implementations

use crate::context::Context;
use crate::context::ModP512Ctx as MCtx;
use crate::context::P256Ctx as PCtx;
use crate::traits::groups::{DistGroupOps, GroupElement, GroupScalar, ReplGroupOps};
use crate::utils::serialization::{VDeserializable, VSerializable};

#[test]
fn test_product_ops_p256() {
    test_product_ops::<PCtx>();
}

#[test]
fn test_product_ops_modp() {
    test_product_ops::<MCtx>();
}

#[test]
fn test_product_serialization_p256() {
    test_product_serialization::<PCtx>();
}

#[test]
fn test_product_serialization_modp() {
    test_product_serialization::<MCtx>();
}

fn test_product_ops<C: Context>() {
    let mut rng = C::get_rng();

    let es = <[C::Element; 3]>::random(&mut rng);
    let rs = <[C::Scalar; 3]>::random(&mut rng);

    // componentwise exponentiation matches the base operation
    let es_rs = es.exp(&rs);
    for i in 0..3 {
        assert!(es_rs[i].equals(&es[i].exp(&rs[i])));
    }

    // replicated exponentiation of the generator
    let g = C::generator();
    let g_rs = g.repl_exp(&rs);
    for i in 0..3 {
        assert!(g_rs[i].equals(&g.exp(&rs[i])));
    }

    // distributed exponentiation by a single scalar
    let r = C::random_scalar();
    let es_r = es.dist_exp(&r);
    for i in 0..3 {
        assert!(es_r[i].equals(&es[i].exp(&r)));
    }

    // identity and inverse
    let one = <[C::Element; 3]>::one();
    assert!(es.mul(&one).equals(&es));
    assert!(es.mul(&es.inv()).equals(&one));

    // scalar ring laws
    let ss = <[C::Scalar; 3]>::random(&mut rng);
    let zero = <[C::Scalar; 3]>::zero();
    assert!(ss.add(&zero).equals(&ss));
    assert!(ss.add(&ss.neg()).equals(&zero));
    assert!(ss.sub(&ss).equals(&zero));
}

fn test_product_serialization<C: Context>() {
    let mut rng = C::get_rng();

    let es = <[C::Element; 2]>::random(&mut rng);
    let back = <[C::Element; 2]>::deser(&es.ser()).unwrap();
    assert_eq!(es, back);

    let ss = <[C::Scalar; 2]>::random(&mut rng);
    let back = <[C::Scalar; 2]>::deser(&ss.ser()).unwrap();
    assert_eq!(ss, back);

    // wrong arity is rejected
    assert!(<[C::Element; 3]>::from_tree(&es.to_tree()).is_err());
}
