// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! CryptographicGroup implementations for safe-prime groups

use core::marker::PhantomData;

use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::groups::modp::element::ModPElement;
use crate::groups::modp::params::ModPParams;
use crate::groups::modp::scalar::ModPScalar;
use crate::traits::groups::CryptographicGroup;
use crate::utils::error::Error;
use crate::utils::hash;
use crate::utils::serialization::{ByteTree, ByteTreeReader};

/// Safe-prime implementation of [`CryptographicGroup`], parameterized by a
/// [`ModPParams`] set.
pub struct ModPGroup<P: ModPParams>(PhantomData<P>);

impl<P: ModPParams> CryptographicGroup for ModPGroup<P> {
    type Element = ModPElement<P>;
    type Scalar = ModPScalar<P>;
    type Hasher = hash::Hasher256;

    const NAME: &'static str = P::NAME;

    fn generator() -> Self::Element {
        ModPElement::new(BigUint::from(P::GENERATOR))
    }

    fn is_member(element: &Self::Element) -> bool {
        element.is_square()
    }

    fn element_unchecked(reader: &mut ByteTreeReader<'_>) -> Result<Self::Element, Error> {
        if reader.remaining() != P::element_bytes() {
            return Err(Error::DecodingError(format!(
                "element leaf of {} bytes, expected {}",
                reader.remaining(),
                P::element_bytes()
            )));
        }
        let bytes = reader.read_bytes(P::element_bytes())?;
        ModPElement::from_bytes_unchecked(bytes)
    }

    /// # Errors
    ///
    /// This derivation cannot fail for safe-prime groups; the `Result` is
    /// part of the shared group interface.
    fn ind_generators(count: usize, prefix: &[u8]) -> Result<Vec<Self::Element>, Error> {
        // Derive each generator from (tag, prefix, index) through the
        // random oracle, reduce into [0, p) with surplus bits against the
        // modular bias, then square into the subgroup.
        let surplus_bytes = 16;
        let width = P::element_bytes() + surplus_bytes;

        let generators = (0..count)
            .into_par_iter()
            .map(|i| {
                let index = u64::try_from(i).expect("index fits u64");
                let data = ByteTree::node(vec![
                    ByteTree::string_leaf("generators"),
                    ByteTree::leaf(prefix.to_vec()),
                    ByteTree::leaf(index.to_be_bytes().to_vec()),
                ]);
                let digest = hash::digest32::<Self::Hasher>(&data.ser());

                let mut prg = ChaCha20Rng::from_seed(digest);
                let mut bytes = vec![0u8; width];
                rand::RngCore::fill_bytes(&mut prg, &mut bytes);

                let candidate = BigUint::from_bytes_be(&bytes) % P::modulus();
                // Squaring maps any non-zero residue into the subgroup; the
                // zero residue has negligible probability but is mapped to
                // the generator to keep the function total.
                if candidate.bits() == 0 {
                    Self::generator()
                } else {
                    ModPElement::new(candidate).exp_int(&BigUint::from(2u32))
                }
            })
            .collect();

        Ok(generators)
    }
}
