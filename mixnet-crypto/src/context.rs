// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! A cryptographic context instantiates a set of interdependent functionalities
//! suitable for some application.

use rand::rngs::OsRng;

use crate::groups::modp::{ModPGroup, SafePrime2048, SafePrime512};
use crate::groups::P256Group;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::utils::hash::Hasher;
use crate::utils::rng::Rng;
use crate::utils::serialization::{FSer, VSer};

/**
 * A cryptographic context instantiates a set of interdependent functionalities
 * suitable for some application.
 *
 * Provides
 * - An underlying [arithmetic group][`crate::traits::groups::CryptographicGroup`],
 *   with [elements][`crate::traits::groups::GroupElement`] and
 *   [scalars][`crate::traits::groups::GroupScalar`] and their respective
 *   [products][`crate::groups::productgroup`].
 *
 * - A [hashing function][`crate::utils::hash`], as instantiated by the group.
 *
 * - A [random number generator][`crate::utils::rng`].
 *
 * Cryptographic functionalities such as the [ElGamal
 * cryptosystem][`crate::cryptosystem`], the [zero knowledge
 * proofs][`crate::zkp`] and the [proof directory
 * verifier][`crate::proofdir`] are built on top of this context.
 */
pub trait Context: private::Sealed + std::fmt::Debug + PartialEq + Clone + 'static {
    /// The group element type.
    type Element: GroupElement<Scalar = Self::Scalar> + FSer + VSer;

    /// The group scalar type.
    type Scalar: GroupScalar + FSer + VSer + From<u32>;

    /// The hashing function.
    type Hasher: Hasher;

    /// The random number generator.
    type Rng: Rng;

    /// The underlying group.
    type G: CryptographicGroup<Element = Self::Element, Scalar = Self::Scalar, Hasher = Self::Hasher>;

    /// Returns a random number generator.
    #[inline]
    #[must_use]
    fn get_rng() -> Self::Rng {
        Self::Rng::rng()
    }

    /// Returns a hasher instance.
    #[inline]
    #[must_use]
    fn get_hasher() -> Self::Hasher {
        Self::Hasher::hasher()
    }

    /// Returns a random group element.
    #[inline]
    #[must_use]
    fn random_element() -> Self::Element {
        let mut rng = Self::get_rng();
        Self::G::random_element(&mut rng)
    }

    /// Returns a random scalar.
    #[inline]
    #[must_use]
    fn random_scalar() -> Self::Scalar {
        let mut rng = Self::get_rng();
        Self::G::random_scalar(&mut rng)
    }

    /// Returns the default group generator.
    #[inline]
    #[must_use]
    fn generator() -> Self::Element {
        Self::G::generator()
    }
}

/**
 * Defines the P-256 context.
 *
 * Sets
 * - `p256` as the underlying curve.
 * - `Sha3-256` as the hashing function.
 * - `OsRng` as the random number generator.
 */
#[derive(Debug, PartialEq, Clone, Hash)]
pub struct P256Ctx;

impl Context for P256Ctx {
    type Element = <Self::G as CryptographicGroup>::Element;
    type Scalar = <Self::G as CryptographicGroup>::Scalar;
    type Hasher = <Self::G as CryptographicGroup>::Hasher;
    type Rng = OsRng;

    type G = P256Group;
}

/**
 * Defines the 512-bit safe-prime context.
 *
 * Sets
 * - the subgroup of squares modulo a 512-bit safe prime as the underlying group.
 * - `Sha3-256` as the hashing function.
 * - `OsRng` as the random number generator.
 */
#[derive(Debug, PartialEq, Clone, Hash)]
pub struct ModP512Ctx;

impl Context for ModP512Ctx {
    type Element = <Self::G as CryptographicGroup>::Element;
    type Scalar = <Self::G as CryptographicGroup>::Scalar;
    type Hasher = <Self::G as CryptographicGroup>::Hasher;
    type Rng = OsRng;

    type G = ModPGroup<SafePrime512>;
}

/**
 * Defines the 2048-bit safe-prime context, over the RFC 3526 MODP group.
 *
 * Sets
 * - the subgroup of squares of the RFC 3526 2048-bit group as the underlying group.
 * - `Sha3-256` as the hashing function.
 * - `OsRng` as the random number generator.
 */
#[derive(Debug, PartialEq, Clone, Hash)]
pub struct ModP2048Ctx;

impl Context for ModP2048Ctx {
    type Element = <Self::G as CryptographicGroup>::Element;
    type Scalar = <Self::G as CryptographicGroup>::Scalar;
    type Hasher = <Self::G as CryptographicGroup>::Hasher;
    type Rng = OsRng;

    type G = ModPGroup<SafePrime2048>;
}

/// Seals the [Context] trait to prevent external implementations.
mod private {
    /// Sealed traits implement this.
    #[allow(unnameable_types)]
    pub trait Sealed {}
}

impl private::Sealed for P256Ctx {}
impl private::Sealed for ModP512Ctx {}
impl private::Sealed for ModP2048Ctx {}
