// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! GroupElement implementations for products

use crate::traits::groups::DistGroupOps;
use crate::traits::groups::GroupElement;
use crate::traits::groups::ReplGroupOps;

use crate::utils::rng;
use std::array;

impl<T: GroupElement, const N: usize> GroupElement for [T; N] {
    type Scalar = [T::Scalar; N];

    fn one() -> Self {
        array::from_fn(|_| T::one())
    }

    fn mul(&self, other: &Self) -> Self {
        array::from_fn(|i| self[i].mul(&other[i]))
    }

    fn inv(&self) -> Self {
        array::from_fn(|i| self[i].inv())
    }

    fn exp(&self, scalars: &Self::Scalar) -> Self {
        array::from_fn(|i| self[i].exp(&scalars[i]))
    }

    fn equals(&self, other: &Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| a.equals(b))
    }

    fn random<R: rng::CRng>(rng: &mut R) -> Self {
        array::from_fn(|_| T::random(rng))
    }
}

impl<T: GroupElement, const N: usize> ReplGroupOps<[T; N], [T::Scalar; N]> for T {
    type Output = [T; N];

    fn repl_mul(&self, other: &[T; N]) -> Self::Output {
        array::from_fn(|i| self.mul(&other[i]))
    }

    fn repl_exp(&self, scalars: &[T::Scalar; N]) -> Self::Output {
        array::from_fn(|i| self.exp(&scalars[i]))
    }

    fn repl_equals(&self, other: &[T; N]) -> bool {
        other.iter().all(|item| item.equals(self))
    }
}

impl<T: GroupElement, const N: usize> DistGroupOps<T> for [T; N] {
    type Output = Self;

    fn dist_mul(&self, other: &T) -> Self::Output {
        array::from_fn(|i| self[i].mul(other))
    }

    fn dist_exp(&self, scalar: &T::Scalar) -> Self::Output {
        array::from_fn(|i| self[i].exp(scalar))
    }

    fn dist_equals(&self, other: &T) -> bool {
        self.iter().all(|item| item.equals(other))
    }
}
