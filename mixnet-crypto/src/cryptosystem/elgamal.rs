// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! ElGamal cryptosystem

use crate::context::Context;
use crate::traits::groups::CryptographicGroup;
use crate::traits::groups::DistGroupOps;
use crate::traits::groups::GroupElement;
use crate::traits::groups::GroupScalar;
use crate::traits::groups::ReplGroupOps;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VDeserializable, VSerializable};

/**
 * An `ElGamal` key pair.
 *
 * This struct represents a key pair in the `ElGamal` encryption scheme,
 * including the secret scalar value and public group element.
 *
 * # Examples
 *
 * ```
 * use mixnet_crypto::context::{Context, P256Ctx as Ctx};
 * use mixnet_crypto::cryptosystem::elgamal::KeyPair;
 *
 * let mut rng = Ctx::get_rng();
 * let keypair: KeyPair<Ctx> = KeyPair::generate(&mut rng);
 * let message = [Ctx::random_element(); 2];
 * let ciphertext = keypair.pkey.encrypt(&message, &mut rng);
 *
 * let decrypted = keypair.decrypt(&ciphertext);
 *
 * assert_eq!(message, decrypted);
 * ```
 */
#[derive(Debug, PartialEq, Clone)]
pub struct KeyPair<C: Context> {
    /// the private key as a raw group scalar
    pub skey: C::Scalar,
    /// the public key
    pub pkey: PublicKey<C>,
}

impl<C: Context> KeyPair<C> {
    /// Construct a new key pair with the given secret and public values.
    ///
    /// Use this function to create a key pair from existing secret and public keys.
    /// Use [`KeyPair::generate`] to instead generate a fresh key pair.
    pub fn new(skey: C::Scalar, pkey: C::Element) -> KeyPair<C> {
        let pkey = PublicKey::new(pkey);
        KeyPair { skey, pkey }
    }

    /// Construct a new key pair, generating fresh key material from the
    /// given randomness source.
    pub fn generate<R: CRng>(rng: &mut R) -> Self {
        let skey = C::G::random_scalar(rng);
        let pkey = C::generator().exp(&skey);
        let pkey = PublicKey::new(pkey);
        KeyPair { skey, pkey }
    }

    /// Decrypt the given ciphertext with this key pair.
    ///
    /// The input ciphertext can have arbitrary width `W`.
    pub fn decrypt<const W: usize>(&self, ciphertext: &Ciphertext<C, W>) -> [C::Element; W] {
        decrypt::<C, W>(ciphertext.u(), ciphertext.v(), &self.skey)
    }
}

/**
 * An `ElGamal` public key.
 *
 * The full public key is the pair `(g, y)` where `g` is the standard
 * generator of the context group; only `y` is stored. The canonical byte
 * tree carries both components of the pair.
 *
 * # Examples
 *
 * ```
 * use mixnet_crypto::context::{Context, P256Ctx as Ctx};
 * use mixnet_crypto::cryptosystem::elgamal::{KeyPair, PublicKey};
 *
 * let mut rng = Ctx::get_rng();
 * let keypair: KeyPair<Ctx> = KeyPair::generate(&mut rng);
 * let public_key: PublicKey<Ctx> = keypair.pkey;
 * let message = [Ctx::random_element(); 2];
 * let ciphertext = public_key.encrypt(&message, &mut rng);
 * ```
 */
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey<C: Context> {
    /// the public key as a raw group element
    pub y: C::Element,
}

impl<C: Context> PublicKey<C> {
    /// Construct a new public key with the given public value.
    pub fn new(y: C::Element) -> Self {
        Self { y }
    }

    /// Encrypt the given message with this public key, drawing the
    /// encryption randomness from `rng`.
    ///
    /// The message can have arbitrary width `W`.
    pub fn encrypt<const W: usize, R: CRng>(
        &self,
        message: &[C::Element; W],
        rng: &mut R,
    ) -> Ciphertext<C, W> {
        let r = <[C::Scalar; W]>::random(rng);

        self.encrypt_with_r(message, &r)
    }

    /// Encrypt the given message with this public key and the given randomness.
    ///
    /// The message can have arbitrary width `W`.
    pub fn encrypt_with_r<const W: usize>(
        &self,
        message: &[C::Element; W],
        r: &[C::Scalar; W],
    ) -> Ciphertext<C, W> {
        let g = C::generator();

        let u = g.repl_exp(r);
        let v = self.y.repl_exp(r);
        let v = message.mul(&v);

        Ciphertext([u, v])
    }
}

/**
 * Decrypt a ciphertext using the given secret key.
 *
 * Computes the plaintext as `p = v * (u^-x) = v / u^x`.
 * This function operates on raw arrays. See also [`KeyPair::decrypt`] to
 * operate on [`Ciphertext`].
 */
#[inline]
pub fn decrypt<C: Context, const W: usize>(
    u: &[C::Element; W],
    v: &[C::Element; W],
    sk: &C::Scalar,
) -> [C::Element; W] {
    let u_pow_neg_x = u.dist_exp(&sk.neg());

    v.mul(&u_pow_neg_x)
}

/**
 * An `ElGamal` ciphertext.
 *
 * This struct represents a ciphertext in the `ElGamal` encryption scheme
 * as a pair of values (u, v). Each element of the ciphertext pair has an
 * arbitrary length of W group elements, so a ciphertext lives in
 * `(G^W) x (G^W)`.
 *
 * # Examples
 *
 * ```
 * use mixnet_crypto::context::{Context, P256Ctx as Ctx};
 * use mixnet_crypto::cryptosystem::elgamal::KeyPair;
 *
 * let mut rng = Ctx::get_rng();
 * let keypair: KeyPair<Ctx> = KeyPair::generate(&mut rng);
 * let message = [Ctx::random_element(); 2];
 * let ciphertext = keypair.pkey.encrypt(&message, &mut rng);
 *
 * // re-encryption leaves the plaintext unchanged
 * let r = [Ctx::random_scalar(), Ctx::random_scalar()];
 * let re_encrypted = ciphertext.re_encrypt(&r, &keypair.pkey.y);
 *
 * let decrypted = keypair.decrypt(&re_encrypted);
 *
 * assert_eq!(message, decrypted);
 * ```
 */
#[derive(Debug, PartialEq, Clone)]
pub struct Ciphertext<C: Context, const W: usize>(pub [[C::Element; W]; 2]);

impl<C: Context, const W: usize> Ciphertext<C, W> {
    /// Construct a ciphertext with given values `u` and `v`.
    ///
    /// Use [`PublicKey::encrypt`] to encrypt a ciphertext from a message.
    pub fn new(u: [C::Element; W], v: [C::Element; W]) -> Self {
        Ciphertext([u, v])
    }

    /// Re-encrypt the ciphertext using a new randomness value `r` and a
    /// public key `pk`, multiplying in an encryption of the identity.
    #[must_use]
    pub fn re_encrypt(&self, r: &[C::Scalar; W], pk: &C::Element) -> Self {
        let g = C::generator();
        // (g, y)^r
        let one = [g, pk.clone()].map(|v| v.repl_exp(r));
        let re_encrypted = self.0.mul(&one);

        Self(re_encrypted)
    }

    /// Obtain a reference to the first element of the ciphertext, `u`.
    pub fn u(&self) -> &[C::Element; W] {
        &self.0[0]
    }

    /// Obtain a reference to the second element of the ciphertext, `v`.
    pub fn v(&self) -> &[C::Element; W] {
        &self.0[1]
    }

    /// Apply the given function to each element of the ciphertext.
    ///
    /// Returns the values as raw arrays.
    pub fn map_ref<F, U>(&self, mut f: F) -> [U; 2]
    where
        F: FnMut(&[C::Element; W]) -> U,
    {
        std::array::from_fn(|i| {
            let uv = &self.0[i];
            f(uv)
        })
    }
}

impl<C: Context> VSerializable for PublicKey<C> {
    fn to_tree(&self) -> ByteTree {
        ByteTree::node(vec![C::generator().to_tree(), self.y.to_tree()])
    }
}

impl<C: Context> VDeserializable for PublicKey<C> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        let children = tree.as_node()?;
        match children {
            [g, y] => {
                let g = C::Element::from_tree(g)?;
                if !g.equals(&C::generator()) {
                    return Err(Error::DecodingError(
                        "basic public key is not the standard generator".to_string(),
                    ));
                }
                Ok(PublicKey::new(C::Element::from_tree(y)?))
            }
            _ => Err(Error::ByteTreeError(format!(
                "public key node of {} children, expected 2",
                children.len()
            ))),
        }
    }
}

impl<C: Context, const W: usize> VSerializable for Ciphertext<C, W> {
    fn to_tree(&self) -> ByteTree {
        self.0.to_tree()
    }
}

impl<C: Context, const W: usize> VDeserializable for Ciphertext<C, W> {
    fn from_tree(tree: &ByteTree) -> Result<Self, Error> {
        Ok(Ciphertext(<[[C::Element; W]; 2]>::from_tree(tree)?))
    }
}
