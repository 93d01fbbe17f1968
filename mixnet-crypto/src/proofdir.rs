// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof-directory layout and the standalone session verifier
//!
//! A mixing session leaves behind a directory of byte-tree files: the
//! session description (`version`, `type`, `auxsid`, `width`, `at`, and
//! `mc` when precomputation was used), the joint public key, the
//! ciphertext list at every level, and per mix-server the permutation
//! commitment and the proof commitment/reply pairs. These files are the
//! ground truth: the [`SessionVerifier`] re-derives every challenge from
//! them alone and accepts or rejects the whole session.
//!
//! Malformed *session* files (unreadable description, public key or
//! ciphertext lists) make verification meaningless and yield
//! [`Verdict::MalformedInput`]; malformed *proof* files are substituted
//! with identity values and lead to an ordinary [`Verdict::Reject`], so a
//! corrupt prover cannot stall the verifier.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::context::Context;
use crate::cryptosystem::elgamal::{Ciphertext, PublicKey};
use crate::traits::groups::CryptographicGroup;
use crate::utils::error::Error;
use crate::utils::rng::CRng;
use crate::utils::serialization::{ByteTree, VDeserializable, VSerializable};
use crate::zkp::ccpos::CCShuffler;
use crate::zkp::challenger::{Challenger, SessionParams};
use crate::zkp::posc::CommitmentShuffler;
use crate::zkp::shuffle::Shuffler;

/// File names of the proof directory. Per-party files carry a two-digit
/// party index suffix, ciphertext level files a two-digit level suffix.
pub mod files {
    /// Protocol version.
    pub const VERSION: &str = "version";
    /// Session type, `"shuffling"` or `"mixing"`.
    pub const TYPE: &str = "type";
    /// Auxiliary session identifier.
    pub const AUXSID: &str = "auxsid";
    /// Ciphertext width.
    pub const WIDTH: &str = "width";
    /// Active threshold: number of mix-servers whose proofs are checked.
    pub const ACTIVE_THRESHOLD: &str = "at";
    /// Maximal number of precomputed ciphertext slots; present if and
    /// only if the session used precomputation.
    pub const MAXCIPH: &str = "mc";
    /// Joint ElGamal public key.
    pub const FULL_PUBLIC_KEY: &str = "FullPublicKey";
    /// Permutation commitment of a party.
    pub const PERM_COMMITMENT: &str = "PC";
    /// Keep list of a party.
    pub const KEEP_LIST: &str = "kL";
    /// Proof-of-shuffle commitment of a party.
    pub const POS_COMMITMENT: &str = "PoSC";
    /// Proof-of-shuffle reply of a party.
    pub const POS_REPLY: &str = "PoSR";
    /// Proof-of-shuffle-of-commitments commitment of a party.
    pub const POSC_COMMITMENT: &str = "PoSCC";
    /// Proof-of-shuffle-of-commitments reply of a party.
    pub const POSC_REPLY: &str = "PoSCR";
    /// Commitment-consistent proof commitment of a party.
    pub const CCPOS_COMMITMENT: &str = "CCPoSC";
    /// Commitment-consistent proof reply of a party.
    pub const CCPOS_REPLY: &str = "CCPoSR";
    /// Ciphertext list at a level; level 0 is the session input.
    pub const CIPHERTEXTS: &str = "L";
}

/// The verdict of the standalone verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every proof in the directory verified.
    Accept,
    /// At least one proof failed to verify.
    Reject,
    /// A session file is missing or undecodable; no verdict on the
    /// proofs is possible.
    MalformedInput,
}

/**
 * A proof directory on the filesystem, one byte-tree file per object.
 */
#[derive(Debug, Clone)]
pub struct ProofDirectory {
    root: PathBuf,
}

impl ProofDirectory {
    /// Create the directory (and parents) and return a handle to it.
    ///
    /// # Errors
    ///
    /// - `IoError` if the directory cannot be created
    pub fn create(root: &Path) -> Result<Self, Error> {
        fs::create_dir_all(root)?;
        Ok(ProofDirectory {
            root: root.to_path_buf(),
        })
    }

    /// A handle to an existing directory.
    #[must_use]
    pub fn open(root: &Path) -> Self {
        ProofDirectory {
            root: root.to_path_buf(),
        }
    }

    /// The root path of this directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The filesystem path of the named object.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.bt"))
    }

    /// The file name of a per-party or per-level object.
    #[must_use]
    pub fn indexed(stem: &str, index: usize) -> String {
        format!("{stem}{index:02}")
    }

    /// True if the named object exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Write the byte tree to the named file.
    ///
    /// # Errors
    ///
    /// - `IoError` on filesystem failure
    pub fn write_tree(&self, name: &str, tree: &ByteTree) -> Result<(), Error> {
        fs::write(self.path(name), tree.ser())?;
        Ok(())
    }

    /// Read and parse the named byte-tree file.
    ///
    /// # Errors
    ///
    /// - `SessionFileError` if the file is missing or unreadable
    /// - `ByteTreeError` if its contents are not a byte tree
    pub fn read_tree(&self, name: &str) -> Result<ByteTree, Error> {
        let path = self.path(name);
        let bytes = fs::read(&path)
            .map_err(|e| Error::SessionFileError(format!("{}: {e}", path.display())))?;
        ByteTree::parse(&bytes)
    }

    /// Write a string object.
    ///
    /// # Errors
    ///
    /// See [`write_tree`][`Self::write_tree`].
    pub fn write_string(&self, name: &str, value: &str) -> Result<(), Error> {
        self.write_tree(name, &ByteTree::string_leaf(value))
    }

    /// Read a string object.
    ///
    /// # Errors
    ///
    /// See [`read_tree`][`Self::read_tree`].
    pub fn read_string(&self, name: &str) -> Result<String, Error> {
        String::from_tree(&self.read_tree(name)?)
    }

    /// Write a 32-bit integer object.
    ///
    /// # Errors
    ///
    /// See [`write_tree`][`Self::write_tree`].
    pub fn write_u32(&self, name: &str, value: u32) -> Result<(), Error> {
        self.write_tree(name, &ByteTree::u32_leaf(value))
    }

    /// Read a 32-bit integer object.
    ///
    /// # Errors
    ///
    /// See [`read_tree`][`Self::read_tree`].
    pub fn read_u32(&self, name: &str) -> Result<u32, Error> {
        u32::from_tree(&self.read_tree(name)?)
    }
}

/**
 * Runs a mixing session and records it in a proof directory.
 *
 * Each of `parties` mix-servers in turn shuffles the current ciphertext
 * list and stores its permutation commitment, proof commitment and reply;
 * levels `L0 ... Lk` hold the ciphertext lists between mixes. With
 * `precompute`, the permutation commitments are produced and proved ahead
 * of the ciphertexts (proof of shuffle of commitments plus keep lists)
 * and the online proofs are commitment-consistent.
 */
pub struct SessionProver<C: Context, const W: usize> {
    dir: ProofDirectory,
    challenger: Challenger<C>,
    pk: PublicKey<C>,
}

impl<C: Context, const W: usize> SessionProver<C, W> {
    /// Construct a session prover writing to the given directory.
    pub fn new(dir: ProofDirectory, challenger: Challenger<C>, pk: PublicKey<C>) -> Self {
        SessionProver {
            dir,
            challenger,
            pk,
        }
    }

    /// Run the session over the input ciphertexts and write all files.
    ///
    /// Returns the final ciphertext list.
    ///
    /// # Errors
    ///
    /// - `EmptyShuffle` if the input list is empty
    /// - `IoError` on filesystem failure
    pub fn prove<R: CRng>(
        &self,
        ciphertexts: &[Ciphertext<C, W>],
        parties: usize,
        precompute: bool,
        rng: &mut R,
    ) -> Result<Vec<Ciphertext<C, W>>, Error> {
        if ciphertexts.is_empty() {
            return Err(Error::EmptyShuffle);
        }
        let n = ciphertexts.len();
        let params = self.challenger.params();
        info!(n, parties, precompute, "proving mixing session");

        self.dir.write_string(files::VERSION, &params.version)?;
        self.dir.write_string(files::TYPE, "shuffling")?;
        self.dir.write_string(files::AUXSID, &params.auxsid)?;
        self.dir
            .write_u32(files::WIDTH, u32::try_from(W).expect("width fits u32"))?;
        self.dir.write_u32(
            files::ACTIVE_THRESHOLD,
            u32::try_from(parties).expect("party count fits u32"),
        )?;
        self.dir.write_tree(files::FULL_PUBLIC_KEY, &self.pk.to_tree())?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::CIPHERTEXTS, 0),
            &ciphertexts.to_vec().to_tree(),
        )?;
        if precompute {
            self.dir
                .write_u32(files::MAXCIPH, u32::try_from(n).expect("size fits u32"))?;
        }

        let generators = C::G::ind_generators(n, self.challenger.rho())?;

        let mut current = ciphertexts.to_vec();
        for l in 1..=parties {
            let next = if precompute {
                self.mix_with_precomputation(l, &current, &generators, rng)?
            } else {
                self.mix_direct(l, &current, &generators, rng)?
            };

            self.dir.write_tree(
                &ProofDirectory::indexed(files::CIPHERTEXTS, l),
                &next.to_vec().to_tree(),
            )?;
            current = next;
        }

        Ok(current)
    }

    /// One mix with a direct proof of shuffle.
    fn mix_direct<R: CRng>(
        &self,
        l: usize,
        current: &[Ciphertext<C, W>],
        generators: &[C::Element],
        rng: &mut R,
    ) -> Result<Vec<Ciphertext<C, W>>, Error> {
        debug!(party = l, "direct shuffle");
        let shuffler = Shuffler::<C, W>::new(generators.to_vec(), self.pk.clone());
        let (next, proof) = shuffler.shuffle(current, &self.challenger, rng)?;

        self.dir.write_tree(
            &ProofDirectory::indexed(files::PERM_COMMITMENT, l),
            &proof.u_n.to_tree(),
        )?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::POS_COMMITMENT, l),
            &proof.commitments.to_tree(),
        )?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::POS_REPLY, l),
            &proof.responses.to_tree(),
        )?;
        Ok(next)
    }

    /// One mix with precomputation: prove the permutation commitment
    /// offline, then shuffle with the commitment-consistent proof.
    fn mix_with_precomputation<R: CRng>(
        &self,
        l: usize,
        current: &[Ciphertext<C, W>],
        generators: &[C::Element],
        rng: &mut R,
    ) -> Result<Vec<Ciphertext<C, W>>, Error> {
        use crate::zkp::permutation::{self, Permutation};

        debug!(party = l, "precomputed shuffle");
        let n = current.len();

        let pi = Permutation::random(n, self.challenger.params().n_r, rng);
        let (u, r) = permutation::commit::<C, R>(&pi, generators, rng)?;

        let posc = CommitmentShuffler::<C>::new(generators.to_vec());
        let posc_proof = posc.prove(&u, &pi, &r, &self.challenger, rng)?;

        self.dir.write_tree(
            &ProofDirectory::indexed(files::PERM_COMMITMENT, l),
            &u.to_tree(),
        )?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::POSC_COMMITMENT, l),
            &posc_proof.commitments.to_tree(),
        )?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::POSC_REPLY, l),
            &posc_proof.responses.to_tree(),
        )?;
        // all precomputed slots are used
        self.dir.write_tree(
            &ProofDirectory::indexed(files::KEEP_LIST, l),
            &ByteTree::booleans_leaf(&vec![true; n]),
        )?;

        let ccpos = CCShuffler::<C, W>::new(generators.to_vec(), self.pk.clone());
        let (next, cc_proof) = ccpos.shuffle(current, &u, &pi, &r, &self.challenger, rng)?;

        self.dir.write_tree(
            &ProofDirectory::indexed(files::CCPOS_COMMITMENT, l),
            &cc_proof.commitments.to_tree(),
        )?;
        self.dir.write_tree(
            &ProofDirectory::indexed(files::CCPOS_REPLY, l),
            &cc_proof.responses.to_tree(),
        )?;
        Ok(next)
    }
}

/**
 * The standalone verifier of a proof directory.
 *
 * The verifier re-derives the session prefix from the stored session
 * description and its own base parameters (session id and security
 * constants), then checks every active party's proofs against the stored
 * ciphertext levels. Running it twice on the same directory yields the
 * same verdict.
 */
pub struct SessionVerifier<C: Context, const W: usize> {
    dir: ProofDirectory,
    base: SessionParams,
    _marker: std::marker::PhantomData<C>,
}

impl<C: Context, const W: usize> SessionVerifier<C, W> {
    /// Construct a verifier for the given directory. `base` supplies the
    /// session id and the security constants; the version and auxiliary
    /// session id are read from the directory itself.
    pub fn new(dir: ProofDirectory, base: SessionParams) -> Self {
        SessionVerifier {
            dir,
            base,
            _marker: std::marker::PhantomData,
        }
    }

    /// Verify the directory.
    ///
    /// # Errors
    ///
    /// Format failures never surface here (they are the
    /// [`Verdict::MalformedInput`] verdict); an error indicates an
    /// internal arithmetic inconsistency and must not be ignored.
    pub fn verify(&self) -> Result<Verdict, Error> {
        match self.verify_inner() {
            Ok(true) => Ok(Verdict::Accept),
            Ok(false) => Ok(Verdict::Reject),
            Err(e) if e.is_format() => {
                info!(error = %e, "session files malformed");
                Ok(Verdict::MalformedInput)
            }
            Err(e) => Err(e),
        }
    }

    #[allow(clippy::similar_names)]
    fn verify_inner(&self) -> Result<bool, Error> {
        let version = self.dir.read_string(files::VERSION)?;
        let session_type = self.dir.read_string(files::TYPE)?;
        if session_type != "shuffling" && session_type != "mixing" {
            return Err(Error::SessionFileError(format!(
                "unknown session type {session_type:?}"
            )));
        }
        let auxsid = self.dir.read_string(files::AUXSID)?;
        let width = self.dir.read_u32(files::WIDTH)?;
        if width != u32::try_from(W).expect("width fits u32") {
            return Err(Error::SessionFileError(format!(
                "directory width {width} does not match verifier width {W}"
            )));
        }
        let parties = self.dir.read_u32(files::ACTIVE_THRESHOLD)? as usize;
        if parties == 0 {
            return Err(Error::SessionFileError("no active parties".to_string()));
        }

        let params = SessionParams {
            version,
            auxsid,
            ..self.base.clone()
        };
        let challenger = Challenger::<C>::new(params);

        let pk = PublicKey::<C>::from_tree(&self.dir.read_tree(files::FULL_PUBLIC_KEY)?)?;

        let mut current = self.read_level(0)?;
        let n = current.len();
        if n == 0 {
            return Err(Error::SessionFileError("empty input level".to_string()));
        }
        info!(n, parties, width = W, "verifying mixing session");

        let precompute = self.dir.exists(files::MAXCIPH);
        let maxciph = if precompute {
            self.dir.read_u32(files::MAXCIPH)? as usize
        } else {
            0
        };

        let generators_n = if precompute { maxciph } else { n };
        if generators_n < n {
            return Err(Error::SessionFileError(format!(
                "maxciph {generators_n} smaller than ciphertext count {n}"
            )));
        }
        let generators = C::G::ind_generators(generators_n, challenger.rho())?;

        for l in 1..=parties {
            let next = self.read_level(l)?;
            if next.len() != n {
                return Err(Error::SessionFileError(format!(
                    "level {l} holds {} ciphertexts, expected {n}",
                    next.len()
                )));
            }

            let verdict = if precompute {
                self.verify_party_precomputed(l, &current, &next, &generators, &pk, &challenger)?
            } else {
                self.verify_party_direct(l, &current, &next, &generators, &pk, &challenger)?
            };
            debug!(party = l, verdict, "party verdict");
            if !verdict {
                return Ok(false);
            }
            current = next;
        }

        Ok(true)
    }

    /// Verify one party's direct proof of shuffle.
    fn verify_party_direct(
        &self,
        l: usize,
        current: &[Ciphertext<C, W>],
        next: &[Ciphertext<C, W>],
        generators: &[C::Element],
        pk: &PublicKey<C>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        let shuffler = Shuffler::<C, W>::new(generators.to_vec(), pk.clone());

        let u = shuffler.decode_permutation_commitment(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::PERM_COMMITMENT, l))?,
        );
        let commitments = shuffler.decode_commitments(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::POS_COMMITMENT, l))?,
        );
        let Some(responses) = shuffler.decode_responses(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::POS_REPLY, l))?,
        ) else {
            return Ok(false);
        };

        shuffler.verify_parts(current, next, &u, &commitments, &responses, challenger)
    }

    /// Verify one party's precomputed flow: proof of shuffle of
    /// commitments, keep-list shrink, then the commitment-consistent
    /// proof.
    #[allow(clippy::too_many_arguments)]
    fn verify_party_precomputed(
        &self,
        l: usize,
        current: &[Ciphertext<C, W>],
        next: &[Ciphertext<C, W>],
        generators: &[C::Element],
        pk: &PublicKey<C>,
        challenger: &Challenger<C>,
    ) -> Result<bool, Error> {
        let posc = CommitmentShuffler::<C>::new(generators.to_vec());

        let u_full = posc.decode_permutation_commitment(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::PERM_COMMITMENT, l))?,
        );
        let commitments = posc.decode_commitments(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::POSC_COMMITMENT, l))?,
        );
        let Some(responses) = posc.decode_responses(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::POSC_REPLY, l))?,
        ) else {
            return Ok(false);
        };

        let posc_verdict = posc.verify_parts(&u_full, &commitments, &responses, challenger)?;

        // keep-list shrink to the actual ciphertext count
        let keep_tree = self
            .dir
            .read_tree(&ProofDirectory::indexed(files::KEEP_LIST, l))?;
        let keep = keep_tree.reader().read_booleans(generators.len())?;
        let kept = keep.iter().filter(|k| **k).count();
        if kept != current.len() {
            return Err(Error::SessionFileError(format!(
                "keep list of party {l} keeps {kept} slots, expected {}",
                current.len()
            )));
        }
        let u = extract(&u_full, &keep);
        let shrunk_generators = extract(generators, &keep);

        let ccpos = CCShuffler::<C, W>::new(shrunk_generators, pk.clone());
        let cc_commitments = ccpos.decode_commitments(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::CCPOS_COMMITMENT, l))?,
        );
        let Some(cc_responses) = ccpos.decode_responses(
            &self
                .dir
                .read_tree(&ProofDirectory::indexed(files::CCPOS_REPLY, l))?,
        ) else {
            return Ok(false);
        };

        let cc_verdict = ccpos.verify_parts(
            current,
            next,
            &u,
            &cc_commitments,
            &cc_responses,
            challenger,
        )?;

        Ok(posc_verdict && cc_verdict)
    }

    /// Read and fully validate the ciphertext list at a level.
    fn read_level(&self, level: usize) -> Result<Vec<Ciphertext<C, W>>, Error> {
        let tree = self
            .dir
            .read_tree(&ProofDirectory::indexed(files::CIPHERTEXTS, level))?;
        Vec::<Ciphertext<C, W>>::from_tree(&tree)
    }
}

/// The entries of `items` selected by the keep list.
fn extract<T: Clone>(items: &[T], keep: &[bool]) -> Vec<T> {
    items
        .iter()
        .zip(keep.iter())
        .filter(|(_, k)| **k)
        .map(|(item, _)| item.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::array;

    use super::*;
    use crate::context::P256Ctx as PCtx;
    use crate::cryptosystem::elgamal::KeyPair;

    fn temp_dir(tag: &str) -> PathBuf {
        let unique = format!(
            "mixnet-crypto-{tag}-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        );
        std::env::temp_dir().join(unique)
    }

    fn setup_session<const W: usize>(
        n: usize,
        tag: &str,
    ) -> (
        ProofDirectory,
        Challenger<PCtx>,
        KeyPair<PCtx>,
        Vec<Ciphertext<PCtx, W>>,
    ) {
        let mut rng = PCtx::get_rng();
        let keypair = KeyPair::<PCtx>::generate(&mut rng);

        let messages: Vec<[_; W]> = (0..n)
            .map(|_| array::from_fn(|_| PCtx::random_element()))
            .collect();
        let ciphertexts: Vec<Ciphertext<PCtx, W>> = messages
            .iter()
            .map(|m| keypair.pkey.encrypt(m, &mut rng))
            .collect();

        let root = temp_dir(tag);
        let _ = std::fs::remove_dir_all(&root);
        let dir = ProofDirectory::create(&root).unwrap();
        let challenger =
            Challenger::<PCtx>::new(SessionParams::new::<PCtx>("proofdir-test", "default"));

        (dir, challenger, keypair, ciphertexts)
    }

    #[test]
    fn test_session_round_trip_direct() {
        let (dir, challenger, keypair, ciphertexts) = setup_session::<1>(7, "direct");
        let mut rng = PCtx::get_rng();

        let prover =
            SessionProver::<PCtx, 1>::new(dir.clone(), challenger.clone(), keypair.pkey.clone());
        prover.prove(&ciphertexts, 3, false, &mut rng).unwrap();

        let verifier =
            SessionVerifier::<PCtx, 1>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::Accept);

        // deterministic: a second run yields the same verdict
        assert_eq!(verifier.verify().unwrap(), Verdict::Accept);

        std::fs::remove_dir_all(dir.root()).unwrap();
    }

    #[test]
    fn test_session_round_trip_precomputed() {
        let (dir, challenger, keypair, ciphertexts) = setup_session::<2>(5, "precomp");
        let mut rng = PCtx::get_rng();

        let prover =
            SessionProver::<PCtx, 2>::new(dir.clone(), challenger.clone(), keypair.pkey.clone());
        prover.prove(&ciphertexts, 2, true, &mut rng).unwrap();

        let verifier =
            SessionVerifier::<PCtx, 2>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::Accept);

        std::fs::remove_dir_all(dir.root()).unwrap();
    }

    #[test]
    fn test_session_rejects_bit_flip() {
        let (dir, challenger, keypair, ciphertexts) = setup_session::<1>(6, "bitflip");
        let mut rng = PCtx::get_rng();

        let prover =
            SessionProver::<PCtx, 1>::new(dir.clone(), challenger.clone(), keypair.pkey.clone());
        prover.prove(&ciphertexts, 2, false, &mut rng).unwrap();

        // flip one bit in the reply of party 2
        let reply = dir.path(&ProofDirectory::indexed(files::POS_REPLY, 2));
        let mut bytes = std::fs::read(&reply).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        std::fs::write(&reply, bytes).unwrap();

        let verifier =
            SessionVerifier::<PCtx, 1>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::Reject);

        std::fs::remove_dir_all(dir.root()).unwrap();
    }

    #[test]
    fn test_session_malformed_input() {
        let (dir, challenger, keypair, ciphertexts) = setup_session::<1>(4, "malformed");
        let mut rng = PCtx::get_rng();

        let prover =
            SessionProver::<PCtx, 1>::new(dir.clone(), challenger.clone(), keypair.pkey.clone());
        prover.prove(&ciphertexts, 1, false, &mut rng).unwrap();

        // wrong verifier width
        let verifier =
            SessionVerifier::<PCtx, 2>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::MalformedInput);

        // truncate the public key file
        std::fs::write(dir.path(files::FULL_PUBLIC_KEY), [0x00, 0x00]).unwrap();
        let verifier =
            SessionVerifier::<PCtx, 1>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::MalformedInput);

        // remove it entirely
        std::fs::remove_file(dir.path(files::FULL_PUBLIC_KEY)).unwrap();
        assert_eq!(verifier.verify().unwrap(), Verdict::MalformedInput);

        std::fs::remove_dir_all(dir.root()).unwrap();
    }

    #[test]
    fn test_malformed_proof_file_rejects() {
        let (dir, challenger, keypair, ciphertexts) = setup_session::<1>(4, "badproof");
        let mut rng = PCtx::get_rng();

        let prover =
            SessionProver::<PCtx, 1>::new(dir.clone(), challenger.clone(), keypair.pkey.clone());
        prover.prove(&ciphertexts, 1, false, &mut rng).unwrap();

        // a malformed proof commitment is substituted, not fatal
        dir.write_tree(
            &ProofDirectory::indexed(files::POS_COMMITMENT, 1),
            &ByteTree::leaf(vec![0xAB; 8]),
        )
        .unwrap();

        let verifier =
            SessionVerifier::<PCtx, 1>::new(dir.clone(), challenger.params().clone());
        assert_eq!(verifier.verify().unwrap(), Verdict::Reject);

        std::fs::remove_dir_all(dir.root()).unwrap();
    }
}
