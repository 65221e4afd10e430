//! Threshold ECDSA in the shared-nonce variant: the committee behaves as if
//! it already agreed on a common ephemeral scalar k, so every partial carries
//! the same r-value and the s-components are valid Shamir shares of the full
//! s. Agreeing on k across real parties takes a multi-party protocol, which
//! is the caller's business; here a [`SigningRound`] owns the nonce for the
//! duration of one signing.

use crate::group::{EcdsaCurve, Element, Scalar};
use crate::poly::{Eval, Idx, Poly};
use crate::sig::ThresholdError;
use crate::Share;
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// One party's contribution to a signing round: the round's shared r-value
/// and the partial s-component s_i = k^-1 * (e + r * y_i).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EcdsaPartial<C: EcdsaCurve> {
    pub index: Idx,
    pub r: C::Scalar,
    pub s: C::Scalar,
}

/// A complete ECDSA signature. Both components serialize as 32-byte
/// big-endian scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EcdsaSignature<C: EcdsaCurve> {
    pub r: C::Scalar,
    pub s: C::Scalar,
}

/// The ephemeral state of one signing round.
///
/// All partials of a round must be produced under the same nonce, so the
/// round samples k once on first use and hands the same value to every
/// signer. The caller owns the round: one round per message, never reused,
/// and the nonce is wiped when the round is dropped or abandoned. Two rounds
/// sharing a nonce would leak the key through two equations in one unknown.
pub struct SigningRound<C: EcdsaCurve> {
    nonce: Option<C::Scalar>,
}

impl<C: EcdsaCurve> SigningRound<C> {
    /// Begins a round. The nonce is sampled lazily by the first partial.
    pub fn new() -> Self {
        Self { nonce: None }
    }

    /// Returns the round nonce, sampling a nonzero scalar on first use.
    fn nonce<R: RngCore>(&mut self, rng: &mut R) -> C::Scalar {
        match &self.nonce {
            Some(k) => k.clone(),
            None => {
                let mut k = C::Scalar::rand(rng);
                while k == C::Scalar::zero() {
                    k = C::Scalar::rand(rng);
                }
                self.nonce = Some(k.clone());
                k
            }
        }
    }
}

impl<C: EcdsaCurve> Default for SigningRound<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EcdsaCurve> Drop for SigningRound<C> {
    fn drop(&mut self) {
        if let Some(k) = self.nonce.as_mut() {
            k.zeroize();
        }
    }
}

/// A (t, n) threshold ECDSA instance as set up by a trusted dealer.
///
/// The dealer samples the master key sk, publishes Q = sk * g and splits sk
/// into one Shamir share per party. Signing happens per round: each selected
/// party derives its partial under the round nonce, and any t partials with
/// a consistent r-value recombine into a standard ECDSA signature.
pub struct EcdsaThreshold<C: EcdsaCurve> {
    threshold: usize,
    parties: usize,
    master: C::Scalar,
    public_key: C::Point,
    shares: Vec<Share<C::Scalar>>,
}

impl<C> EcdsaThreshold<C>
where
    C: EcdsaCurve,
{
    /// Runs the dealer: samples a nonzero master key and splits it among
    /// `parties` shares with reconstruction threshold `threshold`.
    pub fn new<R: RngCore>(
        threshold: usize,
        parties: usize,
        rng: &mut R,
    ) -> Result<Self, ThresholdError> {
        if threshold < 1 || threshold > parties {
            return Err(ThresholdError::InvalidConfig {
                t: threshold,
                n: parties,
            });
        }

        let mut master = C::Scalar::rand(rng);
        while master == C::Scalar::zero() {
            master = C::Scalar::rand(rng);
        }
        let mut public_key = C::Point::one();
        public_key.mul(&master);

        let mut poly = Poly::new_with_constant(master.clone(), threshold - 1, rng);
        let shares = (1..=parties as Idx)
            .map(|i| {
                let eval = poly.eval(i);
                Share {
                    index: eval.index,
                    private: eval.value,
                }
            })
            .collect();
        poly.zeroize();

        Ok(Self {
            threshold,
            parties,
            master,
            public_key,
            shares,
        })
    }

    /// Returns the reconstruction threshold t.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the number of parties n.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Returns the group public key Q = sk * g.
    pub fn public_key(&self) -> &C::Point {
        &self.public_key
    }

    /// Returns the private share of the given party.
    pub fn share(&self, id: Idx) -> Result<&Share<C::Scalar>, ThresholdError> {
        if id < 1 || id as usize > self.parties {
            return Err(ThresholdError::UnknownParty(id, self.parties));
        }
        Ok(&self.shares[(id - 1) as usize])
    }

    /// Partially signs a message within the given round:
    /// s_i = k^-1 * (e + r * y_i) with e the reduced message digest and
    /// r the x-coordinate of k * g.
    ///
    /// Fails with `InvalidNonce` if the round nonce maps to r = 0; the
    /// caller then abandons the round and begins a fresh one.
    pub fn partial_sign<R: RngCore>(
        &self,
        round: &mut SigningRound<C>,
        id: Idx,
        msg: &[u8],
        rng: &mut R,
    ) -> Result<EcdsaPartial<C>, ThresholdError> {
        let share = self.share(id)?;

        let digest = C::Scalar::from_be_bytes_mod_order(&Sha256::digest(msg));

        let mut k = round.nonce(rng);
        let mut commit = C::Point::one();
        commit.mul(&k);

        // r = (k * g).x mod p; the identity cannot occur since k != 0
        let r = match C::x_of(&commit) {
            Some(x) if x != C::Scalar::zero() => x,
            _ => return Err(ThresholdError::InvalidNonce),
        };

        let mut k_inv = match k.inverse() {
            Some(inv) => inv,
            None => return Err(ThresholdError::InvalidNonce),
        };
        k.zeroize();

        let mut s = r.clone();
        s.mul(&share.private);
        s.add(&digest);
        s.mul(&k_inv);
        k_inv.zeroize();

        Ok(EcdsaPartial { index: id, r, s })
    }

    /// Combines partial signatures of one round into a full signature.
    ///
    /// All supplied partials must agree on r. The s-components of the first
    /// t partials are Shamir shares of the full s and are interpolated at
    /// zero, which recovers exactly the single-key s = k^-1 * (e + r * sk).
    pub fn combine(
        &self,
        partials: &[EcdsaPartial<C>],
    ) -> Result<EcdsaSignature<C>, ThresholdError> {
        if partials.len() < self.threshold {
            return Err(ThresholdError::InsufficientSigners(
                partials.len(),
                self.threshold,
            ));
        }

        let r = partials[0].r.clone();
        if partials.iter().any(|partial| partial.r != r) {
            return Err(ThresholdError::InconsistentNonce);
        }

        let evals = partials
            .iter()
            .map(|partial| Eval {
                index: partial.index,
                value: partial.s.clone(),
            })
            .collect::<Vec<_>>();
        let s = Poly::<C::Scalar>::recover(self.threshold, &evals)?;

        if s == C::Scalar::zero() {
            return Err(ThresholdError::InvalidNonce);
        }

        Ok(EcdsaSignature { r, s })
    }

    /// Standard ECDSA verification of (r, s) against the group public key.
    /// Any failure reports `false`.
    pub fn verify(&self, sig: &EcdsaSignature<C>, msg: &[u8]) -> bool {
        let zero = C::Scalar::zero();
        if sig.r == zero || sig.s == zero {
            return false;
        }

        let w = match sig.s.inverse() {
            Some(w) => w,
            None => return false,
        };

        let mut u1 = C::Scalar::from_be_bytes_mod_order(&Sha256::digest(msg));
        u1.mul(&w);
        let mut u2 = sig.r.clone();
        u2.mul(&w);

        // u1 * g + u2 * Q
        let mut point = C::Point::one();
        point.mul(&u1);
        let mut shifted = self.public_key.clone();
        shifted.mul(&u2);
        point.add(&shifted);

        match C::x_of(&point) {
            Some(x) => x == sig.r,
            None => false,
        }
    }
}

impl<C: EcdsaCurve> Drop for EcdsaThreshold<C> {
    fn drop(&mut self) {
        self.master.zeroize();
        for share in self.shares.iter_mut() {
            share.private.zeroize();
        }
    }
}

#[cfg(feature = "secp256k1")]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::secp256k1::{Scalar as Sc, Secp256k1Curve};
    use crate::poly::PolyError;
    use rand::prelude::*;

    const MSG: &[u8] = b"Hello, Threshold Signature!";

    fn setup() -> EcdsaThreshold<Secp256k1Curve> {
        EcdsaThreshold::new(3, 5, &mut thread_rng()).unwrap()
    }

    fn committee_sign(
        scheme: &EcdsaThreshold<Secp256k1Curve>,
        round: &mut SigningRound<Secp256k1Curve>,
        signers: &[Idx],
        msg: &[u8],
    ) -> Vec<EcdsaPartial<Secp256k1Curve>> {
        signers
            .iter()
            .map(|id| {
                scheme
                    .partial_sign(round, *id, msg, &mut thread_rng())
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn invalid_config() {
        for (t, n) in [(0, 5), (6, 5), (1, 0)] {
            match EcdsaThreshold::<Secp256k1Curve>::new(t, n, &mut thread_rng()) {
                Err(ThresholdError::InvalidConfig { .. }) => (),
                res => panic!("expected invalid config for ({}, {}), got {:?}", t, n, res.is_ok()),
            }
        }
    }

    #[test]
    fn unknown_party() {
        let scheme = setup();
        let mut round = SigningRound::new();
        for id in [0, 6] {
            match scheme.partial_sign(&mut round, id, MSG, &mut thread_rng()) {
                Err(ThresholdError::UnknownParty(bad, 5)) => assert_eq!(bad, id),
                res => panic!("expected unknown party, got {:?}", res.is_ok()),
            }
        }
    }

    #[test]
    fn quorum_signs_and_verifies() {
        let scheme = setup();
        let mut round = SigningRound::new();
        let partials = committee_sign(&scheme, &mut round, &[1, 3, 5], MSG);

        // every partial of the round carries the same r
        assert!(partials.iter().all(|p| p.r == partials[0].r));

        let sig = scheme.combine(&partials).unwrap();
        assert!(scheme.verify(&sig, MSG));
    }

    #[test]
    fn matches_single_key_signature() {
        // interpolating the partial s-components must give exactly
        // s = k^-1 * (e + r * sk)
        let scheme = setup();
        let mut round = SigningRound::new();
        let partials = committee_sign(&scheme, &mut round, &[2, 4, 5], MSG);
        let sig = scheme.combine(&partials).unwrap();

        let k = round.nonce.clone().unwrap();
        let k_inv = k.inverse().unwrap();
        let mut expected = sig.r.clone();
        expected.mul(&scheme.master);
        expected.add(&Sc::from_be_bytes_mod_order(&Sha256::digest(MSG)));
        expected.mul(&k_inv);

        assert_eq!(sig.s, expected);
    }

    #[test]
    fn committees_agree_under_one_nonce() {
        // with the nonce fixed by the round, the interpolated s is the same
        // no matter which committee signs
        let scheme = setup();
        let mut round = SigningRound::new();

        let sig_a = scheme
            .combine(&committee_sign(&scheme, &mut round, &[1, 3, 5], MSG))
            .unwrap();
        let sig_b = scheme
            .combine(&committee_sign(&scheme, &mut round, &[2, 4, 5], MSG))
            .unwrap();

        assert_eq!(sig_a, sig_b);
        assert!(scheme.verify(&sig_a, MSG));
    }

    #[test]
    fn below_threshold() {
        let scheme = setup();
        let mut round = SigningRound::new();
        let partials = committee_sign(&scheme, &mut round, &[1, 2], MSG);
        match scheme.combine(&partials) {
            Err(ThresholdError::InsufficientSigners(2, 3)) => (),
            res => panic!("expected insufficient signers, got {:?}", res.is_ok()),
        }
    }

    #[test]
    fn mixed_rounds_rejected() {
        // partials from two rounds disagree on r and must not combine
        let scheme = setup();
        let mut round_a = SigningRound::new();
        let mut round_b = SigningRound::new();

        let mut partials = committee_sign(&scheme, &mut round_a, &[1, 3], MSG);
        partials.extend(committee_sign(&scheme, &mut round_b, &[5], MSG));

        match scheme.combine(&partials) {
            Err(ThresholdError::InconsistentNonce) => (),
            res => panic!("expected inconsistent nonce, got {:?}", res.is_ok()),
        }
    }

    #[test]
    fn duplicate_signers_rejected() {
        let scheme = setup();
        let mut round = SigningRound::new();
        let partials = committee_sign(&scheme, &mut round, &[2, 2, 3], MSG);
        match scheme.combine(&partials) {
            Err(ThresholdError::InvalidInput(PolyError::DuplicateIndex(2))) => (),
            res => panic!("expected duplicate index, got {:?}", res.is_ok()),
        }
    }

    #[test]
    fn distinct_rounds_distinct_nonces() {
        let scheme = setup();
        let mut round_a = SigningRound::new();
        let mut round_b = SigningRound::new();

        let sig_a = scheme
            .combine(&committee_sign(&scheme, &mut round_a, &[1, 2, 3], MSG))
            .unwrap();
        let sig_b = scheme
            .combine(&committee_sign(&scheme, &mut round_b, &[1, 2, 3], MSG))
            .unwrap();

        // both verify; the r-values differ with overwhelming probability
        assert!(scheme.verify(&sig_a, MSG));
        assert!(scheme.verify(&sig_b, MSG));
        assert_ne!(sig_a.r, sig_b.r);
    }

    #[test]
    fn tampering_detected() {
        let scheme = setup();
        let mut round = SigningRound::new();
        let sig = scheme
            .combine(&committee_sign(&scheme, &mut round, &[1, 3, 5], MSG))
            .unwrap();

        assert!(!scheme.verify(&sig, b"some other message"));

        let mut bad_s = sig.clone();
        bad_s.s.add(&Sc::one());
        assert!(!scheme.verify(&bad_s, MSG));

        let mut bad_r = sig.clone();
        bad_r.r.add(&Sc::one());
        assert!(!scheme.verify(&bad_r, MSG));

        let mut zeroed = sig;
        zeroed.s = Sc::zero();
        assert!(!scheme.verify(&zeroed, MSG));
    }

    #[test]
    fn partial_serde_roundtrip() {
        let scheme = setup();
        let mut round = SigningRound::new();
        let partial = scheme
            .partial_sign(&mut round, 4, MSG, &mut thread_rng())
            .unwrap();
        let buff = bincode::serialize(&partial).unwrap();
        let back: EcdsaPartial<Secp256k1Curve> = bincode::deserialize(&buff).unwrap();
        assert_eq!(partial, back);
    }
}
