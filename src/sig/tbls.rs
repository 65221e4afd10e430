//! Threshold BLS built on the plain scheme: a trusted dealer splits the
//! master key into Shamir shares, each party signs with its share, and any
//! threshold-sized subset of partials recombines into the master signature
//! via Lagrange interpolation in G1.

use crate::group::{Element, PairingCurve};
use crate::poly::{Eval, Idx, Poly};
use crate::sig::bls::Bls;
use crate::sig::ThresholdError;
use crate::Share;
use rand_core::RngCore;
use zeroize::Zeroize;

/// A partial BLS signature: the signer's index together with its
/// contribution sigma_i = y_i * H(msg).
pub type BlsPartial<C> = Eval<<C as PairingCurve>::G1>;

/// A (t, n) threshold BLS instance as set up by a trusted dealer.
///
/// The dealer samples the master key, splits it into one share per party and
/// publishes the group public key PK = sk * g2 along with one public key
/// share pk_i = y_i * g2 per party, against which partial signatures are
/// verified. The sharing polynomial is wiped as soon as the shares exist.
pub struct BlsThreshold<C: PairingCurve> {
    threshold: usize,
    parties: usize,
    master: C::Scalar,
    public_key: C::G2,
    shares: Vec<Share<C::Scalar>>,
    public_shares: Vec<C::G2>,
}

impl<C> BlsThreshold<C>
where
    C: PairingCurve,
{
    /// Runs the dealer: samples a master key and splits it among `parties`
    /// shares with reconstruction threshold `threshold`.
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

        let master = C::Scalar::rand(rng);
        let mut public_key = C::G2::one();
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
            .collect::<Vec<_>>();
        poly.zeroize();

        let public_shares = shares
            .iter()
            .map(|share| {
                let mut pk = C::G2::one();
                pk.mul(&share.private);
                pk
            })
            .collect();

        Ok(Self {
            threshold,
            parties,
            master,
            public_key,
            shares,
            public_shares,
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

    /// Returns the group public key PK = sk * g2.
    pub fn public_key(&self) -> &C::G2 {
        &self.public_key
    }

    /// Returns the private share of the given party.
    pub fn share(&self, id: Idx) -> Result<&Share<C::Scalar>, ThresholdError> {
        if id < 1 || id as usize > self.parties {
            return Err(ThresholdError::UnknownParty(id, self.parties));
        }
        Ok(&self.shares[(id - 1) as usize])
    }

    /// Returns the public key share pk_i of the given party.
    pub fn public_share(&self, id: Idx) -> Result<&C::G2, ThresholdError> {
        if id < 1 || id as usize > self.parties {
            return Err(ThresholdError::UnknownParty(id, self.parties));
        }
        Ok(&self.public_shares[(id - 1) as usize])
    }

    /// Partially signs a message with the share of the given party.
    pub fn partial_sign(&self, id: Idx, msg: &[u8]) -> Result<BlsPartial<C>, ThresholdError> {
        let share = self.share(id)?;
        let sig = Bls::<C>::sign(&share.private, msg)?;
        Ok(Eval {
            value: sig,
            index: id,
        })
    }

    /// Verifies a partial signature against the signer's public key share:
    /// e(sigma_i, g2) == e(H(m), pk_i). Any failure, including an unknown
    /// signer index, reports `false`.
    pub fn verify_partial(&self, partial: &BlsPartial<C>, msg: &[u8]) -> bool {
        match self.public_share(partial.index) {
            Ok(pk) => Bls::<C>::verify(pk, msg, &partial.value).is_ok(),
            Err(_) => false,
        }
    }

    /// Combines partial signatures into the master signature. The first t
    /// partials in supplied order are interpolated at zero; their signer
    /// indices must be pairwise distinct. The result is independent of which
    /// committee signed: it always equals sk * H(msg).
    pub fn combine(&self, partials: &[BlsPartial<C>]) -> Result<C::G1, ThresholdError> {
        if partials.len() < self.threshold {
            return Err(ThresholdError::InsufficientSigners(
                partials.len(),
                self.threshold,
            ));
        }

        let sig = Poly::<C::G1>::recover(self.threshold, partials)?;
        Ok(sig)
    }

    /// Verifies a combined signature against the group public key. Any
    /// failure reports `false`.
    pub fn verify(&self, sig: &C::G1, msg: &[u8]) -> bool {
        Bls::<C>::verify(&self.public_key, msg, sig).is_ok()
    }
}

impl<C: PairingCurve> Drop for BlsThreshold<C> {
    fn drop(&mut self) {
        self.master.zeroize();
        for share in self.shares.iter_mut() {
            share.private.zeroize();
        }
    }
}
