use crate::group::{Element, PairingCurve, Point};
use rand_core::RngCore;
use std::marker::PhantomData;
use thiserror::Error;

/// BLSError are thrown out when using the BLS signature scheme.
#[derive(Debug, Error)]
pub enum BlsError {
    /// InvalidSig is raised when the validation routine of the BLS algorithm
    /// does not finish successfully, i.e. it is an invalid signature.
    #[error("invalid signature")]
    InvalidSig,

    #[error("could not hash to curve")]
    HashingError,
}

/// The plain BLS signature scheme over the given pairing curve, with private
/// keys as scalars, public keys in G2 and signatures in G1.
///
/// A signature is sig = private * H(msg), with H the simplified hash-to-G1
/// of the curve backend.
#[derive(Clone, Debug)]
pub struct Bls<C: PairingCurve> {
    m: PhantomData<C>,
}

impl<C> Bls<C>
where
    C: PairingCurve,
{
    /// Returns a new fresh keypair usable by the scheme.
    pub fn keypair<R: RngCore>(rng: &mut R) -> (C::Scalar, C::G2) {
        let private = C::Scalar::rand(rng);

        let mut public = C::G2::one();
        public.mul(&private);

        (private, public)
    }

    /// Maps the message to a point in G1.
    pub fn hash_to_g1(msg: &[u8]) -> Result<C::G1, BlsError> {
        let mut h = C::G1::new();
        h.map(msg).map_err(|_| BlsError::HashingError)?;
        Ok(h)
    }

    /// Signs the message with the provided private key.
    pub fn sign(private: &C::Scalar, msg: &[u8]) -> Result<C::G1, BlsError> {
        let mut h = Self::hash_to_g1(msg)?;
        h.mul(private);
        Ok(h)
    }

    /// Verifies that the signature on the provided message was produced by
    /// the public key.
    pub fn verify(public: &C::G2, msg: &[u8], sig: &C::G1) -> Result<(), BlsError> {
        let h = Self::hash_to_g1(msg)?;

        // e(sig, g2) == e(H(m), pub)
        // e(H(m), g2)^x == e(H(m), g2)^x
        let left = C::pair(sig, &C::G2::one());
        let right = C::pair(&h, public);
        if left != right {
            return Err(BlsError::InvalidSig);
        }

        Ok(())
    }
}
