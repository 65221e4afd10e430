//! # Threshold Signatures
//!
//! t-of-n threshold signing over a Shamir secret-sharing substrate: a trusted
//! dealer splits a master key into n shares so that any t parties can
//! cooperatively produce a signature verifying under the single group public
//! key, while fewer than t parties cannot.
//!
//! Two schemes are provided side by side:
//!
//! - **BLS** over the BN254 pairing curve ([`sig::BlsThreshold`]): partials
//!   are combined non-interactively by Lagrange interpolation in G1, and the
//!   aggregate is unique — every committee produces the same signature.
//! - **ECDSA** over secp256k1 ([`sig::EcdsaThreshold`]): the shared-nonce
//!   variant, where one [`sig::SigningRound`] owns the ephemeral scalar k and
//!   the s-components of the partials interpolate to the single-key s.
//!
//! Curve arithmetic is abstracted behind the traits in [`group`] and
//! instantiated by the backends in [`curve`], each behind a cargo feature of
//! the same name.

use serde::{Deserialize, Serialize};

/// Curve implementations for the traits defined in the [`group`] module.
pub mod curve;

/// Definitions of generic traits with scalars of prime fields and points on
/// elliptic curves.
pub mod group;

/// Implementation of a polynomial suitable to be used for secret sharing
/// schemes. It can evaluate and interpolate private shares as well as group
/// elements such as partial signatures.
pub mod poly;

/// Signature scheme implementations: plain BLS, threshold BLS and threshold
/// ECDSA, together with their error taxonomy.
pub mod sig;

pub type Index = poly::Idx;

/// A private share of the master secret, assigned to the party at `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share<S> {
    pub index: Index,
    pub private: S,
}

/// Pre-instantiated schemes for each compiled-in curve
pub mod schemes {
    /// BN254 BLS schemes
    #[cfg(feature = "bn254")]
    pub mod bn254 {
        use crate::curve::bn254::PairingCurve;

        /// Single-key BLS, public keys on G2 and signatures on G1
        pub type Bls = crate::sig::Bls<PairingCurve>;
        /// Threshold BLS dealer context
        pub type BlsThreshold = crate::sig::BlsThreshold<PairingCurve>;
        /// A partial BLS signature
        pub type BlsPartial = crate::sig::BlsPartial<PairingCurve>;
    }

    /// secp256k1 ECDSA schemes
    #[cfg(feature = "secp256k1")]
    pub mod secp256k1 {
        use crate::curve::secp256k1::Secp256k1Curve;

        /// Threshold ECDSA dealer context
        pub type EcdsaThreshold = crate::sig::EcdsaThreshold<Secp256k1Curve>;
        /// The per-message nonce owner
        pub type SigningRound = crate::sig::SigningRound<Secp256k1Curve>;
        /// A partial ECDSA signature
        pub type EcdsaPartial = crate::sig::EcdsaPartial<Secp256k1Curve>;
        /// A combined (r, s) signature
        pub type EcdsaSignature = crate::sig::EcdsaSignature<Secp256k1Curve>;
    }
}
