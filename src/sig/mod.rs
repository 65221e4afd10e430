use crate::poly::{Idx, PolyError};
use thiserror::Error;

mod bls;
pub use bls::{Bls, BlsError};

mod tbls;
pub use tbls::{BlsPartial, BlsThreshold};

mod tecdsa;
pub use tecdsa::{EcdsaPartial, EcdsaSignature, EcdsaThreshold, SigningRound};

/// Errors surfaced by the threshold schemes.
///
/// Verification routines never return these: a verification that fails for
/// any reason, including malformed inputs, reports `false`.
#[derive(Debug, Error)]
pub enum ThresholdError {
    /// The (threshold, parties) pair does not satisfy 1 <= t <= n.
    #[error("invalid configuration: threshold {t} with {n} parties")]
    InvalidConfig { t: usize, n: usize },

    /// The party id is outside 1..=n.
    #[error("unknown party {0}, ids go from 1 to {1}")]
    UnknownParty(Idx, usize),

    /// Fewer partial signatures than the threshold were supplied.
    #[error("not enough partial signatures: {0}/{1}")]
    InsufficientSigners(usize, usize),

    /// ECDSA partials of one round disagree on the r-value, i.e. they were
    /// produced under different nonces.
    #[error("partial signatures disagree on the nonce r-value")]
    InconsistentNonce,

    /// Malformed combination input: duplicate signer ids, the reserved
    /// index 0, or a denominator that cannot be inverted.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] PolyError),

    /// The round nonce produced a zero signature component; the caller must
    /// begin a fresh round.
    #[error("nonce produced a zero signature component")]
    InvalidNonce,

    /// The underlying signature scheme failed.
    #[error("signing error: {0}")]
    Signature(#[from] BlsError),
}
