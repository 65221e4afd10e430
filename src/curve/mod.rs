#[cfg(feature = "bn254")]
pub mod bn254;
#[cfg(feature = "secp256k1")]
pub mod secp256k1;
