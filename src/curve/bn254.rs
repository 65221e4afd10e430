use crate::group::{Element, PairingCurve as PC, Point, Scalar as Sc};
use ark_bn254::{Bn254, Fr, G1Projective, G2Projective};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::PrimeGroup;
use ark_ff::{Field, One, PrimeField, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::RngCore;
use serde::{
    de::Error as DeserializeError, ser::Error as SerializationError, Deserialize, Deserializer,
    Serialize, Serializer,
};
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use std::fmt;
use zeroize::Zeroize;

/// Element of the scalar field of BN254, i.e. an integer modulo the prime
/// subgroup order r.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scalar(
    #[serde(deserialize_with = "deserialize_canonical")]
    #[serde(serialize_with = "serialize_canonical")]
    Fr,
);

/// Point in the first source group of the pairing. Signatures and message
/// hashes live here; the compressed encoding is 32 bytes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct G1(
    #[serde(deserialize_with = "deserialize_canonical")]
    #[serde(serialize_with = "serialize_canonical")]
    G1Projective,
);

/// Point in the second source group of the pairing. Public keys live here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct G2(
    #[serde(deserialize_with = "deserialize_canonical")]
    #[serde(serialize_with = "serialize_canonical")]
    G2Projective,
);

/// Element of the pairing's target group.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GT(
    #[serde(deserialize_with = "deserialize_canonical")]
    #[serde(serialize_with = "serialize_canonical")]
    PairingOutput<Bn254>,
);

impl Element for Scalar {
    type RHS = Scalar;

    fn new() -> Self {
        Self(Zero::zero())
    }
    fn one() -> Self {
        Self(One::one())
    }
    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }
    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }
    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }
}

impl Sc for Scalar {
    fn set_int(&mut self, i: u64) {
        *self = Self(Fr::from(i))
    }

    fn inverse(&self) -> Option<Self> {
        Some(Self(Field::inverse(&self.0)?))
    }

    fn negate(&mut self) {
        *self = Self(-self.0)
    }

    fn sub(&mut self, other: &Self) {
        self.0 -= other.0;
    }

    fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

/// G1 points can be multiplied by Fr elements
impl Element for G1 {
    type RHS = Scalar;

    fn new() -> Self {
        Self(Zero::zero())
    }

    fn one() -> Self {
        Self(G1Projective::generator())
    }

    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }

    fn mul(&mut self, mul: &Scalar) {
        self.0 = self.0 * mul.0;
    }

    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(G1Projective::rand(rng))
    }
}

impl Point for G1 {
    type Error = Infallible;

    /// Simplified hash-to-group: the SHA-256 digest of the data is reduced
    /// into the scalar field and applied to the generator. Deterministic and
    /// always lands in the prime-order subgroup, but it is not RFC 9380 and
    /// the digest-mod-r distribution carries a small bias.
    fn map(&mut self, data: &[u8]) -> Result<(), Infallible> {
        let digest = Sha256::digest(data);
        let scalar = Fr::from_be_bytes_mod_order(&digest);
        self.0 = G1Projective::generator() * scalar;
        Ok(())
    }
}

impl fmt::Display for G1 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

/// G2 points can be multiplied by Fr elements
impl Element for G2 {
    type RHS = Scalar;

    fn new() -> Self {
        Self(Zero::zero())
    }

    fn one() -> Self {
        Self(G2Projective::generator())
    }

    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }

    fn mul(&mut self, mul: &Scalar) {
        self.0 = self.0 * mul.0;
    }

    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(G2Projective::rand(rng))
    }
}

impl Point for G2 {
    type Error = Infallible;

    /// Same simplified scalar-then-multiply construction as for G1.
    fn map(&mut self, data: &[u8]) -> Result<(), Infallible> {
        let digest = Sha256::digest(data);
        let scalar = Fr::from_be_bytes_mod_order(&digest);
        self.0 = G2Projective::generator() * scalar;
        Ok(())
    }
}

impl fmt::Display for G2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

impl Element for GT {
    type RHS = Scalar;

    fn new() -> Self {
        Self(Zero::zero())
    }
    fn one() -> Self {
        Self(PairingOutput::generator())
    }
    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }
    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }
    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(PairingOutput::rand(rng))
    }
}

impl fmt::Display for GT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

/// The BN254 pairing engine. Pairing arguments are ordered (G1, G2), so both
/// sides of the BLS verification equation are expressed in that order.
#[derive(Debug, Clone)]
pub struct PairingCurve;

impl PC for PairingCurve {
    type Scalar = Scalar;
    type G1 = G1;
    type G2 = G2;
    type GT = GT;

    fn pair(a: &Self::G1, b: &Self::G2) -> Self::GT {
        GT(Bn254::pairing(a.0, b.0))
    }
}

// Serde implementations: everything goes through the arkworks canonical
// compressed encoding.

fn deserialize_canonical<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: CanonicalDeserialize,
{
    let bytes = Vec::<u8>::deserialize(deserializer)?;
    C::deserialize_compressed(&mut &bytes[..]).map_err(DeserializeError::custom)
}

fn serialize_canonical<S, C>(c: &C, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    C: CanonicalSerialize,
{
    let mut bytes = Vec::with_capacity(c.compressed_size());
    c.serialize_compressed(&mut bytes)
        .map_err(SerializationError::custom)?;
    s.serialize_bytes(&bytes)
}
