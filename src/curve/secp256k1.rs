use crate::group::{Curve, EcdsaCurve, Element, Point, Scalar as Sc};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, Group, PrimeField};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, U256};
use rand_core::RngCore;
use serde::{
    de::Error as DeserializeError, Deserialize, Deserializer, Serialize, Serializer,
};
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use std::fmt;
use zeroize::Zeroize;

type KScalar = k256::Scalar;

/// Element of the scalar field of secp256k1, i.e. an integer modulo the
/// curve order n. Serialized as 32 big-endian bytes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scalar(
    #[serde(deserialize_with = "deserialize_scalar")]
    #[serde(serialize_with = "serialize_scalar")]
    KScalar,
);

/// Point on secp256k1. Serialized in SEC1 compressed form.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct G(
    #[serde(deserialize_with = "deserialize_point")]
    #[serde(serialize_with = "serialize_point")]
    ProjectivePoint,
);

impl Element for Scalar {
    type RHS = Scalar;

    fn new() -> Self {
        Self(KScalar::ZERO)
    }
    fn one() -> Self {
        Self(KScalar::ONE)
    }
    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }
    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }
    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(KScalar::random(&mut *rng))
    }
}

impl Sc for Scalar {
    fn set_int(&mut self, i: u64) {
        *self = Self(KScalar::from(i))
    }

    fn inverse(&self) -> Option<Self> {
        Option::<KScalar>::from(self.0.invert()).map(Self)
    }

    fn negate(&mut self) {
        *self = Self(-self.0)
    }

    fn sub(&mut self, other: &Self) {
        self.0 -= other.0;
    }

    fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), 32);
        Self(<KScalar as Reduce<U256>>::reduce(U256::from_be_slice(bytes)))
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

impl Element for G {
    type RHS = Scalar;

    fn new() -> Self {
        Self(ProjectivePoint::IDENTITY)
    }

    fn one() -> Self {
        Self(ProjectivePoint::GENERATOR)
    }

    fn add(&mut self, s2: &Self) {
        self.0 += s2.0;
    }

    fn mul(&mut self, mul: &Scalar) {
        self.0 *= mul.0;
    }

    fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(ProjectivePoint::random(&mut *rng))
    }
}

impl Point for G {
    type Error = Infallible;

    /// Simplified hash-to-group: the SHA-256 digest of the data is reduced
    /// into the scalar field and applied to the generator.
    fn map(&mut self, data: &[u8]) -> Result<(), Infallible> {
        let digest = Sha256::digest(data);
        let scalar = <KScalar as Reduce<U256>>::reduce(U256::from_be_slice(&digest));
        self.0 = ProjectivePoint::GENERATOR * scalar;
        Ok(())
    }
}

impl fmt::Display for G {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{:?}}}", self.0)
    }
}

/// The secp256k1 curve with its scalar field, as used by ECDSA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secp256k1Curve {}

impl Curve for Secp256k1Curve {
    type Scalar = Scalar;
    type Point = G;
}

impl EcdsaCurve for Secp256k1Curve {
    fn x_of(point: &G) -> Option<Scalar> {
        if bool::from(point.0.is_identity()) {
            return None;
        }
        let x = point.0.to_affine().x();
        Some(Scalar(<KScalar as Reduce<U256>>::reduce_bytes(&x)))
    }
}

// Serde implementations

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<KScalar, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = Vec::<u8>::deserialize(deserializer)?;
    let repr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(DeserializeError::custom)?;
    Option::<KScalar>::from(KScalar::from_repr(repr.into()))
        .ok_or_else(|| DeserializeError::custom("scalar is not canonical"))
}

fn serialize_scalar<S>(c: &KScalar, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_bytes(&c.to_bytes())
}

fn deserialize_point<'de, D>(deserializer: D) -> Result<ProjectivePoint, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = Vec::<u8>::deserialize(deserializer)?;
    let encoded = EncodedPoint::from_bytes(&bytes).map_err(DeserializeError::custom)?;
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .map(ProjectivePoint::from)
        .ok_or_else(|| DeserializeError::custom("point is not on the curve"))
}

fn serialize_point<S>(c: &ProjectivePoint, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_bytes(c.to_affine().to_encoded_point(true).as_bytes())
}
