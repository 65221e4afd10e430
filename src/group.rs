//! Traits for operating on prime-order groups and elliptic curves.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use zeroize::Zeroize;

/// Element represents an element of a group with the additive notation
/// which is also equipped with a multiplication transformation.
/// Two implementations are for Scalar which forms a ring so RHS is the same
/// and Point which can be multiplied by a scalar of its prime field.
pub trait Element:
    Clone + Display + Debug + Eq + Serialize + for<'a> Deserialize<'a> + PartialEq + Send + Sync
{
    /// The right-hand-side argument for multiplication
    type RHS;

    /// Returns the zero element of the group
    fn new() -> Self;

    /// Returns the one element of the group
    fn one() -> Self;

    /// Adds the RHS element to the LHS element in place
    fn add(&mut self, s2: &Self);

    /// Multiplies the LHS element by the RHS element in place
    fn mul(&mut self, mul: &Self::RHS);

    /// Samples a uniformly random element using the provided RNG
    fn rand<R: RngCore>(rng: &mut R) -> Self;

    /// Returns the zero element of the group
    fn zero() -> Self {
        Self::new()
    }
}

/// Scalar can be multiplied by only a Scalar, no other elements.
///
/// Scalars routinely hold secret material (private keys, shares, nonces), so
/// the trait requires [`Zeroize`] and owners wipe them on drop.
pub trait Scalar: Element<RHS = Self> + Zeroize {
    /// Sets the scalar to the given small integer.
    fn set_int(&mut self, i: u64);

    /// Returns the multiplicative inverse, or `None` for zero.
    fn inverse(&self) -> Option<Self>;

    /// Negates the scalar in place.
    fn negate(&mut self);

    /// Subtracts the other scalar in place.
    fn sub(&mut self, other: &Self);

    /// Interprets a 32-byte digest as a big-endian integer and reduces it
    /// modulo the field order.
    fn from_be_bytes_mod_order(bytes: &[u8]) -> Self;

    /// Raises the scalar to the given power by square-and-multiply.
    fn pow(&self, mut exp: u64) -> Self {
        let mut base = self.clone();
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc.mul(&base);
            }
            let sq = base.clone();
            base.mul(&sq);
            exp >>= 1;
        }
        acc
    }
}

/// Basic point functionality that can be multiplied by a scalar
pub trait Point: Element {
    /// Error which may occur while mapping to the group
    type Error: Debug;

    /// Maps the provided data to a group element
    fn map(&mut self, data: &[u8]) -> Result<(), <Self as Point>::Error>;
}

/// A group holds functionalities to create scalar and points related; it is
/// similar to the Engine definition, just much more simpler.
pub trait Curve: Clone + Debug + Send + Sync {
    /// The curve's scalar
    type Scalar: Scalar<RHS = Self::Scalar>;

    /// The curve's point
    type Point: Point<RHS = Self::Scalar>;

    /// scalar returns the identity element of the field.
    fn scalar() -> Self::Scalar {
        Self::Scalar::new()
    }

    /// point returns the default additive generator of the group.
    fn point() -> Self::Point {
        Self::Point::one()
    }
}

/// A curve usable for ECDSA: exposes the affine x-coordinate of a point
/// reduced into the scalar field, which is what the signature r-value is.
pub trait EcdsaCurve: Curve {
    /// Returns `x mod p` for the given point, or `None` for the identity.
    fn x_of(point: &Self::Point) -> Option<Self::Scalar>;
}

/// A curve equipped with a bilinear pairing operation.
pub trait PairingCurve: Debug {
    type Scalar: Scalar<RHS = Self::Scalar>;

    type G1: Point<RHS = Self::Scalar>;

    type G2: Point<RHS = Self::Scalar>;

    type GT: Element<RHS = Self::Scalar>;

    /// Performs a pairing operation between the 2 group elements
    fn pair(a: &Self::G1, b: &Self::G2) -> Self::GT;
}
