use crate::group::{Element, Scalar};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use thiserror::Error;
use zeroize::Zeroize;

/// Party index of a share. The index doubles as the Shamir x-coordinate, so
/// index 0 is reserved for the secret itself and is never a valid index.
pub type Idx = u32;

/// A polynomial evaluation at a party index. Doubles as the carrier for BLS
/// partial signatures, where `value` is the partial signature point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eval<A> {
    pub value: A,
    pub index: Idx,
}

impl<A: fmt::Display> fmt::Display for Eval<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ idx: {}, value: {} }}", self.index, self.value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolyError {
    #[error("invalid recovery: only has {0}/{1} shares")]
    NotEnoughShares(usize, usize),
    #[error("duplicate share index {0}")]
    DuplicateIndex(Idx),
    #[error("share index 0 is reserved for the secret")]
    ZeroIndex,
    #[error("could not invert scalar")]
    NoInverse,
}

/// A polynomial that is using a scalar for the variable x and a generic
/// element for the coefficients. The coefficients must be able to multiply
/// the type of the variable, which is always a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poly<C>(Vec<C>);

impl<C> Poly<C> {
    /// Returns the degree of the polynomial
    pub fn degree(&self) -> usize {
        // e.g. c_3 * x^3 + c_2 * x^2 + c_1 * x + c_0
        // ^ 4 coefficients correspond to a 3rd degree poly
        self.0.len() - 1
    }
}

impl<C: Element> Poly<C> {
    /// Returns a new polynomial of the given degree where each coefficient is
    /// sampled at random from the given RNG.
    /// In the context of secret sharing, the threshold is the degree + 1.
    pub fn new_from<R: RngCore>(degree: usize, rng: &mut R) -> Self {
        let coeffs: Vec<C> = (0..=degree).map(|_| C::rand(rng)).collect();
        Self::from(coeffs)
    }

    /// Returns a new polynomial of the given degree where each coefficient is
    /// sampled at random.
    ///
    /// In the context of secret sharing, the threshold is the degree + 1.
    pub fn new(degree: usize) -> Self {
        use rand::prelude::*;
        Self::new_from(degree, &mut thread_rng())
    }

    /// Returns a new polynomial with the given constant term and all higher
    /// coefficients sampled at random. Sharing a secret means sharing the
    /// constant term of such a polynomial.
    pub fn new_with_constant<R: RngCore>(constant: C, degree: usize, rng: &mut R) -> Self {
        let mut coeffs = Vec::with_capacity(degree + 1);
        coeffs.push(constant);
        coeffs.extend((0..degree).map(|_| C::rand(rng)));
        Self::from(coeffs)
    }

    /// Returns the constant term of the polynomial. For a private polynomial
    /// this is the shared secret, for a public one the threshold public key.
    pub fn free_coeff(&self) -> &C {
        &self.0[0]
    }
}

impl<C> Poly<C>
where
    C: Element,
    C::RHS: Scalar<RHS = C::RHS>,
{
    /// Evaluates the polynomial at the given index using Horner's scheme.
    ///
    /// The index is used directly as the x-coordinate. It must never be 0:
    /// evaluating at zero would hand out the constant term, i.e. the secret.
    pub fn eval(&self, i: Idx) -> Eval<C> {
        debug_assert!(i > 0, "evaluating at 0 would reveal the free coefficient");
        let mut xi = C::RHS::new();
        xi.set_int(i.into());

        let res = self.0.iter().rev().fold(C::zero(), |mut sum, coeff| {
            sum.mul(&xi);
            sum.add(coeff);
            sum
        });

        Eval {
            value: res,
            index: i,
        }
    }

    /// Computes the Lagrange basis coefficient at x = 0 for the share at
    /// `index` within the set of x-values `indices`:
    ///
    /// `L_i = prod_{j != i} x_j * (x_j - x_i)^-1 mod p`
    ///
    /// so that `sum_i L_i * f(x_i) = f(0)` for any polynomial f of degree
    /// less than the set size. The indices must be pairwise distinct and
    /// contain `index`; a duplicate makes a denominator zero and the call
    /// fails with `NoInverse`.
    pub fn lagrange_coefficient(index: Idx, indices: &[Idx]) -> Result<C::RHS, PolyError> {
        let mut xi = C::RHS::new();
        xi.set_int(index.into());

        let mut num = C::RHS::one();
        let mut den = C::RHS::one();
        for &j in indices {
            if j == index {
                continue;
            }

            let mut xj = C::RHS::new();
            xj.set_int(j.into());

            // xj - 0
            num.mul(&xj);

            // xj - xi
            xj.sub(&xi);
            den.mul(&xj);
        }

        let inv = den.inverse().ok_or(PolyError::NoInverse)?;
        num.mul(&inv);
        Ok(num)
    }

    /// Given at least `t` polynomial evaluations, recovers the polynomial's
    /// constant term from the first `t` of them, in the order supplied.
    pub fn recover(t: usize, shares: &[Eval<C>]) -> Result<C, PolyError> {
        let xs = Self::share_map(t, shares)?;
        let indices: Vec<Idx> = xs.keys().copied().collect();

        // iterate over all indices and for each multiply the lagrange basis
        // with the value of the share
        let mut acc = C::zero();
        for (idx, value) in &xs {
            let li = Self::lagrange_coefficient(*idx, &indices)?;
            let mut yi = (*value).clone();
            yi.mul(&li);
            acc.add(&yi);
        }

        Ok(acc)
    }

    /// Selects the first `t` shares and indexes them by their x-value,
    /// rejecting duplicates and the reserved index 0.
    fn share_map(t: usize, shares: &[Eval<C>]) -> Result<BTreeMap<Idx, &C>, PolyError> {
        if shares.len() < t {
            return Err(PolyError::NotEnoughShares(shares.len(), t));
        }

        let mut xs = BTreeMap::new();
        for share in shares.iter().take(t) {
            if share.index == 0 {
                return Err(PolyError::ZeroIndex);
            }
            if xs.insert(share.index, &share.value).is_some() {
                return Err(PolyError::DuplicateIndex(share.index));
            }
        }

        debug_assert_eq!(xs.len(), t);

        Ok(xs)
    }
}

impl<C: Element> From<Vec<C>> for Poly<C> {
    fn from(c: Vec<C>) -> Self {
        Self(c)
    }
}

impl<C: Element + Zeroize> Zeroize for Poly<C> {
    fn zeroize(&mut self) {
        for coeff in self.0.iter_mut() {
            coeff.zeroize();
        }
    }
}

impl<C: fmt::Display> fmt::Display for Poly<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self
            .0
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}: {}", i, c))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "[deg: {}, coeffs: [{}]]", self.degree(), s)
    }
}

#[cfg(feature = "bn254")]
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::curve::bn254::Scalar as Sc;
    use rand::prelude::*;

    #[test]
    fn poly_degree() {
        let s = 5;
        let p = Poly::<Sc>::new(s);
        assert_eq!(p.0.len(), s + 1);
        assert_eq!(p.degree(), s);
    }

    #[test]
    fn fixed_constant() {
        let secret = Sc::rand(&mut thread_rng());
        let p = Poly::<Sc>::new_with_constant(secret.clone(), 3, &mut thread_rng());
        assert_eq!(p.degree(), 3);
        assert_eq!(p.free_coeff(), &secret);
    }

    #[test]
    fn lagrange_pair() {
        // L_1 over the set {1, 2} is 2 / (2 - 1) = 2
        let l1 = Poly::<Sc>::lagrange_coefficient(1, &[1, 2]).unwrap();
        let mut two = Sc::new();
        two.set_int(2);
        assert_eq!(l1, two);

        // L_2 over the set {1, 2} is 1 / (1 - 2) = -1
        let l2 = Poly::<Sc>::lagrange_coefficient(2, &[1, 2]).unwrap();
        let mut minus_one = Sc::one();
        minus_one.negate();
        assert_eq!(l2, minus_one);
    }

    #[test]
    fn lagrange_single() {
        // a single share interpolates a constant
        let l = Poly::<Sc>::lagrange_coefficient(4, &[4]).unwrap();
        assert_eq!(l, Sc::one());
    }

    #[test]
    fn recover_duplicate_index() {
        let poly = Poly::<Sc>::new(2);
        let mut shares = vec![poly.eval(1), poly.eval(2), poly.eval(3)];
        shares[2] = shares[0].clone();
        match Poly::<Sc>::recover(3, &shares) {
            Err(PolyError::DuplicateIndex(1)) => (),
            res => panic!("expected duplicate index error, got {:?}", res),
        }
    }

    #[test]
    fn recover_zero_index() {
        let poly = Poly::<Sc>::new(1);
        let shares = vec![
            Eval {
                index: 0,
                value: poly.free_coeff().clone(),
            },
            poly.eval(1),
        ];
        assert_eq!(Poly::<Sc>::recover(2, &shares), Err(PolyError::ZeroIndex));
    }

    #[test]
    fn recover_insufficient_shares() {
        let degree = 4;
        let threshold = degree + 1;
        let poly = Poly::<Sc>::new(degree);

        // insufficient shares gathered
        let shares = (1..threshold as Idx)
            .map(|i| poly.eval(i))
            .collect::<Vec<_>>();

        Poly::<Sc>::recover(threshold, &shares).unwrap_err();
    }

    #[test]
    fn recover_first_t_in_order() {
        let poly = Poly::<Sc>::new(1);
        let expected = poly.free_coeff().clone();

        // five shares supplied, only the first two may be touched
        let mut shares = (1..=5 as Idx).map(|i| poly.eval(i)).collect::<Vec<_>>();
        shares[2].value = Sc::rand(&mut thread_rng());
        shares[3].value = Sc::rand(&mut thread_rng());
        shares[4].value = Sc::rand(&mut thread_rng());

        assert_eq!(Poly::<Sc>::recover(2, &shares).unwrap(), expected);
    }

    use proptest::prelude::*;

    proptest! {

    #[test]
    fn interpolation(degree in 0..40usize, extra in 0..10usize) {
        let poly = Poly::<Sc>::new(degree);
        let expected = poly.free_coeff().clone();

        let threshold = degree + 1;
        let shares = (1..=(threshold + extra) as Idx)
            .map(|i| poly.eval(i))
            .collect::<Vec<_>>();

        let recovered = Poly::<Sc>::recover(threshold, &shares).unwrap();
        prop_assert_eq!(expected, recovered);
    }

    #[test]
    fn eval(d in 0..40usize, idx in 1..100_u32) {
        let mut x = Sc::new();
        x.set_int(idx as u64);

        let p1 = Poly::<Sc>::new(d);
        let evaluation = p1.eval(idx).value;

        // Naively calculate \sum c_i * x^i
        let coeffs = p1.0.clone();
        let mut sum = coeffs[0].clone();
        for (i, coeff) in coeffs.into_iter().enumerate().take(d + 1).skip(1) {
            let xi = x.pow(i as u64);
            let mut var = coeff;
            var.mul(&xi);
            sum.add(&var);
        }

        prop_assert_eq!(sum, evaluation);
    }

    }
}
