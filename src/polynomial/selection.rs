// src/polynomial/selection.rs

use log::{debug, info};
use num::integer::Roots;
use num::{BigInt, Integer, One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::core::error::GnfsError;
use crate::integer_math::fast_prime_sieve::FastPrimeSieve;
use crate::polynomial::finite_field;
use crate::polynomial::polynomial::Polynomial;

/// The selected number-field polynomial: monic irreducible f of degree d
/// together with the root witness m, f(m) == n exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfsPolynomial {
    pub f: Polynomial,
    pub m: BigInt,
}

impl NfsPolynomial {
    pub fn degree(&self) -> usize {
        self.f.degree()
    }

    /// Holds by construction for selected polynomials; used to validate
    /// cached ones.
    pub fn is_valid_for(&self, n: &BigInt) -> bool {
        self.degree() > 0
            && self.f.is_monic()
            && self.m.is_positive()
            && self.f.evaluate(&self.m).mod_floor(n).is_zero()
    }
}

impl std::fmt::Display for NfsPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f(X) = {}, m = {}", self.f, self.m)
    }
}

/// Base-m polynomial selection.
///
/// m starts at floor(n^(1/d)), the largest base whose expansion has d+1
/// digits, which makes the leading digit 1 (monic f) for any n that is not
/// trivially small. The base is decremented until the expansion is monic of
/// the right degree and irreducible over Q, within the retry budget.
pub fn select_polynomial(
    n: &BigInt,
    degree: usize,
    retry_budget: usize,
) -> Result<NfsPolynomial, GnfsError> {
    if degree < 3 || degree % 2 == 0 {
        return Err(GnfsError::InvalidDegree(degree));
    }

    let mut m = n.nth_root(degree as u32);
    let mut tried = 0usize;

    while tried < retry_budget && m > BigInt::one() {
        tried += 1;
        let digits = base_m_digits(n, &m);

        if digits.len() != degree + 1 {
            debug!(
                "m = {}: expansion has {} digits, want {}",
                m,
                digits.len(),
                degree + 1
            );
            m -= 1;
            continue;
        }
        if !digits[degree].is_one() {
            debug!("m = {}: leading digit {} != 1", m, digits[degree]);
            m -= 1;
            continue;
        }

        let f = Polynomial::new(digits);
        if is_irreducible_over_q(&f) {
            debug_assert_eq!(f.evaluate(&m), *n);
            info!("Selected polynomial after {} candidate(s): f = {}, m = {}", tried, f, m);
            return Ok(NfsPolynomial { f, m });
        }
        debug!("m = {}: f = {} is reducible, retrying", m, f);
        m -= 1;
    }

    Err(GnfsError::SelectionFailed { degree, tried })
}

/// Digits of n in base m, constant term first. Requires m >= 2.
pub fn base_m_digits(n: &BigInt, m: &BigInt) -> Vec<BigInt> {
    let mut digits = Vec::new();
    let mut remainder = n.clone();
    while remainder.is_positive() {
        let (q, r) = remainder.div_rem(m);
        digits.push(r);
        remainder = q;
    }
    if digits.is_empty() {
        digits.push(BigInt::zero());
    }
    digits
}

/// Irreducibility over Q via a mod-p witness: a monic integer polynomial
/// that is irreducible mod some prime is irreducible over the rationals.
/// The witness search is a one-sided test; for an irreducible f of degree d
/// the density of witness primes is positive (Chebotarev), so a miss across
/// the whole list is overwhelmingly likely to mean f is reducible, and the
/// caller treats it as such.
pub fn is_irreducible_over_q(f: &Polynomial) -> bool {
    if f.degree() < 1 {
        return false;
    }
    if f.coefficient(0).is_zero() {
        // X divides f.
        return false;
    }

    let witnesses = FastPrimeSieve::primes_up_to(200);
    for p in witnesses {
        let reduced = finite_field::from_bigint_poly(f, p);
        if finite_field::degree(&reduced) != f.degree() {
            // Leading coefficient vanished mod p; not a usable witness.
            continue;
        }
        if finite_field::is_irreducible(&reduced, p) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_m_digits_of_45113() {
        // 45113 = 8 + 29*31 + 15*31^2 + 1*31^3.
        let digits = base_m_digits(&BigInt::from(45113), &BigInt::from(31));
        let expected: Vec<BigInt> = [8, 29, 15, 1].iter().map(|&c| BigInt::from(c)).collect();
        assert_eq!(digits, expected);
    }

    #[test]
    fn test_select_polynomial_satisfies_invariants() {
        let n = BigInt::from(45113);
        let poly = select_polynomial(&n, 3, 50).unwrap();
        assert_eq!(poly.degree(), 3);
        assert!(poly.f.is_monic());
        assert_eq!(poly.f.evaluate(&poly.m), n);
        assert!(poly.is_valid_for(&n));
        // First viable base is the integer cube root.
        assert!(poly.m <= BigInt::from(35));
    }

    #[test]
    fn test_select_polynomial_larger_semiprime() {
        // 1299709 * 1299721
        let n: BigInt = "1689259081189".parse().unwrap();
        let poly = select_polynomial(&n, 3, 100).unwrap();
        assert!(poly.f.is_monic());
        assert_eq!(poly.f.evaluate(&poly.m), n);
    }

    #[test]
    fn test_select_polynomial_rejects_even_degree() {
        let n = BigInt::from(45113);
        assert!(matches!(
            select_polynomial(&n, 4, 50),
            Err(GnfsError::InvalidDegree(4))
        ));
    }

    #[test]
    fn test_select_polynomial_tiny_n_fails_cleanly() {
        // 15 has no monic irreducible cubic base-m expansion with m >= 2.
        let n = BigInt::from(15);
        assert!(matches!(
            select_polynomial(&n, 3, 50),
            Err(GnfsError::SelectionFailed { .. })
        ));
    }

    #[test]
    fn test_irreducibility_screen() {
        // (X + 1)^2 = X^2 + 2X + 1 is reducible.
        assert!(!is_irreducible_over_q(&Polynomial::from_i64(&[1, 2, 1])));
        // X^2 + 1 is irreducible.
        assert!(is_irreducible_over_q(&Polynomial::from_i64(&[1, 0, 1])));
        // X^3 + X + 1 is irreducible.
        assert!(is_irreducible_over_q(&Polynomial::from_i64(&[1, 1, 0, 1])));
        // X^3 - X = X(X-1)(X+1).
        assert!(!is_irreducible_over_q(&Polynomial::from_i64(&[0, -1, 0, 1])));
    }
}
