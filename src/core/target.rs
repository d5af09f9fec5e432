// src/core/target.rs

use log::info;
use num::{BigInt, Integer, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::config::GnfsConfig;
use crate::core::error::GnfsError;

/// Everything derived from n at startup. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub n: BigInt,
    pub nbits: u64,
    pub digits: usize,
    pub degree: usize,
    /// Target factor-base size t, from the Buhler-Lenstra-Pomerance bound.
    pub t: usize,
    /// Smoothness bound B: the rational base holds every prime <= B.
    pub smoothness_bound: u64,
    /// Sieve half-width C; candidates are 1 <= b <= C, |a| <= C.
    pub interval: i64,
}

impl Target {
    /// Derive the run parameters. Rejects n <= 1 and even n; primality of n
    /// is deliberately not checked here (a prime n flows through the whole
    /// pipeline and yields trivial factors).
    pub fn derive(n: &BigInt, config: &GnfsConfig) -> Result<Target, GnfsError> {
        if n <= &BigInt::from(1) {
            return Err(GnfsError::InvalidTarget(format!("n = {} must exceed 1", n)));
        }
        if n.is_even() {
            return Err(GnfsError::InvalidTarget(
                "n must be odd; remove factors of two first".into(),
            ));
        }
        let degree = config.polynomial_degree;
        if degree < 3 || degree % 2 == 0 {
            return Err(GnfsError::InvalidDegree(degree));
        }

        let nbits = n.bits();
        let digits = n.to_string().len();
        let smoothness_bound = smoothness_bound(n, config.smoothness_scale);
        let t = factor_base_size(n, degree);

        let target = Target {
            n: n.clone(),
            nbits,
            digits,
            degree,
            t,
            smoothness_bound,
            interval: smoothness_bound
                .try_into()
                .unwrap_or(i64::MAX),
        };
        info!(
            "Target: {} digits, {} bits, degree {}, B = {}, t = {}",
            target.digits, target.nbits, target.degree, target.smoothness_bound, target.t
        );
        Ok(target)
    }

    /// Relations needed before linear algebra: t + u + v + 2 with the
    /// classical corrections u = d*t and v = digits.
    pub fn pairs_needed(&self) -> usize {
        self.t + self.degree * self.t + self.digits + 2
    }
}

/// Natural log of a positive big integer, exact to double precision at any
/// bit length: ln(mant * 2^shift) = ln(mant) + shift * ln 2, with the
/// mantissa taken from the top 53 bits.
pub fn ln_big(n: &BigInt) -> f64 {
    let bits = n.bits();
    if bits <= 53 {
        return n.to_f64().expect("fits f64").ln();
    }
    let shift = bits - 53;
    let mantissa = (n >> shift).to_f64().expect("53-bit mantissa fits f64");
    mantissa.ln() + shift as f64 * std::f64::consts::LN_2
}

/// B = K * exp((8/9)^(1/3) * (ln n)^(1/3) * (ln ln n)^(2/3)).
/// Crandall & Pomerance, "Prime Numbers: A Computational Perspective".
pub fn smoothness_bound(n: &BigInt, scale: f64) -> u64 {
    let ln_n = ln_big(n);
    let ln_ln_n = ln_n.ln();
    let value = (8.0f64 / 9.0).cbrt() * ln_n.cbrt() * ln_ln_n.powf(2.0 / 3.0);
    let bound = scale * value.exp();
    if bound >= u64::MAX as f64 {
        u64::MAX
    } else {
        bound.ceil() as u64
    }
}

/// u = exp(1/2 * (d ln d + sqrt((d ln d)^2 + 4 ln(n^(1/d)) ln ln(n^(1/d))))).
/// Buhler, Lenstra & Pomerance, "Factoring integers with the number field
/// sieve".
pub fn factor_base_size(n: &BigInt, degree: usize) -> usize {
    let d = degree as f64;
    let d_ln_d = d * d.ln();
    let ln_root = ln_big(n) / d;
    let ln_ln_root = ln_root.ln();
    let value = 0.5 * (d_ln_d + (d_ln_d * d_ln_d + 4.0 * ln_root * ln_ln_root).sqrt());
    let size = value.exp();
    if size >= usize::MAX as f64 {
        usize::MAX
    } else {
        size.ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_big_matches_f64_in_range() {
        for value in [3u64, 45113, 1_000_003, u64::MAX / 3] {
            let exact = (value as f64).ln();
            let computed = ln_big(&BigInt::from(value));
            assert!((exact - computed).abs() < 1e-9, "value {}", value);
        }
    }

    #[test]
    fn test_ln_big_beyond_f64() {
        // ln(10^200) = 200 * ln 10.
        let n = BigInt::from(10).pow(200);
        let expected = 200.0 * 10f64.ln();
        assert!((ln_big(&n) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_match_closed_forms() {
        let n = BigInt::from(45113);
        let ln_n = 45113f64.ln();
        let expected_b = 10.0
            * ((8.0f64 / 9.0).cbrt() * ln_n.cbrt() * ln_n.ln().powf(2.0 / 3.0)).exp();
        assert_eq!(smoothness_bound(&n, 10.0), expected_b.ceil() as u64);

        let d = 3.0f64;
        let dld = d * d.ln();
        let lr = ln_n / 3.0;
        let expected_u = (0.5 * (dld + (dld * dld + 4.0 * lr * lr.ln()).sqrt())).exp();
        assert_eq!(factor_base_size(&n, 3), expected_u.ceil() as usize);
    }

    #[test]
    fn test_bounds_monotonic_in_n() {
        let samples: Vec<BigInt> = [
            "1517",
            "45113",
            "1689259081189",
            "100000980001501",
            "10000004400000259",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
        let mut last_b = 0u64;
        let mut last_t = 0usize;
        for n in &samples {
            let b = smoothness_bound(n, 10.0);
            let t = factor_base_size(n, 3);
            assert!(b > last_b, "B must grow with n (n = {})", n);
            assert!(t > last_t, "t must grow with n (n = {})", n);
            last_b = b;
            last_t = t;
        }
    }

    #[test]
    fn test_derive_rejects_degenerate_input() {
        let config = GnfsConfig::default();
        assert!(matches!(
            Target::derive(&BigInt::from(1), &config),
            Err(GnfsError::InvalidTarget(_))
        ));
        assert!(matches!(
            Target::derive(&BigInt::from(100), &config),
            Err(GnfsError::InvalidTarget(_))
        ));
        let mut bad_degree = config.clone();
        bad_degree.polynomial_degree = 4;
        assert!(matches!(
            Target::derive(&BigInt::from(45113), &bad_degree),
            Err(GnfsError::InvalidDegree(4))
        ));
    }

    #[test]
    fn test_derive_pairs_needed() {
        let config = GnfsConfig::default();
        let target = Target::derive(&BigInt::from(45113), &config).unwrap();
        assert_eq!(target.digits, 5);
        assert_eq!(target.nbits, 16);
        assert_eq!(
            target.pairs_needed(),
            target.t * 4 + target.digits + 2
        );
        assert_eq!(target.interval as u64, target.smoothness_bound);
    }
}
