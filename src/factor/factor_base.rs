// src/factor/factor_base.rs

use log::info;
use num::{BigInt, Integer, Zero};
use serde::{Deserialize, Serialize};

use crate::core::error::GnfsError;
use crate::core::progress::{Phase, RunContext};
use crate::factor::factor_pair::FactorPair;
use crate::integer_math::prime_factory::PrimeFactory;
use crate::polynomial::finite_field;
use crate::polynomial::selection::NfsPolynomial;

/// The three prime bases the sieve and square-root stages test against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactorBase {
    /// Rational base: (p, m mod p) for every prime p <= bound, ascending.
    pub rfb: Vec<FactorPair>,
    /// Algebraic base: (p, r) for every root r of f mod p, p <= bound,
    /// ascending by p then r.
    pub afb: Vec<FactorPair>,
    /// Quadratic character base: (q, s) with q beyond the bound, s a root of
    /// f mod q, q dividing neither disc(f) nor n.
    pub qcb: Vec<FactorPair>,
}

impl FactorBase {
    /// Build all three bases from the smoothness bound.
    ///
    /// `quadratic_size` is the minimum QCB size; it is raised to
    /// log2(relation quota) by the caller when that is larger.
    pub fn build(
        polynomial: &NfsPolynomial,
        n: &BigInt,
        smoothness_bound: u64,
        quadratic_size: usize,
        primes: &mut PrimeFactory,
        ctx: &RunContext,
    ) -> Result<FactorBase, GnfsError> {
        let rfb = Self::build_rational(polynomial, smoothness_bound, primes);
        if rfb.is_empty() {
            return Err(GnfsError::DegenerateFactorBase(format!(
                "no primes at or below the smoothness bound {}",
                smoothness_bound
            )));
        }
        ctx.progress(Phase::FactorBase, format!("RFB: {} elements", rfb.len()));

        let afb = Self::build_algebraic(polynomial, smoothness_bound, primes, ctx)?;
        if afb.is_empty() {
            return Err(GnfsError::DegenerateFactorBase(format!(
                "f has no roots modulo any prime at or below {}",
                smoothness_bound
            )));
        }
        ctx.progress(Phase::FactorBase, format!("AFB: {} elements", afb.len()));

        let qcb = Self::build_quadratic(polynomial, n, smoothness_bound, quadratic_size, primes);
        ctx.progress(Phase::FactorBase, format!("QCB: {} elements", qcb.len()));

        info!(
            "Factor bases: |RFB| = {}, |AFB| = {}, |QCB| = {}",
            rfb.len(),
            afb.len(),
            qcb.len()
        );
        Ok(FactorBase { rfb, afb, qcb })
    }

    fn build_rational(
        polynomial: &NfsPolynomial,
        bound: u64,
        primes: &mut PrimeFactory,
    ) -> Vec<FactorPair> {
        primes
            .primes_to(bound)
            .iter()
            .map(|&p| {
                let r = polynomial.m.mod_floor(&BigInt::from(p));
                FactorPair::new(p, u64::try_from(r).expect("residue below word-sized prime"))
            })
            .collect()
    }

    fn build_algebraic(
        polynomial: &NfsPolynomial,
        bound: u64,
        primes: &mut PrimeFactory,
        ctx: &RunContext,
    ) -> Result<Vec<FactorPair>, GnfsError> {
        let prime_list: Vec<u64> = primes.primes_to(bound).to_vec();
        let mut afb = Vec::new();
        for p in prime_list {
            if ctx.is_cancelled() {
                return Err(GnfsError::Cancelled);
            }
            for r in finite_field::roots_mod_p(&polynomial.f, p) {
                afb.push(FactorPair::new(p, r));
            }
        }
        Ok(afb)
    }

    /// Pairs (q, s) with q > bound prime, f squarefree mod q (so q does not
    /// divide disc(f)), q not dividing n, and s a root of f mod q. Primes
    /// where f has no root contribute nothing and are skipped.
    fn build_quadratic(
        polynomial: &NfsPolynomial,
        n: &BigInt,
        bound: u64,
        size: usize,
        primes: &mut PrimeFactory,
    ) -> Vec<FactorPair> {
        let f_prime = polynomial.f.derivative();
        let mut qcb = Vec::with_capacity(size);
        let mut iter = primes.primes_after(bound);
        while qcb.len() < size {
            let q = iter.next().expect("prime stream is unbounded");
            let q_big = BigInt::from(q);
            if n.mod_floor(&q_big).is_zero() {
                continue;
            }
            let f_mod = finite_field::from_bigint_poly(&polynomial.f, q);
            let fp_mod = finite_field::from_bigint_poly(&f_prime, q);
            // q | disc(f) exactly when f is not squarefree mod q.
            let g = finite_field::gcd(&f_mod, &fp_mod, q);
            if finite_field::degree(&g) != 0 {
                continue;
            }
            if let Some(&s) = finite_field::roots_mod_p(&polynomial.f, q).first() {
                qcb.push(FactorPair::new(q, s));
            }
        }
        qcb
    }

    /// Columns of the GF(2) matrix: sign bit, one per RFB prime, one per AFB
    /// ideal, one per QCB character.
    pub fn column_count(&self) -> usize {
        1 + self.rfb.len() + self.afb.len() + self.qcb.len()
    }
}
