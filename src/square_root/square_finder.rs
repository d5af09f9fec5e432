// src/square_root/square_finder.rs

use bitvec::prelude::*;
use log::{debug, info};
use num::{BigInt, Integer, One, ToPrimitive};
use rayon::prelude::*;

use crate::core::error::GnfsError;
use crate::core::progress::{Phase, RunContext};
use crate::integer_math::primality;
use crate::polynomial::algorithms::{balanced_residue, chinese_remainder_theorem, exact_sqrt, resultant};
use crate::polynomial::finite_field::{self, GfPoly};
use crate::polynomial::polynomial::Polynomial;
use crate::polynomial::selection::NfsPolynomial;
use crate::relation_sieve::relation::Relation;
use crate::square_root::finite_field_arithmetic;

// Inert primes for the CRT reconstruction are drawn from here upward so each
// one contributes ~28 bits.
const CRT_PRIME_FLOOR: u64 = 1 << 28;
const CRT_BATCH: usize = 8;

/// Turns one nullspace vector into a congruence of squares x^2 == y^2 (mod n).
pub struct SquareFinder {
    n: BigInt,
    polynomial: NfsPolynomial,
    f_prime: Polynomial,
    /// f'(m), the rational-side correction factor.
    f_prime_at_m: BigInt,
    prime_budget: usize,
}

impl SquareFinder {
    pub fn new(polynomial: &NfsPolynomial, n: &BigInt, prime_budget: usize) -> Self {
        let f_prime = polynomial.f.derivative();
        let f_prime_at_m = f_prime.evaluate(&polynomial.m);
        SquareFinder {
            n: n.clone(),
            polynomial: polynomial.clone(),
            f_prime,
            f_prime_at_m,
            prime_budget,
        }
    }

    /// Attempt the subset of relations marked by `subset`. On success returns
    /// (x, y) with x^2 == y^2 (mod n).
    pub fn attempt(
        &self,
        relations: &[Relation],
        subset: &BitSlice,
        ctx: &RunContext,
    ) -> Result<(BigInt, BigInt), GnfsError> {
        let selected: Vec<&Relation> = relations
            .iter()
            .enumerate()
            .filter(|(i, _)| subset[*i])
            .map(|(_, rel)| rel)
            .collect();
        if selected.is_empty() {
            return Err(GnfsError::SquareRootFailed(
                "empty relation subset".into(),
            ));
        }
        debug!("Square root attempt over {} relations", selected.len());

        let x = self.rational_side(&selected)?;
        let y = self.algebraic_side(&selected, ctx)?;
        Ok((x, y))
    }

    /// x = f'(m) * sqrt(prod (a_i - b_i * m)) mod n.
    fn rational_side(&self, selected: &[&Relation]) -> Result<BigInt, GnfsError> {
        let product: BigInt = selected.iter().map(|rel| &rel.rational_norm).product();
        let root = exact_sqrt(&product).ok_or_else(|| {
            GnfsError::SquareRootFailed("rational product is not a perfect square".into())
        })?;
        Ok((&self.f_prime_at_m * root).mod_floor(&self.n))
    }

    /// y = gamma(m) mod n, where gamma^2 = f'(theta)^2 * prod (a_i - b_i*theta)
    /// in Z[theta]/(f).
    fn algebraic_side(
        &self,
        selected: &[&Relation],
        ctx: &RunContext,
    ) -> Result<BigInt, GnfsError> {
        let f = &self.polynomial.f;
        let d = f.degree();

        // S = f'(theta)^2 * prod (a_i - b_i * theta), reduced mod f after
        // every multiplication to keep the degree below d.
        let mut s = self.f_prime.multiply_mod(&self.f_prime, f);
        for rel in selected {
            let linear = Polynomial::new(vec![BigInt::from(rel.a), BigInt::from(-rel.b)]);
            s = s.multiply_mod(&linear, f);
        }

        // The norm of S is a perfect square; its integer square root pins
        // down the sign of each modular root (odd degree: N(-g) = -N(g)).
        let norm_s = resultant(f, &s);
        let eta = exact_sqrt(&norm_s).ok_or_else(|| {
            GnfsError::SquareRootFailed("norm of the ring element is not a perfect square".into())
        })?;
        debug!("N(S) has {} digits", norm_s.to_string().len());

        let mut crt_primes: Vec<BigInt> = Vec::new();
        let mut residues: Vec<Vec<BigInt>> = vec![Vec::new(); d];
        let mut next_start = CRT_PRIME_FLOOR;

        while crt_primes.len() < self.prime_budget {
            if ctx.is_cancelled() {
                return Err(GnfsError::Cancelled);
            }

            // A batch of candidate primes, tested in parallel.
            let mut batch = Vec::with_capacity(CRT_BATCH);
            let mut p = next_start;
            while batch.len() < CRT_BATCH {
                p = primality::next_prime(p);
                batch.push(p);
            }
            next_start = p;

            let local_roots: Vec<(u64, GfPoly)> = batch
                .par_iter()
                .filter_map(|&p| {
                    self.local_square_root(&s, &eta, p).map(|root| (p, root))
                })
                .collect();

            for (p, root) in local_roots {
                if crt_primes.len() == self.prime_budget {
                    break;
                }
                crt_primes.push(BigInt::from(p));
                for (i, coefficient_residues) in residues.iter_mut().enumerate() {
                    coefficient_residues.push(BigInt::from(root.get(i).copied().unwrap_or(0)));
                }

                if let Some(gamma) = self.reconstruct(&crt_primes, &residues, &s) {
                    info!(
                        "Algebraic square root reconstructed from {} primes",
                        crt_primes.len()
                    );
                    let y = gamma.evaluate_mod(&self.polynomial.m, &self.n);
                    return Ok(y);
                }
            }

            ctx.progress(
                Phase::SquareRoot,
                format!("{} / {} CRT primes", crt_primes.len(), self.prime_budget),
            );
        }

        Err(GnfsError::SquareRootFailed(format!(
            "no consistent square root within {} primes",
            self.prime_budget
        )))
    }

    /// Square root of S in GF(p^d) with the sign normalized against eta,
    /// for p inert in the number field (f irreducible mod p).
    fn local_square_root(&self, s: &Polynomial, eta: &BigInt, p: u64) -> Option<GfPoly> {
        let f_mod = finite_field::from_bigint_poly(&self.polynomial.f, p);
        let d = self.polynomial.f.degree();
        if finite_field::degree(&f_mod) != d || !finite_field::is_irreducible(&f_mod, p) {
            return None;
        }
        let eta_mod = eta
            .mod_floor(&BigInt::from(p))
            .to_u64()
            .expect("residue fits u64");
        if eta_mod == 0 {
            // p divides the norm; the local root would be degenerate.
            return None;
        }

        let s_mod = finite_field::from_bigint_poly(s, p);
        let root = finite_field_arithmetic::sqrt(&s_mod, &f_mod, p, d)?;

        let norm = finite_field_arithmetic::norm(&root, &f_mod, p, d);
        if norm == eta_mod {
            Some(root)
        } else if (p - norm) % p == eta_mod {
            Some(finite_field_arithmetic::negate(&root, p))
        } else {
            // Cannot happen for odd degree; treat as a non-usable prime.
            debug!("prime {} gave inconsistent norm {} (eta = {})", p, norm, eta_mod);
            None
        }
    }

    /// CRT the collected residues into balanced coefficients and check the
    /// candidate exactly; only a verified gamma is accepted.
    fn reconstruct(
        &self,
        crt_primes: &[BigInt],
        residues: &[Vec<BigInt>],
        s: &Polynomial,
    ) -> Option<Polynomial> {
        let modulus: BigInt = crt_primes.iter().product();
        let coefficients: Vec<BigInt> = residues
            .iter()
            .map(|r| {
                let z = chinese_remainder_theorem(crt_primes, r);
                balanced_residue(&z, &modulus)
            })
            .collect();
        let gamma = Polynomial::new(coefficients);
        let square = gamma.multiply_mod(&gamma, &self.polynomial.f);
        if &square == s {
            Some(gamma)
        } else {
            None
        }
    }
}

/// gcd(x - y, n) and gcd(x + y, n); the caller decides whether they are
/// trivial.
pub fn extract_factors(n: &BigInt, x: &BigInt, y: &BigInt) -> (BigInt, BigInt) {
    let g1 = (x - y).gcd(n);
    let g2 = (x + y).gcd(n);
    (g1, g2)
}

/// Whether g splits n: 1 < g < n.
pub fn is_nontrivial(g: &BigInt, n: &BigInt) -> bool {
    g > &BigInt::one() && g < n
}
