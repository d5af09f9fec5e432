// src/relation_sieve/sieve.rs

use log::debug;
use num::{BigInt, Integer, One, Signed, Zero};
use rayon::prelude::*;

use crate::core::error::GnfsError;
use crate::core::progress::{Phase, RunContext};
use crate::factor::factor_base::FactorBase;
use crate::integer_math::modular::{legendre_symbol, reduce_signed};
use crate::polynomial::selection::NfsPolynomial;
use crate::relation_sieve::relation::Relation;

/// The rectangle of candidate pairs: 1 <= b <= b_max, |a| <= a_half_width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SieveRegion {
    pub a_half_width: i64,
    pub b_max: i64,
}

impl SieveRegion {
    pub fn square(half_width: i64) -> Self {
        SieveRegion {
            a_half_width: half_width,
            b_max: half_width,
        }
    }

    pub fn contains(&self, a: i64, b: i64) -> bool {
        b >= 1 && b <= self.b_max && a.abs() <= self.a_half_width
    }

    /// The region scaled by `growth`, used when a round comes up short.
    pub fn widened(&self, growth: f64) -> Self {
        let scale = |v: i64| ((v as f64) * growth).ceil() as i64;
        SieveRegion {
            a_half_width: scale(self.a_half_width),
            b_max: scale(self.b_max),
        }
    }
}

// b values are processed in blocks of this size, in parallel inside a block,
// so the quota check and cancellation stay coarse-grained.
const B_BLOCK: i64 = 16;

/// Collect relations over `region` into `relations` until it holds `quota`
/// entries, skipping any candidate already covered by `exclude` (the
/// previously sieved region, on a widening round). Partial progress stays in
/// `relations` even when the region is exhausted early with
/// `GnfsError::InsufficientRelations`.
///
/// Enumeration is deterministic: b ascending, a zig-zagging 1, -1, 2, -2, ...
/// outward, so small norms are tried first and the emitted sequence is
/// reproducible.
pub fn sieve_relations(
    polynomial: &NfsPolynomial,
    fb: &FactorBase,
    region: SieveRegion,
    exclude: Option<SieveRegion>,
    quota: usize,
    relations: &mut Vec<Relation>,
    ctx: &RunContext,
) -> Result<(), GnfsError> {
    if relations.len() >= quota {
        return Ok(());
    }
    let mut b_start = 1i64;

    while b_start <= region.b_max {
        if ctx.is_cancelled() {
            return Err(GnfsError::Cancelled);
        }

        let b_end = (b_start + B_BLOCK - 1).min(region.b_max);
        let b_values: Vec<i64> = (b_start..=b_end).collect();
        let mut block: Vec<Vec<Relation>> = b_values
            .into_par_iter()
            .map(|b| sieve_row(polynomial, fb, region, exclude, b))
            .collect();

        for row in block.drain(..) {
            for relation in row {
                relations.push(relation);
                if relations.len() == quota {
                    debug!(
                        "Sieve quota reached at b = {} ({} relations)",
                        relations.last().map(|r| r.b).unwrap_or(0),
                        relations.len()
                    );
                    return Ok(());
                }
            }
        }

        ctx.progress(
            Phase::Sieve,
            format!("b <= {}: {} / {} relations", b_end, relations.len(), quota),
        );
        b_start = b_end + 1;
    }

    Err(GnfsError::InsufficientRelations {
        found: relations.len(),
        needed: quota,
    })
}

/// All smooth relations with this b, a zig-zagging outward.
fn sieve_row(
    polynomial: &NfsPolynomial,
    fb: &FactorBase,
    region: SieveRegion,
    exclude: Option<SieveRegion>,
    b: i64,
) -> Vec<Relation> {
    let mut found = Vec::new();
    for magnitude in 1..=region.a_half_width {
        for a in [magnitude, -magnitude] {
            if exclude.is_some_and(|prev| prev.contains(a, b)) {
                continue;
            }
            if num::integer::gcd(a.unsigned_abs(), b.unsigned_abs()) != 1 {
                continue;
            }
            if let Some(relation) = test_candidate(polynomial, fb, a, b) {
                found.push(relation);
            }
        }
    }
    found
}

/// Full smoothness test of one coprime candidate.
fn test_candidate(polynomial: &NfsPolynomial, fb: &FactorBase, a: i64, b: i64) -> Option<Relation> {
    let a_big = BigInt::from(a);
    let b_big = BigInt::from(b);

    // Rational side: a - b*m. (p, r) with r = m mod p divides exactly when
    // a == b*r (mod p).
    let rational_norm = &a_big - &b_big * &polynomial.m;
    if rational_norm.is_zero() {
        return None;
    }
    let mut remainder = rational_norm.abs();
    let mut rational_exponents = Vec::new();
    for (index, pair) in fb.rfb.iter().enumerate() {
        if !congruent_to_rb(a, b, pair.r, pair.p) {
            continue;
        }
        let exponent = divide_out(&mut remainder, pair.p);
        if exponent > 0 {
            rational_exponents.push((index, exponent));
        }
    }
    if !remainder.is_one() {
        return None;
    }

    // Algebraic side: the ideal (p, theta - r) divides a - b*theta exactly
    // when a == b*r (mod p).
    let algebraic_norm = polynomial.f.homogeneous_evaluate(&a_big, &b_big);
    if algebraic_norm.is_zero() {
        return None;
    }
    let mut remainder = algebraic_norm.abs();
    let mut algebraic_exponents = Vec::new();
    for (index, pair) in fb.afb.iter().enumerate() {
        if !congruent_to_rb(a, b, pair.r, pair.p) {
            continue;
        }
        let exponent = divide_out(&mut remainder, pair.p);
        if exponent > 0 {
            algebraic_exponents.push((index, exponent));
        }
    }
    if !remainder.is_one() {
        return None;
    }

    // Quadratic characters. A vanishing character cannot be used for the
    // parity argument, so such (rare) candidates are dropped.
    let mut quadratic_characters = Vec::with_capacity(fb.qcb.len());
    for pair in &fb.qcb {
        let value = reduce_signed(a as i128 - b as i128 * pair.r as i128, pair.p);
        match legendre_symbol(value, pair.p) {
            0 => return None,
            s => quadratic_characters.push(s == -1),
        }
    }

    Some(Relation {
        a,
        b,
        rational_norm,
        algebraic_norm,
        rational_exponents,
        algebraic_exponents,
        quadratic_characters,
    })
}

fn congruent_to_rb(a: i64, b: i64, r: u64, p: u64) -> bool {
    reduce_signed(a as i128 - b as i128 * r as i128, p) == 0
}

/// Divide out every factor of p, returning the exponent.
fn divide_out(value: &mut BigInt, p: u64) -> u32 {
    let p_big = BigInt::from(p);
    let mut exponent = 0u32;
    loop {
        let (q, r) = value.div_rem(&p_big);
        if !r.is_zero() {
            return exponent;
        }
        *value = q;
        exponent += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::RunContext;
    use crate::integer_math::prime_factory::PrimeFactory;
    use crate::polynomial::selection::select_polynomial;
    use num::Zero;

    fn fixture() -> (BigInt, NfsPolynomial, FactorBase) {
        let n = BigInt::from(45113);
        let poly = select_polynomial(&n, 3, 50).unwrap();
        let mut primes = PrimeFactory::new();
        let fb =
            FactorBase::build(&poly, &n, 100, 6, &mut primes, &RunContext::silent()).unwrap();
        (n, poly, fb)
    }

    fn collect(
        poly: &NfsPolynomial,
        fb: &FactorBase,
        region: SieveRegion,
        exclude: Option<SieveRegion>,
        quota: usize,
    ) -> (Vec<Relation>, Result<(), GnfsError>) {
        let mut relations = Vec::new();
        let result = sieve_relations(
            poly,
            fb,
            region,
            exclude,
            quota,
            &mut relations,
            &RunContext::silent(),
        );
        (relations, result)
    }

    #[test]
    fn test_relations_refactor_completely() {
        let (_, poly, fb) = fixture();
        let (relations, result) = collect(&poly, &fb, SieveRegion::square(120), None, 25);
        result.unwrap();
        assert_eq!(relations.len(), 25);

        for rel in &relations {
            // Independent re-factoring of both norms from the exponent lists.
            let mut rational = BigInt::one();
            for &(index, exponent) in &rel.rational_exponents {
                rational *= BigInt::from(fb.rfb[index].p).pow(exponent);
            }
            assert_eq!(rational, rel.rational_norm.abs(), "relation {}", rel);

            let mut algebraic = BigInt::one();
            for &(index, exponent) in &rel.algebraic_exponents {
                algebraic *= BigInt::from(fb.afb[index].p).pow(exponent);
            }
            assert_eq!(algebraic, rel.algebraic_norm.abs(), "relation {}", rel);

            // Norms recompute from (a, b).
            let a = BigInt::from(rel.a);
            let b = BigInt::from(rel.b);
            assert_eq!(rel.rational_norm, &a - &b * &poly.m);
            assert_eq!(rel.algebraic_norm, poly.f.homogeneous_evaluate(&a, &b));
            assert_eq!(num::integer::gcd(rel.a.unsigned_abs(), rel.b.unsigned_abs()), 1);
            assert_eq!(rel.quadratic_characters.len(), fb.qcb.len());
        }
    }

    #[test]
    fn test_no_duplicate_pairs_and_deterministic_order() {
        let (_, poly, fb) = fixture();
        let run = || {
            let (relations, result) = collect(&poly, &fb, SieveRegion::square(120), None, 20);
            result.unwrap();
            relations
        };
        let first = run();
        let second = run();
        assert_eq!(first, second, "sieve order must be reproducible");

        let mut seen = std::collections::HashSet::new();
        for rel in &first {
            assert!(seen.insert((rel.a, rel.b)), "duplicate pair ({}, {})", rel.a, rel.b);
        }
    }

    #[test]
    fn test_widening_excludes_previous_region() {
        let (_, poly, fb) = fixture();
        let inner = SieveRegion::square(60);
        // An unreachable quota exhausts each region completely.
        let (first, result) = collect(&poly, &fb, inner, None, usize::MAX);
        assert!(matches!(
            result,
            Err(GnfsError::InsufficientRelations { .. })
        ));

        let outer = inner.widened(2.0);
        assert_eq!(outer, SieveRegion::square(120));
        let (second, _) = collect(&poly, &fb, outer, Some(inner), usize::MAX);

        // The widened round only visits new territory; combined with the
        // first round it matches a fresh full sweep of the outer region.
        let (full, _) = collect(&poly, &fb, outer, None, usize::MAX);
        assert_eq!(first.len() + second.len(), full.len());

        let mut seen = std::collections::HashSet::new();
        for rel in first.iter().chain(second.iter()) {
            assert!(seen.insert((rel.a, rel.b)));
        }
    }

    #[test]
    fn test_parity_row_matches_factorizations() {
        let (_, poly, fb) = fixture();
        let (relations, result) = collect(&poly, &fb, SieveRegion::square(120), None, 5);
        result.unwrap();
        let width = fb.column_count();
        for rel in &relations {
            let row = rel.parity_row(&fb, width);
            assert_eq!(row.len(), width);
            assert_eq!(row[0], rel.rational_norm < BigInt::zero());
            for &(index, exponent) in &rel.rational_exponents {
                assert_eq!(row[1 + index], exponent % 2 == 1);
            }
        }
    }
}
