// src/core/gnfs.rs

use log::{debug, info, warn};
use num::BigInt;

use crate::config::GnfsConfig;
use crate::core::error::GnfsError;
use crate::core::polynomial_cache::PolynomialCache;
use crate::core::progress::{Phase, RunContext};
use crate::core::solution::Solution;
use crate::core::target::Target;
use crate::factor::factor_base::FactorBase;
use crate::integer_math::prime_factory::PrimeFactory;
use crate::matrix::gaussian_matrix::GaussianMatrix;
use crate::polynomial::selection::{select_polynomial, NfsPolynomial};
use crate::relation_sieve::relation::Relation;
use crate::relation_sieve::sieve::{sieve_relations, SieveRegion};
use crate::square_root::square_finder::{extract_factors, is_nontrivial, SquareFinder};

/// One factoring attempt: parameters, polynomial, factor bases, and the
/// sieve -> linear algebra -> square root loop with its retry paths.
pub struct Gnfs {
    config: GnfsConfig,
    target: Target,
    polynomial: NfsPolynomial,
    factor_base: FactorBase,
    relations: Vec<Relation>,
}

impl Gnfs {
    /// Run the three setup stages. The prime factory seeds the factor bases;
    /// it extends itself with a sieve when the supplied list runs short.
    pub fn new(
        n: &BigInt,
        mut primes: PrimeFactory,
        config: GnfsConfig,
        ctx: &RunContext,
    ) -> Result<Self, GnfsError> {
        let target = {
            let _guard = ctx.enter_phase(Phase::Parameters);
            Target::derive(n, &config)?
        };

        let polynomial = {
            let _guard = ctx.enter_phase(Phase::PolynomialSelection);
            let cache = config.polynomial_cache.as_ref().map(PolynomialCache::new);
            let cached = cache.as_ref().and_then(|c| c.load(n));
            match cached {
                Some(polynomial) => polynomial,
                None => {
                    let polynomial =
                        select_polynomial(n, config.polynomial_degree, config.selection_retry_budget)?;
                    if let Some(cache) = &cache {
                        if let Err(e) = cache.store(&polynomial) {
                            warn!("Could not write polynomial cache: {}", e);
                        }
                    }
                    polynomial
                }
            }
        };
        ctx.progress(
            Phase::PolynomialSelection,
            format!("{}", polynomial),
        );

        let factor_base = {
            let _guard = ctx.enter_phase(Phase::FactorBase);
            let quadratic_size = config
                .quadratic_base_size
                .max((target.pairs_needed() as f64).log2().ceil() as usize);
            FactorBase::build(
                &polynomial,
                n,
                target.smoothness_bound,
                quadratic_size,
                &mut primes,
                ctx,
            )?
        };

        Ok(Gnfs {
            config,
            target,
            polynomial,
            factor_base,
            relations: Vec::new(),
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn polynomial(&self) -> &NfsPolynomial {
        &self.polynomial
    }

    pub fn factor_base(&self) -> &FactorBase {
        &self.factor_base
    }

    /// The sieve / linear algebra / square root loop.
    ///
    /// Retry paths, in order: a trivial congruence advances to the next
    /// nullspace vector; an exhausted nullspace (or an exhausted interval)
    /// widens the sieve region and raises the relation quota, up to
    /// `max_sieve_rounds`; after the last round the most recent (possibly
    /// trivial) GCD pair is returned; for a prime n that is the correct
    /// outcome, not an error.
    pub fn factor(&mut self, ctx: &RunContext) -> Result<Solution, GnfsError> {
        let n = self.target.n.clone();
        let mut region = SieveRegion::square(self.target.interval);
        let mut exclude: Option<SieveRegion> = None;
        // Rows must exceed live columns by at least two for a guaranteed
        // nontrivial nullspace.
        let mut quota = self
            .target
            .pairs_needed()
            .max(self.factor_base.column_count() + 2);
        let mut last_pair: Option<(BigInt, BigInt)> = None;

        for round in 1..=self.config.max_sieve_rounds {
            {
                let _guard = ctx.enter_phase(Phase::Sieve);
                info!(
                    "Sieve round {}: region |a| <= {}, b <= {}, quota {}",
                    round, region.a_half_width, region.b_max, quota
                );
                match sieve_relations(
                    &self.polynomial,
                    &self.factor_base,
                    region,
                    exclude,
                    quota,
                    &mut self.relations,
                    ctx,
                ) {
                    Ok(()) => {}
                    Err(GnfsError::InsufficientRelations { found, needed })
                        if round < self.config.max_sieve_rounds =>
                    {
                        info!(
                            "Interval exhausted at {} of {} relations; widening",
                            found, needed
                        );
                        exclude = Some(region);
                        region = region.widened(self.config.interval_growth);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let kernel = {
                let _guard = ctx.enter_phase(Phase::LinearAlgebra);
                info!(
                    "Assembling {} x {} matrix from {} relations",
                    self.relations.len(),
                    self.relations.len().max(self.factor_base.column_count()),
                    self.relations.len()
                );
                GaussianMatrix::new(&self.relations, &self.factor_base).kernel(ctx)?
            };

            {
                let _guard = ctx.enter_phase(Phase::SquareRoot);
                let finder =
                    SquareFinder::new(&self.polynomial, &n, self.config.sqrt_prime_budget);
                // Later rounds move on to vectors not attempted yet, clamped
                // so a small kernel still gets a full window.
                let attempts = self.config.nullspace_attempts;
                let start = ((round - 1) * attempts).min(kernel.len().saturating_sub(attempts));
                let window = kernel.iter().skip(start).take(attempts);
                for (index, vector) in window.enumerate() {
                    if ctx.is_cancelled() {
                        return Err(GnfsError::Cancelled);
                    }
                    match finder.attempt(&self.relations, vector, ctx) {
                        Ok((x, y)) => {
                            debug_assert_eq!(
                                (&x * &x - &y * &y) % &n,
                                BigInt::from(0),
                                "congruence of squares must hold"
                            );
                            let (g1, g2) = extract_factors(&n, &x, &y);
                            if is_nontrivial(&g1, &n) {
                                let q = &n / &g1;
                                return Ok(Solution::new(g1, q));
                            }
                            if is_nontrivial(&g2, &n) {
                                let q = &n / &g2;
                                return Ok(Solution::new(g2, q));
                            }
                            ctx.progress(
                                Phase::SquareRoot,
                                format!("nullspace vector {} gave a trivial split", index),
                            );
                            last_pair = Some((g1, g2));
                        }
                        Err(GnfsError::Cancelled) => return Err(GnfsError::Cancelled),
                        Err(e) => {
                            debug!("nullspace vector {} unusable: {}", index, e);
                        }
                    }
                }
            }

            if round < self.config.max_sieve_rounds {
                info!("All nullspace vectors exhausted; sieving for more relations");
                exclude = Some(region);
                region = region.widened(self.config.interval_growth);
                quota += (quota / 4).max(16);
            }
        }

        match last_pair {
            // Every congruence was trivial (expected for prime n).
            Some((g1, g2)) => Ok(Solution::new(g1, g2)),
            None => Err(GnfsError::SquareRootFailed(
                "no usable congruence of squares within the retry budget".into(),
            )),
        }
    }
}
