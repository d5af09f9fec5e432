// src/core/polynomial_cache.rs

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use num::BigInt;

use crate::polynomial::polynomial::Polynomial;
use crate::polynomial::selection::NfsPolynomial;

/// Plain-text cache of a selected polynomial, three lines:
/// degree, space-separated coefficients (constant term first), m.
///
/// Only the orchestration layer touches the cache; selection itself never
/// does. A cached polynomial is used only if it passes the same invariants a
/// freshly selected one satisfies.
pub struct PolynomialCache {
    path: PathBuf,
}

impl PolynomialCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PolynomialCache { path: path.into() }
    }

    /// Read and validate against n. Any malformed or mismatched content is
    /// treated as a miss.
    pub fn load(&self, n: &BigInt) -> Option<NfsPolynomial> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let mut lines = contents.lines();

        let degree: usize = lines.next()?.trim().parse().ok()?;
        let coefficients: Vec<BigInt> = lines
            .next()?
            .split_whitespace()
            .map(|tok| tok.parse().ok())
            .collect::<Option<_>>()?;
        let m: BigInt = lines.next()?.trim().parse().ok()?;

        let f = Polynomial::new(coefficients);
        let candidate = NfsPolynomial { f, m };
        if degree == 0 || candidate.degree() != degree || !candidate.is_valid_for(n) {
            warn!(
                "Ignoring cached polynomial at {:?}: fails validation",
                self.path
            );
            return None;
        }
        info!("Reading polynomial from {:?}", self.path);
        Some(candidate)
    }

    pub fn store(&self, polynomial: &NfsPolynomial) -> io::Result<()> {
        let coefficients: Vec<String> = polynomial
            .f
            .coefficients()
            .iter()
            .map(|c| c.to_string())
            .collect();
        let contents = format!(
            "{}\n{}\n{}\n",
            polynomial.degree(),
            coefficients.join(" "),
            polynomial.m
        );
        fs::write(&self.path, contents)
    }
}
