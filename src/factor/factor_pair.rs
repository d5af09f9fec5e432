// src/factor/factor_pair.rs

use serde::{Deserialize, Serialize};

/// One factor-base entry (p, r).
///
/// Rational side: r = m mod p. Algebraic and quadratic sides: r is a root of
/// f mod p, so (p, r) names the degree-one prime ideal (p, theta - r).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactorPair {
    pub p: u64,
    pub r: u64,
}

impl FactorPair {
    pub fn new(p: u64, r: u64) -> Self {
        FactorPair { p, r }
    }
}

impl std::fmt::Display for FactorPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.p, self.r)
    }
}
