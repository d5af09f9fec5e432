// src/core/solution.rs

use num::{BigInt, One};
use serde::{Deserialize, Serialize};

/// The outcome of a run: the two GCD results. `p * q == n` holds exactly
/// when the congruence split n; for a prime (or unlucky) n both entries are
/// legitimately trivial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub p: BigInt,
    pub q: BigInt,
}

impl Solution {
    pub fn new(p: BigInt, q: BigInt) -> Self {
        let (p, q) = if p <= q { (p, q) } else { (q, p) };
        Solution { p, q }
    }

    /// True when this solution actually splits n.
    pub fn splits(&self, n: &BigInt) -> bool {
        self.p > BigInt::one()
            && &self.p < n
            && self.q > BigInt::one()
            && &self.q < n
            && &self.p * &self.q == *n
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} * {}", self.p, self.q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits() {
        let n = BigInt::from(35);
        assert!(Solution::new(BigInt::from(7), BigInt::from(5)).splits(&n));
        assert!(!Solution::new(BigInt::from(1), BigInt::from(35)).splits(&n));
        assert!(!Solution::new(BigInt::from(35), BigInt::from(35)).splits(&n));
    }

    #[test]
    fn test_ordering() {
        let s = Solution::new(BigInt::from(7), BigInt::from(5));
        assert_eq!(s.p, BigInt::from(5));
        assert_eq!(s.q, BigInt::from(7));
    }
}
