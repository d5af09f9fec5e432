// src/integer_math/prime_factory.rs

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::core::error::GnfsError;
use crate::integer_math::fast_prime_sieve::FastPrimeSieve;
use crate::integer_math::primality;

/// Source of factor-base primes. Seeded either from an ascending prime file
/// (the second program argument) or empty; extends itself with its own sieve
/// whenever a query reaches past what the file provided.
#[derive(Debug, Clone, Default)]
pub struct PrimeFactory {
    primes: Vec<u64>,
    /// Every prime <= covered_to is present in `primes`.
    covered_to: u64,
}

impl PrimeFactory {
    pub fn new() -> Self {
        PrimeFactory {
            primes: Vec::new(),
            covered_to: 1,
        }
    }

    /// Parse a file of ascending primes, one per line. Blank lines are
    /// ignored; anything else that fails to parse, a non-prime, or an
    /// out-of-order entry is a fatal configuration error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GnfsError> {
        let path_str = path.as_ref().display().to_string();
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| GnfsError::PrimeFile {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let mut primes: Vec<u64> = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: u64 = line.parse().map_err(|_| GnfsError::PrimeFile {
                path: path_str.clone(),
                reason: format!("line {}: not an integer: {:?}", lineno + 1, line),
            })?;
            if !primality::is_prime(value) {
                return Err(GnfsError::PrimeFile {
                    path: path_str.clone(),
                    reason: format!("line {}: {} is not prime", lineno + 1, value),
                });
            }
            if primes.last().is_some_and(|&last| last >= value) {
                return Err(GnfsError::PrimeFile {
                    path: path_str.clone(),
                    reason: format!("line {}: primes not strictly ascending", lineno + 1),
                });
            }
            primes.push(value);
        }

        if primes.is_empty() {
            return Err(GnfsError::PrimeFile {
                path: path_str,
                reason: "empty prime file".into(),
            });
        }

        // The file is only a complete list up to its last entry if it starts
        // at 2; otherwise treat it as covering nothing and let the sieve fill in.
        let covered_to = if primes[0] == 2 { *primes.last().unwrap() } else { 1 };
        info!(
            "Loaded {} primes from {} (covering up to {})",
            primes.len(),
            path_str,
            covered_to
        );

        Ok(PrimeFactory { primes, covered_to })
    }

    /// Make sure every prime <= limit is present.
    pub fn ensure_limit(&mut self, limit: u64) {
        if limit <= self.covered_to {
            return;
        }
        debug!("Extending prime list from {} to {}", self.covered_to, limit);
        let mut sieved = FastPrimeSieve::primes_up_to(limit);
        // Keep any file-provided primes beyond the sieved range.
        if let Some(&last_sieved) = sieved.last() {
            sieved.extend(self.primes.iter().copied().filter(|&p| p > last_sieved));
        }
        self.primes = sieved;
        self.covered_to = limit;
    }

    /// All primes p <= bound, ascending.
    pub fn primes_to(&mut self, bound: u64) -> &[u64] {
        self.ensure_limit(bound);
        let end = self.primes.partition_point(|&p| p <= bound);
        &self.primes[..end]
    }

    /// Primes strictly greater than `from`, ascending and unbounded
    /// (generated past the covered range on demand).
    pub fn primes_after(&mut self, from: u64) -> PrimesAfter<'_> {
        self.ensure_limit(from);
        let start = self.primes.partition_point(|&p| p <= from);
        PrimesAfter {
            factory: self,
            index: start,
            last: from,
        }
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }
}

pub struct PrimesAfter<'a> {
    factory: &'a mut PrimeFactory,
    index: usize,
    last: u64,
}

impl<'a> Iterator for PrimesAfter<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if let Some(&p) = self.factory.primes.get(self.index) {
            self.index += 1;
            self.last = p;
            return Some(p);
        }
        let p = primality::next_prime(self.last);
        self.factory.primes.push(p);
        self.factory.covered_to = p;
        self.index += 1;
        self.last = p;
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_primes_to_is_exact_and_ascending() {
        let mut factory = PrimeFactory::new();
        let primes = factory.primes_to(50);
        assert_eq!(
            primes,
            &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
    }

    #[test]
    fn test_primes_after_extends_past_sieved_range() {
        let mut factory = PrimeFactory::new();
        factory.ensure_limit(10);
        let collected: Vec<u64> = factory.primes_after(7).take(5).collect();
        assert_eq!(collected, vec![11, 13, 17, 19, 23]);
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("nfsieve_prime_factory_test.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "2\n3\n5\n7").unwrap();
        drop(file);

        let mut factory = PrimeFactory::from_file(&path).unwrap();
        assert_eq!(factory.primes_to(7), &[2, 3, 5, 7]);
        // Queries past the file fall back to the sieve.
        assert_eq!(factory.primes_to(13), &[2, 3, 5, 7, 11, 13]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_file_rejects_composites_and_disorder() {
        let dir = std::env::temp_dir();

        let path = dir.join("nfsieve_prime_factory_bad1.txt");
        std::fs::write(&path, "2\n4\n").unwrap();
        assert!(PrimeFactory::from_file(&path).is_err());
        std::fs::remove_file(&path).ok();

        let path = dir.join("nfsieve_prime_factory_bad2.txt");
        std::fs::write(&path, "5\n3\n").unwrap();
        assert!(PrimeFactory::from_file(&path).is_err());
        std::fs::remove_file(&path).ok();

        let path = dir.join("nfsieve_prime_factory_bad3.txt");
        std::fs::write(&path, "").unwrap();
        assert!(PrimeFactory::from_file(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
