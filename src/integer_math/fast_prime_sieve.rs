// src/integer_math/fast_prime_sieve.rs

use bitvec::prelude::*;

/// Sieve of Eratosthenes over odd numbers, one bit per candidate.
pub struct FastPrimeSieve;

impl FastPrimeSieve {
    /// All primes p <= limit, ascending.
    pub fn primes_up_to(limit: u64) -> Vec<u64> {
        if limit < 2 {
            return Vec::new();
        }
        let mut primes = vec![2u64];
        if limit < 3 {
            return primes;
        }

        // composite[i] marks the odd number 2i + 3.
        let count = ((limit - 1) / 2) as usize;
        let mut composite = bitvec![0; count];

        let mut i = 0usize;
        loop {
            let p = 2 * i as u64 + 3;
            if p * p > limit {
                break;
            }
            if !composite[i] {
                let mut multiple = p * p;
                while multiple <= limit {
                    composite.set(((multiple - 3) / 2) as usize, true);
                    multiple += 2 * p;
                }
            }
            i += 1;
        }

        for i in 0..count {
            if !composite[i] {
                primes.push(2 * i as u64 + 3);
            }
        }
        primes
    }
}
