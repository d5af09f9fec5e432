// src/polynomial/finite_field.rs
//
// Arithmetic in GF(p)[X] and GF(p)[X]/(f) for word-sized primes p.
// Polynomials are coefficient vectors (index = power) with no trailing
// zeros; the zero polynomial is the empty vector.

use num::{BigInt, Integer, ToPrimitive};

use crate::integer_math::modular::{inv_mod, mul_mod, pow_mod};
use crate::polynomial::polynomial::Polynomial;

pub type GfPoly = Vec<u64>;

pub fn trim(mut v: GfPoly) -> GfPoly {
    while v.last() == Some(&0) {
        v.pop();
    }
    v
}

pub fn degree(v: &[u64]) -> usize {
    v.len().saturating_sub(1)
}

pub fn is_zero(v: &[u64]) -> bool {
    v.is_empty()
}

/// Reduce an integer polynomial coefficient-wise into GF(p).
pub fn from_bigint_poly(f: &Polynomial, p: u64) -> GfPoly {
    let p_big = BigInt::from(p);
    let coefficients = f
        .coefficients()
        .iter()
        .map(|c| {
            c.mod_floor(&p_big)
                .to_u64()
                .expect("coefficient reduced mod word-sized prime")
        })
        .collect();
    trim(coefficients)
}

pub fn evaluate(f: &[u64], x: u64, p: u64) -> u64 {
    let mut result = 0u64;
    for &c in f.iter().rev() {
        result = (mul_mod(result, x, p) + c) % p;
    }
    result
}

pub fn add(a: &[u64], b: &[u64], p: u64) -> GfPoly {
    let mut out = vec![0u64; a.len().max(b.len())];
    for (i, &c) in a.iter().enumerate() {
        out[i] = c % p;
    }
    for (i, &c) in b.iter().enumerate() {
        out[i] = (out[i] + c) % p;
    }
    trim(out)
}

pub fn sub(a: &[u64], b: &[u64], p: u64) -> GfPoly {
    let mut out = vec![0u64; a.len().max(b.len())];
    for (i, &c) in a.iter().enumerate() {
        out[i] = c % p;
    }
    for (i, &c) in b.iter().enumerate() {
        out[i] = (out[i] + p - c % p) % p;
    }
    trim(out)
}

pub fn mul(a: &[u64], b: &[u64], p: u64) -> GfPoly {
    if is_zero(a) || is_zero(b) {
        return Vec::new();
    }
    let mut out = vec![0u64; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] = (out[i + j] + mul_mod(x, y, p)) % p;
        }
    }
    trim(out)
}

pub fn scale(a: &[u64], k: u64, p: u64) -> GfPoly {
    trim(a.iter().map(|&c| mul_mod(c, k, p)).collect())
}

/// Make the leading coefficient 1 (f nonzero).
pub fn monic(f: &[u64], p: u64) -> GfPoly {
    let lead = *f.last().expect("monic of zero polynomial");
    if lead == 1 {
        return f.to_vec();
    }
    scale(f, inv_mod(lead, p), p)
}

/// Remainder of a divided by b in GF(p)[X]; b nonzero.
pub fn rem(a: &[u64], b: &[u64], p: u64) -> GfPoly {
    let b = trim(b.to_vec());
    assert!(!is_zero(&b), "polynomial division by zero");
    let db = degree(&b);
    let lead_inv = inv_mod(*b.last().unwrap(), p);

    let mut r: GfPoly = trim(a.to_vec());
    while !is_zero(&r) && degree(&r) >= db && !(degree(&r) == 0 && db == 0) {
        if db == 0 {
            return Vec::new();
        }
        let shift = degree(&r) - db;
        let q = mul_mod(*r.last().unwrap(), lead_inv, p);
        for (i, &bc) in b.iter().enumerate() {
            let idx = shift + i;
            r[idx] = (r[idx] + p - mul_mod(q, bc, p)) % p;
        }
        r = trim(r);
    }
    if db == 0 {
        // Dividing by a nonzero constant leaves no remainder.
        return Vec::new();
    }
    r
}

pub fn gcd(a: &[u64], b: &[u64], p: u64) -> GfPoly {
    let mut x = trim(a.to_vec());
    let mut y = trim(b.to_vec());
    while !is_zero(&y) {
        let r = rem(&x, &y, p);
        x = y;
        y = r;
    }
    if is_zero(&x) {
        x
    } else {
        monic(&x, p)
    }
}

/// base^exp mod (f, p), with an arbitrary-precision exponent.
pub fn pow_mod_fp(base: &[u64], exp: &BigInt, f: &[u64], p: u64) -> GfPoly {
    let mut result: GfPoly = vec![1];
    let mut acc = rem(base, f, p);
    let bits = exp.bits();
    for i in 0..bits {
        if exp.bit(i) {
            result = rem(&mul(&result, &acc, p), f, p);
        }
        if i + 1 < bits {
            acc = rem(&mul(&acc, &acc, p), f, p);
        }
    }
    result
}

/// base^exp mod (f, p) for a machine-word exponent.
pub fn pow_mod_fp_u64(base: &[u64], exp: u64, f: &[u64], p: u64) -> GfPoly {
    pow_mod_fp(base, &BigInt::from(exp), f, p)
}

/// Whether f (monic image mod p, degree d >= 1) is irreducible over GF(p):
/// X^(p^d) == X (mod f) and gcd(X^(p^(d/l)) - X, f) = 1 for every prime l | d.
pub fn is_irreducible(f: &[u64], p: u64) -> bool {
    let f = monic(f, p);
    let d = degree(&f);
    if d == 0 {
        return false;
    }
    if d == 1 {
        return true;
    }

    let x: GfPoly = vec![0, 1];
    // Iterated Frobenius: frob[k] = X^(p^k) mod f.
    let mut t = x.clone();
    let mut prime_divisors = Vec::new();
    let mut rest = d;
    let mut q = 2;
    while q * q <= rest {
        if rest % q == 0 {
            prime_divisors.push(q);
            while rest % q == 0 {
                rest /= q;
            }
        }
        q += 1;
    }
    if rest > 1 {
        prime_divisors.push(rest);
    }

    for k in 1..=d {
        t = pow_mod_fp_u64(&t, p, &f, p);
        if prime_divisors.iter().any(|&l| k == d / l) {
            let g = gcd(&sub(&t, &x, p), &f, p);
            if degree(&g) != 0 || is_zero(&g) {
                return false;
            }
        }
    }
    t == rem(&x, &f, p)
}

/// All roots of f mod p, ascending. Exhaustive scan; factor-base primes are
/// word-sized and the scan is the dominant but acceptable cost at the scales
/// this crate targets.
pub fn roots_mod_p(f: &Polynomial, p: u64) -> Vec<u64> {
    let reduced = from_bigint_poly(f, p);
    if is_zero(&reduced) {
        return (0..p).collect();
    }
    (0..p).filter(|&r| evaluate(&reduced, r, p) == 0).collect()
}
