// src/square_root/finite_field_arithmetic.rs
//
// Square roots and norms in GF(p^d) = GF(p)[X]/(f), f monic irreducible
// mod p. Elements are GfPoly values of degree < d.

use num::{BigInt, Integer};

use crate::integer_math::modular::legendre_symbol;
use crate::polynomial::finite_field::{
    self, degree, is_zero, mul, rem, sub, GfPoly,
};

/// q = p^d.
pub fn field_order(p: u64, d: usize) -> BigInt {
    BigInt::from(p).pow(d as u32)
}

fn one() -> GfPoly {
    vec![1]
}

fn minus_one(p: u64) -> GfPoly {
    vec![p - 1]
}

fn field_mul(a: &[u64], b: &[u64], f: &[u64], p: u64) -> GfPoly {
    rem(&mul(a, b, p), f, p)
}

fn field_pow(base: &[u64], exp: &BigInt, f: &[u64], p: u64) -> GfPoly {
    finite_field::pow_mod_fp(base, exp, f, p)
}

/// Whether s is a nonzero square in GF(p^d): s^((q-1)/2) == 1.
pub fn is_square(s: &[u64], f: &[u64], p: u64, d: usize) -> bool {
    if is_zero(s) {
        return false;
    }
    let exp = (field_order(p, d) - 1) / 2;
    field_pow(s, &exp, f, p) == one()
}

/// Tonelli-Shanks in GF(p^d). Returns one of the two square roots of s, or
/// None when s is zero or a non-residue.
pub fn sqrt(s: &[u64], f: &[u64], p: u64, d: usize) -> Option<GfPoly> {
    if is_zero(s) {
        return None;
    }
    let q = field_order(p, d);
    let half = (&q - 1) / 2;
    if field_pow(s, &half, f, p) != one() {
        return None;
    }

    // q - 1 = t * 2^r with t odd.
    let mut t: BigInt = &q - 1;
    let mut r = 0u32;
    while t.is_even() {
        t /= 2;
        r += 1;
    }

    // A quadratic non-residue of the field. In odd degree a ground-field
    // non-residue c stays one (N(c) = c^d); even degrees scan X + k instead.
    let non_residue: GfPoly = if d % 2 == 1 {
        let mut c = 2u64;
        while legendre_symbol(c, p) != -1 {
            c += 1;
        }
        vec![c]
    } else {
        let mut k = 0u64;
        loop {
            let candidate: GfPoly = finite_field::trim(vec![k % p, 1]);
            if field_pow(&candidate, &half, f, p) == minus_one(p) {
                break candidate;
            }
            k += 1;
        }
    };
    let mut c = field_pow(&non_residue, &t, f, p);

    let mut m = r;
    let mut u = field_pow(s, &t, f, p);
    let mut root = field_pow(s, &((&t + 1) / 2), f, p);

    while u != one() {
        // Least i with u^(2^i) == 1.
        let mut i = 0u32;
        let mut probe = u.clone();
        while probe != one() {
            probe = field_mul(&probe, &probe, f, p);
            i += 1;
            if i == m {
                return None;
            }
        }
        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = field_mul(&b, &b, f, p);
        }
        m = i;
        c = field_mul(&b, &b, f, p);
        u = field_mul(&u, &c, f, p);
        root = field_mul(&root, &b, f, p);
    }

    debug_assert_eq!(field_mul(&root, &root, f, p), rem(s, f, p));
    Some(root)
}

/// Field norm GF(p^d) -> GF(p): N(a) = a^((q-1)/(p-1)). The result is a
/// constant; returns its value (0 for a = 0).
pub fn norm(a: &[u64], f: &[u64], p: u64, d: usize) -> u64 {
    if is_zero(a) {
        return 0;
    }
    let exp = (field_order(p, d) - 1) / (BigInt::from(p) - 1);
    let n = field_pow(a, &exp, f, p);
    debug_assert!(degree(&n) == 0 || is_zero(&n));
    n.first().copied().unwrap_or(0)
}

/// Additive inverse, coefficient-wise.
pub fn negate(a: &[u64], p: u64) -> GfPoly {
    sub(&[], a, p)
}
