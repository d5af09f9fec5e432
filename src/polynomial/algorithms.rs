// src/polynomial/algorithms.rs

use num::{BigInt, Integer, One, Signed, Zero};

use crate::polynomial::polynomial::Polynomial;

/// Exact integer square root: Some(r) with r*r == n, or None.
pub fn exact_sqrt(n: &BigInt) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let r = n.sqrt();
    if &r * &r == *n {
        Some(r)
    } else {
        None
    }
}

/// Resultant of f and g over Z, computed as the determinant of the Sylvester
/// matrix by fraction-free (Bareiss) elimination. The matrix has dimension
/// deg f + deg g, which is tiny for the degrees this crate uses.
pub fn resultant(f: &Polynomial, g: &Polynomial) -> BigInt {
    if f.is_zero() || g.is_zero() {
        return BigInt::zero();
    }
    let df = f.degree();
    let dg = g.degree();
    if df == 0 {
        return f.coefficient(0).pow(dg as u32);
    }
    if dg == 0 {
        return g.coefficient(0).pow(df as u32);
    }

    let size = df + dg;
    let mut m = vec![vec![BigInt::zero(); size]; size];
    // dg rows of f's coefficients, then df rows of g's, each shifted.
    for row in 0..dg {
        for i in 0..=df {
            m[row][row + i] = f.coefficient(df - i);
        }
    }
    for row in 0..df {
        for i in 0..=dg {
            m[dg + row][row + i] = g.coefficient(dg - i);
        }
    }

    // Bareiss fraction-free elimination; every division is exact.
    let mut sign = BigInt::one();
    let mut prev = BigInt::one();
    for k in 0..size - 1 {
        if m[k][k].is_zero() {
            let swap = (k + 1..size).find(|&r| !m[r][k].is_zero());
            match swap {
                Some(r) => {
                    m.swap(k, r);
                    sign = -sign;
                }
                None => return BigInt::zero(),
            }
        }
        for i in k + 1..size {
            for j in k + 1..size {
                let num = &m[i][j] * &m[k][k] - &m[i][k] * &m[k][j];
                m[i][j] = num / &prev;
            }
            m[i][k] = BigInt::zero();
        }
        prev = m[k][k].clone();
    }
    sign * m[size - 1][size - 1].clone()
}

/// Chinese remainder theorem: the unique z mod prod(moduli) with
/// z == residues[i] (mod moduli[i]). Moduli must be pairwise coprime.
pub fn chinese_remainder_theorem(moduli: &[BigInt], residues: &[BigInt]) -> BigInt {
    assert_eq!(moduli.len(), residues.len());
    let product: BigInt = moduli.iter().product();
    let mut sum = BigInt::zero();
    for (m_i, r_i) in moduli.iter().zip(residues) {
        let q = &product / m_i;
        let inv = modular_inverse(&q, m_i).expect("moduli pairwise coprime");
        sum += r_i * inv * q;
    }
    sum.mod_floor(&product)
}

/// Balanced representative of z mod m in (-m/2, m/2].
pub fn balanced_residue(z: &BigInt, m: &BigInt) -> BigInt {
    let r = z.mod_floor(m);
    if &r * 2 > *m {
        r - m
    } else {
        r
    }
}

/// Inverse of a mod m via the extended Euclidean algorithm.
pub fn modular_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if m.is_one() {
        return Some(BigInt::zero());
    }
    let (mut old_r, mut r) = (a.mod_floor(m), m.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }
    if !old_r.is_one() {
        return None;
    }
    Some(old_s.mod_floor(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sqrt() {
        assert_eq!(exact_sqrt(&BigInt::from(144)), Some(BigInt::from(12)));
        assert_eq!(exact_sqrt(&BigInt::from(0)), Some(BigInt::zero()));
        assert_eq!(exact_sqrt(&BigInt::from(145)), None);
        assert_eq!(exact_sqrt(&BigInt::from(-4)), None);
    }

    #[test]
    fn test_resultant_linear_pair() {
        // Res(x - a, x - b) = a - b (up to the classical sign convention
        // Res = product of differences of roots with unit leading coeffs).
        let f = Polynomial::from_i64(&[-3, 1]); // x - 3
        let g = Polynomial::from_i64(&[-5, 1]); // x - 5
        let r = resultant(&f, &g);
        assert_eq!(r.abs(), BigInt::from(2));
    }

    #[test]
    fn test_resultant_with_common_root_is_zero() {
        let f = Polynomial::from_i64(&[-1, 0, 1]); // (x-1)(x+1)
        let g = Polynomial::from_i64(&[-1, 1]); // x - 1
        assert!(resultant(&f, &g).is_zero());
    }

    #[test]
    fn test_resultant_discriminant_of_cubic() {
        // disc(x^3 + px + q) = -4p^3 - 27q^2; disc = -Res(f, f')/lc(f) for cubic.
        let f = Polynomial::from_i64(&[2, -1, 0, 1]); // x^3 - x + 2
        let fp = f.derivative();
        let res = resultant(&f, &fp);
        // -4*(-1)^3 - 27*(2)^2 = 4 - 108 = -104; Res(f, f') = -disc = 104.
        assert_eq!(res, BigInt::from(104));
    }

    #[test]
    fn test_chinese_remainder_theorem() {
        let moduli = [BigInt::from(3), BigInt::from(5), BigInt::from(7)];
        let residues = [BigInt::from(2), BigInt::from(3), BigInt::from(2)];
        let z = chinese_remainder_theorem(&moduli, &residues);
        assert_eq!(z, BigInt::from(23));
    }

    #[test]
    fn test_balanced_residue() {
        let m = BigInt::from(7);
        assert_eq!(balanced_residue(&BigInt::from(6), &m), BigInt::from(-1));
        assert_eq!(balanced_residue(&BigInt::from(3), &m), BigInt::from(3));
        assert_eq!(balanced_residue(&BigInt::from(-1), &m), BigInt::from(-1));
    }

    #[test]
    fn test_modular_inverse() {
        let inv = modular_inverse(&BigInt::from(3), &BigInt::from(11)).unwrap();
        assert_eq!((inv * 3) % 11, BigInt::one());
        assert!(modular_inverse(&BigInt::from(4), &BigInt::from(8)).is_none());
    }
}
