// src/polynomial/polynomial.rs

use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Sub};

use num::{BigInt, One, Signed, Zero};
use serde::{Deserialize, Serialize};

/// Dense univariate polynomial over Z. `coefficients[i]` is the coefficient
/// of X^i; the vector carries no trailing zeros, and the zero polynomial is
/// the empty vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polynomial {
    coefficients: Vec<BigInt>,
}

impl Polynomial {
    pub fn new(mut coefficients: Vec<BigInt>) -> Self {
        while coefficients.last().is_some_and(|c| c.is_zero()) {
            coefficients.pop();
        }
        Polynomial { coefficients }
    }

    pub fn zero() -> Self {
        Polynomial {
            coefficients: Vec::new(),
        }
    }

    pub fn one() -> Self {
        Polynomial {
            coefficients: vec![BigInt::one()],
        }
    }

    pub fn constant(c: BigInt) -> Self {
        Polynomial::new(vec![c])
    }

    /// c * X^k.
    pub fn monomial(c: BigInt, k: usize) -> Self {
        let mut coefficients = vec![BigInt::zero(); k + 1];
        coefficients[k] = c;
        Polynomial::new(coefficients)
    }

    /// Convenience constructor for tests and small literals.
    pub fn from_i64(coefficients: &[i64]) -> Self {
        Polynomial::new(coefficients.iter().map(|&c| BigInt::from(c)).collect())
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn coefficients(&self) -> &[BigInt] {
        &self.coefficients
    }

    pub fn coefficient(&self, power: usize) -> BigInt {
        self.coefficients
            .get(power)
            .cloned()
            .unwrap_or_else(BigInt::zero)
    }

    pub fn leading_coefficient(&self) -> BigInt {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(BigInt::zero)
    }

    pub fn is_monic(&self) -> bool {
        self.coefficients.last().is_some_and(|c| c.is_one())
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        for c in self.coefficients.iter().rev() {
            result = result * x + c;
        }
        result
    }

    /// Horner evaluation with every step reduced mod n (n > 0).
    pub fn evaluate_mod(&self, x: &BigInt, n: &BigInt) -> BigInt {
        use num::Integer;
        let mut result = BigInt::zero();
        let x = x.mod_floor(n);
        for c in self.coefficients.iter().rev() {
            result = (result * &x + c).mod_floor(n);
        }
        result
    }

    /// The homogeneous form b^d * f(a/b) evaluated as an exact integer:
    /// sum of c_i * a^i * b^(d-i). This is the algebraic norm of a - b*theta
    /// up to sign conventions.
    pub fn homogeneous_evaluate(&self, a: &BigInt, b: &BigInt) -> BigInt {
        if self.is_zero() {
            return BigInt::zero();
        }
        let d = self.degree();
        let mut result = self.coefficients[d].clone();
        let mut b_power = BigInt::one();
        for i in (0..d).rev() {
            b_power *= b;
            result = result * a + &self.coefficients[i] * &b_power;
        }
        result
    }

    pub fn derivative(&self) -> Polynomial {
        if self.coefficients.len() <= 1 {
            return Polynomial::zero();
        }
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * BigInt::from(i))
            .collect();
        Polynomial::new(coefficients)
    }

    /// Remainder of self divided by a monic polynomial, exact over Z.
    /// Panics if `modulus` is not monic (internal contract; the number-field
    /// polynomial is monic by selection).
    pub fn reduce_mod(&self, modulus: &Polynomial) -> Polynomial {
        assert!(modulus.is_monic(), "reduce_mod requires a monic modulus");
        let d = modulus.degree();
        let mut rem = self.coefficients.clone();
        while rem.len() > d {
            let lead = rem.pop().expect("nonempty");
            if lead.is_zero() {
                continue;
            }
            let shift = rem.len() - d;
            for (i, c) in modulus.coefficients.iter().take(d).enumerate() {
                let idx = shift + i;
                let delta = &lead * c;
                rem[idx] -= delta;
            }
        }
        Polynomial::new(rem)
    }

    /// Product of the two polynomials reduced mod a monic modulus.
    pub fn multiply_mod(&self, other: &Polynomial, modulus: &Polynomial) -> Polynomial {
        (self.clone() * other.clone()).reduce_mod(modulus)
    }

    pub fn square(&self) -> Polynomial {
        self.clone() * self.clone()
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, other: Polynomial) -> Polynomial {
        let (mut longer, shorter) = if self.coefficients.len() >= other.coefficients.len() {
            (self.coefficients, other.coefficients)
        } else {
            (other.coefficients, self.coefficients)
        };
        for (i, c) in shorter.into_iter().enumerate() {
            longer[i] += c;
        }
        Polynomial::new(longer)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, other: Polynomial) -> Polynomial {
        let mut coefficients = self.coefficients;
        if coefficients.len() < other.coefficients.len() {
            coefficients.resize(other.coefficients.len(), BigInt::zero());
        }
        for (i, c) in other.coefficients.into_iter().enumerate() {
            coefficients[i] -= c;
        }
        Polynomial::new(coefficients)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, other: Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut coefficients =
            vec![BigInt::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Polynomial::new(coefficients)
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
                first = false;
            } else if c.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            let abs = c.abs();
            match power {
                0 => write!(f, "{}", abs)?,
                _ => {
                    if !abs.is_one() {
                        write!(f, "{}*", abs)?;
                    }
                    if power == 1 {
                        write!(f, "X")?;
                    } else {
                        write!(f, "X^{}", power)?;
                    }
                }
            }
        }
        Ok(())
    }
}
