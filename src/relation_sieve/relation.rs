// src/relation_sieve/relation.rs

use bitvec::prelude::*;
use num::{BigInt, Signed};
use serde::{Deserialize, Serialize};

use crate::factor::factor_base::FactorBase;

/// One smooth relation: a coprime pair (a, b) with b > 0 whose rational norm
/// a - b*m and algebraic norm b^d * f(a/b) both factor completely over the
/// factor bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub a: i64,
    pub b: i64,
    /// a - b*m, signed.
    pub rational_norm: BigInt,
    /// b^d * f(a/b), signed.
    pub algebraic_norm: BigInt,
    /// (index into RFB, exponent) for every prime dividing |rational_norm|.
    pub rational_exponents: Vec<(usize, u32)>,
    /// (index into AFB, exponent) for every ideal dividing the algebraic norm.
    pub algebraic_exponents: Vec<(usize, u32)>,
    /// One bit per QCB pair: set when the character (a - b*s | q) is -1.
    pub quadratic_characters: Vec<bool>,
}

impl Relation {
    /// Exponent-parity row: [sign][RFB][AFB][QCB], zero-padded to `width`.
    pub fn parity_row(&self, fb: &FactorBase, width: usize) -> BitVec {
        let mut row = bitvec![0; width.max(fb.column_count())];
        if self.rational_norm.is_negative() {
            row.set(0, true);
        }
        for &(index, exponent) in &self.rational_exponents {
            if exponent % 2 == 1 {
                row.set(1 + index, true);
            }
        }
        let afb_offset = 1 + fb.rfb.len();
        for &(index, exponent) in &self.algebraic_exponents {
            if exponent % 2 == 1 {
                row.set(afb_offset + index, true);
            }
        }
        let qcb_offset = afb_offset + fb.afb.len();
        for (i, &bit) in self.quadratic_characters.iter().enumerate() {
            if bit {
                row.set(qcb_offset + i, true);
            }
        }
        row
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(a = {}, b = {}, rational = {}, algebraic = {})",
            self.a, self.b, self.rational_norm, self.algebraic_norm
        )
    }
}
