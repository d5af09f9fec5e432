// src/matrix/gaussian_matrix.rs

use bitvec::prelude::*;
use log::debug;

use crate::core::error::GnfsError;
use crate::core::progress::{Phase, RunContext};
use crate::factor::factor_base::FactorBase;
use crate::relation_sieve::relation::Relation;

/// Square GF(2) matrix of relation exponent-parity rows, padded with zero
/// columns so the row count matches the column count. Because relations
/// exceed the live columns by at least two, the left nullspace is nontrivial.
pub struct GaussianMatrix {
    rows: Vec<BitVec>,
    /// markers[i] tracks which original rows were combined into rows[i].
    markers: Vec<BitVec>,
    width: usize,
    eliminated: bool,
}

impl GaussianMatrix {
    pub fn new(relations: &[Relation], fb: &FactorBase) -> Self {
        let count = relations.len();
        let width = count.max(fb.column_count());
        let rows: Vec<BitVec> = relations
            .iter()
            .map(|rel| rel.parity_row(fb, width))
            .collect();
        let markers: Vec<BitVec> = (0..count)
            .map(|i| {
                let mut marker = bitvec![0; count];
                marker.set(i, true);
                marker
            })
            .collect();
        GaussianMatrix {
            rows,
            markers,
            width,
            eliminated: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Basis of the left nullspace: each returned vector marks a subset of
    /// relation indices whose parity rows XOR to zero.
    ///
    /// Plain Gaussian elimination with marker tracking; rows that reduce to
    /// zero hand over their markers. Cancellation is honored between column
    /// rounds.
    pub fn kernel(&mut self, ctx: &RunContext) -> Result<Vec<BitVec>, GnfsError> {
        if !self.eliminated {
            self.eliminate(ctx)?;
        }
        let vectors: Vec<BitVec> = self
            .rows
            .iter()
            .zip(&self.markers)
            .filter(|(row, _)| row.not_any())
            .map(|(_, marker)| marker.clone())
            .collect();
        debug!(
            "Nullspace dimension {} over {} rows x {} columns",
            vectors.len(),
            self.rows.len(),
            self.width
        );
        Ok(vectors)
    }

    fn eliminate(&mut self, ctx: &RunContext) -> Result<(), GnfsError> {
        let mut pivot_row = 0usize;
        for column in 0..self.width {
            if ctx.is_cancelled() {
                return Err(GnfsError::Cancelled);
            }
            if pivot_row == self.rows.len() {
                break;
            }
            let Some(found) = (pivot_row..self.rows.len()).find(|&r| self.rows[r][column]) else {
                continue;
            };
            self.rows.swap(pivot_row, found);
            self.markers.swap(pivot_row, found);

            let (pivot, rest) = self.split_at_pivot(pivot_row);
            for r in 0..rest.0.len() {
                if rest.0[r][column] {
                    rest.0[r] ^= &pivot.0[..];
                    rest.1[r] ^= &pivot.1[..];
                }
            }
            pivot_row += 1;

            if column % 256 == 0 {
                ctx.progress(
                    Phase::LinearAlgebra,
                    format!("column {} / {}", column, self.width),
                );
            }
        }
        self.eliminated = true;
        Ok(())
    }

    /// Split off the pivot row/marker so the tail can be mutated while the
    /// pivot is borrowed.
    fn split_at_pivot(&mut self, pivot: usize) -> ((&BitVec, &BitVec), (&mut [BitVec], &mut [BitVec])) {
        let (row_head, row_tail) = self.rows.split_at_mut(pivot + 1);
        let (marker_head, marker_tail) = self.markers.split_at_mut(pivot + 1);
        (
            (&row_head[pivot], &marker_head[pivot]),
            (row_tail, marker_tail),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::RunContext;
    use crate::integer_math::prime_factory::PrimeFactory;
    use crate::polynomial::selection::select_polynomial;
    use crate::relation_sieve::sieve::{sieve_relations, SieveRegion};
    use num::BigInt;

    #[test]
    fn test_kernel_vectors_sum_to_zero() {
        let n = BigInt::from(45113);
        let poly = select_polynomial(&n, 3, 50).unwrap();
        let mut primes = PrimeFactory::new();
        let fb = crate::factor::factor_base::FactorBase::build(
            &poly,
            &n,
            60,
            4,
            &mut primes,
            &RunContext::silent(),
        )
        .unwrap();

        let quota = fb.column_count() + 4;
        let mut relations = Vec::new();
        sieve_relations(
            &poly,
            &fb,
            SieveRegion::square(250),
            None,
            quota,
            &mut relations,
            &RunContext::silent(),
        )
        .unwrap();

        let mut matrix = GaussianMatrix::new(&relations, &fb);
        let kernel = matrix.kernel(&RunContext::silent()).unwrap();
        assert!(
            kernel.len() >= 2,
            "rows exceed columns by >= 2, kernel must be nontrivial"
        );

        let width = fb.column_count().max(relations.len());
        for vector in &kernel {
            let mut sum = bitvec![0; width];
            let mut selected = 0;
            for (i, rel) in relations.iter().enumerate() {
                if vector[i] {
                    sum ^= &rel.parity_row(&fb, width)[..];
                    selected += 1;
                }
            }
            assert!(selected > 0, "kernel vector must select relations");
            assert!(sum.not_any(), "selected rows must cancel over GF(2)");
        }
    }

    #[test]
    fn test_kernel_of_duplicate_rows() {
        // Two identical nonzero rows cancel pairwise; a third independent
        // row stays out of the kernel.
        let n = BigInt::from(45113);
        let poly = select_polynomial(&n, 3, 50).unwrap();
        let mut primes = PrimeFactory::new();
        let fb = crate::factor::factor_base::FactorBase::build(
            &poly,
            &n,
            60,
            4,
            &mut primes,
            &RunContext::silent(),
        )
        .unwrap();

        let synthetic = |rational: Vec<(usize, u32)>, algebraic: Vec<(usize, u32)>| Relation {
            a: 1,
            b: 1,
            rational_norm: BigInt::from(1),
            algebraic_norm: BigInt::from(1),
            rational_exponents: rational,
            algebraic_exponents: algebraic,
            quadratic_characters: vec![false; fb.qcb.len()],
        };
        let relations = vec![
            synthetic(vec![(0, 1), (1, 2)], vec![(0, 1)]),
            synthetic(vec![(0, 1), (1, 2)], vec![(0, 1)]),
            synthetic(vec![(2, 1)], vec![]),
        ];

        let mut matrix = GaussianMatrix::new(&relations, &fb);
        let kernel = matrix.kernel(&RunContext::silent()).unwrap();
        assert_eq!(kernel.len(), 1);
        assert!(kernel[0][0] && kernel[0][1]);
        assert!(!kernel[0][2]);
    }
}
