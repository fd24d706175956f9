//! Variable-bandwidth (skyline) storage for the symmetric network Jacobian.
//!
//! Column `j` stores rows `j - h[j] .. j` of the strict upper triangle, packed
//! column after column; the diagonal is kept separately. Factorization is
//! LDLᵀ in place, with work proportional to the sum of the column heights.

use crate::error::{SkylineError, SkylineResult};

/// Packed offsets of each column, validating `h[j] <= j`.
pub(crate) fn column_offsets(heights: &[usize]) -> SkylineResult<Vec<usize>> {
    let mut offsets = Vec::with_capacity(heights.len() + 1);
    let mut total = 0;
    offsets.push(0);
    for (column, &height) in heights.iter().enumerate() {
        if height > column {
            return Err(SkylineError::InvalidProfile { column, height });
        }
        total += height;
        offsets.push(total);
    }
    Ok(offsets)
}

/// Symmetric skyline matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SkylineMatrix {
    heights: Vec<usize>,
    offsets: Vec<usize>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl SkylineMatrix {
    /// Allocate a zero matrix with the given column heights.
    pub fn new(heights: &[usize]) -> SkylineResult<Self> {
        let offsets = column_offsets(heights)?;
        let packed = offsets[heights.len()];
        Ok(Self {
            heights: heights.to_vec(),
            offsets,
            diag: vec![0.0; heights.len()],
            upper: vec![0.0; packed],
        })
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    /// Number of stored off-diagonal entries.
    pub fn packed_len(&self) -> usize {
        self.upper.len()
    }

    /// Packed position of the off-diagonal entry `(i, j)`.
    ///
    /// Order of the indices does not matter. `None` for diagonal entries and
    /// for entries outside the profile.
    pub fn index(&self, i: usize, j: usize) -> Option<usize> {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        if i == j || j >= self.dim() {
            return None;
        }
        let top = j - self.heights[j];
        (i >= top).then(|| self.offsets[j] + (i - top))
    }

    pub fn diagonal(&self, i: usize) -> f64 {
        self.diag[i]
    }

    pub fn diagonal_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.diag[i]
    }

    pub fn at(&self, k: usize) -> f64 {
        self.upper[k]
    }

    pub fn at_mut(&mut self, k: usize) -> &mut f64 {
        &mut self.upper[k]
    }

    /// Entry `(i, j)`, zero outside the profile.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return self.diag[i];
        }
        self.index(i, j).map_or(0.0, |k| self.upper[k])
    }

    /// Set every stored entry, diagonal included.
    pub fn fill(&mut self, value: f64) {
        self.diag.fill(value);
        self.upper.fill(value);
    }

    /// `A·x` for an unfactored matrix.
    pub fn mul_vec(&self, x: &[f64]) -> SkylineResult<Vec<f64>> {
        self.check_len(x.len())?;
        let mut y: Vec<f64> = self.diag.iter().zip(x).map(|(d, v)| d * v).collect();
        for j in 0..self.dim() {
            let top = j - self.heights[j];
            for i in top..j {
                let a = self.upper[self.offsets[j] + (i - top)];
                y[i] += a * x[j];
                y[j] += a * x[i];
            }
        }
        Ok(y)
    }

    /// Overwrite the matrix with its LDLᵀ factors.
    pub fn factorize(&mut self) -> SkylineResult<()> {
        for j in 0..self.dim() {
            let top_j = j - self.heights[j];
            let col_j = self.offsets[j];

            for i in top_j..j {
                let top_i = i - self.heights[i];
                let col_i = self.offsets[i];
                let mut s = 0.0;
                for k in top_j.max(top_i)..i {
                    s += self.upper[col_i + (k - top_i)] * self.upper[col_j + (k - top_j)];
                }
                self.upper[col_j + (i - top_j)] -= s;
            }

            let mut d = self.diag[j];
            for i in top_j..j {
                let g = self.upper[col_j + (i - top_j)];
                let l = g / self.diag[i];
                d -= l * g;
                self.upper[col_j + (i - top_j)] = l;
            }
            if d == 0.0 || !d.is_finite() {
                return Err(SkylineError::SingularPivot { index: j, value: d });
            }
            self.diag[j] = d;
        }
        Ok(())
    }

    /// Solve in place with factors produced by `factorize`.
    pub fn solve_factored(&self, rhs: &mut [f64]) -> SkylineResult<()> {
        self.check_len(rhs.len())?;
        let n = self.dim();
        for j in 0..n {
            let top = j - self.heights[j];
            let col = self.offsets[j];
            let s: f64 = (top..j).map(|i| self.upper[col + (i - top)] * rhs[i]).sum();
            rhs[j] -= s;
        }
        for (r, d) in rhs.iter_mut().zip(&self.diag) {
            *r /= d;
        }
        for j in (0..n).rev() {
            let top = j - self.heights[j];
            let col = self.offsets[j];
            let xj = rhs[j];
            for i in top..j {
                rhs[i] -= self.upper[col + (i - top)] * xj;
            }
        }
        Ok(())
    }

    /// Factorize and solve `A·x = rhs`, leaving `x` in `rhs`.
    pub fn factorize_and_solve(&mut self, rhs: &mut [f64]) -> SkylineResult<()> {
        self.check_len(rhs.len())?;
        self.factorize()?;
        self.solve_factored(rhs)
    }

    fn check_len(&self, found: usize) -> SkylineResult<()> {
        if found == self.dim() {
            Ok(())
        } else {
            Err(SkylineError::DimensionMismatch {
                expected: self.dim(),
                found,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_profile() {
        let m = SkylineMatrix::new(&[0, 1, 1, 3]).unwrap();
        assert_eq!(m.packed_len(), 5);
        assert_eq!(m.index(0, 1), Some(0));
        assert_eq!(m.index(1, 2), Some(1));
        assert_eq!(m.index(0, 2), None);
        assert_eq!(m.index(0, 3), Some(2));
        assert_eq!(m.index(3, 2), Some(4));
        assert_eq!(m.index(2, 2), None);
        assert_eq!(m.index(1, 7), None);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        assert_eq!(
            SkylineMatrix::new(&[1]).unwrap_err(),
            SkylineError::InvalidProfile {
                column: 0,
                height: 1
            }
        );
    }

    #[test]
    fn tridiagonal_solve() {
        // [2 -1 0; -1 2 -1; 0 -1 2] x = [1 0 1] -> x = [1 1 1]
        let mut m = SkylineMatrix::new(&[0, 1, 1]).unwrap();
        for i in 0..3 {
            *m.diagonal_mut(i) = 2.0;
        }
        *m.at_mut(0) = -1.0;
        *m.at_mut(1) = -1.0;
        let mut rhs = vec![1.0, 0.0, 1.0];
        m.factorize_and_solve(&mut rhs).unwrap();
        for v in rhs {
            assert!((v - 1.0).abs() < 1e-14);
        }
    }

    #[test]
    fn zero_pivot_is_reported() {
        let mut m = SkylineMatrix::new(&[0, 1]).unwrap();
        *m.diagonal_mut(0) = 1.0;
        *m.diagonal_mut(1) = 1.0;
        *m.at_mut(0) = 1.0;
        let mut rhs = vec![1.0, 1.0];
        assert!(matches!(
            m.factorize_and_solve(&mut rhs),
            Err(SkylineError::SingularPivot { index: 1, .. })
        ));
    }

    #[test]
    fn fill_resets_everything() {
        let mut m = SkylineMatrix::new(&[0, 1]).unwrap();
        *m.diagonal_mut(1) = 4.0;
        *m.at_mut(0) = -2.0;
        m.fill(0.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(1, 0), 0.0);
    }

    #[test]
    fn wrong_rhs_length() {
        let mut m = SkylineMatrix::new(&[0, 1]).unwrap();
        let mut rhs = vec![1.0];
        assert!(matches!(
            m.factorize_and_solve(&mut rhs),
            Err(SkylineError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }
}
