//! Skyline storage for non-symmetric matrices with a symmetric profile.
//!
//! The upper triangle is packed by columns and the lower triangle by rows,
//! both with the same heights, so `(i, j)` and `(j, i)` share a packed
//! position. Factorization is Doolittle LU without pivoting.

use crate::error::{SkylineError, SkylineResult};
use crate::skyline::column_offsets;

#[derive(Debug, Clone, PartialEq)]
pub struct SkylineLu {
    heights: Vec<usize>,
    offsets: Vec<usize>,
    diag: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl SkylineLu {
    pub fn new(heights: &[usize]) -> SkylineResult<Self> {
        let offsets = column_offsets(heights)?;
        let packed = offsets[heights.len()];
        Ok(Self {
            heights: heights.to_vec(),
            offsets,
            diag: vec![0.0; heights.len()],
            upper: vec![0.0; packed],
            lower: vec![0.0; packed],
        })
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    fn packed(&self, i: usize, j: usize) -> Option<usize> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi || hi >= self.dim() {
            return None;
        }
        let top = hi - self.heights[hi];
        (lo >= top).then(|| self.offsets[hi] + (lo - top))
    }

    /// Entry `(i, j)`, zero outside the profile.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return self.diag[i];
        }
        match self.packed(i, j) {
            Some(k) if i < j => self.upper[k],
            Some(k) => self.lower[k],
            None => 0.0,
        }
    }

    /// Add `value` to entry `(i, j)`.
    pub fn add(&mut self, i: usize, j: usize, value: f64) -> SkylineResult<()> {
        if i == j && i < self.dim() {
            self.diag[i] += value;
            return Ok(());
        }
        match self.packed(i, j) {
            Some(k) if i < j => self.upper[k] += value,
            Some(k) => self.lower[k] += value,
            None => return Err(SkylineError::OutsideProfile { row: i, col: j }),
        }
        Ok(())
    }

    pub fn fill(&mut self, value: f64) {
        self.diag.fill(value);
        self.upper.fill(value);
        self.lower.fill(value);
    }

    /// Multiply every entry by `k`.
    pub fn scale(&mut self, k: f64) {
        for v in self
            .diag
            .iter_mut()
            .chain(self.upper.iter_mut())
            .chain(self.lower.iter_mut())
        {
            *v *= k;
        }
    }

    /// `A·x` for an unfactored matrix.
    pub fn mul_vec(&self, x: &[f64]) -> SkylineResult<Vec<f64>> {
        self.check_len(x.len())?;
        let mut y: Vec<f64> = self.diag.iter().zip(x).map(|(d, v)| d * v).collect();
        for j in 0..self.dim() {
            let top = j - self.heights[j];
            for i in top..j {
                let k = self.offsets[j] + (i - top);
                y[i] += self.upper[k] * x[j];
                y[j] += self.lower[k] * x[i];
            }
        }
        Ok(y)
    }

    /// Overwrite with unit-lower `L` and upper `U` (diagonal in `diag`).
    pub fn factorize(&mut self) -> SkylineResult<()> {
        for j in 0..self.dim() {
            let top_j = j - self.heights[j];
            let base = self.offsets[j];

            for i in top_j..j {
                let top_i = i - self.heights[i];
                let row_i = self.offsets[i];
                let mut s = 0.0;
                for k in top_j.max(top_i)..i {
                    s += self.lower[row_i + (k - top_i)] * self.upper[base + (k - top_j)];
                }
                self.upper[base + (i - top_j)] -= s;
            }

            for i in top_j..j {
                let top_i = i - self.heights[i];
                let col_i = self.offsets[i];
                let mut s = 0.0;
                for k in top_j.max(top_i)..i {
                    s += self.lower[base + (k - top_j)] * self.upper[col_i + (k - top_i)];
                }
                let pos = base + (i - top_j);
                self.lower[pos] = (self.lower[pos] - s) / self.diag[i];
            }

            let s: f64 = (top_j..j)
                .map(|k| self.lower[base + (k - top_j)] * self.upper[base + (k - top_j)])
                .sum();
            let d = self.diag[j] - s;
            if d == 0.0 || !d.is_finite() {
                return Err(SkylineError::SingularPivot { index: j, value: d });
            }
            self.diag[j] = d;
        }
        Ok(())
    }

    pub fn solve_factored(&self, rhs: &mut [f64]) -> SkylineResult<()> {
        self.check_len(rhs.len())?;
        let n = self.dim();
        for j in 0..n {
            let top = j - self.heights[j];
            let row = self.offsets[j];
            let s: f64 = (top..j).map(|k| self.lower[row + (k - top)] * rhs[k]).sum();
            rhs[j] -= s;
        }
        for j in (0..n).rev() {
            rhs[j] /= self.diag[j];
            let top = j - self.heights[j];
            let col = self.offsets[j];
            let xj = rhs[j];
            for i in top..j {
                rhs[i] -= self.upper[col + (i - top)] * xj;
            }
        }
        Ok(())
    }

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
    fn upper_and_lower_are_distinct() {
        let mut m = SkylineLu::new(&[0, 1]).unwrap();
        m.add(0, 1, 2.0).unwrap();
        m.add(1, 0, -3.0).unwrap();
        m.add(1, 1, 5.0).unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), -3.0);
        assert_eq!(m.get(1, 1), 5.0);
        assert_eq!(m.mul_vec(&[1.0, 1.0]).unwrap(), vec![2.0, 2.0]);
    }

    #[test]
    fn outside_profile_is_an_error() {
        let mut m = SkylineLu::new(&[0, 0, 1]).unwrap();
        assert_eq!(
            m.add(0, 2, 1.0),
            Err(SkylineError::OutsideProfile { row: 0, col: 2 })
        );
    }

    #[test]
    fn lower_triangular_solve() {
        // [1 0; -1 2] x = [1 1] -> x = [1, 1]
        let mut m = SkylineLu::new(&[0, 1]).unwrap();
        m.add(0, 0, 1.0).unwrap();
        m.add(1, 0, -1.0).unwrap();
        m.add(1, 1, 2.0).unwrap();
        let mut rhs = vec![1.0, 1.0];
        m.factorize_and_solve(&mut rhs).unwrap();
        assert!((rhs[0] - 1.0).abs() < 1e-15);
        assert!((rhs[1] - 1.0).abs() < 1e-15);
    }
}
