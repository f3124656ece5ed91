//! Dense square matrices over walk counts.
//!
//! Entry `(i, j)` of `A^k` counts the walks of length `k` from `i` to `j`.
//! Arithmetic saturates at `u64::MAX`, so a nonzero entry never wraps back
//! to zero and reachability stays exact on large graphs.

use std::fmt;

/// Row-major `n × n` matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matrix {
    n: usize,
    cells: Vec<u64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    /// Build a matrix from a cell function `(row, col) -> value`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> u64) -> Self {
        let mut cells = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                cells.push(f(i, j));
            }
        }
        Self { n, cells }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.n + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u64) {
        self.cells[row * self.n + col] = value;
    }

    pub fn row(&self, row: usize) -> &[u64] {
        &self.cells[row * self.n..(row + 1) * self.n]
    }

    /// Rows as owned vectors, for renderers and bindings.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    /// Matrix product `self × other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        debug_assert_eq!(self.n, other.n, "matrix sizes differ");
        let n = self.n;
        let mut out = Matrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a == 0 {
                    continue;
                }
                for j in 0..n {
                    let b = other.get(k, j);
                    if b == 0 {
                        continue;
                    }
                    let idx = i * n + j;
                    out.cells[idx] = out.cells[idx].saturating_add(a.saturating_mul(b));
                }
            }
        }
        out
    }

    /// Successive powers `A^1, A^2, ...` (unbounded; callers `take` what they need).
    pub fn powers(&self) -> Powers<'_> {
        Powers {
            base: self,
            current: None,
        }
    }

    /// Element-wise boolean OR of `matrices`, clipped to {0, 1}.
    pub fn boolean_union<'a>(n: usize, matrices: impl IntoIterator<Item = &'a Matrix>) -> Matrix {
        let mut out = Matrix::zeros(n);
        for m in matrices {
            debug_assert_eq!(m.n, n, "matrix sizes differ");
            for (cell, &value) in out.cells.iter_mut().zip(&m.cells) {
                if value != 0 {
                    *cell = 1;
                }
            }
        }
        out
    }

    /// Sum of diagonal entries.
    pub fn trace(&self) -> u64 {
        (0..self.n).fold(0u64, |acc, i| acc.saturating_add(self.get(i, i)))
    }

    #[inline]
    pub fn column_is_null(&self, col: usize) -> bool {
        (0..self.n).all(|row| self.get(row, col) == 0)
    }

    /// Indices of the all-zero columns.
    pub fn null_columns(&self) -> Vec<usize> {
        (0..self.n).filter(|&col| self.column_is_null(col)).collect()
    }

    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.n, |i, j| self.get(j, i))
    }
}

/// Plain-text grid, one row per line, cells separated by a space.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            let row: Vec<String> = self.row(i).iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// Iterator over `A^1, A^2, ...` built by repeated multiplication.
pub struct Powers<'a> {
    base: &'a Matrix,
    current: Option<Matrix>,
}

impl Iterator for Powers<'_> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        let next = match &self.current {
            None => self.base.clone(),
            Some(m) => m.multiply(self.base),
        };
        self.current = Some(next.clone());
        Some(next)
    }
}
