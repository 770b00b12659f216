//! Dense mission × data score matrix.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Row-major matrix indexed `[mission row][data column]`.
///
/// Serializes as a JSON array of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl UsageMatrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one mission row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutably borrow one mission row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        &mut self.values[row * self.cols..(row + 1) * self.cols]
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.values[row * self.cols + col])
    }

    /// Set one cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(col < self.cols, "column {col} out of bounds ({})", self.cols);
        self.row_mut(row)[col] = value;
    }

    /// Iterate rows in mission order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and a zero-column matrix still has rows.
        (0..self.rows).map(move |r| &self.values[r * self.cols..(r + 1) * self.cols])
    }

    /// Largest absolute cell difference against `other`.
    ///
    /// Returns `None` when the shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(
            self.values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}

impl Serialize for UsageMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.iter_rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
