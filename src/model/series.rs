/// A lag-indexed table of values: one row per lag, `columns` values per row.
///
/// A single column holds a molecule-averaged quantity; several columns hold
/// one series per molecule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    columns: usize,
    values: Vec<f64>,
}

impl Series {
    /// # Panics
    ///
    /// Panics if `columns` is zero or does not divide `values.len()`.
    pub fn new(columns: usize, values: Vec<f64>) -> Self {
        assert!(columns > 0, "series needs at least one column");
        assert_eq!(
            values.len() % columns,
            0,
            "series buffer is not a whole number of rows"
        );
        Self { columns, values }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn lags(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.values.len() / self.columns
        }
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.values[t * self.columns..(t + 1) * self.columns]
    }

    pub fn value(&self, t: usize, column: usize) -> f64 {
        self.row(t)[column]
    }

    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.values.chunks_exact(self.columns.max(1))
    }

    #[inline]
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    /// Element-wise map into a new series of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Series {
        Series {
            columns: self.columns,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Collapses the columns of each row into their arithmetic mean.
    pub fn mean_over_columns(&self) -> Series {
        let n = self.columns as f64;
        Series {
            columns: 1,
            values: self
                .iter_rows()
                .map(|row| row.iter().sum::<f64>() / n)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_lags() {
        let s = Series::new(2, vec![0.0, 0.0, 1.0, 3.0, 4.0, 8.0]);
        assert_eq!(s.lags(), 3);
        assert_eq!(s.row(1), &[1.0, 3.0]);
        assert_eq!(s.value(2, 1), 8.0);
    }

    #[test]
    fn mean_over_columns_collapses_rows() {
        let s = Series::new(2, vec![0.0, 0.0, 1.0, 3.0, 4.0, 8.0]);
        let m = s.mean_over_columns();
        assert_eq!(m.columns(), 1);
        assert_eq!(m.as_flat(), &[0.0, 2.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "series buffer is not a whole number of rows")]
    fn rejects_ragged_buffer() {
        Series::new(2, vec![1.0, 2.0, 3.0]);
    }
}
