//! # Interpolation
//!
//! Piecewise-linear interpolation over sparse empirical tables.
//!
//! Both primitives extrapolate linearly beyond the tabulated range using the
//! outermost segment, and a table with a single point is a constant function.
//!
//! ```rust
//! use anchor_core::interpolation::Table1D;
//!
//! let table = Table1D::new([(50.0, 7.0), (60.0, 9.0)]).unwrap();
//! assert!((table.eval(55.0) - 8.0).abs() < 1e-12);
//! assert!((table.eval(70.0) - 11.0).abs() < 1e-12); // extrapolated
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Linear interpolation between two points, extended beyond them.
#[inline]
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Interpolate over ordered `(x, y)` points. Returns `None` for an empty slice.
///
/// Points must be sorted by ascending `x`.
pub fn interpolate_1d(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let (first, last) = (points.first()?, points.last()?);
    if points.len() == 1 {
        return Some(first.1);
    }

    if x <= first.0 {
        let next = points[1];
        return Some(lerp(first.0, first.1, next.0, next.1, x));
    }
    if x >= last.0 {
        let prev = points[points.len() - 2];
        return Some(lerp(prev.0, prev.1, last.0, last.1, x));
    }

    points
        .windows(2)
        .find(|win| x >= win[0].0 && x <= win[1].0)
        .map(|win| lerp(win[0].0, win[0].1, win[1].0, win[1].1, x))
}

/// Index pair of the segment used to evaluate `x` over sorted `xs`.
fn bracket(xs: &[f64], x: f64) -> (usize, usize) {
    let n = xs.len();
    if n < 2 {
        return (0, 0);
    }
    if x <= xs[0] {
        return (0, 1);
    }
    if x >= xs[n - 1] {
        return (n - 2, n - 1);
    }
    let upper = xs.iter().position(|&v| v >= x).unwrap_or(n - 1);
    (upper.saturating_sub(1), upper)
}

fn sorted_points(points: impl IntoIterator<Item = (f64, f64)>, table: &str) -> CalcResult<Vec<(f64, f64)>> {
    let mut points: Vec<(f64, f64)> = points.into_iter().collect();
    if points.is_empty() {
        return Err(CalcError::invalid_input(table, "[]", "Table needs at least one point"));
    }
    if let Some(bad) = points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(CalcError::invalid_input(
            table,
            format!("({}, {})", bad.0, bad.1),
            "Table points must be finite",
        ));
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    if let Some(dup) = points.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CalcError::invalid_input(
            table,
            dup[0].0.to_string(),
            "Duplicate abscissa in table",
        ));
    }
    Ok(points)
}

/// One-dimensional piecewise-linear table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table1D {
    points: Vec<(f64, f64)>,
}

impl Table1D {
    /// Build a table from unordered points. Fails on empty, non-finite or
    /// duplicate abscissae.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> CalcResult<Self> {
        Ok(Table1D {
            points: sorted_points(points, "table_1d")?,
        })
    }

    /// Evaluate at `x`, extrapolating linearly outside the tabulated range.
    pub fn eval(&self, x: f64) -> f64 {
        // Construction guarantees at least one point
        interpolate_1d(&self.points, x).unwrap_or(f64::NAN)
    }
}

/// Two-dimensional table evaluated by nested 1-D interpolation.
///
/// Each row sits at a primary-axis value and holds a [`Table1D`] along the
/// secondary axis. A query first evaluates the two rows bracketing the
/// primary value, then interpolates between those results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table2D {
    primary: Vec<f64>,
    rows: Vec<Table1D>,
}

impl Table2D {
    /// Build from `(primary, secondary points)` rows.
    pub fn new<I, P>(rows: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = (f64, P)>,
        P: IntoIterator<Item = (f64, f64)>,
    {
        let mut built: Vec<(f64, Table1D)> = Vec::new();
        for (key, points) in rows {
            if !key.is_finite() {
                return Err(CalcError::invalid_input("table_2d", key.to_string(), "Primary axis value must be finite"));
            }
            built.push((key, Table1D::new(points)?));
        }
        if built.is_empty() {
            return Err(CalcError::invalid_input("table_2d", "[]", "Table needs at least one row"));
        }
        built.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(dup) = built.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CalcError::invalid_input(
                "table_2d",
                dup[0].0.to_string(),
                "Duplicate primary axis value",
            ));
        }

        let (primary, rows) = built.into_iter().unzip();
        Ok(Table2D { primary, rows })
    }

    /// Evaluate at (`primary`, `secondary`), extrapolating on both axes.
    pub fn eval(&self, primary: f64, secondary: f64) -> f64 {
        let (lo, hi) = bracket(&self.primary, primary);
        let y_lo = self.rows[lo].eval(secondary);
        if lo == hi {
            return y_lo;
        }
        let y_hi = self.rows[hi].eval(secondary);
        lerp(self.primary[lo], y_lo, self.primary[hi], y_hi, primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_is_constant() {
        let table = Table1D::new([(80.0, 12.5)]).unwrap();
        assert_eq!(table.eval(0.0), 12.5);
        assert_eq!(table.eval(80.0), 12.5);
        assert_eq!(table.eval(1e6), 12.5);
    }

    #[test]
    fn test_interior_and_exact_points() {
        let table = Table1D::new([(100.0, 16.0), (79.9, 12.7), (122.0, 19.4)]).unwrap();
        assert!((table.eval(79.9) - 12.7).abs() < 1e-12);
        assert!((table.eval(122.0) - 19.4).abs() < 1e-12);
        let mid = table.eval(111.0);
        assert!(mid > 16.0 && mid < 19.4);
    }

    #[test]
    fn test_extrapolates_both_ends() {
        let table = Table1D::new([(20.0, 10.0), (30.0, 12.0)]).unwrap();
        assert!((table.eval(10.0) - 8.0).abs() < 1e-12);
        assert!((table.eval(40.0) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(Table1D::new(Vec::<(f64, f64)>::new()).is_err());
        assert!(Table1D::new([(1.0, 2.0), (1.0, 3.0)]).is_err());
        assert!(Table1D::new([(f64::NAN, 2.0)]).is_err());
    }

    #[test]
    fn test_free_function_matches_table() {
        let points = [(0.0, 0.0), (10.0, 5.0), (20.0, 20.0)];
        assert_eq!(interpolate_1d(&[], 1.0), None);
        assert!((interpolate_1d(&points, 15.0).unwrap() - 12.5).abs() < 1e-12);
        assert!((interpolate_1d(&points, -10.0).unwrap() + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_2d_nested_interpolation() {
        // z = x + 10 y is reproduced exactly by bilinear interpolation
        let table = Table2D::new([
            (1.0, vec![(0.0, 1.0), (1.0, 11.0)]),
            (2.0, vec![(0.0, 2.0), (1.0, 12.0)]),
        ])
        .unwrap();
        assert!((table.eval(1.5, 0.5) - 6.5).abs() < 1e-12);
        assert!((table.eval(3.0, 2.0) - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_2d_single_row_uses_secondary_only() {
        let table = Table2D::new([(60.0, vec![(20.0, 9.0), (30.0, 11.0)])]).unwrap();
        assert!((table.eval(999.0, 25.0) - 10.0).abs() < 1e-12);
    }
}
