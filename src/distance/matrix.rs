//! Dense distance matrix.

use crate::error::{DivisionError, Result};

use super::GeoPoint;

const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense n×n distance matrix stored in row-major order.
///
/// Entry `(i, j)` is the travel distance between team `i`'s and team `j`'s
/// home locations. The optimization core requires the matrix to be square,
/// symmetric, finite, and non-negative with a zero diagonal; see
/// [`DistanceMatrix::validate`]. The triangle inequality is never assumed.
///
/// # Examples
///
/// ```
/// use u_divisions::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 3.0, 5.0],
///     vec![3.0, 0.0, 4.0],
///     vec![5.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(1, 2), 4.0);
/// assert_eq!(dm.size(), 3);
/// assert!(dm.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes the great-circle distance matrix (kilometres) between locations.
    pub fn from_coordinates(points: &[GeoPoint]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].great_circle_km(&points[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from nested rows.
    ///
    /// Fails if any row's length differs from the number of rows. Content is
    /// not checked here; call [`validate`](Self::validate) for that.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(DivisionError::invalid(format!(
                    "distance matrix is not square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, size })
    }

    /// Returns the distance between locations `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance between locations `from` and `to` (one direction only).
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within relative tolerance `tol`.
    ///
    /// Entries `a` and `b` match when `|a - b| <= tol * max(a, b, 1)`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.asymmetry(tol).is_none()
    }

    fn asymmetry(&self, tol: f64) -> Option<(usize, usize)> {
        (0..self.size)
            .flat_map(|i| ((i + 1)..self.size).map(move |j| (i, j)))
            .find(|&(i, j)| {
                let (a, b) = (self.get(i, j), self.get(j, i));
                (a - b).abs() > tol * a.max(b).max(1.0)
            })
    }

    /// Checks every invariant the optimization core relies on.
    ///
    /// Entries must be finite and non-negative, the diagonal must be zero, and
    /// the matrix must be symmetric (relative tolerance `1e-9`).
    pub fn validate(&self) -> Result<()> {
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(DivisionError::invalid(format!(
                        "distance ({i}, {j}) = {d} is not a finite non-negative number"
                    )));
                }
            }
            if self.get(i, i) != 0.0 {
                return Err(DivisionError::invalid(format!(
                    "distance ({i}, {i}) must be zero, found {}",
                    self.get(i, i)
                )));
            }
        }
        if let Some((i, j)) = self.asymmetry(SYMMETRY_TOLERANCE) {
            return Err(DivisionError::invalid(format!(
                "distance matrix is not symmetric at ({i}, {j}): {} vs {}",
                self.get(i, j),
                self.get(j, i)
            )));
        }
        Ok(())
    }

    /// Sum of all pairwise distances `Σ_{i<j} d(i, j)`.
    pub fn total_pairwise(&self) -> f64 {
        (0..self.size)
            .flat_map(|i| ((i + 1)..self.size).map(move |j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .sum()
    }
}
