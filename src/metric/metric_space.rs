use crate::error::{CoverError, Result};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// The trait for distance values.
///
/// Distances are grouped by exact equality, so floating point values should be avoided.
/// Squared Euclidean distances on integer coordinates are a typical choice.
pub trait DistanceType: Clone + Debug + Display + Ord + Hash {}
impl<T: Clone + Debug + Display + Ord + Hash> DistanceType for T {}

/// A finite metric space whose points are identified by the integers `0..n_points()`.
pub trait MetricSpace {
    /// The type of the distance values.
    type Distance: DistanceType;

    /// Returns the number of points of the space.
    fn n_points(&self) -> usize;

    /// Returns the distance between two distinct points.
    fn distance(&self, a: usize, b: usize) -> Self::Distance;

    /// Returns a human readable label for a point.
    fn point_label(&self, p: usize) -> String {
        p.to_string()
    }

    /// Returns permutations of the points that preserve all the distances.
    ///
    /// Each permutation is given as the images of the points `0..n_points()`.
    /// They do not need to generate the whole isometry group.
    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        vec![]
    }
}

/// A metric space given by an explicit table of distances.
///
/// The table is symmetric and stored in condensed form, one entry per unordered pair.
///
/// # Example
///
/// ```
/// # use distcover::metric::{DistanceTable, MetricSpace};
/// let path = DistanceTable::from_fn(3, |a, b| b.abs_diff(a));
/// assert_eq!(2, path.distance(2, 0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceTable<D>
where
    D: DistanceType,
{
    n_points: usize,
    distances: Vec<D>,
    labels: Option<Vec<String>>,
    generators: Vec<Vec<usize>>,
}

impl<D> DistanceTable<D>
where
    D: DistanceType,
{
    /// Builds a table by evaluating a distance function on each pair `(a, b)` with `a < b`.
    pub fn from_fn<F>(n_points: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> D,
    {
        let mut distances = Vec::with_capacity(n_points * n_points.saturating_sub(1) / 2);
        for a in 0..n_points {
            for b in a + 1..n_points {
                distances.push(f(a, b));
            }
        }
        Self {
            n_points,
            distances,
            labels: None,
            generators: vec![],
        }
    }

    /// Builds a table from a full square matrix.
    ///
    /// The matrix must be symmetric; its diagonal is ignored.
    pub fn from_matrix(matrix: &[Vec<D>]) -> Result<Self> {
        let n_points = matrix.len();
        for (a, row) in matrix.iter().enumerate() {
            if row.len() != n_points {
                return Err(CoverError::configuration(format!(
                    "row {} of the distance matrix has {} entries instead of {}",
                    a,
                    row.len(),
                    n_points
                )));
            }
            for b in a + 1..n_points {
                if row[b] != matrix[b][a] {
                    return Err(CoverError::configuration(format!(
                        "the distance matrix is not symmetric at ({}, {})",
                        a, b
                    )));
                }
            }
        }
        Ok(Self::from_fn(n_points, |a, b| matrix[a][b].clone()))
    }

    /// Sets the labels of the points.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.n_points {
            return Err(CoverError::configuration(format!(
                "got {} labels for {} points",
                labels.len(),
                self.n_points
            )));
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Sets the isometry generators returned by [`MetricSpace::isometry_generators`].
    ///
    /// They are not checked here; the encoder validates them.
    pub fn with_generators(mut self, generators: Vec<Vec<usize>>) -> Self {
        self.generators = generators;
        self
    }

    fn condensed_index(&self, a: usize, b: usize) -> usize {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        a * (2 * self.n_points - a - 1) / 2 + (b - a - 1)
    }
}

impl<D> MetricSpace for DistanceTable<D>
where
    D: DistanceType,
{
    type Distance = D;

    fn n_points(&self) -> usize {
        self.n_points
    }

    fn distance(&self, a: usize, b: usize) -> D {
        assert_ne!(a, b, "distances are only defined between distinct points");
        self.distances[self.condensed_index(a, b)].clone()
    }

    fn point_label(&self, p: usize) -> String {
        match &self.labels {
            Some(l) => l[p].clone(),
            None => p.to_string(),
        }
    }

    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        self.generators.clone()
    }
}
