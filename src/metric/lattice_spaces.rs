use super::MetricSpace;

/// The points of a `rows x cols` integer grid, at squared Euclidean distances.
///
/// Points are numbered row-major: `(i, j)` has the identifier `i * cols + j`.
///
/// # Example
///
/// ```
/// # use distcover::metric::{Grid, MetricSpace};
/// let grid = Grid::new(3, 3);
/// assert_eq!(9, grid.n_points());
/// assert_eq!(8, grid.distance(0, 8));
/// assert_eq!("(2,2)", grid.point_label(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Builds a new grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    fn coordinates(&self, p: usize) -> (usize, usize) {
        (p / self.cols, p % self.cols)
    }
}

impl MetricSpace for Grid {
    type Distance = u64;

    fn n_points(&self) -> usize {
        self.rows * self.cols
    }

    fn distance(&self, a: usize, b: usize) -> u64 {
        let (ai, aj) = self.coordinates(a);
        let (bi, bj) = self.coordinates(b);
        let di = ai.abs_diff(bi) as u64;
        let dj = aj.abs_diff(bj) as u64;
        di * di + dj * dj
    }

    fn point_label(&self, p: usize) -> String {
        let (i, j) = self.coordinates(p);
        format!("({},{})", i, j)
    }

    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        rectangle_generators(self.rows, self.cols)
    }
}

/// The points of a `rows x cols` integer grid, at Manhattan distances.
///
/// Points are numbered like the ones of [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiCab {
    rows: usize,
    cols: usize,
}

impl TaxiCab {
    /// Builds a new grid with the Manhattan distance.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl MetricSpace for TaxiCab {
    type Distance = u64;

    fn n_points(&self) -> usize {
        self.rows * self.cols
    }

    fn distance(&self, a: usize, b: usize) -> u64 {
        let (ai, aj) = (a / self.cols, a % self.cols);
        let (bi, bj) = (b / self.cols, b % self.cols);
        (ai.abs_diff(bi) + aj.abs_diff(bj)) as u64
    }

    fn point_label(&self, p: usize) -> String {
        format!("({},{})", p / self.cols, p % self.cols)
    }

    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        rectangle_generators(self.rows, self.cols)
    }
}

// Reflections along both axes, plus the transposition for square grids.
fn rectangle_generators(rows: usize, cols: usize) -> Vec<Vec<usize>> {
    let n = rows * cols;
    let mut generators = vec![
        (0..n)
            .map(|p| (rows - 1 - p / cols) * cols + p % cols)
            .collect::<Vec<usize>>(),
        (0..n)
            .map(|p| (p / cols) * cols + (cols - 1 - p % cols))
            .collect(),
    ];
    if rows == cols {
        generators.push((0..n).map(|p| (p % cols) * cols + p / cols).collect());
    }
    generators
}

/// The points of the cube `{0, ..., size-1}^dim`, at squared Euclidean distances.
///
/// Points are numbered in lexicographic order of their coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    dim: usize,
    size: usize,
}

impl Cube {
    /// Builds a new cube.
    pub fn new(dim: usize, size: usize) -> Self {
        Self { dim, size }
    }

    fn coordinates(&self, mut p: usize) -> Vec<usize> {
        let mut coords = vec![0; self.dim];
        for c in coords.iter_mut().rev() {
            *c = p % self.size;
            p /= self.size;
        }
        coords
    }

    fn point_of(&self, coords: &[usize]) -> usize {
        coords.iter().fold(0, |acc, c| acc * self.size + c)
    }
}

impl MetricSpace for Cube {
    type Distance = u64;

    fn n_points(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.size.pow(self.dim as u32)
        }
    }

    fn distance(&self, a: usize, b: usize) -> u64 {
        self.coordinates(a)
            .iter()
            .zip(self.coordinates(b).iter())
            .map(|(x, y)| {
                let d = x.abs_diff(*y) as u64;
                d * d
            })
            .sum()
    }

    fn point_label(&self, p: usize) -> String {
        let coords = self
            .coordinates(p)
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>();
        format!("({})", coords.join(","))
    }

    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        let n = self.n_points();
        let mut generators = Vec::with_capacity(2 * self.dim);
        for axis in 0..self.dim {
            generators.push(
                (0..n)
                    .map(|p| {
                        let mut coords = self.coordinates(p);
                        coords[axis] = self.size - 1 - coords[axis];
                        self.point_of(&coords)
                    })
                    .collect(),
            );
        }
        for axis in 1..self.dim {
            generators.push(
                (0..n)
                    .map(|p| {
                        let mut coords = self.coordinates(p);
                        coords.swap(axis - 1, axis);
                        self.point_of(&coords)
                    })
                    .collect(),
            );
        }
        generators
    }
}
