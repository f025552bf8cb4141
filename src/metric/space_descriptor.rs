use super::{Cube, Grid, MetricSpace, TaxiCab};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DESCRIPTOR_PATTERN: Regex =
        Regex::new(r"^\s*([[:alpha:]]+)\s*:\s*(\d+)\s*[xX]\s*(\d+)\s*$").unwrap();
}

/// One of the lattice metric spaces provided by this crate.
///
/// Lattice spaces are described by short strings:
///   * `grid:RxC` for a [`Grid`] with `R` rows and `C` columns,
///   * `taxicab:RxC` for a [`TaxiCab`] grid,
///   * `cube:DxS` for a [`Cube`] of dimension `D` and side `S`.
///
/// # Example
///
/// ```
/// # use distcover::metric::{LatticeSpace, MetricSpace};
/// let space = LatticeSpace::try_from("grid:4x4").unwrap();
/// assert_eq!(16, space.n_points());
/// assert!(LatticeSpace::try_from("sphere:4x4").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeSpace {
    /// An Euclidean grid
    Grid(Grid),
    /// A grid with the Manhattan distance
    TaxiCab(TaxiCab),
    /// An Euclidean cube
    Cube(Cube),
}

impl TryFrom<&str> for LatticeSpace {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let captures = DESCRIPTOR_PATTERN
            .captures(value)
            .ok_or_else(|| anyhow!(r#"invalid space descriptor "{}""#, value))?;
        let context = || format!(r#"while reading space descriptor "{}""#, value);
        let first = captures[2].parse::<usize>().with_context(context)?;
        let second = captures[3].parse::<usize>().with_context(context)?;
        let kind = captures[1].to_ascii_lowercase();
        let n_points = match kind.as_str() {
            "grid" | "taxicab" => first.checked_mul(second),
            "cube" if first == 0 => Some(0),
            "cube" => u32::try_from(first)
                .ok()
                .and_then(|dim| second.checked_pow(dim)),
            _ => return Err(anyhow!(r#"undefined space kind "{}""#, kind)),
        };
        // pairs are indexed by usize identifiers
        n_points
            .and_then(|n| n.checked_mul(n.saturating_sub(1)))
            .ok_or_else(|| anyhow!(r#"the space described by "{}" is too large"#, value))?;
        match kind.as_str() {
            "grid" => Ok(LatticeSpace::Grid(Grid::new(first, second))),
            "taxicab" => Ok(LatticeSpace::TaxiCab(TaxiCab::new(first, second))),
            _ => Ok(LatticeSpace::Cube(Cube::new(first, second))),
        }
    }
}

impl MetricSpace for LatticeSpace {
    type Distance = u64;

    fn n_points(&self) -> usize {
        match self {
            LatticeSpace::Grid(s) => s.n_points(),
            LatticeSpace::TaxiCab(s) => s.n_points(),
            LatticeSpace::Cube(s) => s.n_points(),
        }
    }

    fn distance(&self, a: usize, b: usize) -> u64 {
        match self {
            LatticeSpace::Grid(s) => s.distance(a, b),
            LatticeSpace::TaxiCab(s) => s.distance(a, b),
            LatticeSpace::Cube(s) => s.distance(a, b),
        }
    }

    fn point_label(&self, p: usize) -> String {
        match self {
            LatticeSpace::Grid(s) => s.point_label(p),
            LatticeSpace::TaxiCab(s) => s.point_label(p),
            LatticeSpace::Cube(s) => s.point_label(p),
        }
    }

    fn isometry_generators(&self) -> Vec<Vec<usize>> {
        match self {
            LatticeSpace::Grid(s) => s.isometry_generators(),
            LatticeSpace::TaxiCab(s) => s.isometry_generators(),
            LatticeSpace::Cube(s) => s.isometry_generators(),
        }
    }
}
