use super::PairIndex;
use crate::{metric::DistanceType, sat::Variable};
use std::fmt::Display;

/// The role of a variable in a distance cover encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// The variable is true iff the point belongs to the cover
    Point(usize),
    /// The variable is true if the pair (given by its identifier) is used to realize its distance
    Pair(usize),
    /// The variable is true if the distance class (given by its index) is realized by the selected points
    Distance(usize),
}

impl Display for VarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarKind::Point(p) => write!(f, "x{}", p),
            VarKind::Pair(p) => write!(f, "p{}", p),
            VarKind::Distance(c) => write!(f, "d{}", c),
        }
    }
}

/// The assignment of solver variables to points and pairs.
///
/// Identifiers are dense: the points `0..n` get the identifiers `0..n`,
/// and the pairs get the identifiers `n..n+n_pairs` in pair identifier order.
/// When the distance classes get variables too, they come next, in class order.
/// The solver variable of the identifier `i` is the DIMACS variable `i+1`.
/// The map is built once and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMap {
    n_points: usize,
    n_pairs: usize,
    n_distances: usize,
}

impl VariableMap {
    /// Allocates the variables for the points and the pairs of an index.
    pub fn allocate<D>(index: &PairIndex<D>) -> Self
    where
        D: DistanceType,
    {
        Self {
            n_points: index.n_points(),
            n_pairs: index.n_pairs(),
            n_distances: 0,
        }
    }

    /// Allocates the variables for the points and the pairs of an index, followed by one variable per distance class.
    pub fn allocate_with_distances<D>(index: &PairIndex<D>) -> Self
    where
        D: DistanceType,
    {
        Self {
            n_distances: index.distance_classes().len(),
            ..Self::allocate(index)
        }
    }

    /// Returns the number of allocated variables.
    pub fn n_vars(&self) -> usize {
        self.n_points + self.n_pairs + self.n_distances
    }

    /// Returns the number of distance variables, which is zero unless they were requested.
    pub fn n_distances(&self) -> usize {
        self.n_distances
    }

    /// Returns the number of point variables.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Returns the solver variable of a point.
    pub fn point_var(&self, point: usize) -> Variable {
        assert!(point < self.n_points, "point {} is out of bounds", point);
        Variable::from(point + 1)
    }

    /// Returns the solver variable of a pair, given by its identifier.
    pub fn pair_var(&self, pair_id: usize) -> Variable {
        assert!(pair_id < self.n_pairs, "pair {} is out of bounds", pair_id);
        Variable::from(self.n_points + pair_id + 1)
    }

    /// Returns the solver variable of a distance class, given by its index.
    pub fn distance_var(&self, class: usize) -> Variable {
        assert!(class < self.n_distances, "distance class {} is out of bounds", class);
        Variable::from(self.n_points + self.n_pairs + class + 1)
    }

    /// Returns the role of a solver variable, or [Option::None] if it was not allocated.
    pub fn kind_of(&self, var: Variable) -> Option<VarKind> {
        let id = usize::from(var) - 1;
        if id < self.n_points {
            Some(VarKind::Point(id))
        } else if id < self.n_points + self.n_pairs {
            Some(VarKind::Pair(id - self.n_points))
        } else if id < self.n_vars() {
            Some(VarKind::Distance(id - self.n_points - self.n_pairs))
        } else {
            None
        }
    }

    /// Iterates over the allocated variables and their roles, in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, VarKind)> + '_ {
        (1..=self.n_vars()).map(|i| {
            let v = Variable::from(i);
            (v, self.kind_of(v).unwrap())
        })
    }
}
