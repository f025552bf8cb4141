use crate::{
    error::{CoverError, Result},
    metric::{DistanceType, MetricSpace},
};
use log::debug;
use std::collections::BTreeMap;
use std::fmt::Display;

/// An unordered pair of distinct points, stored in canonical `(min, max)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnorderedPair(usize, usize);

impl UnorderedPair {
    /// Builds a pair from two distinct points, given in any order.
    ///
    /// # Panics
    ///
    /// If both points are equal.
    pub fn new(a: usize, b: usize) -> Self {
        assert_ne!(a, b, "a pair is made of distinct points");
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Returns the smallest point of the pair.
    pub fn first(&self) -> usize {
        self.0
    }

    /// Returns the greatest point of the pair.
    pub fn second(&self) -> usize {
        self.1
    }
}

impl Display for UnorderedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{},{}}}", self.0, self.1)
    }
}

/// A distance value and the identifiers of the pairs realizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceClass<D>
where
    D: DistanceType,
{
    distance: D,
    pairs: Vec<usize>,
}

impl<D> DistanceClass<D>
where
    D: DistanceType,
{
    /// Returns the distance shared by the pairs of this class.
    pub fn distance(&self) -> &D {
        &self.distance
    }

    /// Returns the identifiers of the pairs of this class, in increasing order.
    pub fn pairs(&self) -> &[usize] {
        &self.pairs
    }

    /// Returns the number of pairs in this class.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` iff this class has no pair (which never happens for built indices).
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The unordered pairs of a metric space, bucketed by distance.
///
/// Pairs get identifiers `0..n*(n-1)/2` in lexicographic order of their canonical form.
/// Distance classes are sorted by increasing distance, and partition the set of pairs.
///
/// # Example
///
/// ```
/// # use distcover::encoding::PairIndex;
/// # use distcover::metric::Grid;
/// let index = PairIndex::new(&Grid::new(2, 2)).unwrap();
/// assert_eq!(6, index.n_pairs());
/// assert_eq!(2, index.distance_classes().len());
/// assert_eq!(4, index.distance_classes()[0].len());
/// ```
#[derive(Debug, Clone)]
pub struct PairIndex<D>
where
    D: DistanceType,
{
    n_points: usize,
    classes: Vec<DistanceClass<D>>,
    class_of_pair: Vec<usize>,
}

impl<D> PairIndex<D>
where
    D: DistanceType,
{
    /// Builds the index of a metric space.
    ///
    /// A configuration error is returned if the space has less than two points, since no pair exists in this case.
    pub fn new<M>(space: &M) -> Result<Self>
    where
        M: MetricSpace<Distance = D>,
    {
        let n_points = space.n_points();
        if n_points < 2 {
            return Err(CoverError::configuration(format!(
                "a space with {} point(s) has no pair of points",
                n_points
            )));
        }
        let mut buckets: BTreeMap<D, Vec<usize>> = BTreeMap::new();
        let mut pair_id = 0;
        for a in 0..n_points {
            for b in a + 1..n_points {
                buckets.entry(space.distance(a, b)).or_default().push(pair_id);
                pair_id += 1;
            }
        }
        let mut class_of_pair = vec![0; pair_id];
        let classes = buckets
            .into_iter()
            .enumerate()
            .map(|(i, (distance, pairs))| {
                pairs.iter().for_each(|p| class_of_pair[*p] = i);
                DistanceClass { distance, pairs }
            })
            .collect::<Vec<DistanceClass<D>>>();
        debug!(
            "indexed {} pairs of {} points into {} distance classes",
            pair_id,
            n_points,
            classes.len()
        );
        Ok(Self {
            n_points,
            classes,
            class_of_pair,
        })
    }

    /// Returns the number of points of the underlying space.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Returns the number of pairs of points.
    pub fn n_pairs(&self) -> usize {
        self.class_of_pair.len()
    }

    /// Returns the identifier of the pair made of two distinct points.
    pub fn pair_id(&self, a: usize, b: usize) -> usize {
        let pair = UnorderedPair::new(a, b);
        let (a, b) = (pair.first(), pair.second());
        a * (2 * self.n_points - a - 1) / 2 + (b - a - 1)
    }

    /// Returns the pair which has the given identifier.
    pub fn pair(&self, id: usize) -> UnorderedPair {
        assert!(id < self.n_pairs(), "pair id {} is out of bounds", id);
        let mut a = 0;
        let mut first_of_row = 0;
        loop {
            let row_len = self.n_points - a - 1;
            if id < first_of_row + row_len {
                return UnorderedPair(a, a + 1 + id - first_of_row);
            }
            first_of_row += row_len;
            a += 1;
        }
    }

    /// Iterates over the pairs in increasing identifier order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = UnorderedPair> + '_ {
        (0..self.n_points)
            .flat_map(move |a| (a + 1..self.n_points).map(move |b| UnorderedPair(a, b)))
    }

    /// Returns the distance classes, sorted by increasing distance.
    pub fn distance_classes(&self) -> &[DistanceClass<D>] {
        &self.classes
    }

    /// Returns the index (in [`distance_classes`](Self::distance_classes)) of the class containing a pair.
    pub fn class_of(&self, pair_id: usize) -> usize {
        self.class_of_pair[pair_id]
    }
}
