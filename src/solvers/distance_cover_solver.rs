use crate::{
    encoding::{DistanceCoverEncoder, EncodingOptions},
    error::Result,
    metric::{DistanceType, MetricSpace},
    sat::{LinearSearchMaxSatSolver, MaxSatOutcome, MaxSatSolver, SatSolverFactoryFn, Variable},
};
use log::{info, warn};
use std::time::{Duration, Instant};

/// A selection of a bounded number of points, with the distances it realizes and the ones it leaves uncovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedCover<D>
where
    D: DistanceType,
{
    points: Vec<usize>,
    covered: Vec<D>,
    uncovered: Vec<D>,
}

impl<D> BoundedCover<D>
where
    D: DistanceType,
{
    /// Returns the selected points, in increasing order.
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    /// Returns the distances realized by the selected points, in increasing order.
    pub fn covered_distances(&self) -> &[D] {
        &self.covered
    }

    /// Returns the distances of the space that are not realized by the selected points, in increasing order.
    pub fn uncovered_distances(&self) -> &[D] {
        &self.uncovered
    }
}

/// A solver computing minimum distance covers of a metric space.
///
/// The space is encoded into a MaxSAT instance which is given to a MaxSAT solver,
/// and the optimal assignment is decoded back into a set of points.
/// Spaces with less than two points have no distance to cover; their only cover is the set of all their points.
///
/// # Example
///
/// ```
/// # use distcover::metric::Grid;
/// # use distcover::solvers::DistanceCoverSolver;
/// let grid = Grid::new(3, 3);
/// let mut solver = DistanceCoverSolver::new(&grid);
/// let cover = solver.compute_minimum_cover().unwrap().unwrap();
/// assert_eq!(5, cover.len());
/// ```
pub struct DistanceCoverSolver<'a, M>
where
    M: MetricSpace,
{
    space: &'a M,
    encoder: DistanceCoverEncoder,
    maxsat_solver: Box<dyn MaxSatSolver>,
    enumerator: LinearSearchMaxSatSolver,
}

impl<'a, M> DistanceCoverSolver<'a, M>
where
    M: MetricSpace,
{
    /// Builds a new solver for the given space.
    ///
    /// The default encoding options are used, and the MaxSAT solver is a [`LinearSearchMaxSatSolver`] over the default SAT solver.
    pub fn new(space: &'a M) -> Self {
        Self::new_with_options(space, EncodingOptions::default())
    }

    /// Builds a new solver for the given space and encoding options.
    ///
    /// The bound on the number of points of the options is ignored; bounded problems are solved by
    /// [`compute_bounded_cover`](Self::compute_bounded_cover).
    pub fn new_with_options(space: &'a M, options: EncodingOptions) -> Self {
        Self {
            space,
            encoder: DistanceCoverEncoder::new(EncodingOptions {
                max_points: None,
                ..options
            }),
            maxsat_solver: Box::<LinearSearchMaxSatSolver>::default(),
            enumerator: LinearSearchMaxSatSolver::default(),
        }
    }

    /// Sets the MaxSAT solver used to compute a minimum cover.
    pub fn set_maxsat_solver(&mut self, maxsat_solver: Box<dyn MaxSatSolver>) {
        self.maxsat_solver = maxsat_solver;
    }

    /// Sets the SAT solvers used for the enumeration of the minimum covers.
    pub fn set_sat_solver_factory(&mut self, solver_factory: Box<SatSolverFactoryFn>) {
        self.enumerator = LinearSearchMaxSatSolver::new(solver_factory);
    }

    /// Sets the time limit given to the enumeration of minimum covers.
    ///
    /// The time limit of the MaxSAT solver set by [`set_maxsat_solver`](Self::set_maxsat_solver) must be set on the solver itself.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.enumerator.set_timeout(timeout);
    }

    /// Computes a minimum cover, given as the increasing list of its points.
    ///
    /// [Option::None] is returned if the MaxSAT solver finds the instance unsatisfiable,
    /// which does not happen with a correct solver.
    pub fn compute_minimum_cover(&mut self) -> Result<Option<Vec<usize>>> {
        if self.space.n_points() < 2 {
            return Ok(Some(self.trivial_cover()));
        }
        let encoded = self.encoder.encode(self.space)?;
        let instance = encoded.instance();
        let start = Instant::now();
        let outcome = self.maxsat_solver.solve(instance)?;
        info!("MaxSAT solving took {:?}", start.elapsed());
        match outcome {
            MaxSatOutcome::Optimum { assignment, .. } => {
                let cover = instance.decode(&assignment)?;
                info!("found a cover of size {}", cover.len());
                Ok(Some(cover))
            }
            MaxSatOutcome::Unsatisfiable => {
                warn!("the MaxSAT solver found a distance cover instance unsatisfiable");
                Ok(None)
            }
        }
    }

    /// Selects at most `max_points` points realizing as many distances as possible.
    ///
    /// The returned selection gives the uncovered distances, of which there are none if a cover of at most `max_points` points exists.
    /// Symmetry breaking is not applied to bounded problems.
    /// [Option::None] is returned if the MaxSAT solver finds the instance unsatisfiable,
    /// which does not happen with a correct solver.
    ///
    /// # Example
    ///
    /// ```
    /// # use distcover::metric::Grid;
    /// # use distcover::solvers::DistanceCoverSolver;
    /// let grid = Grid::new(3, 3);
    /// let mut solver = DistanceCoverSolver::new(&grid);
    /// let selection = solver.compute_bounded_cover(4).unwrap().unwrap();
    /// assert_eq!(4, selection.points().len());
    /// assert_eq!(1, selection.uncovered_distances().len());
    /// ```
    pub fn compute_bounded_cover(&mut self, max_points: usize) -> Result<Option<BoundedCover<M::Distance>>> {
        if self.space.n_points() < 2 {
            info!("the space has less than two points; there is no distance to cover");
            return Ok(Some(BoundedCover {
                points: (0..self.space.n_points().min(max_points)).collect(),
                covered: vec![],
                uncovered: vec![],
            }));
        }
        let encoder = DistanceCoverEncoder::new(EncodingOptions {
            max_points: Some(max_points),
            ..*self.encoder.options()
        });
        let encoded = encoder.encode(self.space)?;
        let instance = encoded.instance();
        let start = Instant::now();
        let outcome = self.maxsat_solver.solve(instance)?;
        info!("MaxSAT solving took {:?}", start.elapsed());
        match outcome {
            MaxSatOutcome::Optimum { assignment, .. } => {
                let points = instance.decode(&assignment)?;
                let uncovered_classes = instance.decode_uncovered_distances(&assignment)?;
                let mut covered = Vec::new();
                let mut uncovered = Vec::new();
                for (c, class) in encoded.pair_index().distance_classes().iter().enumerate() {
                    if uncovered_classes.binary_search(&c).is_ok() {
                        uncovered.push(class.distance().clone());
                    } else {
                        covered.push(class.distance().clone());
                    }
                }
                covered.sort_unstable();
                uncovered.sort_unstable();
                info!(
                    "selected {} point(s), leaving {} distance(s) uncovered",
                    points.len(),
                    uncovered_classes.len()
                );
                Ok(Some(BoundedCover {
                    points,
                    covered,
                    uncovered,
                }))
            }
            MaxSatOutcome::Unsatisfiable => {
                warn!("the MaxSAT solver found a bounded distance cover instance unsatisfiable");
                Ok(None)
            }
        }
    }

    /// Enumerates distinct minimum covers, at most `limit` of them if a limit is given.
    ///
    /// When symmetry breaking is enabled, only the covers compatible with the symmetry breaking clauses are listed,
    /// which leaves at least one cover of each class of isometric covers.
    pub fn enumerate_optimal_covers(&mut self, limit: Option<usize>) -> Result<Vec<Vec<usize>>> {
        if self.space.n_points() < 2 {
            return Ok(if limit == Some(0) {
                vec![]
            } else {
                vec![self.trivial_cover()]
            });
        }
        let encoded = self.encoder.encode(self.space)?;
        let instance = encoded.instance();
        let projection = (0..instance.n_points())
            .map(|p| instance.variable_map().point_var(p))
            .collect::<Vec<Variable>>();
        let start = Instant::now();
        let covers = self
            .enumerator
            .enumerate_optima(instance, &projection, limit)?
            .iter()
            .map(|a| instance.decode(a))
            .collect::<Result<Vec<Vec<usize>>>>()?;
        info!(
            "enumerated {} minimum covers in {:?}",
            covers.len(),
            start.elapsed()
        );
        Ok(covers)
    }

    fn trivial_cover(&self) -> Vec<usize> {
        info!("the space has less than two points; the cover is made of all of them");
        (0..self.space.n_points()).collect()
    }
}
