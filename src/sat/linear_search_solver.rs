use super::{
    default_solver, Assignment, Literal, MaxSatOutcome, MaxSatSolver, SatSolver, SatSolverFactoryFn,
    SolvingResult, Totalizer, Variable,
};
use crate::{
    encoding::MaxSatInstance,
    error::{CoverError, Result},
};
use log::{debug, info};
use std::time::{Duration, Instant};

/// A MaxSAT solver performing a linear search on the cost of the solutions.
///
/// The violations of the soft clauses are counted by a totalizer.
/// Each time a solution is found, the next SAT call assumes that the count is lower than its cost,
/// until the underlying SAT solver proves there is no better solution.
/// Weights are handled by counting a violation as many times as the weight of the clause,
/// which is fine for the small weights of distance cover instances.
///
/// The timeout, if any, is checked between two SAT solver calls.
pub struct LinearSearchMaxSatSolver {
    solver_factory: Box<SatSolverFactoryFn>,
    timeout: Option<Duration>,
}

impl Default for LinearSearchMaxSatSolver {
    fn default() -> Self {
        Self::new(Box::new(default_solver))
    }
}

struct LoadedInstance {
    solver: Box<dyn SatSolver>,
    totalizer: Totalizer,
}

impl LinearSearchMaxSatSolver {
    /// Builds a new linear search solver using the SAT solvers built by the given factory.
    pub fn new(solver_factory: Box<SatSolverFactoryFn>) -> Self {
        Self {
            solver_factory,
            timeout: None,
        }
    }

    /// Sets the time limit of the solver calls.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Enumerates optimal assignments that differ on the projection variables.
    ///
    /// At most `limit` assignments are returned, if a limit is given.
    /// An empty vector is returned when the instance is unsatisfiable.
    pub fn enumerate_optima(
        &mut self,
        instance: &MaxSatInstance,
        projection: &[Variable],
        limit: Option<usize>,
    ) -> Result<Vec<Assignment>> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let optimum = match self.solve_until(instance, deadline)? {
            MaxSatOutcome::Optimum { cost, .. } => cost,
            MaxSatOutcome::Unsatisfiable => return Ok(vec![]),
        };
        let mut loaded = self.load(instance);
        let assumptions = loaded
            .totalizer
            .at_most(optimum as usize)
            .into_iter()
            .collect::<Vec<Literal>>();
        let mut optima = Vec::new();
        while limit.map(|l| optima.len() < l).unwrap_or(true) {
            self.check_deadline(deadline)?;
            match loaded.solver.solve_under_assumptions(&assumptions) {
                SolvingResult::Satisfiable(model) => {
                    let assignment = restrict(&model, instance.n_vars());
                    let blocking_clause = projection
                        .iter()
                        .map(|v| {
                            if assignment.value_of(*v) == Some(true) {
                                v.negative()
                            } else {
                                v.positive()
                            }
                        })
                        .collect();
                    loaded.solver.add_clause(blocking_clause);
                    optima.push(assignment);
                    debug!("found optimal solution #{}", optima.len());
                }
                SolvingResult::Unsatisfiable => break,
                SolvingResult::Unknown => return Err(unknown_answer()),
            }
        }
        info!(
            "enumerated {} optimal solutions of cost {}",
            optima.len(),
            optimum
        );
        Ok(optima)
    }

    fn solve_until(
        &self,
        instance: &MaxSatInstance,
        deadline: Option<Instant>,
    ) -> Result<MaxSatOutcome> {
        let mut loaded = self.load(instance);
        let mut best = None;
        let mut assumptions = vec![];
        loop {
            self.check_deadline(deadline)?;
            match loaded.solver.solve_under_assumptions(&assumptions) {
                SolvingResult::Satisfiable(model) => {
                    let assignment = restrict(&model, instance.n_vars());
                    let cost = instance.cost(&assignment);
                    info!("found a solution of cost {}", cost);
                    best = Some((assignment, cost));
                    match cost.checked_sub(1).and_then(|b| loaded.totalizer.at_most(b as usize)) {
                        Some(l) => assumptions = vec![l],
                        None => break,
                    }
                }
                SolvingResult::Unsatisfiable => break,
                SolvingResult::Unknown => return Err(unknown_answer()),
            }
        }
        Ok(match best {
            Some((assignment, cost)) => {
                info!("the optimal cost is {}", cost);
                MaxSatOutcome::Optimum { assignment, cost }
            }
            None => {
                info!("the hard clauses are unsatisfiable");
                MaxSatOutcome::Unsatisfiable
            }
        })
    }

    fn load(&self, instance: &MaxSatInstance) -> LoadedInstance {
        let mut solver = (self.solver_factory)();
        solver.reserve(instance.n_vars());
        instance
            .hard_clauses()
            .iter()
            .for_each(|cl| solver.add_clause(cl.clone()));
        let mut next_var = instance.n_vars() + 1;
        let mut violations = Vec::new();
        for soft in instance.soft_clauses() {
            let violation = match soft.clause() {
                [l] => l.negate(),
                clause => {
                    let relaxation = Variable::from(next_var);
                    next_var += 1;
                    let mut relaxed = clause.to_vec();
                    relaxed.push(relaxation.positive());
                    solver.add_clause(relaxed);
                    relaxation.positive()
                }
            };
            (0..soft.weight()).for_each(|_| violations.push(violation));
        }
        let totalizer = Totalizer::encode(&violations, &mut next_var, solver.as_mut());
        debug!(
            "loaded the instance into a SAT solver with {} variables",
            solver.n_vars()
        );
        LoadedInstance { solver, totalizer }
    }

    fn check_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        match (deadline, self.timeout) {
            (Some(d), Some(t)) if Instant::now() >= d => Err(CoverError::SolverTimeout(t)),
            _ => Ok(()),
        }
    }
}

impl MaxSatSolver for LinearSearchMaxSatSolver {
    fn solve(&mut self, instance: &MaxSatInstance) -> Result<MaxSatOutcome> {
        self.solve_until(instance, self.timeout.map(|t| Instant::now() + t))
    }
}

fn restrict(model: &Assignment, n_vars: usize) -> Assignment {
    Assignment::new(model.iter().take(n_vars).map(|(_, v)| v).collect())
}

fn unknown_answer() -> CoverError {
    CoverError::solver_failure("the SAT solver stopped without giving an answer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clause,
        encoding::{ClauseBuilder, DistanceCoverEncoder, EncodingOptions, InstanceAssembler, PairIndex, VariableMap},
        metric::{DistanceTable, Grid, MetricSpace, TaxiCab},
    };

    fn instance_of<M: MetricSpace>(space: &M, symmetry_breaking: bool) -> MaxSatInstance {
        DistanceCoverEncoder::new(EncodingOptions {
            symmetry_breaking,
            ..Default::default()
        })
        .encode(space)
        .unwrap()
        .into_instance()
    }

    fn point_vars(instance: &MaxSatInstance) -> Vec<Variable> {
        (0..instance.n_points())
            .map(|p| instance.variable_map().point_var(p))
            .collect()
    }

    #[test]
    fn test_optimum_grid_2x2() {
        let instance = instance_of(&Grid::new(2, 2), true);
        let outcome = LinearSearchMaxSatSolver::default().solve(&instance).unwrap();
        assert_eq!(Some(3), outcome.cost());
        let assignment = outcome.assignment().unwrap();
        assert_eq!(instance.n_vars(), assignment.len());
        assert!(instance.satisfies_hard_clauses(assignment));
        assert_eq!(3, instance.decode(assignment).unwrap().len());
    }

    #[test]
    fn test_optimum_taxicab_3x3() {
        let instance = instance_of(&TaxiCab::new(3, 3), false);
        let outcome = LinearSearchMaxSatSolver::default().solve(&instance).unwrap();
        assert_eq!(Some(4), outcome.cost());
    }

    #[test]
    fn test_unsatisfiable() {
        let index = PairIndex::new(&DistanceTable::from_fn(2, |_, _| 1)).unwrap();
        let vars = VariableMap::allocate(&index);
        let cover = ClauseBuilder::default().build(&index, &vars);
        let instance = InstanceAssembler::new(vars).assemble(cover, vec![clause![-3]]);
        let outcome = LinearSearchMaxSatSolver::default().solve(&instance).unwrap();
        assert_eq!(MaxSatOutcome::Unsatisfiable, outcome);
        let optima = LinearSearchMaxSatSolver::default()
            .enumerate_optima(&instance, &point_vars(&instance), None)
            .unwrap();
        assert!(optima.is_empty());
    }

    #[test]
    fn test_timeout() {
        let instance = instance_of(&Grid::new(3, 3), true);
        let mut solver = LinearSearchMaxSatSolver::default();
        solver.set_timeout(Some(Duration::ZERO));
        assert_eq!(
            Err(CoverError::SolverTimeout(Duration::ZERO)),
            solver.solve(&instance)
        );
    }

    #[test]
    fn test_enumerate_grid_2x2() {
        let instance = instance_of(&Grid::new(2, 2), false);
        let optima = LinearSearchMaxSatSolver::default()
            .enumerate_optima(&instance, &point_vars(&instance), None)
            .unwrap();
        let mut covers = optima
            .iter()
            .map(|a| instance.decode(a).unwrap())
            .collect::<Vec<Vec<usize>>>();
        covers.sort_unstable();
        assert_eq!(
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]],
            covers
        );
    }

    #[test]
    fn test_enumerate_with_limit() {
        let instance = instance_of(&Grid::new(3, 3), false);
        let optima = LinearSearchMaxSatSolver::default()
            .enumerate_optima(&instance, &point_vars(&instance), Some(5))
            .unwrap();
        assert_eq!(5, optima.len());
        assert!(optima.iter().all(|a| instance.cost(a) == 5));
    }

    #[test]
    fn test_enumerate_grid_3x3_count() {
        let instance = instance_of(&Grid::new(3, 3), false);
        let optima = LinearSearchMaxSatSolver::default()
            .enumerate_optima(&instance, &point_vars(&instance), None)
            .unwrap();
        assert_eq!(44, optima.len());
    }
}
