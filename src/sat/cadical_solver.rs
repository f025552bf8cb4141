use super::{sat_solver::SolvingResult, Assignment, Literal, SatSolver};
use cadical::Solver as CadicalCSolver;

/// A wrapper around the Cadical SAT solver.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    n_reserved: usize,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32))
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        match self
            .solver
            .solve_with(assumptions.iter().map(|l| isize::from(*l) as i32))
        {
            Some(true) => {
                // variables that only were reserved are free, so they get the value false
                let max_solver_var = self.solver.max_variable();
                let assignment = Assignment::new(
                    (1..=self.n_vars() as i32)
                        .map(|i| {
                            if i <= max_solver_var {
                                self.solver.value(i)
                            } else {
                                Some(false)
                            }
                        })
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        }
    }

    fn n_vars(&self) -> usize {
        usize::max(self.solver.max_variable() as usize, self.n_reserved)
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_reserved = usize::max(self.n_reserved, new_max_id);
    }
}
