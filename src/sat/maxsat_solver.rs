use super::Assignment;
use crate::{encoding::MaxSatInstance, error::Result};

/// The outcome of a MaxSAT solver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxSatOutcome {
    /// An optimal assignment was found; the cost is the sum of the weights of the soft clauses it falsifies
    Optimum {
        /// The optimal assignment, restricted to the variables of the instance
        assignment: Assignment,
        /// The cost of the assignment
        cost: u64,
    },
    /// The hard clauses cannot be satisfied together
    Unsatisfiable,
}

impl MaxSatOutcome {
    /// Returns the optimal assignment, if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            MaxSatOutcome::Optimum { assignment, .. } => Some(assignment),
            MaxSatOutcome::Unsatisfiable => None,
        }
    }

    /// Returns the optimal cost, if any.
    pub fn cost(&self) -> Option<u64> {
        match self {
            MaxSatOutcome::Optimum { cost, .. } => Some(*cost),
            MaxSatOutcome::Unsatisfiable => None,
        }
    }
}

/// A trait for weighted partial MaxSAT solvers.
///
/// Solvers may fail with [`SolverTimeout`](crate::CoverError::SolverTimeout) when they are given a time limit,
/// or with [`SolverFailure`](crate::CoverError::SolverFailure) when they cannot produce an answer.
pub trait MaxSatSolver {
    /// Computes an optimal assignment of the instance.
    fn solve(&mut self, instance: &MaxSatInstance) -> Result<MaxSatOutcome>;
}
