use super::{CoverClauses, VarKind, VariableMap};
use crate::{
    error::{CoverError, Result},
    sat::{Assignment, Literal, Variable},
};
use log::debug;

/// A clause: the disjunction of its literals.
pub type Clause = Vec<Literal>;

/// A soft clause and the weight paid when it is falsified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedClause {
    clause: Clause,
    weight: u64,
}

impl WeightedClause {
    /// Builds a new weighted clause.
    pub fn new(clause: Clause, weight: u64) -> Self {
        Self { clause, weight }
    }

    /// Returns the literals of the clause.
    pub fn clause(&self) -> &[Literal] {
        &self.clause
    }

    /// Returns the weight of the clause.
    pub fn weight(&self) -> u64 {
        self.weight
    }
}

/// A weighted partial MaxSAT instance encoding a distance cover problem.
///
/// Hard clauses must all be satisfied; the cost of an assignment is the sum of the weights of the soft clauses it falsifies.
/// The instance is immutable once assembled.
#[derive(Debug, Clone)]
pub struct MaxSatInstance {
    vars: VariableMap,
    hard: Vec<Clause>,
    soft: Vec<WeightedClause>,
    n_symmetry_clauses: usize,
    n_auxiliary_vars: usize,
}

impl MaxSatInstance {
    /// Returns the number of variables of the instance, auxiliary variables included.
    pub fn n_vars(&self) -> usize {
        self.vars.n_vars() + self.n_auxiliary_vars
    }

    /// Returns the number of auxiliary variables, which follow the variables of the variable map.
    pub fn n_auxiliary_vars(&self) -> usize {
        self.n_auxiliary_vars
    }

    /// Returns the number of points of the underlying metric space.
    pub fn n_points(&self) -> usize {
        self.vars.n_points()
    }

    /// Returns the variable map of the instance.
    pub fn variable_map(&self) -> &VariableMap {
        &self.vars
    }

    /// Returns the role of a variable, or [Option::None] for auxiliary variables.
    pub fn variable_kind(&self, var: Variable) -> Option<VarKind> {
        self.vars.kind_of(var)
    }

    /// Returns the hard clauses: cover clauses first, then symmetry breaking clauses.
    pub fn hard_clauses(&self) -> &[Clause] {
        &self.hard
    }

    /// Returns the number of hard clauses coming from symmetry breaking (they close the list of hard clauses).
    pub fn n_symmetry_clauses(&self) -> usize {
        self.n_symmetry_clauses
    }

    /// Returns the soft clauses.
    pub fn soft_clauses(&self) -> &[WeightedClause] {
        &self.soft
    }

    /// Returns a weight strictly greater than the sum of the soft clause weights.
    ///
    /// This is the weight given to hard clauses in the WCNF format.
    pub fn top_weight(&self) -> u64 {
        1 + self.soft.iter().map(|s| s.weight()).sum::<u64>()
    }

    /// Returns the cost of an assignment, that is the sum of the weights of the soft clauses it falsifies.
    ///
    /// Unassigned literals are considered false.
    pub fn cost(&self, assignment: &Assignment) -> u64 {
        self.soft
            .iter()
            .filter(|s| !satisfies(assignment, s.clause()))
            .map(|s| s.weight())
            .sum()
    }

    /// Returns `true` iff the assignment satisfies every hard clause.
    pub fn satisfies_hard_clauses(&self, assignment: &Assignment) -> bool {
        self.hard.iter().all(|cl| satisfies(assignment, cl))
    }

    /// Translates back an assignment into the set of points of the cover, in increasing order.
    ///
    /// The assignment must give a value to each point variable, and must not go beyond the variables of the instance.
    ///
    /// # Example
    ///
    /// ```
    /// # use distcover::encoding::DistanceCoverEncoder;
    /// # use distcover::metric::Grid;
    /// # use distcover::sat::Assignment;
    /// let encoded = DistanceCoverEncoder::default().encode(&Grid::new(2, 2)).unwrap();
    /// let instance = encoded.instance();
    /// let all_true = Assignment::new(vec![Some(true); instance.n_vars()]);
    /// assert_eq!(vec![0, 1, 2, 3], instance.decode(&all_true).unwrap());
    /// ```
    pub fn decode(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        if assignment.len() > self.n_vars() {
            return Err(CoverError::decode(format!(
                "the assignment refers to variable {} while the instance has {} variables",
                assignment.len(),
                self.n_vars()
            )));
        }
        (0..self.n_points())
            .filter_map(|p| match assignment.value_of(self.vars.point_var(p)) {
                Some(true) => Some(Ok(p)),
                Some(false) => None,
                None => Some(Err(CoverError::decode(format!(
                    "the assignment does not give a value to the variable of point {}",
                    p
                )))),
            })
            .collect()
    }

    /// Returns the indices of the distance classes whose distance variable is false, in increasing order.
    ///
    /// Instances encoding the plain cover problem have no distance variable; the result is then empty.
    pub fn decode_uncovered_distances(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        (0..self.vars.n_distances())
            .filter_map(|c| match assignment.value_of(self.vars.distance_var(c)) {
                Some(true) => None,
                Some(false) => Some(Ok(c)),
                None => Some(Err(CoverError::decode(format!(
                    "the assignment does not give a value to the variable of distance class {}",
                    c
                )))),
            })
            .collect()
    }
}

fn satisfies(assignment: &Assignment, clause: &[Literal]) -> bool {
    clause
        .iter()
        .any(|l| assignment.literal_value(*l) == Some(true))
}

/// Merges the cover clauses and the symmetry breaking clauses into a [`MaxSatInstance`].
pub struct InstanceAssembler {
    vars: VariableMap,
}

impl InstanceAssembler {
    /// Builds an assembler for the given variables.
    pub fn new(vars: VariableMap) -> Self {
        Self { vars }
    }

    /// Assembles the instance.
    ///
    /// # Panics
    ///
    /// If a clause refers to a variable that was not allocated, which would be a defect of the clause producers.
    pub fn assemble(self, cover: CoverClauses, symmetry: Vec<Clause>) -> MaxSatInstance {
        let n_vars = self.vars.n_vars() + cover.n_auxiliary_vars;
        let check = |cl: &[Literal]| {
            cl.iter().for_each(|l| {
                assert!(
                    usize::from(l.var()) <= n_vars,
                    "clause refers to the unallocated variable {}",
                    l.var()
                )
            })
        };
        cover.hard.iter().for_each(|cl| check(cl.as_slice()));
        cover.soft.iter().for_each(|s| check(s.clause()));
        symmetry.iter().for_each(|cl| check(cl.as_slice()));
        let n_symmetry_clauses = symmetry.len();
        let mut hard = cover.hard;
        hard.extend(symmetry);
        debug!(
            "assembled an instance with {} variables, {} hard clauses ({} for symmetries) and {} soft clauses",
            n_vars,
            hard.len(),
            n_symmetry_clauses,
            cover.soft.len()
        );
        MaxSatInstance {
            vars: self.vars,
            hard,
            soft: cover.soft,
            n_symmetry_clauses,
            n_auxiliary_vars: cover.n_auxiliary_vars,
        }
    }
}
