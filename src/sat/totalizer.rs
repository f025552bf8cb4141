//! A totalizer encoding, used to bound the number of true literals among a set.

use super::{Literal, SatSolver, Variable};

/// A totalizer over a list of input literals.
///
/// The `k`-th output literal (0-based) is implied by any assignment that sets at least `k+1` inputs to true.
/// Bounding the number of true inputs is then a matter of assuming the negation of an output,
/// which allows the bound to be tightened incrementally through assumptions.
pub struct Totalizer {
    outputs: Vec<Literal>,
}

impl Totalizer {
    /// Encodes a totalizer into a solver.
    ///
    /// New variables are taken starting from `*next_var`, which is updated accordingly.
    pub fn encode(inputs: &[Literal], next_var: &mut usize, solver: &mut dyn SatSolver) -> Self {
        let (totalizer, clauses) = Self::encode_clauses(inputs, next_var);
        solver.reserve(*next_var - 1);
        clauses.into_iter().for_each(|cl| solver.add_clause(cl));
        totalizer
    }

    /// Encodes a totalizer into a list of clauses, to be added to an instance.
    ///
    /// New variables are taken starting from `*next_var`, which is updated accordingly.
    pub fn encode_clauses(inputs: &[Literal], next_var: &mut usize) -> (Self, Vec<Vec<Literal>>) {
        let mut clauses = Vec::new();
        let outputs = if inputs.is_empty() {
            vec![]
        } else {
            encode_node(inputs, next_var, &mut clauses)
        };
        (Self { outputs }, clauses)
    }

    /// Returns the number of input literals.
    pub fn n_inputs(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the assumption that enforces at most `bound` true inputs.
    ///
    /// If the bound is trivially satisfied, [Option::None] is returned.
    pub fn at_most(&self, bound: usize) -> Option<Literal> {
        self.outputs.get(bound).map(|o| o.negate())
    }
}

fn encode_node(inputs: &[Literal], next_var: &mut usize, clauses: &mut Vec<Vec<Literal>>) -> Vec<Literal> {
    if inputs.len() == 1 {
        return vec![inputs[0]];
    }
    let (left_inputs, right_inputs) = inputs.split_at(inputs.len() / 2);
    let left = encode_node(left_inputs, next_var, clauses);
    let right = encode_node(right_inputs, next_var, clauses);
    let outputs = (0..inputs.len())
        .map(|_| {
            let v = Variable::from(*next_var);
            *next_var += 1;
            v.positive()
        })
        .collect::<Vec<Literal>>();
    for i in 0..=left.len() {
        for j in 0..=right.len() {
            if i + j == 0 {
                continue;
            }
            let mut cl = Vec::with_capacity(3);
            if i > 0 {
                cl.push(left[i - 1].negate());
            }
            if j > 0 {
                cl.push(right[j - 1].negate());
            }
            cl.push(outputs[i + j - 1]);
            clauses.push(cl);
        }
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{default_solver, Literal};

    fn count_models_at_most(n_inputs: usize, bound: usize) -> usize {
        let mut solver = default_solver();
        let inputs = (1..=n_inputs as isize)
            .map(Literal::from)
            .collect::<Vec<Literal>>();
        let mut next_var = n_inputs + 1;
        let totalizer = Totalizer::encode(&inputs, &mut next_var, solver.as_mut());
        let assumption = totalizer.at_most(bound);
        let mut n_models = 0;
        loop {
            let assumptions = assumption.into_iter().collect::<Vec<Literal>>();
            match solver.solve_under_assumptions(&assumptions).unwrap_model() {
                Some(model) => {
                    n_models += 1;
                    let blocking = inputs
                        .iter()
                        .map(|l| match model.literal_value(*l) {
                            Some(true) => l.negate(),
                            _ => *l,
                        })
                        .collect();
                    solver.add_clause(blocking);
                }
                None => break,
            }
        }
        n_models
    }

    #[test]
    fn test_at_most_counts() {
        // sum of binomial coefficients C(4, i) for i <= bound
        assert_eq!(1, count_models_at_most(4, 0));
        assert_eq!(5, count_models_at_most(4, 1));
        assert_eq!(11, count_models_at_most(4, 2));
        assert_eq!(16, count_models_at_most(4, 4));
        assert_eq!(1 + 5 + 10, count_models_at_most(5, 2));
    }

    #[test]
    fn test_trivial_bound() {
        let mut solver = default_solver();
        let inputs = vec![Literal::from(1), Literal::from(2)];
        let mut next_var = 3;
        let totalizer = Totalizer::encode(&inputs, &mut next_var, solver.as_mut());
        assert_eq!(2, totalizer.n_inputs());
        assert!(totalizer.at_most(2).is_none());
        assert!(totalizer.at_most(1).is_some());
    }

    #[test]
    fn test_clauses_only_use_new_variables() {
        let inputs = (1..=5isize).map(Literal::from).collect::<Vec<Literal>>();
        let mut next_var = 6;
        let (totalizer, clauses) = Totalizer::encode_clauses(&inputs, &mut next_var);
        assert_eq!(5, totalizer.n_inputs());
        assert!(next_var > 6);
        assert!(clauses
            .iter()
            .flatten()
            .all(|l| usize::from(l.var()) < next_var));
        let bound = totalizer.at_most(2).unwrap();
        assert!(usize::from(bound.var()) > 5);
    }

    #[test]
    fn test_empty() {
        let mut solver = default_solver();
        let mut next_var = 1;
        let totalizer = Totalizer::encode(&[], &mut next_var, solver.as_mut());
        assert_eq!(0, totalizer.n_inputs());
        assert!(totalizer.at_most(0).is_none());
        assert_eq!(1, next_var);
    }
}
