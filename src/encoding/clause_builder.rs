use super::{Clause, PairIndex, VariableMap, WeightedClause};
use crate::{metric::DistanceType, sat::Totalizer};
use log::debug;

/// The clauses modeling the distance cover problem, before any symmetry breaking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverClauses {
    /// The hard clauses: pair implications, then one disjunction per distance class
    pub hard: Vec<Clause>,
    /// The soft clauses: one negated point literal per point, with weight 1
    pub soft: Vec<WeightedClause>,
    /// The number of variables introduced after the ones of the variable map, for cardinality constraints
    pub n_auxiliary_vars: usize,
}

/// Builds the clauses of the distance cover problem.
///
/// For each pair `{a,b}`, the pair variable implies both point variables.
/// For each distance class, at least one pair variable of the class must be true.
/// For each point, a soft clause of weight 1 asks for the point to be left out of the cover.
///
/// The hard clauses are always satisfied by setting all the variables to true.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClauseBuilder {
    backward_implications: bool,
}

impl ClauseBuilder {
    /// Builds a new clause builder.
    ///
    /// If `backward_implications` is set, each pair variable is also implied by its two point variables.
    pub fn new(backward_implications: bool) -> Self {
        Self {
            backward_implications,
        }
    }

    /// Builds the clauses for the given index and variables.
    pub fn build<D>(&self, index: &PairIndex<D>, vars: &VariableMap) -> CoverClauses
    where
        D: DistanceType,
    {
        let mut hard = self.pair_implications(index, vars);
        index.distance_classes().iter().for_each(|class| {
            hard.push(
                class
                    .pairs()
                    .iter()
                    .map(|p| vars.pair_var(*p).positive())
                    .collect(),
            );
        });
        let soft = (0..index.n_points())
            .map(|p| WeightedClause::new(vec![vars.point_var(p).negative()], 1))
            .collect::<Vec<WeightedClause>>();
        debug!(
            "built {} hard and {} soft cover clauses",
            hard.len(),
            soft.len()
        );
        CoverClauses {
            hard,
            soft,
            n_auxiliary_vars: 0,
        }
    }

    fn pair_implications<D>(&self, index: &PairIndex<D>, vars: &VariableMap) -> Vec<Clause>
    where
        D: DistanceType,
    {
        let n_implications = if self.backward_implications { 3 } else { 2 };
        let mut hard =
            Vec::with_capacity(n_implications * index.n_pairs() + index.distance_classes().len());
        index.iter_pairs().enumerate().for_each(|(id, pair)| {
            let pair_var = vars.pair_var(id);
            let first_var = vars.point_var(pair.first());
            let second_var = vars.point_var(pair.second());
            hard.push(vec![pair_var.negative(), first_var.positive()]);
            hard.push(vec![pair_var.negative(), second_var.positive()]);
            if self.backward_implications {
                hard.push(vec![
                    pair_var.positive(),
                    first_var.negative(),
                    second_var.negative(),
                ]);
            }
        });
        hard
    }

    /// Builds the clauses of the bounded problem: select at most `max_points` points realizing as many distances as possible.
    ///
    /// The variable map must hold the distance variables.
    /// A distance variable implies the disjunction of the pairs of its class, and each pair implies its distance variable.
    /// A totalizer over the point variables, with auxiliary variables numbered after the ones of the map,
    /// forbids selecting more than `max_points` points.
    /// Each distance variable is asked to be true by a soft unit clause of weight 1,
    /// so that the cost of an assignment is the number of distances left uncovered.
    ///
    /// # Panics
    ///
    /// If the variable map has no distance variables.
    pub fn build_bounded<D>(&self, index: &PairIndex<D>, vars: &VariableMap, max_points: usize) -> CoverClauses
    where
        D: DistanceType,
    {
        assert_eq!(
            index.distance_classes().len(),
            vars.n_distances(),
            "the variable map must hold the distance variables"
        );
        let mut hard = self.pair_implications(index, vars);
        index.distance_classes().iter().enumerate().for_each(|(c, class)| {
            let mut clause = Vec::with_capacity(1 + class.len());
            clause.push(vars.distance_var(c).negative());
            clause.extend(class.pairs().iter().map(|p| vars.pair_var(*p).positive()));
            hard.push(clause);
        });
        (0..index.n_pairs()).for_each(|p| {
            hard.push(vec![
                vars.pair_var(p).negative(),
                vars.distance_var(index.class_of(p)).positive(),
            ]);
        });
        let points = (0..index.n_points())
            .map(|p| vars.point_var(p).positive())
            .collect::<Vec<_>>();
        let mut next_var = vars.n_vars() + 1;
        let (totalizer, cardinality) = Totalizer::encode_clauses(&points, &mut next_var);
        hard.extend(cardinality);
        if let Some(l) = totalizer.at_most(max_points) {
            hard.push(vec![l]);
        }
        let soft = (0..vars.n_distances())
            .map(|c| WeightedClause::new(vec![vars.distance_var(c).positive()], 1))
            .collect::<Vec<WeightedClause>>();
        let n_auxiliary_vars = next_var - vars.n_vars() - 1;
        debug!(
            "built {} hard and {} soft bounded cover clauses, with {} auxiliary variables",
            hard.len(),
            soft.len(),
            n_auxiliary_vars
        );
        CoverClauses {
            hard,
            soft,
            n_auxiliary_vars,
        }
    }
}
