use super::{ClauseBuilder, InstanceAssembler, MaxSatInstance, PairIndex, VariableMap};
use crate::{
    error::Result,
    metric::{DistanceType, MetricSpace},
    sat::Assignment,
    symmetry::{lift_generator, ChainBudget, StabilizerChain, StabilizerChainBuilder, SymmetryBreaker},
};
use log::{info, warn};
use std::collections::HashMap;

/// The options of the distance cover encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Whether symmetry breaking clauses are added
    pub symmetry_breaking: bool,
    /// Whether pair variables are also implied by their point variables
    pub backward_implications: bool,
    /// The budget of the stabilizer chain construction
    pub budget: ChainBudget,
    /// If set, the number of selected points is bounded and the number of uncovered distances is minimized instead
    pub max_points: Option<usize>,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            symmetry_breaking: true,
            backward_implications: false,
            budget: ChainBudget::default(),
            max_points: None,
        }
    }
}

/// The result of an encoding: the instance, with the structures used to build it.
pub struct EncodedInstance<D>
where
    D: DistanceType,
{
    instance: MaxSatInstance,
    pair_index: PairIndex<D>,
    chain: Option<StabilizerChain>,
}

impl<D> EncodedInstance<D>
where
    D: DistanceType,
{
    /// Returns the MaxSAT instance.
    pub fn instance(&self) -> &MaxSatInstance {
        &self.instance
    }

    /// Consumes this object and returns the MaxSAT instance.
    pub fn into_instance(self) -> MaxSatInstance {
        self.instance
    }

    /// Returns the pair index of the metric space.
    pub fn pair_index(&self) -> &PairIndex<D> {
        &self.pair_index
    }

    /// Returns the stabilizer chain, if symmetry breaking was applied.
    pub fn chain(&self) -> Option<&StabilizerChain> {
        self.chain.as_ref()
    }
}

/// Encodes the distance cover problem of a metric space into a MaxSAT instance.
///
/// # Example
///
/// ```
/// # use distcover::encoding::{DistanceCoverEncoder, EncodingOptions};
/// # use distcover::metric::Grid;
/// let encoder = DistanceCoverEncoder::new(EncodingOptions {
///     symmetry_breaking: false,
///     ..Default::default()
/// });
/// let encoded = encoder.encode(&Grid::new(2, 2)).unwrap();
/// // 4 point variables and 6 pair variables
/// assert_eq!(10, encoded.instance().n_vars());
/// // 2 implications per pair, 2 distance classes
/// assert_eq!(14, encoded.instance().hard_clauses().len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCoverEncoder {
    options: EncodingOptions,
}

impl DistanceCoverEncoder {
    /// Builds an encoder with the given options.
    pub fn new(options: EncodingOptions) -> Self {
        Self { options }
    }

    /// Returns the options of this encoder.
    pub fn options(&self) -> &EncodingOptions {
        &self.options
    }

    /// Encodes a metric space, using the isometries it provides.
    ///
    /// Errors are returned for spaces with less than two points, for invalid isometry generators,
    /// and when the stabilizer chain construction exceeds its budget.
    ///
    /// When the number of points is bounded, the instance asks for at most this number of points
    /// leaving as few distances uncovered as possible, and no symmetry breaking clause is added:
    /// the distance classes forced by symmetry breaking may be left uncovered by every optimal selection.
    pub fn encode<M>(&self, space: &M) -> Result<EncodedInstance<M::Distance>>
    where
        M: MetricSpace,
    {
        self.encode_with_generators(space, &space.isometry_generators())
    }

    /// Encodes a metric space, using the provided isometry generators instead of the ones of the space.
    pub fn encode_with_generators<M>(
        &self,
        space: &M,
        generators: &[Vec<usize>],
    ) -> Result<EncodedInstance<M::Distance>>
    where
        M: MetricSpace,
    {
        let pair_index = PairIndex::new(space)?;
        let vars = match self.options.max_points {
            Some(_) => VariableMap::allocate_with_distances(&pair_index),
            None => VariableMap::allocate(&pair_index),
        };
        info!(
            "encoding a space of {} points, {} pairs and {} distances",
            pair_index.n_points(),
            pair_index.n_pairs(),
            pair_index.distance_classes().len()
        );
        let lifted = generators
            .iter()
            .enumerate()
            .map(|(i, g)| lift_generator(&pair_index, g, i))
            .collect::<Result<Vec<_>>>()?;
        let clause_builder = ClauseBuilder::new(self.options.backward_implications);
        let cover_clauses = match self.options.max_points {
            Some(bound) => {
                info!("the cover is bounded to {} points", bound);
                clause_builder.build_bounded(&pair_index, &vars, bound)
            }
            None => clause_builder.build(&pair_index, &vars),
        };
        if self.options.symmetry_breaking && self.options.max_points.is_some() {
            warn!("symmetry breaking is not applied when the number of points is bounded");
        }
        let (chain, symmetry_clauses) = if self.options.symmetry_breaking && self.options.max_points.is_none() {
            let chain = StabilizerChainBuilder::new(self.options.budget).build(&pair_index, lifted)?;
            let clauses = SymmetryBreaker::for_backward_implications(self.options.backward_implications)
                .break_symmetries(&chain, &vars);
            (Some(chain), clauses)
        } else {
            (None, vec![])
        };
        let instance = InstanceAssembler::new(vars).assemble(cover_clauses, symmetry_clauses);
        if self.options.max_points.is_none() {
            check_instance(&instance);
        }
        info!(
            "encoded into {} variables, {} hard clauses ({} for symmetries) and {} soft clauses",
            instance.n_vars(),
            instance.hard_clauses().len(),
            instance.n_symmetry_clauses(),
            instance.soft_clauses().len()
        );
        Ok(EncodedInstance {
            instance,
            pair_index,
            chain,
        })
    }
}

fn check_instance(instance: &MaxSatInstance) {
    let n_cover_clauses = instance.hard_clauses().len() - instance.n_symmetry_clauses();
    let all_true = Assignment::new(vec![Some(true); instance.n_vars()]);
    if let Some(cl) = instance.hard_clauses()[..n_cover_clauses]
        .iter()
        .find(|cl| cl.iter().all(|l| all_true.literal_value(*l) == Some(false)))
    {
        panic!(
            "the cover clause {:?} is not satisfied by the all-true assignment",
            cl
        );
    }
    let mut units = HashMap::new();
    for cl in &instance.hard_clauses()[n_cover_clauses..] {
        assert_eq!(1, cl.len(), "symmetry breaking clauses must be units");
        let previous = units.insert(cl[0].var(), cl[0].is_positive());
        assert!(
            previous.map(|p| p == cl[0].is_positive()).unwrap_or(true),
            "variable {} is both forced and forbidden by symmetry breaking",
            cl[0].var()
        );
    }
}
