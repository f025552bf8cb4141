use super::PairPermutation;
use crate::{
    encoding::PairIndex,
    error::{CoverError, Result},
    metric::DistanceType,
};
use log::{debug, info};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    time::{Duration, Instant},
};

/// Limits on the work done while building a stabilizer chain.
///
/// Operations are counted as elementary permutation applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBudget {
    /// The maximal number of operations
    pub max_operations: u64,
    /// The maximal duration of the construction, if any
    pub max_duration: Option<Duration>,
}

impl Default for ChainBudget {
    fn default() -> Self {
        Self {
            max_operations: 1 << 32,
            max_duration: None,
        }
    }
}

impl ChainBudget {
    /// Returns a budget limited to a number of operations.
    pub fn with_max_operations(max_operations: u64) -> Self {
        Self {
            max_operations,
            max_duration: None,
        }
    }
}

struct BudgetTracker {
    budget: ChainBudget,
    start: Instant,
    operations: u64,
    level: usize,
}

impl BudgetTracker {
    fn new(budget: ChainBudget) -> Self {
        Self {
            budget,
            start: Instant::now(),
            operations: 0,
            level: 0,
        }
    }

    fn spend(&mut self, operations: usize) -> Result<()> {
        self.operations = self.operations.saturating_add(operations as u64);
        let out_of_time = self
            .budget
            .max_duration
            .map(|d| self.start.elapsed() > d)
            .unwrap_or(false);
        if self.operations > self.budget.max_operations || out_of_time {
            Err(CoverError::ResourceExhausted {
                level: self.level,
                operations: self.operations,
            })
        } else {
            Ok(())
        }
    }
}

/// A level of a stabilizer chain.
///
/// Level `i` holds the generators of the subgroup fixing the base prefix `b_1, ..., b_i`,
/// the partition of the pairs into orbits under this subgroup,
/// and, unless the level is the terminal one, the orbit chosen to extend the base with the transversal of this orbit.
#[derive(Debug, Clone)]
pub struct StabilizerLevel {
    generators: Vec<PairPermutation>,
    orbits: Vec<Vec<usize>>,
    chosen_orbit: Option<usize>,
    transversal: BTreeMap<usize, PairPermutation>,
    breaks_symmetry: bool,
}

impl StabilizerLevel {
    /// Returns the generators of the subgroup of this level.
    pub fn generators(&self) -> &[PairPermutation] {
        &self.generators
    }

    /// Returns the orbits of the pairs under the subgroup of this level, including singletons.
    ///
    /// Orbits are sorted, and listed in increasing order of their smallest pair.
    pub fn orbits(&self) -> &[Vec<usize>] {
        &self.orbits
    }

    /// Iterates over the orbits containing more than one pair.
    pub fn non_singleton_orbits(&self) -> impl Iterator<Item = &Vec<usize>> + '_ {
        self.orbits.iter().filter(|o| o.len() > 1)
    }

    /// Returns the orbit chosen at this level, or [Option::None] for the terminal level.
    pub fn chosen_orbit(&self) -> Option<&[usize]> {
        self.chosen_orbit.map(|i| self.orbits[i].as_slice())
    }

    /// Returns the base point chosen at this level (the smallest pair of the chosen orbit).
    pub fn base_point(&self) -> Option<usize> {
        self.chosen_orbit().map(|o| o[0])
    }

    /// Returns the element of the transversal which maps the base point to the given pair.
    pub fn transversal_element(&self, pair: usize) -> Option<&PairPermutation> {
        self.transversal.get(&pair)
    }

    /// Returns `true` iff symmetry breaking clauses are emitted for this level.
    pub fn breaks_symmetry(&self) -> bool {
        self.breaks_symmetry
    }

    /// Returns `true` iff this is the terminal level, at which the group is trivial on pairs.
    pub fn is_terminal(&self) -> bool {
        self.chosen_orbit.is_none()
    }
}

/// A frozen stabilizer chain: a base of pairs and the levels of successive pointwise stabilizers.
#[derive(Debug, Clone)]
pub struct StabilizerChain {
    levels: Vec<StabilizerLevel>,
}

impl StabilizerChain {
    /// Returns the levels, the last one being the terminal level.
    pub fn levels(&self) -> &[StabilizerLevel] {
        &self.levels
    }

    /// Returns the base, that is the sequence of chosen base points.
    pub fn base(&self) -> Vec<usize> {
        self.levels.iter().filter_map(|l| l.base_point()).collect()
    }

    /// Returns the number of levels with a non-singleton chosen orbit (the terminal level is not counted).
    pub fn len(&self) -> usize {
        self.levels.len() - 1
    }

    /// Returns `true` iff the group is trivial on pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the order of the group induced on the pairs.
    ///
    /// It is the product of the sizes of the chosen orbits; it saturates at [u128::MAX].
    pub fn group_order(&self) -> u128 {
        self.levels
            .iter()
            .filter_map(|l| l.chosen_orbit())
            .fold(1u128, |acc, o| acc.saturating_mul(o.len() as u128))
    }

    /// Iterates over the levels for which symmetry breaking clauses are emitted.
    pub fn breaking_levels(&self) -> impl Iterator<Item = &StabilizerLevel> + '_ {
        self.levels.iter().filter(|l| l.breaks_symmetry())
    }
}

/// Builds the stabilizer chain of the group generated by permutations of pairs.
///
/// At each level, the orbits of the current group are computed together with a transversal.
/// A non-singleton orbit is chosen and its smallest pair is appended to the base.
/// The generators of the next level are the Schreier generators of the stabilizer of this pair,
/// sifted through a Sims filter to keep their number bounded.
/// The construction stops when all the orbits are singletons.
///
/// The chosen orbit is the largest one among the orbits that are whole distance classes, ties being broken by the smallest pair.
/// Such levels break symmetries. When no such orbit exists anymore, the largest non-singleton orbit is chosen
/// (with the same tie break) and this level and all the next ones do not break symmetries.
/// Preferring a whole distance class over a larger orbit keeps at least one minimum cover compatible with the forced base pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilizerChainBuilder {
    budget: ChainBudget,
}

impl StabilizerChainBuilder {
    /// Builds a new chain builder with the given budget.
    pub fn new(budget: ChainBudget) -> Self {
        Self { budget }
    }

    /// Builds the stabilizer chain of the group generated by the given permutations of the pairs of the index.
    pub fn build<D>(
        &self,
        index: &PairIndex<D>,
        generators: Vec<PairPermutation>,
    ) -> Result<StabilizerChain>
    where
        D: DistanceType,
    {
        let n_pairs = index.n_pairs();
        if let Some(g) = generators.iter().find(|g| g.len() != n_pairs) {
            return Err(CoverError::configuration(format!(
                "a pair permutation acts on {} elements while there are {} pairs",
                g.len(),
                n_pairs
            )));
        }
        let mut tracker = BudgetTracker::new(self.budget);
        let mut current_generators = distinct_non_identity(generators);
        let mut levels = Vec::new();
        let mut breaking = true;
        loop {
            tracker.level = levels.len();
            let schreier_vector = compute_schreier_vector(n_pairs, &current_generators, &mut tracker)?;
            let orbits = orbits_of_schreier_vector(&schreier_vector);
            let choice = select_orbit(index, &orbits, breaking);
            let (chosen, breaks_symmetry) = match choice {
                None => {
                    debug!("stabilizer level {} is trivial on pairs", levels.len());
                    levels.push(StabilizerLevel {
                        generators: current_generators,
                        orbits,
                        chosen_orbit: None,
                        transversal: BTreeMap::new(),
                        breaks_symmetry: false,
                    });
                    break;
                }
                Some(c) => c,
            };
            breaking = breaks_symmetry;
            let orbit = &orbits[chosen];
            let transversal =
                materialize_transversal(n_pairs, orbit, &schreier_vector, &current_generators, &mut tracker)?;
            let next_generators =
                schreier_generators(orbit, &transversal, &current_generators, &mut tracker)?;
            debug!(
                "stabilizer level {}: base pair {} with an orbit of size {} ({}), {} generators kept for the stabilizer",
                levels.len(),
                index.pair(orbit[0]),
                orbit.len(),
                if breaks_symmetry {
                    "breaking symmetries"
                } else {
                    "not breaking symmetries"
                },
                next_generators.len()
            );
            levels.push(StabilizerLevel {
                generators: std::mem::replace(&mut current_generators, next_generators),
                orbits,
                chosen_orbit: Some(chosen),
                transversal,
                breaks_symmetry,
            });
        }
        let chain = StabilizerChain { levels };
        info!(
            "built a stabilizer chain of length {} for a group of order {} acting on pairs ({} operations)",
            chain.len(),
            chain.group_order(),
            tracker.operations
        );
        Ok(chain)
    }
}

fn distinct_non_identity(generators: Vec<PairPermutation>) -> Vec<PairPermutation> {
    let mut seen = HashSet::new();
    generators
        .into_iter()
        .filter(|g| !g.is_identity() && seen.insert(g.clone()))
        .collect()
}

// For each pair, the generator and the predecessor through which it was reached; roots are mapped to None.
type SchreierVector = Vec<Option<(usize, usize)>>;

fn compute_schreier_vector(
    n_pairs: usize,
    generators: &[PairPermutation],
    tracker: &mut BudgetTracker,
) -> Result<SchreierVector> {
    let mut visited = vec![false; n_pairs];
    let mut schreier_vector = vec![None; n_pairs];
    let mut queue = Vec::new();
    for root in 0..n_pairs {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        queue.clear();
        queue.push(root);
        let mut next = 0;
        while next < queue.len() {
            let x = queue[next];
            next += 1;
            tracker.spend(generators.len())?;
            for (i, g) in generators.iter().enumerate() {
                let y = g.apply(x);
                if !visited[y] {
                    visited[y] = true;
                    schreier_vector[y] = Some((i, x));
                    queue.push(y);
                }
            }
        }
    }
    Ok(schreier_vector)
}

fn orbits_of_schreier_vector(schreier_vector: &SchreierVector) -> Vec<Vec<usize>> {
    // roots are the smallest elements of their orbits, so orbits come sorted and ordered by their roots
    let mut orbit_index = HashMap::new();
    let mut orbits: Vec<Vec<usize>> = Vec::new();
    for x in 0..schreier_vector.len() {
        let i = *orbit_index
            .entry(root_of(schreier_vector, x))
            .or_insert_with(|| {
                orbits.push(vec![]);
                orbits.len() - 1
            });
        orbits[i].push(x);
    }
    orbits
}

fn root_of(schreier_vector: &SchreierVector, mut x: usize) -> usize {
    while let Some((_, pred)) = schreier_vector[x] {
        x = pred;
    }
    x
}

/// Returns the orbit to branch on and whether its level breaks symmetries.
///
/// While breaking, only orbits that are a whole distance class are candidates, even when a larger orbit exists.
/// Forcing the base pair of such an orbit keeps an optimum because every cover realizes the distance of the orbit
/// with one of its pairs, which an isometry of the current stabilizer maps onto the base pair.
/// A larger orbit that is only a part of its class, such as the unit edges on the border of a 3x3 grid,
/// can be avoided by a cover realizing its distance elsewhere; forcing its base pair may then remove every optimum.
fn select_orbit<D>(index: &PairIndex<D>, orbits: &[Vec<usize>], breaking: bool) -> Option<(usize, bool)>
where
    D: DistanceType,
{
    let best_of = |candidates: &mut dyn Iterator<Item = (usize, &Vec<usize>)>| {
        candidates
            .max_by(|(_, o1), (_, o2)| o1.len().cmp(&o2.len()).then(o2[0].cmp(&o1[0])))
            .map(|(i, _)| i)
    };
    let non_singleton = || orbits.iter().enumerate().filter(|(_, o)| o.len() > 1);
    if breaking {
        let whole_class = best_of(&mut non_singleton().filter(|(_, o)| {
            index.distance_classes()[index.class_of(o[0])].len() == o.len()
        }));
        if let Some(i) = whole_class {
            return Some((i, true));
        }
    }
    best_of(&mut non_singleton()).map(|i| (i, false))
}

fn materialize_transversal(
    n_pairs: usize,
    orbit: &[usize],
    schreier_vector: &SchreierVector,
    generators: &[PairPermutation],
    tracker: &mut BudgetTracker,
) -> Result<BTreeMap<usize, PairPermutation>> {
    let mut transversal = BTreeMap::new();
    transversal.insert(orbit[0], PairPermutation::identity(n_pairs));
    let mut pending = orbit.to_vec();
    while !pending.is_empty() {
        let mut still_pending = Vec::new();
        for x in pending {
            if transversal.contains_key(&x) {
                continue;
            }
            let (g, pred) = schreier_vector[x].expect("only the root of an orbit has no predecessor");
            match transversal.get(&pred) {
                Some(u) => {
                    tracker.spend(n_pairs)?;
                    let element = generators[g].compose(u);
                    transversal.insert(x, element);
                }
                None => still_pending.push(x),
            }
        }
        pending = still_pending;
    }
    Ok(transversal)
}

fn schreier_generators(
    orbit: &[usize],
    transversal: &BTreeMap<usize, PairPermutation>,
    generators: &[PairPermutation],
    tracker: &mut BudgetTracker,
) -> Result<Vec<PairPermutation>> {
    let mut filter = SimsFilter::default();
    for x in orbit {
        let u_x = &transversal[x];
        for g in generators {
            tracker.spend(3 * g.len())?;
            let u_gx = &transversal[&g.apply(*x)];
            let candidate = u_gx.inverse().compose(&g.compose(u_x));
            debug_assert_eq!(orbit[0], candidate.apply(orbit[0]));
            filter.sift(candidate, tracker)?;
        }
    }
    Ok(filter.into_generators())
}

// Keeps at most one generator for each (first moved point, image) pair, without changing the generated group.
#[derive(Default)]
struct SimsFilter {
    generators: Vec<(PairPermutation, PairPermutation)>,
    table: HashMap<(usize, usize), usize>,
}

impl SimsFilter {
    fn sift(&mut self, mut g: PairPermutation, tracker: &mut BudgetTracker) -> Result<()> {
        while let Some(i) = g.first_moved() {
            let key = (i, g.apply(i));
            match self.table.get(&key) {
                None => {
                    self.table.insert(key, self.generators.len());
                    let inverse = g.inverse();
                    self.generators.push((g, inverse));
                    return Ok(());
                }
                Some(j) => {
                    tracker.spend(g.len())?;
                    g = self.generators[*j].1.compose(&g);
                }
            }
        }
        Ok(())
    }

    fn into_generators(self) -> Vec<PairPermutation> {
        self.generators.into_iter().map(|(g, _)| g).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metric::{Cube, DistanceTable, Grid, MetricSpace},
        symmetry::lift_generator,
    };

    fn chain_of<M>(space: &M, generators: &[Vec<usize>]) -> StabilizerChain
    where
        M: MetricSpace,
    {
        let index = PairIndex::new(space).unwrap();
        let lifted = generators
            .iter()
            .enumerate()
            .map(|(i, g)| lift_generator(&index, g, i).unwrap())
            .collect();
        StabilizerChainBuilder::default().build(&index, lifted).unwrap()
    }

    fn cyclic_square() -> DistanceTable<i64> {
        let coords = [(0i64, 0i64), (1, 0), (1, 1), (0, 1)];
        DistanceTable::from_fn(4, move |a, b| {
            let (dx, dy) = (coords[a].0 - coords[b].0, coords[a].1 - coords[b].1);
            dx * dx + dy * dy
        })
    }

    #[test]
    fn test_square_dihedral_group() {
        let chain = chain_of(&cyclic_square(), &[vec![1, 2, 3, 0], vec![1, 0, 3, 2]]);
        assert_eq!(8, chain.group_order());
        assert_eq!(2, chain.len());
        assert!(chain.len() <= 3);
        // sides first, then the diagonals under the stabilizer of {0,1}
        assert_eq!(vec![0, 1], chain.base());
        assert_eq!(Some(&[0, 2, 3, 5][..]), chain.levels()[0].chosen_orbit());
        assert_eq!(Some(&[1, 4][..]), chain.levels()[1].chosen_orbit());
        assert!(chain.levels()[0].breaks_symmetry());
        assert!(chain.levels()[1].breaks_symmetry());
        assert!(chain.levels()[2].is_terminal());
        assert!(chain.levels()[2].non_singleton_orbits().next().is_none());
    }

    #[test]
    fn test_transversal_maps_base_point() {
        let chain = chain_of(&cyclic_square(), &[vec![1, 2, 3, 0], vec![1, 0, 3, 2]]);
        for level in chain.levels().iter().filter(|l| !l.is_terminal()) {
            let b = level.base_point().unwrap();
            for x in level.chosen_orbit().unwrap() {
                assert_eq!(*x, level.transversal_element(*x).unwrap().apply(b));
            }
        }
    }

    #[test]
    fn test_stabilizer_generators_fix_base_prefix() {
        let grid = Grid::new(4, 4);
        let chain = chain_of(&grid, &grid.isometry_generators());
        let base = chain.base();
        for (i, level) in chain.levels().iter().enumerate() {
            for g in level.generators() {
                for b in base.iter().take(i) {
                    assert_eq!(*b, g.apply(*b));
                }
            }
        }
    }

    #[test]
    fn test_grid_group_orders() {
        for (rows, cols, order) in [(2, 2, 8), (3, 3, 8), (4, 4, 8), (2, 3, 4), (3, 4, 4), (1, 4, 2)] {
            let grid = Grid::new(rows, cols);
            let chain = chain_of(&grid, &grid.isometry_generators());
            assert_eq!(order, chain.group_order(), "grid {}x{}", rows, cols);
        }
    }

    #[test]
    fn test_cube_group_order() {
        let cube = Cube::new(3, 2);
        let chain = chain_of(&cube, &cube.isometry_generators());
        assert_eq!(48, chain.group_order());
    }

    #[test]
    fn test_no_generators() {
        let chain = chain_of(&Grid::new(3, 3), &[]);
        assert!(chain.is_empty());
        assert_eq!(1, chain.group_order());
        assert_eq!(1, chain.levels().len());
        assert_eq!(36, chain.levels()[0].orbits().len());
        assert!(chain.base().is_empty());
    }

    #[test]
    fn test_identity_generators_are_discarded() {
        let chain = chain_of(&Grid::new(2, 2), &[vec![0, 1, 2, 3], vec![0, 1, 2, 3]]);
        assert!(chain.is_empty());
        assert!(chain.levels()[0].generators().is_empty());
    }

    #[test]
    fn test_orbits_partition_pairs() {
        let grid = Grid::new(3, 4);
        let chain = chain_of(&grid, &grid.isometry_generators());
        let index = PairIndex::new(&grid).unwrap();
        for level in chain.levels() {
            let mut all = level.orbits().iter().flatten().copied().collect::<Vec<usize>>();
            all.sort_unstable();
            assert_eq!((0..index.n_pairs()).collect::<Vec<usize>>(), all);
            for orbit in level.orbits() {
                assert!(orbit.windows(2).all(|w| w[0] < w[1]));
                assert!(orbit.iter().all(|p| index.class_of(*p) == index.class_of(orbit[0])));
            }
        }
    }

    #[test]
    fn test_non_breaking_levels() {
        // an equilateral triangle: its three sides form a single distance class
        let space = DistanceTable::from_fn(3, |_, _| 1u64);
        let chain = chain_of(&space, &[vec![1, 2, 0], vec![1, 0, 2]]);
        assert_eq!(6, chain.group_order());
        // once {0,1} is fixed, the stabilizer swaps {0,2} and {1,2}, which is not a whole class
        assert_eq!(2, chain.len());
        assert!(chain.levels()[0].breaks_symmetry());
        assert!(!chain.levels()[1].breaks_symmetry());
        assert_eq!(1, chain.breaking_levels().count());
    }

    #[test]
    fn test_budget_exhausted() {
        let grid = Grid::new(4, 4);
        let index = PairIndex::new(&grid).unwrap();
        let lifted = grid
            .isometry_generators()
            .iter()
            .enumerate()
            .map(|(i, g)| lift_generator(&index, g, i).unwrap())
            .collect();
        let result = StabilizerChainBuilder::new(ChainBudget::with_max_operations(10)).build(&index, lifted);
        assert!(matches!(
            result,
            Err(CoverError::ResourceExhausted { level: 0, .. })
        ));
    }

    #[test]
    fn test_wrong_permutation_size() {
        let index = PairIndex::new(&Grid::new(2, 2)).unwrap();
        let result = StabilizerChainBuilder::default().build(&index, vec![PairPermutation::identity(3)]);
        assert!(matches!(result, Err(CoverError::Configuration(_))));
    }
}
