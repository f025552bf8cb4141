use distcover::{
    encoding::{DistanceCoverEncoder, EncodedInstance, EncodingOptions},
    metric::{Cube, DistanceTable, Grid, MetricSpace, TaxiCab},
    sat::{Assignment, LinearSearchMaxSatSolver, MaxSatSolver},
    solvers::DistanceCoverSolver,
    CoverError,
};
use std::collections::HashMap;

fn without_symmetry_breaking() -> DistanceCoverEncoder {
    DistanceCoverEncoder::new(EncodingOptions {
        symmetry_breaking: false,
        ..Default::default()
    })
}

fn square() -> DistanceTable<i64> {
    let points = [(0i64, 0i64), (0, 1), (1, 1), (1, 0)];
    DistanceTable::from_fn(4, |a, b| {
        let (dx, dy) = (points[a].0 - points[b].0, points[a].1 - points[b].1);
        dx * dx + dy * dy
    })
    .with_generators(vec![vec![1, 2, 3, 0], vec![1, 0, 3, 2]])
}

fn all_assignments(n_vars: usize) -> impl Iterator<Item = Assignment> {
    (0..1u32 << n_vars).map(move |mask| {
        Assignment::new((0..n_vars).map(|i| Some(mask & (1 << i) != 0)).collect())
    })
}

fn check_models<D>(encoded: &EncodedInstance<D>)
where
    D: distcover::metric::DistanceType,
{
    let instance = encoded.instance();
    let vars = instance.variable_map();
    let index = encoded.pair_index();
    let mut n_models = 0;
    for assignment in all_assignments(instance.n_vars()) {
        if !instance.satisfies_hard_clauses(&assignment) {
            continue;
        }
        n_models += 1;
        for (k, pair) in index.iter_pairs().enumerate() {
            if assignment.value_of(vars.pair_var(k)) == Some(true) {
                assert_eq!(Some(true), assignment.value_of(vars.point_var(pair.first())));
                assert_eq!(Some(true), assignment.value_of(vars.point_var(pair.second())));
            }
        }
        for class in index.distance_classes() {
            assert!(class
                .pairs()
                .iter()
                .any(|k| assignment.value_of(vars.pair_var(*k)) == Some(true)));
        }
    }
    assert!(n_models > 0);
}

#[test]
fn test_models_of_grid_2x2() {
    check_models(&without_symmetry_breaking().encode(&Grid::new(2, 2)).unwrap());
}

#[test]
fn test_models_of_taxicab_2x2() {
    check_models(&DistanceCoverEncoder::default().encode(&TaxiCab::new(2, 2)).unwrap());
}

#[test]
fn test_backward_implications_fix_pair_variables() {
    let encoded = DistanceCoverEncoder::new(EncodingOptions {
        symmetry_breaking: false,
        backward_implications: true,
        ..Default::default()
    })
    .encode(&Grid::new(2, 2))
    .unwrap();
    check_models(&encoded);
    let instance = encoded.instance();
    let vars = instance.variable_map();
    for assignment in all_assignments(instance.n_vars()) {
        if !instance.satisfies_hard_clauses(&assignment) {
            continue;
        }
        for (k, pair) in encoded.pair_index().iter_pairs().enumerate() {
            let both = assignment.value_of(vars.point_var(pair.first())) == Some(true)
                && assignment.value_of(vars.point_var(pair.second())) == Some(true);
            assert_eq!(Some(both), assignment.value_of(vars.pair_var(k)));
        }
    }
}

#[test]
fn test_backward_implications_with_symmetry_breaking_keep_the_optimum() {
    fn optimum<M: MetricSpace>(space: &M, symmetry_breaking: bool) -> Option<usize> {
        DistanceCoverSolver::new_with_options(
            space,
            EncodingOptions {
                symmetry_breaking,
                backward_implications: true,
                ..Default::default()
            },
        )
        .compute_minimum_cover()
        .unwrap()
        .map(|c| c.len())
    }
    assert_eq!(Some(3), optimum(&Grid::new(2, 2), true));
    assert_eq!(Some(5), optimum(&Grid::new(3, 3), true));
    assert_eq!(Some(4), optimum(&TaxiCab::new(3, 3), true));
    assert_eq!(optimum(&square(), false), optimum(&square(), true));
    let encoded = DistanceCoverEncoder::new(EncodingOptions {
        backward_implications: true,
        ..Default::default()
    })
    .encode(&Grid::new(2, 2))
    .unwrap();
    check_models(&encoded);
}

#[test]
fn test_all_true_assignment() {
    let spaces: Vec<Box<dyn Fn(&DistanceCoverEncoder) -> Vec<usize>>> = vec![
        Box::new(|e| decode_all_true(e, &Grid::new(3, 4))),
        Box::new(|e| decode_all_true(e, &TaxiCab::new(4, 4))),
        Box::new(|e| decode_all_true(e, &Cube::new(3, 2))),
        Box::new(|e| decode_all_true(e, &square())),
    ];
    for f in spaces {
        let points = f(&without_symmetry_breaking());
        assert_eq!((0..points.len()).collect::<Vec<_>>(), points);
    }
}

fn decode_all_true<M>(encoder: &DistanceCoverEncoder, space: &M) -> Vec<usize>
where
    M: MetricSpace,
{
    let encoded = encoder.encode(space).unwrap();
    let instance = encoded.instance();
    let all_true = Assignment::new(vec![Some(true); instance.n_vars()]);
    assert!(instance.satisfies_hard_clauses(&all_true));
    let points = instance.decode(&all_true).unwrap();
    assert_eq!(space.n_points(), points.len());
    points
}

#[test]
fn test_two_points() {
    let space = DistanceTable::from_fn(2, |_, _| 7u64);
    let encoded = without_symmetry_breaking().encode(&space).unwrap();
    assert_eq!(3, encoded.instance().hard_clauses().len());
    assert_eq!(2, encoded.instance().soft_clauses().len());
    let mut solver = DistanceCoverSolver::new(&space);
    assert_eq!(Some(vec![0, 1]), solver.compute_minimum_cover().unwrap());
}

#[test]
fn test_right_triangle() {
    let space = DistanceTable::from_matrix(&[vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]]).unwrap();
    let encoded = without_symmetry_breaking().encode(&space).unwrap();
    assert_eq!(2, encoded.pair_index().distance_classes().len());
    // 2 implications per pair and one disjunction per distance
    assert_eq!(8, encoded.instance().hard_clauses().len());
    let mut solver = DistanceCoverSolver::new(&space);
    assert_eq!(Some(vec![0, 1, 2]), solver.compute_minimum_cover().unwrap());
}

#[test]
fn test_square_chain() {
    let encoded = DistanceCoverEncoder::default().encode(&square()).unwrap();
    let chain = encoded.chain().unwrap();
    assert!(chain.len() <= 3);
    assert_eq!(8, chain.group_order());
    let mut forced = HashMap::new();
    for cl in encoded.instance().hard_clauses().iter().filter(|cl| cl.len() == 1) {
        let previous = forced.insert(cl[0].var(), cl[0].is_positive());
        assert!(previous.is_none() || previous == Some(cl[0].is_positive()));
    }
    assert!(!forced.is_empty());
}

#[test]
fn test_symmetry_breaking_keeps_the_optimum() {
    let spaces: Vec<(Box<dyn Fn(&DistanceCoverEncoder) -> u64>, u64)> = vec![
        (Box::new(|e| optimum(e, &Grid::new(3, 3))), 5),
        (Box::new(|e| optimum(e, &TaxiCab::new(3, 3))), 4),
        (Box::new(|e| optimum(e, &Cube::new(3, 2))), 3),
        (Box::new(|e| optimum(e, &square())), 3),
    ];
    for (f, expected) in spaces {
        assert_eq!(expected, f(&without_symmetry_breaking()));
        assert_eq!(expected, f(&DistanceCoverEncoder::default()));
    }
}

fn optimum<M>(encoder: &DistanceCoverEncoder, space: &M) -> u64
where
    M: MetricSpace,
{
    let encoded = encoder.encode(space).unwrap();
    LinearSearchMaxSatSolver::default()
        .solve(encoded.instance())
        .unwrap()
        .cost()
        .unwrap()
}

#[test]
fn test_symmetry_breaking_keeps_some_optimal_covers() {
    let grid = Grid::new(3, 3);
    let encoded = DistanceCoverEncoder::default().encode(&grid).unwrap();
    let instance = encoded.instance();
    let projection = (0..instance.n_points())
        .map(|p| instance.variable_map().point_var(p))
        .collect::<Vec<_>>();
    let with_symmetries = LinearSearchMaxSatSolver::default()
        .enumerate_optima(instance, &projection, None)
        .unwrap();
    let encoded_without = without_symmetry_breaking().encode(&grid).unwrap();
    let without_symmetries = LinearSearchMaxSatSolver::default()
        .enumerate_optima(encoded_without.instance(), &projection, None)
        .unwrap();
    assert!(!with_symmetries.is_empty());
    assert!(with_symmetries.len() < without_symmetries.len());
    with_symmetries
        .iter()
        .for_each(|a| assert!(encoded_without.instance().satisfies_hard_clauses(a)));
}

#[test]
fn test_non_isometric_generator() {
    let space = DistanceTable::from_fn(3, |a, b| a.max(b) as u64).with_generators(vec![vec![0, 2, 1]]);
    let err = DistanceCoverEncoder::default().encode(&space).err().unwrap();
    assert!(matches!(err, CoverError::Configuration(_)));
}

#[test]
fn test_not_a_bijection() {
    let err = DistanceCoverEncoder::default()
        .encode_with_generators(&Grid::new(2, 2), &[vec![0, 0, 1, 2]])
        .err()
        .unwrap();
    assert!(matches!(err, CoverError::Configuration(_)));
}

#[test]
fn test_single_point() {
    let err = DistanceCoverEncoder::default()
        .encode(&Grid::new(1, 1))
        .err()
        .unwrap();
    assert!(matches!(err, CoverError::Configuration(_)));
}

fn min_uncovered_by_brute_force<M: MetricSpace>(space: &M, max_points: usize) -> usize {
    let n = space.n_points();
    let mut all = std::collections::HashSet::new();
    for a in 0..n {
        for b in a + 1..n {
            all.insert(space.distance(a, b));
        }
    }
    (0u32..1 << n)
        .filter(|subset| subset.count_ones() as usize <= max_points)
        .map(|subset| {
            let mut covered = std::collections::HashSet::new();
            for a in (0..n).filter(|a| subset & (1 << a) != 0) {
                for b in (a + 1..n).filter(|b| subset & (1 << b) != 0) {
                    covered.insert(space.distance(a, b));
                }
            }
            all.len() - covered.len()
        })
        .min()
        .unwrap()
}

#[test]
fn test_bounded_covers_match_brute_force() {
    let taxicab = TaxiCab::new(3, 3);
    let square = square();
    for bound in 0..=5 {
        let selection = DistanceCoverSolver::new(&taxicab)
            .compute_bounded_cover(bound)
            .unwrap()
            .unwrap();
        assert!(selection.points().len() <= bound);
        assert_eq!(
            min_uncovered_by_brute_force(&taxicab, bound),
            selection.uncovered_distances().len()
        );
        let selection = DistanceCoverSolver::new(&square)
            .compute_bounded_cover(bound)
            .unwrap()
            .unwrap();
        assert_eq!(
            min_uncovered_by_brute_force(&square, bound),
            selection.uncovered_distances().len()
        );
    }
}
