//! Symmetries of distance cover instances, and the clauses that break them.
//!
//! Isometries of the metric space permute the pairs of points.
//! The group they generate is described by a stabilizer chain,
//! from which unit clauses are derived to discard symmetric solutions.

mod pair_permutation;
pub use pair_permutation::lift_generator;
pub use pair_permutation::PairPermutation;

mod stabilizer_chain;
pub use stabilizer_chain::ChainBudget;
pub use stabilizer_chain::StabilizerChain;
pub use stabilizer_chain::StabilizerChainBuilder;
pub use stabilizer_chain::StabilizerLevel;

mod symmetry_breaker;
pub use symmetry_breaker::SymmetryBreaker;
