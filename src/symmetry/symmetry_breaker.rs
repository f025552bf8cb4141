use super::StabilizerChain;
use crate::encoding::{Clause, VariableMap};
use log::debug;

/// Emits the symmetry breaking clauses of a stabilizer chain.
///
/// For each level that breaks symmetries, the base pair is forced to be realized
/// and, unless disabled, the other pairs of the chosen orbit are forbidden, using unit hard clauses.
///
/// Forbidding a pair only prevents it from witnessing its distance as long as pair variables are
/// independent from their endpoints. When backward implications tie a pair variable to the
/// conjunction of its point variables, a negative unit excludes one of the endpoints instead,
/// which can exclude every cover; the breaker must then be built with [SymmetryBreaker::forced_only].
#[derive(Debug, Clone, Copy)]
pub struct SymmetryBreaker {
    forbid_orbit_pairs: bool,
}

impl Default for SymmetryBreaker {
    fn default() -> Self {
        Self {
            forbid_orbit_pairs: true,
        }
    }
}

impl SymmetryBreaker {
    /// Builds a breaker that only forces the base pairs, without forbidding the rest of their orbits.
    pub fn forced_only() -> Self {
        Self {
            forbid_orbit_pairs: false,
        }
    }

    /// Builds the breaker matching the given encoding of pair variables.
    pub fn for_backward_implications(backward_implications: bool) -> Self {
        if backward_implications {
            Self::forced_only()
        } else {
            Self::default()
        }
    }

    /// Returns true iff the pairs of a chosen orbit other than its base pair are forbidden.
    pub fn forbids_orbit_pairs(&self) -> bool {
        self.forbid_orbit_pairs
    }

    /// Returns the unit clauses for the given chain, level after level.
    pub fn break_symmetries(&self, chain: &StabilizerChain, vars: &VariableMap) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for level in chain.breaking_levels() {
            let orbit = level
                .chosen_orbit()
                .expect("a breaking level always has a chosen orbit");
            let base_point = orbit[0];
            clauses.push(vec![vars.pair_var(base_point).positive()]);
            if !self.forbid_orbit_pairs {
                continue;
            }
            clauses.extend(
                orbit
                    .iter()
                    .skip(1)
                    .map(|q| vec![vars.pair_var(*q).negative()]),
            );
        }
        debug!("emitted {} symmetry breaking clauses", clauses.len());
        clauses
    }
}
