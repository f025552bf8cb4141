//! Solvers computing minimum distance covers.

mod distance_cover_solver;
pub use distance_cover_solver::BoundedCover;
pub use distance_cover_solver::DistanceCoverSolver;
