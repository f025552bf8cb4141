//! SAT and MaxSAT solver interfaces for distance cover problems.

mod cadical_solver;
pub use cadical_solver::CadicalSolver;

mod external_maxsat_solver;
pub use external_maxsat_solver::ExternalMaxSatSolver;

mod linear_search_solver;
pub use linear_search_solver::LinearSearchMaxSatSolver;

mod maxsat_solver;
pub use maxsat_solver::MaxSatOutcome;
pub use maxsat_solver::MaxSatSolver;

mod sat_solver;
pub use sat_solver::default_solver;
pub use sat_solver::Assignment;
pub use sat_solver::Literal;
pub use sat_solver::SatSolver;
pub use sat_solver::SatSolverFactoryFn;
pub use sat_solver::SolvingResult;
pub use sat_solver::Variable;

mod totalizer;
pub use totalizer::Totalizer;
