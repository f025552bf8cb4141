//! Finite metric spaces and their isometries.

mod lattice_spaces;
pub use lattice_spaces::Cube;
pub use lattice_spaces::Grid;
pub use lattice_spaces::TaxiCab;

mod metric_space;
pub use metric_space::DistanceTable;
pub use metric_space::DistanceType;
pub use metric_space::MetricSpace;

mod space_descriptor;
pub use space_descriptor::LatticeSpace;
