//! The encoding of distance cover problems into weighted partial MaxSAT instances.

mod clause_builder;
pub use clause_builder::ClauseBuilder;
pub use clause_builder::CoverClauses;

mod encoder;
pub use encoder::DistanceCoverEncoder;
pub use encoder::EncodedInstance;
pub use encoder::EncodingOptions;

mod instance;
pub use instance::Clause;
pub use instance::InstanceAssembler;
pub use instance::MaxSatInstance;
pub use instance::WeightedClause;

mod pair_index;
pub use pair_index::DistanceClass;
pub use pair_index::PairIndex;
pub use pair_index::UnorderedPair;

mod variable_allocator;
pub use variable_allocator::VarKind;
pub use variable_allocator::VariableMap;
