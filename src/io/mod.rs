//! Objects used to write distance cover instances and their solutions.

mod clause_graph_writer;
pub use clause_graph_writer::ClauseGraphWriter;

mod cover_writer;
pub use cover_writer::CoverWriter;

mod specs;
pub use specs::InstanceWriter;
pub use specs::ResponseWriter;

mod wcnf_writer;
pub use wcnf_writer::WcnfWriter;
