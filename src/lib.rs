//! Distcover computes minimum distance covers of finite metric spaces.
//!
//! A distance cover is a set of points such that every distance realized in the space
//! is realized by two points of the set.
//! The problem is encoded into a MaxSAT instance whose symmetries, induced by the isometries of the space,
//! are partially broken by the clauses derived from a stabilizer chain.

#![warn(missing_docs)]

pub mod encoding;

pub mod error;
pub use error::CoverError;
pub use error::Result;

pub mod io;

pub mod metric;

pub mod sat;

pub mod solvers;

pub mod symmetry;
