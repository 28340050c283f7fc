//! This crate maps biological abundance data onto a functional hierarchy, such as the KEGG
//! BRITE pathway/module/ortholog tree, and aggregates it into per-node profiles for
//! visualisation.
//!
//! Uploaded measurements exist only for the leaves of the hierarchy. Every internal node is
//! given the column-wise reduction (sum, mean, min, max or median) of the rows of its leaf
//! descendants, see [aggregator::calc_abundances]. The result of running one or more methods is
//! a [profile::Profile].
//!
//! FuncTree is built on top of a number of open source components.
//!
//! * [ndarray] provides [NumPy](https://numpy.org)-like n-dimensional arrays used in numerical
//!   computation, with [ndarray_stats] for NaN-aware order statistics.
//! * [Serde](serde) performs (de)serialisation of hierarchies and profiles.
//! * [csv] parses uploaded tab separated tables.
//! * [Rayon](rayon) optionally computes several methods in parallel.

pub mod aggregator;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod compression;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod operation;
pub mod operations;
pub mod profile;
pub mod table;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod types;
