//! Data loading and dataset implementations
//!
//! Labeled account data is read from CSV files with a named header.

pub mod csv;

pub use self::csv::*;
