//! Report exporters.

pub mod csv;
pub mod xlsx;
