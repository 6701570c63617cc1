//! Identity extraction from both sources.

pub mod csv;
pub mod json;
