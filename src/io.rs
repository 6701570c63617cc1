//! Readers and writers for the formats a run touches: ZIP archives, CSV files
//! and glob-selected files on disk.

pub mod archive;
pub mod csv;
pub mod glob;
