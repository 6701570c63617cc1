//! Testing utilities for reconciliation runs.
//!
//! This module helps write tests against the engine without files on disk:
//!
//! - **Builders**: [`ZipBuilder`] makes in-memory ZIP uploads and
//!   [`UploadSetBuilder`] assembles CSV/JSON/ZIP batches.
//! - **Fixtures**: small ready-made inputs ([`sample_csv`], [`observation_json`]).
//! - **Assertions**: [`assert_row`] and [`assert_rows_sorted`] with readable
//!   failure messages.
//!
//! # Quick Start
//!
//! ```
//! use user_reconcile::runner::Reconciler;
//! use user_reconcile::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let (csv, uploads) = UploadSetBuilder::new()
//!     .csv(sample_csv())
//!     .json("BehaviouralObservation_1.json", &observation_json("a@x.com"))
//!     .build()?;
//! let result = Reconciler::default().compare_counts(&csv, &uploads)?;
//! assert_row(&result, "a@x.com", 2, 1);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
