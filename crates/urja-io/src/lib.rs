//! # urja-io: CSV ingestion and emission
//!
//! Everything that touches the filesystem on the way in or out of the
//! pipeline:
//!
//! - [`matrix`] - reshapes raw wide climate matrices into long observations
//! - [`auxiliary`] - fixed-schema loaders for the four secondary sources,
//!   with positional column renaming and join-key validation
//! - [`dates`] - ordered date-column detection strategies for tables of
//!   uncertain provenance
//! - [`frame`] - CSV DataFrame read/write helpers
//!
//! Per-file problems (missing file, undetectable header) are absorbed and
//! reported by callers; only pipeline-wide impossibilities propagate as
//! errors.

pub mod auxiliary;
pub mod dates;
pub mod frame;
pub mod matrix;

pub use auxiliary::{load_aux, validate_unique_keys, AuxSpec, AUX_SOURCES};
pub use dates::{detect_date_column, parse_date_cell, DateStrategy};
pub use frame::{read_csv_frame, write_csv_frame};
pub use matrix::{convert_file, convert_path, reshape_matrix, write_long_csv, ConvertSummary};
