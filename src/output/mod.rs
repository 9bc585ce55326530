//! Output for a built model.
//!
//! - [`trace`] - Full model dump at trace level
//! - [`terminal`] - Terminal summary with colors
//! - [`snapshot`] - JSON snapshot files

mod snapshot;
mod terminal;
mod trace;

pub use snapshot::{read_snapshot, snapshot_file_name, write_snapshot};
pub use terminal::{print_summary, summary_lines};
pub use trace::log_model;
