//! MySQL plumbing shared by the services: bind values, row decoding, procedure calls.

mod params;
mod procedure;
mod rows;

pub use params::SqlValue;
pub use procedure::{call_first_result_set, call_to_completion};
pub use rows::{numeric_column, row_to_json};
