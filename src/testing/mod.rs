//! Testing helpers: render trees to text for snapshot-style assertions.

pub mod snapshot;

pub use snapshot::{render_expanded_to_string, render_to_string};
