//! Compute module - Grid state and the per-tick heat flow update.

mod cell_set;
mod flow;
mod grid;
mod stats;
mod topology;

pub use cell_set::*;
pub use flow::*;
pub use grid::*;
pub use stats::*;
pub use topology::*;
