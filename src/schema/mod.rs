//! Schema module - Configuration and material layout types for thermal grids.

mod config;
mod layout;

pub use config::*;
pub use layout::*;
