//! Thermal Grid - Discrete neighbor-flow heat diffusion.
//!
//! This crate simulates heat spreading across a 2D grid of materials with
//! per-cell thermal mass, fixed heat sources and heat sinks. Each tick adds
//! heat at sources, halves sinks, then moves heat from every cell to its
//! strictly colder axis-aligned neighbors.
//!
//! # Architecture
//!
//! - `schema`: Configuration and material layout types
//! - `compute`: Grid state, neighbor topology and the per-tick update
//! - `recording`: Binary recording and playback of temperature fields
//!
//! # Example
//!
//! ```rust,no_run
//! use thermal_grid::{
//!     compute::{DiffusionGrid, GridStats},
//!     schema::GridConfig,
//! };
//!
//! // Reference 40x40 room with one source and one sink
//! let config = GridConfig::default();
//! let mut grid = DiffusionGrid::new(&config).unwrap();
//!
//! // Add a second heater and run
//! grid.toggle_source(20, 20).unwrap();
//! grid.run(100);
//!
//! println!("{}", GridStats::from_grid(&grid));
//! ```

pub mod compute;
pub mod recording;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{Cell, CellSet, DiffusionGrid, GridError, GridStats};
pub use schema::{Band, ConfigError, GridConfig, MaterialLayout};
