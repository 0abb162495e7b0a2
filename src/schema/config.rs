//! Configuration types for thermal grid simulation parameters.

use serde::{Deserialize, Serialize};

use super::{Band, MaterialLayout};
use crate::compute::Cell;

/// Top-level grid configuration.
///
/// Every tunable of the engine lives here; nothing is read from globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Initial temperature of every cell.
    pub baseline: f64,
    /// Temperature added to each source cell per tick.
    pub source_rate: f64,
    /// Thermal mass layout.
    pub material: MaterialLayout,
    /// Cells that start out as sources.
    #[serde(default)]
    pub initial_sources: Vec<Cell>,
    /// Cells that start out as sinks.
    #[serde(default)]
    pub initial_sinks: Vec<Cell>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 40,
            baseline: 5.0,
            source_rate: 10.0,
            material: MaterialLayout::Banded {
                default_mass: 1.0,
                bands: vec![
                    Band {
                        margin: 5,
                        delta: 100.0,
                    },
                    Band {
                        margin: 6,
                        delta: -100.0,
                    },
                ],
            },
            initial_sources: vec![Cell::new(8, 8)],
            initial_sinks: vec![Cell::new(37, 37)],
        }
    }
}

impl GridConfig {
    /// Uniform-material grid with no sources or sinks.
    pub fn uniform(rows: usize, cols: usize, baseline: f64, mass: f64) -> Self {
        Self {
            rows,
            cols,
            baseline,
            source_rate: 10.0,
            material: MaterialLayout::Uniform { mass },
            initial_sources: Vec::new(),
            initial_sinks: Vec::new(),
        }
    }

    /// Get total cell count (rows * cols).
    ///
    /// Only meaningful for a config that passed [`validate`](Self::validate).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate scalar parameters and initial cell placement.
    ///
    /// The material layout is checked separately by [`MaterialLayout::build`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        checked_cell_count(self.rows, self.cols)?;
        if !self.baseline.is_finite() {
            return Err(ConfigError::NonFiniteParameter { name: "baseline" });
        }
        if !self.source_rate.is_finite() {
            return Err(ConfigError::NonFiniteParameter {
                name: "source_rate",
            });
        }
        for (role, cells) in [
            (CellRole::Source, &self.initial_sources),
            (CellRole::Sink, &self.initial_sinks),
        ] {
            if let Some(cell) = cells
                .iter()
                .find(|c| c.row >= self.rows || c.col >= self.cols)
            {
                return Err(ConfigError::CellOutOfBounds {
                    role,
                    row: cell.row,
                    col: cell.col,
                });
            }
        }
        Ok(())
    }
}

/// Number of cells in a `rows` x `cols` grid.
///
/// Rejects empty grids and grids whose per-cell buffers (neighbor lists
/// included) could not be addressed.
pub fn checked_cell_count(rows: usize, cols: usize) -> Result<usize, ConfigError> {
    if rows == 0 || cols == 0 {
        return Err(ConfigError::InvalidDimensions);
    }
    rows.checked_mul(cols)
        .filter(|&n| {
            n.checked_mul(MAX_BYTES_PER_CELL)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(ConfigError::GridTooLarge { rows, cols })
}

/// Up to four neighbor indices per cell dominate the per-cell footprint.
const MAX_BYTES_PER_CELL: usize = 4 * std::mem::size_of::<usize>();

/// Role of a designated cell, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Source,
    Sink,
    Material,
}

impl std::fmt::Display for CellRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellRole::Source => f.write_str("source"),
            CellRole::Sink => f.write_str("sink"),
            CellRole::Material => f.write_str("material"),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (rows, cols) must be non-zero")]
    InvalidDimensions,
    #[error("Grid of {rows}x{cols} cells is too large to allocate")]
    GridTooLarge { rows: usize, cols: usize },
    #[error("Parameter `{name}` must be finite")]
    NonFiniteParameter { name: &'static str },
    #[error("Band with margin {margin} does not fit a {rows}x{cols} grid")]
    BandDoesNotFit {
        margin: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Initial {role} cell ({row}, {col}) is outside the grid")]
    CellOutOfBounds {
        role: CellRole,
        row: usize,
        col: usize,
    },
    #[error("Thermal mass at ({row}, {col}) must be positive and finite, got {mass}")]
    NonPositiveMass { row: usize, col: usize, mass: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size(), 1600);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut config = GridConfig::uniform(0, 4, 1.0, 1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidDimensions));

        config.rows = 4;
        config.cols = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDimensions));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let config = GridConfig::uniform(usize::MAX / 2, 3, 1.0, 1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                rows: usize::MAX / 2,
                cols: 3,
            })
        );

        // Cell count fits in usize but the neighbor lists would not
        let rows = usize::MAX / 16;
        assert!(matches!(
            checked_cell_count(rows, 2),
            Err(ConfigError::GridTooLarge { .. })
        ));

        assert_eq!(checked_cell_count(40, 40), Ok(1600));
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let mut config = GridConfig::uniform(4, 4, f64::NAN, 1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFiniteParameter { name: "baseline" })
        );

        config.baseline = 1.0;
        config.source_rate = f64::INFINITY;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFiniteParameter {
                name: "source_rate"
            })
        );
    }

    #[test]
    fn test_initial_cells_out_of_bounds() {
        let mut config = GridConfig::uniform(4, 4, 1.0, 1.0);
        config.initial_sinks.push(Cell::new(1, 4));
        assert_eq!(
            config.validate(),
            Err(ConfigError::CellOutOfBounds {
                role: CellRole::Sink,
                row: 1,
                col: 4,
            })
        );
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "rows": 10,
            "cols": 12,
            "baseline": 2.5,
            "source_rate": 4.0,
            "material": { "type": "Uniform", "mass": 3.0 },
            "initial_sources": [ { "row": 1, "col": 2 } ]
        }"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 12);
        assert_eq!(config.material, MaterialLayout::Uniform { mass: 3.0 });
        assert_eq!(config.initial_sources, vec![Cell::new(1, 2)]);
        assert!(config.initial_sinks.is_empty());
        assert!(config.validate().is_ok());
    }
}
