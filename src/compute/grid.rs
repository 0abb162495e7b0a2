//! Diffusion grid - Main simulation driver for thermal grids.
//!
//! Owns all simulation state and orchestrates the stages of each tick:
//! injection, extraction, flow computation and commit.

use log::{debug, trace};

use crate::schema::{ConfigError, GridConfig};

use super::{
    Cell, CellSet, NeighborTopology, commit_changes, compute_flow_into, extract_sinks,
    inject_sources,
};

/// Errors reported by [`DiffusionGrid`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("Coordinate ({row}, {col}) is outside the {rows}x{cols} grid")]
    InvalidCoordinate {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },
    #[error("Invalid construction parameters: {0}")]
    InvalidConstructionParameters(#[from] ConfigError),
}

/// Heat diffusion engine over a fixed rectangular grid.
///
/// Fields are stored row-major: `index = row * cols + col`.
pub struct DiffusionGrid {
    rows: usize,
    cols: usize,
    source_rate: f64,
    /// Current temperature of every cell.
    temperature: Vec<f64>,
    /// Resistance to temperature change, strictly positive.
    thermal_mass: Vec<f64>,
    topology: NeighborTopology,
    sources: CellSet,
    sinks: CellSet,
    /// Pre-allocated change buffer (reused each tick).
    change: Vec<f64>,
    /// Pre-allocated per-cell count of colder neighbors.
    downhill: Vec<u8>,
    /// Ticks completed.
    tick_count: u64,
}

impl DiffusionGrid {
    /// Create a new grid from configuration.
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let thermal_mass = config.material.build(config.rows, config.cols)?;

        let rows = config.rows;
        let cols = config.cols;
        let size = config.grid_size();

        let mut sources = CellSet::new(rows, cols);
        for cell in &config.initial_sources {
            sources.insert(cell.row * cols + cell.col);
        }
        let mut sinks = CellSet::new(rows, cols);
        for cell in &config.initial_sinks {
            sinks.insert(cell.row * cols + cell.col);
        }

        let (min_mass, max_mass) = thermal_mass
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| {
                (lo.min(m), hi.max(m))
            });
        debug!(
            "Created {}x{} grid: baseline={}, source_rate={}, {} sources, {} sinks, mass in [{}, {}]",
            rows,
            cols,
            config.baseline,
            config.source_rate,
            sources.len(),
            sinks.len(),
            min_mass,
            max_mass
        );

        Ok(Self {
            rows,
            cols,
            source_rate: config.source_rate,
            temperature: vec![config.baseline; size],
            thermal_mass,
            topology: NeighborTopology::new(rows, cols),
            sources,
            sinks,
            change: vec![0.0f64; size],
            downhill: vec![0u8; size],
            tick_count: 0,
        })
    }

    /// Convert signed coordinates to a flat index, checking bounds.
    #[inline]
    pub fn index_of(&self, row: isize, col: isize) -> Result<usize, GridError> {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) if r < self.rows && c < self.cols => Ok(r * self.cols + c),
            _ => Err(GridError::InvalidCoordinate {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    /// Flip source membership of a cell. Returns the new membership.
    pub fn toggle_source(&mut self, row: isize, col: isize) -> Result<bool, GridError> {
        let idx = self.index_of(row, col)?;
        let active = self.sources.toggle(idx);
        debug!("Source ({}, {}) -> {}", row, col, active);
        Ok(active)
    }

    /// Flip sink membership of a cell. Returns the new membership.
    pub fn toggle_sink(&mut self, row: isize, col: isize) -> Result<bool, GridError> {
        let idx = self.index_of(row, col)?;
        let active = self.sinks.toggle(idx);
        debug!("Sink ({}, {}) -> {}", row, col, active);
        Ok(active)
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        // 1. Injection
        inject_sources(&mut self.temperature, &self.sources, self.source_rate);

        // 2. Extraction (reads post-injection values)
        extract_sinks(&mut self.temperature, &self.sinks);

        // 3. Flow from a fixed snapshot into the change buffer
        compute_flow_into(
            &self.temperature,
            &self.thermal_mass,
            &self.topology,
            &mut self.downhill,
            &mut self.change,
        );

        // 4. Commit
        commit_changes(&mut self.temperature, &self.change);

        self.tick_count += 1;
        trace!(
            "Tick {}: {} sources, {} sinks",
            self.tick_count,
            self.sources.len(),
            self.sinks.len()
        );
    }

    /// Run simulation for specified number of ticks.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.tick();
        }
    }

    /// Temperature of a cell.
    pub fn temperature_at(&self, row: isize, col: isize) -> Result<f64, GridError> {
        Ok(self.temperature[self.index_of(row, col)?])
    }

    /// Thermal mass of a cell.
    pub fn thermal_mass_at(&self, row: isize, col: isize) -> Result<f64, GridError> {
        Ok(self.thermal_mass[self.index_of(row, col)?])
    }

    /// Grid dimensions as (rows, cols).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major temperature field.
    #[inline]
    pub fn temperatures(&self) -> &[f64] {
        &self.temperature
    }

    /// Row-major thermal mass field.
    #[inline]
    pub fn thermal_masses(&self) -> &[f64] {
        &self.thermal_mass
    }

    /// Cells currently acting as sources.
    pub fn sources(&self) -> &CellSet {
        &self.sources
    }

    /// Cells currently acting as sinks.
    pub fn sinks(&self) -> &CellSet {
        &self.sinks
    }

    /// Whether `cell` is a source. Out-of-range cells are never sources.
    pub fn is_source(&self, cell: Cell) -> bool {
        self.sources.contains_cell(cell)
    }

    /// Whether `cell` is a sink. Out-of-range cells are never sinks.
    pub fn is_sink(&self, cell: Cell) -> bool {
        self.sinks.contains_cell(cell)
    }

    /// Heat added to each source per tick.
    #[inline]
    pub fn source_rate(&self) -> f64 {
        self.source_rate
    }

    /// Ticks completed since construction.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
