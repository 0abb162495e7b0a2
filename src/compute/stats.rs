//! Summary statistics over a grid's temperature field.

use serde::{Deserialize, Serialize};

use super::DiffusionGrid;

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sum of all cell temperatures.
    pub total_heat: f64,
    pub sources: usize,
    pub sinks: usize,
    pub tick: u64,
}

impl GridStats {
    /// Compute statistics from grid.
    pub fn from_grid(grid: &DiffusionGrid) -> Self {
        let mut total_heat = 0.0f64;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        let temperatures = grid.temperatures();
        for &t in temperatures {
            total_heat += t;
            max = max.max(t);
            min = min.min(t);
        }

        Self {
            min,
            max,
            mean: total_heat / temperatures.len() as f64,
            total_heat,
            sources: grid.sources().len(),
            sinks: grid.sinks().len(),
            tick: grid.tick_count(),
        }
    }
}

impl std::fmt::Display for GridStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tick={} heat={:.4} range=[{:.4}, {:.4}] mean={:.4} sources={} sinks={}",
            self.tick, self.total_heat, self.min, self.max, self.mean, self.sources, self.sinks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Cell;
    use crate::schema::GridConfig;

    #[test]
    fn test_stats_initial() {
        let grid = DiffusionGrid::new(&GridConfig::default()).unwrap();
        let stats = GridStats::from_grid(&grid);

        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.total_heat, 5.0 * 1600.0);
        assert_eq!(stats.sources, 1);
        assert_eq!(stats.sinks, 1);
        assert_eq!(stats.tick, 0);
    }

    #[test]
    fn test_stats_after_source_tick() {
        let mut config = GridConfig::uniform(2, 2, 0.0, 1.0);
        config.source_rate = 8.0;
        config.initial_sources.push(Cell::new(0, 0));
        let mut grid = DiffusionGrid::new(&config).unwrap();
        grid.tick();

        // Uniform unit mass moves heat without creating or destroying it
        let stats = GridStats::from_grid(&grid);
        assert!((stats.total_heat - 8.0).abs() < 1e-12);
        assert!(stats.max > stats.min);
        assert_eq!(stats.tick, 1);
    }
}
