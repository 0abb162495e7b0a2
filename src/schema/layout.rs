//! Material layouts describing the thermal mass of each cell.

use serde::{Deserialize, Serialize};

use super::{CellRole, ConfigError, checked_cell_count};

/// Rectangular band applied at a fixed inset from every edge.
///
/// Covers rows `margin..rows - margin` and columns `margin..cols - margin`,
/// so a margin of 0 covers the whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Number of cells between the grid edge and the band on each side.
    pub margin: usize,
    /// Added to the thermal mass of every cell inside the band.
    pub delta: f64,
}

impl Band {
    /// A band fits when it leaves at least one cell inside on both axes.
    #[inline]
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        self.margin
            .checked_mul(2)
            .is_some_and(|width| width < rows && width < cols)
    }
}

/// Predefined thermal mass layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialLayout {
    /// Same mass everywhere.
    Uniform {
        /// Mass of every cell.
        mass: f64,
    },
    /// Nested rectangular bands over a default mass.
    ///
    /// Bands are applied in order, so an inner band can cancel part of an
    /// outer one (a wall ring around a room).
    Banded {
        /// Mass outside every band.
        default_mass: f64,
        /// Bands to overlay.
        bands: Vec<Band>,
    },
    /// Custom per-cell values (sparse representation).
    Custom {
        /// Mass of unlisted cells.
        default_mass: f64,
        /// List of (row, col, mass) entries.
        values: Vec<(usize, usize, f64)>,
    },
}

impl Default for MaterialLayout {
    fn default() -> Self {
        MaterialLayout::Uniform { mass: 1.0 }
    }
}

impl MaterialLayout {
    /// Generate the row-major thermal mass field.
    ///
    /// Fails if a band or custom entry does not fit the grid, or if any
    /// resulting mass is not strictly positive.
    pub fn build(&self, rows: usize, cols: usize) -> Result<Vec<f64>, ConfigError> {
        let size = checked_cell_count(rows, cols)?;

        let field = match self {
            MaterialLayout::Uniform { mass } => vec![*mass; size],
            MaterialLayout::Banded {
                default_mass,
                bands,
            } => {
                let mut field = vec![*default_mass; size];
                for band in bands {
                    if !band.fits(rows, cols) {
                        return Err(ConfigError::BandDoesNotFit {
                            margin: band.margin,
                            rows,
                            cols,
                        });
                    }
                    apply_band(&mut field, rows, cols, band);
                }
                field
            }
            MaterialLayout::Custom {
                default_mass,
                values,
            } => {
                let mut field = vec![*default_mass; size];
                for &(r, c, mass) in values {
                    if r >= rows || c >= cols {
                        return Err(ConfigError::CellOutOfBounds {
                            role: CellRole::Material,
                            row: r,
                            col: c,
                        });
                    }
                    field[r * cols + c] = mass;
                }
                field
            }
        };

        if let Some(idx) = field.iter().position(|m| !(m.is_finite() && *m > 0.0)) {
            return Err(ConfigError::NonPositiveMass {
                row: idx / cols,
                col: idx % cols,
                mass: field[idx],
            });
        }

        Ok(field)
    }
}

fn apply_band(field: &mut [f64], rows: usize, cols: usize, band: &Band) {
    let m = band.margin;
    for row in field.chunks_exact_mut(cols).take(rows - m).skip(m) {
        for cell in &mut row[m..cols - m] {
            *cell += band.delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let field = MaterialLayout::Uniform { mass: 2.0 }.build(3, 4).unwrap();
        assert_eq!(field.len(), 12);
        assert!(field.iter().all(|&m| m == 2.0));
    }

    #[test]
    fn test_single_band() {
        let layout = MaterialLayout::Banded {
            default_mass: 1.0,
            bands: vec![Band {
                margin: 1,
                delta: 9.0,
            }],
        };
        let field = layout.build(4, 5).unwrap();

        // Band covers rows 1..3, cols 1..4
        for r in 0..4 {
            for c in 0..5 {
                let expected = if (1..3).contains(&r) && (1..4).contains(&c) {
                    10.0
                } else {
                    1.0
                };
                assert_eq!(field[r * 5 + c], expected, "cell ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_zero_margin_covers_grid() {
        let layout = MaterialLayout::Banded {
            default_mass: 1.0,
            bands: vec![Band {
                margin: 0,
                delta: 2.0,
            }],
        };
        assert!(layout.build(2, 3).unwrap().iter().all(|&m| m == 3.0));
    }

    #[test]
    fn test_oversized_layout_rejected() {
        let layout = MaterialLayout::Uniform { mass: 1.0 };
        assert!(matches!(
            layout.build(usize::MAX / 2, 3),
            Err(ConfigError::GridTooLarge { .. })
        ));

        let huge = Band {
            margin: usize::MAX,
            delta: 1.0,
        };
        assert!(!huge.fits(10, 10));
    }

    #[test]
    fn test_band_too_wide() {
        let layout = MaterialLayout::Banded {
            default_mass: 1.0,
            bands: vec![Band {
                margin: 2,
                delta: 1.0,
            }],
        };
        assert_eq!(
            layout.build(4, 10),
            Err(ConfigError::BandDoesNotFit {
                margin: 2,
                rows: 4,
                cols: 10,
            })
        );
        assert!(layout.build(5, 5).is_ok());
    }

    #[test]
    fn test_non_positive_mass() {
        let layout = MaterialLayout::Banded {
            default_mass: 1.0,
            bands: vec![Band {
                margin: 1,
                delta: -1.0,
            }],
        };
        assert_eq!(
            layout.build(3, 3),
            Err(ConfigError::NonPositiveMass {
                row: 1,
                col: 1,
                mass: 0.0,
            })
        );

        let zero = MaterialLayout::Uniform { mass: 0.0 };
        assert!(matches!(
            zero.build(2, 2),
            Err(ConfigError::NonPositiveMass { row: 0, col: 0, .. })
        ));
    }

    #[test]
    fn test_custom_values() {
        let layout = MaterialLayout::Custom {
            default_mass: 1.0,
            values: vec![(0, 1, 4.0), (2, 2, 0.5)],
        };
        let field = layout.build(3, 3).unwrap();
        assert_eq!(field[1], 4.0);
        assert_eq!(field[8], 0.5);
        assert_eq!(field[0], 1.0);

        let outside = MaterialLayout::Custom {
            default_mass: 1.0,
            values: vec![(3, 0, 4.0)],
        };
        assert!(matches!(
            outside.build(3, 3),
            Err(ConfigError::CellOutOfBounds { row: 3, col: 0, .. })
        ));
    }
}
