//! Neighbor topology for a rectangular grid.
//!
//! Each cell links to its in-bounds axis-aligned neighbors. There are no
//! diagonals and no wraparound, so corner cells have 2 neighbors and edge
//! cells have 3.

/// Precomputed 4-neighborhood of every cell, stored in compressed rows.
///
/// Neighbors of a cell are listed in the fixed order right, left, down, up
/// (absent ones skipped). Flow accumulation depends on this order.
#[derive(Debug, Clone)]
pub struct NeighborTopology {
    rows: usize,
    cols: usize,
    /// `offsets[i]..offsets[i + 1]` indexes into `neighbors` for cell `i`.
    offsets: Vec<usize>,
    /// Flat neighbor indices.
    neighbors: Vec<usize>,
}

impl NeighborTopology {
    /// Build the topology for a `rows` x `cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        let size = rows * cols;
        let mut offsets = Vec::with_capacity(size + 1);
        let mut neighbors = Vec::with_capacity(size * 4);

        offsets.push(0);
        for r in 0..rows {
            for c in 0..cols {
                let idx = r * cols + c;
                if c + 1 < cols {
                    neighbors.push(idx + 1);
                }
                if c > 0 {
                    neighbors.push(idx - 1);
                }
                if r + 1 < rows {
                    neighbors.push(idx + cols);
                }
                if r > 0 {
                    neighbors.push(idx - cols);
                }
                offsets.push(neighbors.len());
            }
        }

        Self {
            rows,
            cols,
            offsets,
            neighbors,
        }
    }

    /// Neighbors of the cell at flat index `idx`.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Number of neighbors of the cell at flat index `idx`.
    #[inline]
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get total cell count.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}
