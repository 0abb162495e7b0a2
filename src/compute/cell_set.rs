//! Coordinate types and packed-index cell sets.

use serde::{Deserialize, Serialize};

/// Grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Set of grid cells keyed by packed index (`row * cols + col`).
///
/// Backed by a bitset, so membership tests and toggles are O(1).
/// Iteration yields cells in ascending index (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    cols: usize,
    capacity: usize,
    words: Vec<u64>,
    len: usize,
}

impl CellSet {
    /// Empty set for a `rows` x `cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        let capacity = rows * cols;
        Self {
            cols,
            capacity,
            words: vec![0u64; capacity.div_ceil(64)],
            len: 0,
        }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < self.capacity && (self.words[idx >> 6] & (1u64 << (idx & 63))) != 0
    }

    #[inline]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.col < self.cols && self.contains(cell.row * self.cols + cell.col)
    }

    /// Insert `idx`. Returns true if it was not already present.
    pub fn insert(&mut self, idx: usize) -> bool {
        debug_assert!(idx < self.capacity);
        let mask = 1u64 << (idx & 63);
        let word = &mut self.words[idx >> 6];
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        self.len += 1;
        true
    }

    /// Remove `idx`. Returns true if it was present.
    pub fn remove(&mut self, idx: usize) -> bool {
        debug_assert!(idx < self.capacity);
        let mask = 1u64 << (idx & 63);
        let word = &mut self.words[idx >> 6];
        if *word & mask == 0 {
            return false;
        }
        *word &= !mask;
        self.len -= 1;
        true
    }

    /// Flip membership of `idx`. Returns the new membership.
    pub fn toggle(&mut self, idx: usize) -> bool {
        if self.remove(idx) {
            false
        } else {
            self.insert(idx)
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &bits)| {
            let mut remaining = bits;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(w * 64 + bit)
            })
        })
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols;
        self.indices().map(move |idx| Cell::new(idx / cols, idx % cols))
    }

    /// Collect cells into a vector (for serialization).
    pub fn to_vec(&self) -> Vec<Cell> {
        self.cells().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_involution() {
        let mut set = CellSet::new(4, 4);
        assert!(set.toggle(5));
        assert!(set.contains(5));
        assert_eq!(set.len(), 1);

        assert!(!set.toggle(5));
        assert!(!set.contains(5));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let mut set = CellSet::new(2, 2);
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 1);
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_iteration_is_row_major() {
        // Span several words
        let mut set = CellSet::new(20, 20);
        for idx in [399, 0, 64, 63, 130, 1] {
            set.insert(idx);
        }
        let indices: Vec<usize> = set.indices().collect();
        assert_eq!(indices, vec![0, 1, 63, 64, 130, 399]);

        let cells = set.to_vec();
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[3], Cell::new(3, 4));
        assert_eq!(cells[5], Cell::new(19, 19));
    }

    #[test]
    fn test_contains_cell_bounds() {
        let mut set = CellSet::new(3, 3);
        set.insert(4);
        assert!(set.contains_cell(Cell::new(1, 1)));
        assert!(!set.contains_cell(Cell::new(0, 4)));
        assert!(!set.contains_cell(Cell::new(5, 0)));
        assert!(!set.contains(100));
    }
}
