//! Heat flow computation.
//!
//! Each tick every cell pushes heat to its strictly colder neighbors. With `k`
//! colder neighbors, the share sent to neighbor `n` is
//! `(T[c] - T[n]) / (k + 1)`, which lands in `n` scaled by `1 / mass[n]` and
//! leaves `c` scaled by `1 / mass[c]`. Dividing by `k + 1` rather than `k`
//! keeps part of every difference in place, which damps oscillation.
//!
//! The change buffer is computed per target cell (gather) so cells can be
//! processed in parallel. Contributions are summed in the same sequence a
//! row-major scatter over source cells produces, so results are bit-identical
//! to the sequential formulation.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::{CellSet, NeighborTopology};

/// Add `rate` to every source cell, in place.
pub fn inject_sources(temperature: &mut [f64], sources: &CellSet, rate: f64) {
    for idx in sources.indices() {
        temperature[idx] += rate;
    }
}

/// Halve every sink cell, in place.
pub fn extract_sinks(temperature: &mut [f64], sinks: &CellSet) {
    for idx in sinks.indices() {
        temperature[idx] /= 2.0;
    }
}

/// Count strictly colder neighbors of every cell.
pub fn count_downhill_into(temperature: &[f64], topology: &NeighborTopology, downhill: &mut [u8]) {
    let count = |idx: usize| -> u8 {
        let t = temperature[idx];
        topology
            .neighbors(idx)
            .iter()
            .filter(|&&n| temperature[n] < t)
            .count() as u8
    };

    #[cfg(not(target_arch = "wasm32"))]
    downhill
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, k)| *k = count(idx));

    #[cfg(target_arch = "wasm32")]
    for (idx, k) in downhill.iter_mut().enumerate() {
        *k = count(idx);
    }
}

/// Net flow into a single cell.
///
/// Summation order: inflow from lower-index neighbors (ascending), the
/// cell's own outflow in topology order, then inflow from higher-index
/// neighbors (ascending).
#[inline]
fn cell_change(
    idx: usize,
    temperature: &[f64],
    thermal_mass: &[f64],
    topology: &NeighborTopology,
    downhill: &[u8],
) -> f64 {
    let t = temperature[idx];
    let mass = thermal_mass[idx];
    let neighbors = topology.neighbors(idx);

    let mut ordered = [0usize; 4];
    let ordered = &mut ordered[..neighbors.len()];
    ordered.copy_from_slice(neighbors);
    ordered.sort_unstable();

    let inflow = |n: usize| -> Option<f64> {
        let tn = temperature[n];
        (tn > t).then(|| ((tn - t) / f64::from(downhill[n] + 1)) / mass)
    };

    let mut acc = 0.0f64;

    for &n in ordered.iter().filter(|&&n| n < idx) {
        if let Some(v) = inflow(n) {
            acc += v;
        }
    }

    let k = downhill[idx];
    if k > 0 {
        let share = f64::from(k + 1);
        for &n in neighbors {
            let tn = temperature[n];
            if t > tn {
                acc -= ((t - tn) / share) / mass;
            }
        }
    }

    for &n in ordered.iter().filter(|&&n| n > idx) {
        if let Some(v) = inflow(n) {
            acc += v;
        }
    }

    acc
}

/// Fill `change` with the net flow of every cell.
///
/// `downhill` must hold the output of [`count_downhill_into`] for the same
/// temperature snapshot.
pub fn accumulate_flow_into(
    temperature: &[f64],
    thermal_mass: &[f64],
    topology: &NeighborTopology,
    downhill: &[u8],
    change: &mut [f64],
) {
    #[cfg(not(target_arch = "wasm32"))]
    change.par_iter_mut().enumerate().for_each(|(idx, out)| {
        *out = cell_change(idx, temperature, thermal_mass, topology, downhill);
    });

    #[cfg(target_arch = "wasm32")]
    for (idx, out) in change.iter_mut().enumerate() {
        *out = cell_change(idx, temperature, thermal_mass, topology, downhill);
    }
}

/// Compute the full change buffer from a temperature snapshot.
pub fn compute_flow_into(
    temperature: &[f64],
    thermal_mass: &[f64],
    topology: &NeighborTopology,
    downhill: &mut [u8],
    change: &mut [f64],
) {
    debug_assert_eq!(temperature.len(), topology.cell_count());
    count_downhill_into(temperature, topology, downhill);
    accumulate_flow_into(temperature, thermal_mass, topology, downhill, change);
}

/// Add the change buffer to the temperature field elementwise.
pub fn commit_changes(temperature: &mut [f64], change: &[f64]) {
    for (t, &d) in temperature.iter_mut().zip(change.iter()) {
        *t += d;
    }
}
