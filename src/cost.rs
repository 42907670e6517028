// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cumulative seam cost
//!
//! The classic seam-carving recurrence: the top row costs exactly its
//! energy, and every cell below costs its own energy plus the
//! cheapest of the three cells that could lead into it from above.
//! Columns outside the field cost infinity, so the edge columns can
//! only be reached from inside.
//!
//! Rows must be filled strictly top to bottom.  Within a row every
//! cell is independent, which is what the `threaded` feature uses.

use crate::cq;
use crate::energy::{EnergyField, Score};
use crate::plane::ScalarField;

/// Fill `cost` from `energy`.  Both must have the same logical
/// dimensions.
pub fn cumulative_cost(energy: &EnergyField, cost: &mut ScalarField) {
    assert_eq!(energy.width(), cost.width());
    assert_eq!(energy.height(), cost.height());
    if energy.height() == 0 || energy.width() == 0 {
        return;
    }

    // Populate the first row with their native energies.
    for (cell, score) in cost.row_mut(0).iter_mut().zip(energy.row(0)) {
        *cell = score.value();
    }

    #[cfg(feature = "threaded")]
    let threads = num_cpus::get();

    for y in 1..energy.height() {
        let (above, current) = cost.adjacent_rows_mut(y);
        #[cfg(not(feature = "threaded"))]
        cost_span(above, energy.row(y), 0, current);
        #[cfg(feature = "threaded")]
        threaded::cost_row(above, energy.row(y), current, threads);
    }
}

// Fill `out`, which holds columns `offset..offset + out.len()` of the
// current row.
fn cost_span(above: &[f32], energy: &[Score], offset: usize, out: &mut [f32]) {
    let last = above.len() - 1;
    for (i, cell) in out.iter_mut().enumerate() {
        let x = offset + i;
        let left = cq!(x == 0, f32::INFINITY, above[x - 1]);
        let right = cq!(x == last, f32::INFINITY, above[x + 1]);
        let cheapest = [left, above[x], right]
            .iter()
            .fold(f32::INFINITY, |m, &v| cq!(v < m, v, m));
        *cell = energy[x].value() + cheapest;
    }
}

#[cfg(feature = "threaded")]
mod threaded {
    use super::cost_span;
    use crate::energy::Score;

    // Below this, spawning costs more than it saves.
    const PARALLEL_MIN_WIDTH: usize = 2048;

    pub(super) fn cost_row(above: &[f32], energy: &[Score], out: &mut [f32], threads: usize) {
        let width = out.len();
        if threads < 2 || width < PARALLEL_MIN_WIDTH {
            return cost_span(above, energy, 0, out);
        }
        let span = (width + threads - 1) / threads;
        crossbeam::scope(|scope| {
            for (i, chunk) in out.chunks_mut(span).enumerate() {
                scope.spawn(move |_| cost_span(above, energy, i * span, chunk));
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    }
}
