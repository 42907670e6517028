// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Incremental re-scoring
//!
//! Removing a seam only disturbs the energy of cells whose 3x3
//! neighbourhood the seam passed through.  Those were marked dirty
//! before the removal; afterwards they sit in one unbroken band per
//! row, straddling the column the seam used to occupy.  Walking
//! outward from that column in both directions and stopping at the
//! first clean cell re-scores the band and nothing else, so a removal
//! costs O(height) instead of O(width * height).

use crate::energy::{sobel_at, EnergyField, Score};
use crate::plane::ScalarField;
use log::trace;

/// Re-score the dirty cells left behind by removing `seam`.
/// `luminance` must already have had the seam removed.  Returns the
/// number of cells re-scored.
pub fn rescore(energy: &mut EnergyField, luminance: &ScalarField, seam: &[u32]) -> usize {
    debug_assert_eq!(energy.width(), luminance.width());
    debug_assert_eq!(seam.len(), energy.height() as usize);
    let width = energy.width();
    let mut rescored = 0;

    for (y, &removed) in seam.iter().enumerate() {
        let y = y as u32;

        // Rightward, starting with the cell that slid into the gap.
        let mut x = removed;
        while x < width && energy[(x, y)].is_dirty() {
            energy[(x, y)] = Score::Scored(sobel_at(luminance, x, y));
            rescored += 1;
            x += 1;
        }

        // Leftward, from the cell that was beside the seam.
        let mut x = removed;
        while x > 0 && energy[(x - 1, y)].is_dirty() {
            energy[(x - 1, y)] = Score::Scored(sobel_at(luminance, x - 1, y));
            rescored += 1;
            x -= 1;
        }
    }

    trace!("re-scored {} cells across {} rows", rescored, seam.len());
    rescored
}
