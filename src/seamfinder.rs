// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam extraction
//!
//! Walk the cumulative cost field from the bottom up.  The seam ends
//! at the cheapest cell of the last row, and every row above
//! continues from whichever of the three cells over the previous
//! choice is cheapest.  Ties always resolve the same way: comparisons
//! are strict, so the first candidate seen wins, and the candidates
//! are seen left to right.  On a flat image that means the seam hugs
//! column zero.

use crate::plane::ScalarField;

/// One column index per row, top to bottom.
pub type Seam = Vec<u32>;

// The first cell of `row` that nothing after it undercuts.
fn cheapest_column(row: &[f32]) -> usize {
    (1..row.len()).fold(0, |best, x| if row[x] < row[best] { x } else { best })
}

/// Trace the cheapest seam through `cost`.  The field must have at
/// least one column.
pub fn extract_seam(cost: &ScalarField) -> Seam {
    let (width, height) = (cost.width(), cost.height());
    assert!(width > 0, "cannot find a seam in an empty field");
    if height == 0 {
        return Seam::new();
    }

    let mut seam = vec![0; height as usize];
    let mut seam_col = cheapest_column(cost.row(height - 1)) as u32;
    seam[height as usize - 1] = seam_col;

    // Working backwards, stay put unless a neighbour is strictly
    // cheaper; left is considered before right.
    for y in (0..height - 1).rev() {
        let row = cost.row(y);
        let mut best = seam_col;
        if seam_col > 0 && row[seam_col as usize - 1] < row[best as usize] {
            best = seam_col - 1;
        }
        if seam_col + 1 < width && row[seam_col as usize + 1] < row[best as usize] {
            best = seam_col + 1;
        }
        seam_col = best;
        seam[y as usize] = seam_col;
    }
    seam
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::cumulative_cost;
    use crate::energy::{EnergyField, Score};
    use crate::plane::Plane;

    const ENERGY_DATA: [f32; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0, 9.0, 1.0, 9.0, 8.0, 9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 9.0, 9.0, 9.0,
        0.0, 9.0,
    ];

    fn cost_field(width: u32, height: u32, energies: &[f32]) -> ScalarField {
        let energy: EnergyField =
            Plane::from_vec(width, height, energies.iter().map(|&e| Score::Scored(e)).collect())
                .unwrap();
        let mut cost = ScalarField::shaped_like(&energy, 0.0).unwrap();
        cumulative_cost(&energy, &mut cost);
        cost
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let cost = cost_field(5, 4, &ENERGY_DATA);
        assert_eq!(extract_seam(&cost), vec![2, 3, 4, 3]);
    }

    #[test]
    fn ties_go_to_the_leftmost_column() {
        let cost = ScalarField::from_vec(4, 1, vec![3.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(extract_seam(&cost), vec![1]);

        let flat = cost_field(4, 3, &[0.0; 12]);
        assert_eq!(extract_seam(&flat), vec![0, 0, 0]);
    }

    #[test]
    fn upward_ties_stay_in_place_then_prefer_left() {
        let cost = ScalarField::from_vec(
            3,
            3,
            vec![
                0.0, 0.0, 0.0, // tie with the right: stay
                0.0, 5.0, 0.0, // left and right tie: left
                9.0, 1.0, 9.0,
            ],
        )
        .unwrap();
        assert_eq!(extract_seam(&cost), vec![0, 0, 1]);
    }

    #[test]
    fn seams_are_connected() {
        // Pseudo-random energies from a small linear congruential walk.
        let mut state = 17u32;
        let energies: Vec<f32> = (0..9 * 7)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((state >> 16) % 100) as f32
            })
            .collect();
        let seam = extract_seam(&cost_field(9, 7, &energies));
        assert_eq!(seam.len(), 7);
        assert!(seam.iter().all(|&x| x < 9));
        assert!(seam.windows(2).all(|w| (w[0] as i64 - w[1] as i64).abs() <= 1));
    }

    #[test]
    fn a_single_column_is_its_own_seam() {
        let cost = cost_field(1, 4, &[5.0, 1.0, 2.0, 0.0]);
        assert_eq!(extract_seam(&cost), vec![0, 0, 0, 0]);
    }
}
