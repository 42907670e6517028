// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given a luminance field, calculate the energy of every cell: the
//! squared magnitude of the Sobel gradient, with everything outside
//! the field counting as zero.  The square root is monotonic and
//! changes no seam choice, so it is only taken when the
//! `square_root` feature asks for it.
//!
//! The energy of a cell depends only on its 3x3 neighbourhood, and
//! [`sobel_at`] computes exactly one cell.  That is what lets the
//! re-scorer patch the field after a seam is removed instead of
//! rebuilding it.

use crate::cq;
use crate::plane::{Plane, ScalarField};
use itertools::iproduct;

const GX: [[f32; 3]; 3] = [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]];

const GY: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

/// One cell of the energy field.  After a seam is removed, the cells
/// whose neighbourhood it passed through are `Dirty` until the
/// re-scorer gets to them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Score {
    Scored(f32),
    Dirty,
}

impl Score {
    /// The energy of a scored cell.  Dirty cells read as infinitely
    /// expensive, though a consistent field never contains any.
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            Score::Scored(energy) => energy,
            Score::Dirty => f32::INFINITY,
        }
    }

    pub fn is_dirty(self) -> bool {
        self == Score::Dirty
    }
}

/// The energy field.
pub type EnergyField = Plane<Score>;

/// The energy of the single cell at `(cx, cy)`.
pub fn sobel_at(luminance: &ScalarField, cx: u32, cy: u32) -> f32 {
    let (width, height) = (luminance.width() as i64, luminance.height() as i64);
    let mut sx = 0.0;
    let mut sy = 0.0;
    for dy in -1..=1i64 {
        for dx in -1..=1i64 {
            let (x, y) = (cx as i64 + dx, cy as i64 + dy);
            let inside = 0 <= x && x < width && 0 <= y && y < height;
            let c = cq!(inside, luminance[(x as u32, y as u32)], 0.0);
            let (ky, kx) = ((dy + 1) as usize, (dx + 1) as usize);
            sx += c * GX[ky][kx];
            sy += c * GY[ky][kx];
        }
    }
    magnitude(sx * sx + sy * sy)
}

#[cfg(not(feature = "square_root"))]
#[inline]
fn magnitude(squared: f32) -> f32 {
    squared
}

#[cfg(feature = "square_root")]
#[inline]
fn magnitude(squared: f32) -> f32 {
    squared.sqrt()
}

/// Score every live cell of `energy` from `luminance`.  Both must have
/// the same logical dimensions.
pub fn compute_energy(luminance: &ScalarField, energy: &mut EnergyField) {
    assert_eq!(luminance.width(), energy.width());
    assert_eq!(luminance.height(), energy.height());
    for (y, x) in iproduct!(0..luminance.height(), 0..luminance.width()) {
        energy[(x, y)] = Score::Scored(sobel_at(luminance, x, y));
    }
}

/// Mark every cell whose 3x3 neighbourhood contains a pixel of
/// `seam` as dirty.  Must run before the seam is removed.
pub fn mark_dirty(energy: &mut EnergyField, seam: &[u32]) {
    let (width, height) = (energy.width() as i64, energy.height() as i64);
    for (y, &sx) in seam.iter().enumerate() {
        for (dy, dx) in iproduct!(-1..=1i64, -1..=1i64) {
            let (x, y) = (sx as i64 + dx, y as i64 + dy);
            if 0 <= x && x < width && 0 <= y && y < height {
                energy[(x as u32, y as u32)] = Score::Dirty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A vertical step: dark on the left, bright on the right.
    fn step_field() -> ScalarField {
        ScalarField::from_vec(
            4,
            3,
            vec![
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0,
            ],
        )
        .unwrap()
    }

    fn scored(luminance: &ScalarField) -> EnergyField {
        let mut energy = EnergyField::shaped_like(luminance, Score::Dirty).unwrap();
        compute_energy(luminance, &mut energy);
        energy
    }

    #[test]
    fn flat_fields_have_no_energy_inside() {
        let luminance = ScalarField::filled(5, 5, 0.5).unwrap();
        let energy = scored(&luminance);
        assert_eq!(energy[(2, 2)], Score::Scored(0.0));
        // Zero padding makes the border light up.
        assert!(energy[(0, 0)].value() > 0.0);
    }

    #[test]
    fn vertical_edges_score_on_both_sides() {
        let energy = scored(&step_field());
        // Middle row, either side of the step: Gx = -4, Gy = 0.
        assert_eq!(energy[(1, 1)].value(), magnitude(16.0));
        assert_eq!(energy[(2, 1)].value(), magnitude(16.0));
        assert_eq!(energy[(0, 1)].value(), 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let luminance = step_field();
        assert_eq!(scored(&luminance), scored(&luminance));
    }

    #[test]
    fn single_cells_match_the_whole_field() {
        let luminance = step_field();
        let energy = scored(&luminance);
        for (y, x) in iproduct!(0..3, 0..4) {
            assert_eq!(energy[(x, y)], Score::Scored(sobel_at(&luminance, x, y)));
        }
    }

    #[test]
    fn marking_covers_the_neighbourhood_of_the_seam() {
        let mut energy = scored(&step_field());
        mark_dirty(&mut energy, &[0, 1, 2]);
        let dirty: Vec<Vec<bool>> = energy
            .rows()
            .map(|row| row.iter().map(|s| s.is_dirty()).collect())
            .collect();
        assert_eq!(
            dirty,
            vec![
                vec![true, true, true, false],
                vec![true, true, true, true],
                vec![true, true, true, true],
            ]
        );
    }
}
