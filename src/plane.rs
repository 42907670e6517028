// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shrinkable two-dimensional planes
//!
//! Every buffer the carver touches (the pixels, the luminance, the
//! energy and the cumulative cost) is one of these: a row-major block
//! of cells allocated once at the image's original width, with a
//! logical width that shrinks by one every time a seam is removed.
//! The allocated row width, the stride, never changes, so carving
//! never reallocates.  Columns at or beyond the logical width are
//! stale and are never handed out.

use crate::error::{CarveError, Result};
use image::Rgba;
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of cells with a logical
/// width that may be smaller than its allocated stride.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T: Copy> {
    width: u32,
    height: u32,
    stride: u32,
    cells: Vec<T>,
}

/// The image being carved.
pub type PixelBuffer = Plane<Rgba<u8>>;

/// Luminance and cumulative cost.
pub type ScalarField = Plane<f32>;

impl<T: Copy> Plane<T> {
    /// Allocate a `width` by `height` plane with every cell set to
    /// `value`.  Allocation failure is reported rather than aborting.
    pub fn filled(width: u32, height: u32, value: T) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(CarveError::AllocationFailure { width, height })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| CarveError::AllocationFailure { width, height })?;
        cells.resize(len, value);
        Ok(Plane {
            width,
            height,
            stride: width,
            cells,
        })
    }

    /// Wrap an existing row-major vector whose stride equals its width.
    /// Returns `None` if the vector is the wrong length.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Plane {
            width,
            height,
            stride: width,
            cells,
        })
    }

    /// Allocate a plane shaped exactly like `other`, logical width and
    /// stride included.
    pub fn shaped_like<U: Copy>(other: &Plane<U>, value: T) -> Result<Self> {
        let mut plane = Self::filled(other.stride, other.height, value)?;
        plane.width = other.width;
        Ok(plane)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    // All of the index math lives here and nowhere else.
    fn get_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.stride as usize) + (x as usize)
    }

    fn row_start(&self, y: u32) -> usize {
        (y as usize) * (self.stride as usize)
    }

    /// The live cells of row `y`.
    pub fn row(&self, y: u32) -> &[T] {
        let start = self.row_start(y);
        &self.cells[start..start + self.width as usize]
    }

    /// The live cells of row `y`, mutably.
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        let start = self.row_start(y);
        let end = start + self.width as usize;
        &mut self.cells[start..end]
    }

    /// Row `y - 1` for reading and row `y` for writing, at once.
    /// Panics if `y` is zero.
    pub fn adjacent_rows_mut(&mut self, y: u32) -> (&[T], &mut [T]) {
        assert!(y > 0, "row 0 has no row above it");
        let width = self.width as usize;
        let start = self.row_start(y);
        let above_start = start - self.stride as usize;
        let (above, rest) = self.cells.split_at_mut(start);
        (&above[above_start..above_start + width], &mut rest[..width])
    }

    /// Iterate over the live rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Delete column `x` from row `y` by shifting everything to its
    /// right one place left.  The logical width is untouched; call
    /// [`Plane::shrink`] once every row has been processed.
    pub fn remove_column(&mut self, y: u32, x: u32) {
        debug_assert!(x < self.width);
        let start = self.row_start(y);
        let (x, width) = (x as usize, self.width as usize);
        self.cells
            .copy_within(start + x + 1..start + width, start + x);
    }

    /// Narrow the logical width by one column.
    pub fn shrink(&mut self) {
        debug_assert!(self.width > 0);
        self.width -= 1;
    }

    /// Remove one column per row, as given by `seam`, then shrink.
    pub fn remove_seam(&mut self, seam: &[u32]) {
        debug_assert_eq!(seam.len(), self.height as usize);
        for (y, &x) in seam.iter().enumerate() {
            self.remove_column(y as u32, x);
        }
        self.shrink();
    }

    /// Copy the live cells into a fresh vector with stride equal to
    /// the logical width.
    pub fn to_compact_vec(&self) -> Vec<T> {
        self.rows().flat_map(|row| row.iter().copied()).collect()
    }
}

impl<T: Copy> Index<(u32, u32)> for Plane<T> {
    type Output = T;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &T {
        let index = self.get_index(x, y);
        &self.cells[index]
    }
}

impl<T: Copy> IndexMut<(u32, u32)> for Plane<T> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut T {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }
}
