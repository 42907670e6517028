// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Perceived brightness
//!
//! The energy kernels work on a single channel, so the first step is
//! collapsing each pixel to its luminance using the ITU-R BT.709
//! weights.  Alpha is ignored.

use crate::plane::{PixelBuffer, ScalarField};
use image::Rgba;
use itertools::iproduct;

const RED_WEIGHT: f32 = 0.2126;
const GREEN_WEIGHT: f32 = 0.7152;
const BLUE_WEIGHT: f32 = 0.0722;

/// The luminance of one pixel, in `[0, 1]`.
#[inline]
pub fn rgb_to_luminance(pixel: Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    let (r, g, b) = (
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
    RED_WEIGHT * r + GREEN_WEIGHT * g + BLUE_WEIGHT * b
}

/// Fill `luminance` from `pixels`.  Both must have the same logical
/// dimensions.
pub fn compute_luminance(pixels: &PixelBuffer, luminance: &mut ScalarField) {
    assert_eq!(pixels.width(), luminance.width());
    assert_eq!(pixels.height(), luminance.height());
    for (y, x) in iproduct!(0..pixels.height(), 0..pixels.width()) {
        luminance[(x, y)] = rgb_to_luminance(pixels[(x, y)]);
    }
}
