// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image boundary
//!
//! Reading and writing files is the `image` crate's business.  This
//! module only converts between its buffers and a [`PixelBuffer`]:
//! any pixel type goes in as 8-bit RGBA, and a carved buffer comes out
//! with its stale columns dropped.

use crate::error::{CarveError, Result};
use crate::plane::PixelBuffer;
use image::{GenericImageView, Pixel, Primitive, Rgba, RgbaImage};
use num_traits::NumCast;
use std::path::Path;

// Rescale one channel of any depth to 8 bits.
#[inline]
fn to_u8<S: Primitive>(channel: S) -> u8 {
    let max: f32 = NumCast::from(S::DEFAULT_MAX_VALUE).unwrap_or(255.0);
    let value: f32 = NumCast::from(channel).unwrap_or(0.0);
    (value / max * 255.0).round().max(0.0).min(255.0) as u8
}

/// Copy any image into a freshly allocated [`PixelBuffer`].
pub fn from_view<I, P, S>(image: &I) -> Result<PixelBuffer>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut pixels = PixelBuffer::filled(width, height, Rgba([0, 0, 0, 0]))?;
    for (x, y, pixel) in image.pixels() {
        let rgba = pixel.to_rgba();
        let [r, g, b, a] = rgba.0;
        pixels[(x, y)] = Rgba([to_u8(r), to_u8(g), to_u8(b), to_u8(a)]);
    }
    Ok(pixels)
}

/// The live region of `pixels` as a tightly packed image.
pub fn to_image(pixels: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_fn(pixels.width(), pixels.height(), |x, y| pixels[(x, y)])
}

/// Decode the file at `path`.
pub fn load<Q: AsRef<Path>>(path: Q) -> Result<PixelBuffer> {
    let image = image::open(path)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(CarveError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
            seams: 0,
        });
    }
    from_view(&image)
}

/// Encode `pixels` to `path`; the format follows the extension.
pub fn save<Q: AsRef<Path>>(pixels: &PixelBuffer, path: Q) -> Result<()> {
    to_image(pixels).save(path)?;
    Ok(())
}
