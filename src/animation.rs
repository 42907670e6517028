// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Watching the carver work
//!
//! The carver shows every seam to a [`FrameSink`] just before cutting
//! it out, and shows the finished image once at the end.  Sinks only
//! ever see shared references, so they cannot disturb the carve.
//!
//! [`GifRecorder`] turns that into an animated GIF at the original
//! canvas size: the image narrows from the right, the uncovered area
//! is background, and the seam about to go is drawn in a highlight
//! color.

use crate::error::{CarveError, Result};
use crate::palette::{Palette, BACKGROUND_INDEX, RESERVED_ENTRIES, SEAM_INDEX};
use crate::plane::PixelBuffer;
use gif::{Encoder, Frame, Repeat};
use log::debug;
use std::convert::TryFrom;
use std::io::{self, Write};

/// Something that wants to see each seam before it is removed.
pub trait FrameSink {
    /// Called once per iteration with the image as it stands and the
    /// seam about to be removed from it.
    fn frame(&mut self, pixels: &PixelBuffer, seam: &[u32]) -> Result<()>;

    /// Called once after the last seam is gone.
    fn finish(&mut self, _pixels: &PixelBuffer) -> Result<()> {
        Ok(())
    }
}

/// The sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFrames;

impl FrameSink for NoFrames {
    fn frame(&mut self, _pixels: &PixelBuffer, _seam: &[u32]) -> Result<()> {
        Ok(())
    }
}

/// Configuration options for the seam animation.
#[derive(Clone, Debug)]
pub struct AnimationOptions {
    /// Total palette entries, the two reserved ones included.  Rounded
    /// up to a power of two between 4 and 256.
    pub palette_size: usize,

    /// Rounds of k-means run when building the palette.
    pub kmeans_iterations: usize,

    /// How many pixels are sampled to build the palette.
    pub sample_count: usize,

    /// Delay between frames, in hundredths of a second.
    pub frame_delay: u16,

    /// The color the seam is drawn in.
    pub seam_color: [u8; 3],
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            palette_size: 64,
            kmeans_iterations: 8,
            sample_count: 4096,
            frame_delay: 2,
            seam_color: [255, 0, 0],
        }
    }
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_palette_size(mut self, size: usize) -> Self {
        self.palette_size = size;
        self
    }

    pub fn set_kmeans_iterations(mut self, iterations: usize) -> Self {
        self.kmeans_iterations = iterations;
        self
    }

    pub fn set_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    pub fn set_frame_delay(mut self, delay: u16) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn set_seam_color(mut self, color: [u8; 3]) -> Self {
        self.seam_color = color;
        self
    }

    fn gif_palette_size(&self) -> usize {
        self.palette_size
            .max(RESERVED_ENTRIES + 1)
            .min(256)
            .next_power_of_two()
    }
}

/// Records one GIF frame per seam.  The palette is built from the
/// first image the recorder sees and shared by every frame.
pub struct GifRecorder<W: Write> {
    writer: Option<W>,
    encoder: Option<Encoder<W>>,
    palette: Option<Palette>,
    width: u16,
    height: u16,
    options: AnimationOptions,
    indices: Vec<u8>,
    frames: usize,
}

impl<W: Write> GifRecorder<W> {
    /// Prepare to record an image of `width` by `height` pixels, the
    /// size it has before any seam is removed.
    pub fn new(writer: W, width: u32, height: u32, options: AnimationOptions) -> Result<Self> {
        let too_large = || CarveError::FrameTooLarge { width, height };
        let gif_width = u16::try_from(width).map_err(|_| too_large())?;
        let gif_height = u16::try_from(height).map_err(|_| too_large())?;
        Ok(GifRecorder {
            writer: Some(writer),
            encoder: None,
            palette: None,
            width: gif_width,
            height: gif_height,
            options,
            indices: vec![BACKGROUND_INDEX; width as usize * height as usize],
            frames: 0,
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the GIF trailer and hand back the writer.  Also happens,
    /// with errors ignored, when the recorder is dropped.
    pub fn into_inner(mut self) -> Result<Option<W>> {
        match self.encoder.take() {
            Some(encoder) => Ok(Some(encoder.into_inner()?)),
            None => Ok(self.writer.take()),
        }
    }

    // The palette comes from the first image seen, so the encoder
    // cannot be opened any earlier.
    fn start(&mut self, pixels: &PixelBuffer) -> Result<()> {
        if self.encoder.is_none() {
            let options = &self.options;
            let palette = Palette::build(
                pixels,
                options.gif_palette_size(),
                options.kmeans_iterations,
                options.sample_count,
                options.seam_color,
            );
            let writer = self.writer.take().ok_or_else(|| {
                CarveError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "animation writer already released",
                ))
            })?;
            let mut encoder = Encoder::new(writer, self.width, self.height, &palette.to_rgb_bytes())?;
            encoder.set_repeat(Repeat::Infinite)?;
            debug!(
                "recording a {}x{} animation with {} palette entries",
                self.width,
                self.height,
                options.gif_palette_size()
            );
            self.palette = Some(palette);
            self.encoder = Some(encoder);
        }
        Ok(())
    }

    fn record(&mut self, pixels: &PixelBuffer, seam: Option<&[u32]>) -> Result<()> {
        if pixels.width() > u32::from(self.width) || pixels.height() != u32::from(self.height) {
            return Err(CarveError::FrameTooLarge {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        self.start(pixels)?;
        let canvas = self.width as usize;
        if let Some(palette) = self.palette.as_mut() {
            for (y, row) in pixels.rows().enumerate() {
                let line = &mut self.indices[y * canvas..(y + 1) * canvas];
                for (index, pixel) in line.iter_mut().zip(row) {
                    let [r, g, b, _] = pixel.0;
                    *index = palette.index_of([r, g, b]);
                }
                for index in line[row.len()..].iter_mut() {
                    *index = BACKGROUND_INDEX;
                }
            }
        }
        if let Some(seam) = seam {
            let live = pixels.width();
            for (y, &x) in seam.iter().enumerate().take(self.height as usize) {
                if x < live {
                    self.indices[y * canvas + x as usize] = SEAM_INDEX;
                }
            }
        }

        let mut frame = Frame::from_indexed_pixels(self.width, self.height, &self.indices[..], None);
        frame.delay = self.options.frame_delay;
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.write_frame(&frame)?;
        }
        self.frames += 1;
        Ok(())
    }
}

impl<W: Write> FrameSink for GifRecorder<W> {
    fn frame(&mut self, pixels: &PixelBuffer, seam: &[u32]) -> Result<()> {
        self.record(pixels, Some(seam))
    }

    fn finish(&mut self, pixels: &PixelBuffer) -> Result<()> {
        self.record(pixels, None)
    }
}
