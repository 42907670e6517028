// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! A [`SeamCarver`] owns the image and the three fields derived from
//! it (luminance, energy and cumulative cost), all allocated once at
//! the original width and narrowed in lockstep.  Luminance and energy
//! are computed in full exactly once, when the carver is built.
//! After that each iteration runs the cost recurrence, traces a seam,
//! shows it to the frame sink, removes it from every buffer, and
//! patches the energy field around the hole.

use crate::animation::{FrameSink, NoFrames};
use crate::codec;
use crate::cost::cumulative_cost;
use crate::energy::{compute_energy, mark_dirty, EnergyField, Score};
use crate::error::{CarveError, Result};
use crate::luminance::compute_luminance;
use crate::plane::{PixelBuffer, ScalarField};
use crate::rescore::rescore;
use crate::seamfinder::{extract_seam, Seam};
use image::{GenericImageView, Pixel, Primitive, RgbaImage};
use log::{debug, info};

/// The share of the original width kept when no seam count is given.
pub const DEFAULT_KEEP_RATIO: f64 = 2.0 / 3.0;

/// How many seams to remove so that roughly `keep` of `width` is
/// left.  At least one column always survives.
pub fn seams_for_ratio(width: u32, keep: f64) -> u32 {
    let target = (f64::from(width) * keep).round().max(1.0).min(f64::from(width));
    width - target as u32
}

fn check_request(width: u32, height: u32, seams: u32) -> Result<()> {
    if width == 0 || height == 0 || seams >= width {
        return Err(CarveError::InvalidDimensions {
            width,
            height,
            seams,
        });
    }
    Ok(())
}

/// The carving state: the image and its derived fields, always
/// consistent with one another between calls.
#[derive(Debug, Clone)]
pub struct SeamCarver {
    pixels: PixelBuffer,
    luminance: ScalarField,
    energy: EnergyField,
    cost: ScalarField,
}

impl SeamCarver {
    /// Take ownership of an image and score it.
    pub fn new(pixels: PixelBuffer) -> Result<Self> {
        check_request(pixels.width(), pixels.height(), 0)?;
        let mut luminance = ScalarField::shaped_like(&pixels, 0.0)?;
        let mut energy = EnergyField::shaped_like(&pixels, Score::Dirty)?;
        let cost = ScalarField::shaped_like(&pixels, 0.0)?;
        compute_luminance(&pixels, &mut luminance);
        compute_energy(&luminance, &mut energy);
        Ok(SeamCarver {
            pixels,
            luminance,
            energy,
            cost,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn luminance(&self) -> &ScalarField {
        &self.luminance
    }

    pub fn energy(&self) -> &EnergyField {
        &self.energy
    }

    /// The cumulative cost field as of the last [`SeamCarver::next_seam`].
    pub fn cost(&self) -> &ScalarField {
        &self.cost
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    /// Find the cheapest seam through the current image.  Nothing but
    /// the cost field changes.
    pub fn next_seam(&mut self) -> Seam {
        cumulative_cost(&self.energy, &mut self.cost);
        extract_seam(&self.cost)
    }

    /// Cut `seam` out of the image and every derived field, then
    /// re-score the energy around it.  At least one column must
    /// remain afterwards.
    ///
    /// `seam` must hold one in-bounds column per row, each within one
    /// column of the next, as [`next_seam`](Self::next_seam) returns.
    pub fn remove_seam(&mut self, seam: &[u32]) {
        assert!(self.width() > 1, "cannot remove the last column");
        assert_eq!(seam.len(), self.height() as usize);
        assert!(
            seam.iter().all(|&x| x < self.width()),
            "seam leaves the image"
        );
        assert!(
            seam.windows(2).all(|pair| pair[0].max(pair[1]) - pair[0].min(pair[1]) <= 1),
            "seam is not connected"
        );

        mark_dirty(&mut self.energy, seam);
        self.pixels.remove_seam(seam);
        self.luminance.remove_seam(seam);
        self.energy.remove_seam(seam);
        self.cost.remove_seam(seam);
        rescore(&mut self.energy, &self.luminance, seam);
    }

    /// Remove `seams` seams, showing each one to `sink` before it goes.
    pub fn carve<S: FrameSink>(&mut self, seams: u32, sink: &mut S) -> Result<()> {
        check_request(self.width(), self.height(), seams)?;
        info!(
            "carving {} seams from a {}x{} image",
            seams,
            self.width(),
            self.height()
        );

        for iteration in 0..seams {
            let seam = self.next_seam();
            let bottom = self.height() - 1;
            debug!(
                "seam {}/{}: cost {}, ending at column {}, width now {}",
                iteration + 1,
                seams,
                self.cost[(seam[bottom as usize], bottom)],
                seam[bottom as usize],
                self.width() - 1
            );
            sink.frame(&self.pixels, &seam)?;
            self.remove_seam(&seam);
        }

        sink.finish(&self.pixels)?;
        info!("carved down to {}x{}", self.width(), self.height());
        Ok(())
    }
}

/// Remove `seams` vertical seams from `image`.  Fails without doing
/// any work if the image is empty or `seams` is not smaller than its
/// width.
pub fn carve<I, P, S>(image: &I, seams: u32) -> Result<RgbaImage>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    carve_with(image, seams, &mut NoFrames)
}

/// As [`carve`], showing every seam to `sink` on its way out.
pub fn carve_with<I, P, S, F>(image: &I, seams: u32, sink: &mut F) -> Result<RgbaImage>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
    F: FrameSink,
{
    let (width, height) = image.dimensions();
    check_request(width, height, seams)?;
    let mut carver = SeamCarver::new(codec::from_view(image)?)?;
    carver.carve(seams, sink)?;
    Ok(codec::to_image(carver.pixels()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn noisy_image(width: u32, height: u32, seed: u32) -> RgbaImage {
        let mut state = seed;
        RgbaImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let [r, g, b, _] = state.to_le_bytes();
            Rgba([r, g, b, 255])
        })
    }

    // Luminance zero everywhere, every pixel distinguishable by alpha.
    fn black_image(width: u32, height: u32) -> PixelBuffer {
        let cells = (0..width * height).map(|i| Rgba([0, 0, 0, i as u8])).collect();
        PixelBuffer::from_vec(width, height, cells).unwrap()
    }

    struct Recorder {
        widths: Vec<u32>,
        seams: Vec<Seam>,
        finished: Option<u32>,
    }

    impl FrameSink for Recorder {
        fn frame(&mut self, pixels: &PixelBuffer, seam: &[u32]) -> Result<()> {
            self.widths.push(pixels.width());
            self.seams.push(seam.to_vec());
            Ok(())
        }

        fn finish(&mut self, pixels: &PixelBuffer) -> Result<()> {
            self.finished = Some(pixels.width());
            Ok(())
        }
    }

    #[test]
    fn flat_black_image_carves_from_the_left() {
        let original = black_image(4, 3);
        let mut carver = SeamCarver::new(original.clone()).unwrap();
        assert!(carver
            .energy()
            .rows()
            .all(|row| row.iter().all(|&s| s == Score::Scored(0.0))));

        let seam = carver.next_seam();
        assert!(carver.cost().rows().all(|row| row.iter().all(|&c| c == 0.0)));
        assert_eq!(seam, vec![0, 0, 0]);

        carver.remove_seam(&seam);
        assert_eq!(carver.width(), 3);
        assert_eq!(carver.height(), 3);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(carver.pixels()[(x, y)], original[(x + 1, y)]);
            }
        }
    }

    #[test]
    fn incremental_energy_always_matches_a_full_recompute() {
        let pixels = codec::from_view(&noisy_image(12, 8, 42)).unwrap();
        let mut carver = SeamCarver::new(pixels).unwrap();
        while carver.width() > 1 {
            let seam = carver.next_seam();
            carver.remove_seam(&seam);

            let mut luminance = ScalarField::shaped_like(carver.pixels(), 0.0).unwrap();
            compute_luminance(carver.pixels(), &mut luminance);
            assert_eq!(luminance.to_compact_vec(), carver.luminance().to_compact_vec());

            let mut energy = EnergyField::shaped_like(&luminance, Score::Dirty).unwrap();
            compute_energy(&luminance, &mut energy);
            assert_eq!(energy.to_compact_vec(), carver.energy().to_compact_vec());
        }
    }

    #[test]
    fn every_seam_is_connected_and_in_bounds() {
        let mut carver = SeamCarver::new(codec::from_view(&noisy_image(10, 9, 7)).unwrap()).unwrap();
        let mut recorder = Recorder {
            widths: vec![],
            seams: vec![],
            finished: None,
        };
        carver.carve(6, &mut recorder).unwrap();
        assert_eq!(recorder.widths, vec![10, 9, 8, 7, 6, 5]);
        assert_eq!(recorder.finished, Some(4));
        for (seam, &width) in recorder.seams.iter().zip(&recorder.widths) {
            assert_eq!(seam.len(), 9);
            assert!(seam.iter().all(|&x| x < width));
            assert!(seam.windows(2).all(|w| (w[0] as i64 - w[1] as i64).abs() <= 1));
        }
    }

    #[test]
    fn carving_keeps_the_height_and_drops_the_width() {
        let carved = carve(&noisy_image(15, 6, 1), 5).unwrap();
        assert_eq!(carved.dimensions(), (10, 6));
        let untouched = carve(&noisy_image(15, 6, 1), 0).unwrap();
        assert_eq!(untouched, noisy_image(15, 6, 1));
    }

    #[test]
    fn impossible_requests_are_rejected() {
        let narrow = RgbaImage::new(1, 5);
        match carve(&narrow, 1) {
            Err(CarveError::InvalidDimensions { width: 1, seams: 1, .. }) => {}
            other => panic!("expected InvalidDimensions, got {:?}", other.map(|i| i.width())),
        }
        assert_eq!(carve(&narrow, 0).unwrap().dimensions(), (1, 5));
        assert!(carve(&noisy_image(4, 4, 3), 4).is_err());
        assert!(carve(&RgbaImage::new(0, 0), 0).is_err());
    }

    #[test]
    fn a_single_column_has_a_trivial_seam() {
        let mut carver = SeamCarver::new(black_image(1, 4)).unwrap();
        assert_eq!(carver.next_seam(), vec![0; 4]);
        assert!(carver.carve(1, &mut NoFrames).is_err());
        assert_eq!(carver.width(), 1);
    }

    #[test]
    #[should_panic(expected = "seam is not connected")]
    fn disconnected_seams_are_refused() {
        let mut carver = SeamCarver::new(black_image(8, 2)).unwrap();
        carver.remove_seam(&[0, 5]);
    }

    #[test]
    #[should_panic(expected = "seam leaves the image")]
    fn out_of_bounds_seams_are_refused() {
        let mut carver = SeamCarver::new(black_image(3, 2)).unwrap();
        carver.remove_seam(&[2, 3]);
    }

    #[test]
    fn ratios_leave_at_least_one_column() {
        assert_eq!(seams_for_ratio(300, DEFAULT_KEEP_RATIO), 100);
        assert_eq!(seams_for_ratio(10, 0.5), 5);
        assert_eq!(seams_for_ratio(1, DEFAULT_KEEP_RATIO), 0);
        assert_eq!(seams_for_ratio(7, 0.0), 6);
        assert_eq!(seams_for_ratio(7, 1.0), 0);
    }
}
