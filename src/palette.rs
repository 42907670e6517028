// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Palette quantization for the seam animation
//!
//! GIF frames index into a palette of at most 256 colors.  The first
//! two entries are reserved, one for the background uncovered as the
//! image narrows and one for highlighting the seam; the rest are
//! k-means centroids of colors sampled from the image.  Everything
//! here is deterministic: samples are evenly strided, the initial
//! centroids are evenly spaced through the samples, and the number of
//! iterations is fixed.

use crate::plane::PixelBuffer;
use std::collections::HashMap;

pub const BACKGROUND_INDEX: u8 = 0;
pub const SEAM_INDEX: u8 = 1;
pub const RESERVED_ENTRIES: usize = 2;

pub type Color = [f32; 3];

/// Up to `count` colors taken at even intervals from the live pixels.
pub fn sample_colors(pixels: &PixelBuffer, count: usize) -> Vec<Color> {
    let width = pixels.width() as usize;
    let total = width * pixels.height() as usize;
    let count = count.min(total);
    (0..count)
        .map(|i| {
            let index = i * total / count;
            let (x, y) = ((index % width) as u32, (index / width) as u32);
            let [r, g, b, _] = pixels[(x, y)].0;
            [f32::from(r), f32::from(g), f32::from(b)]
        })
        .collect()
}

fn to_color(rgb: &[u8; 3]) -> Color {
    [f32::from(rgb[0]), f32::from(rgb[1]), f32::from(rgb[2])]
}

fn distance(a: &Color, b: &Color) -> f32 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}

/// The index of the centroid closest to `color`; the first one wins
/// a tie.
pub fn nearest(color: &Color, centroids: &[Color]) -> usize {
    (1..centroids.len()).fold(0, |best, i| {
        if distance(color, &centroids[i]) < distance(color, &centroids[best]) {
            i
        } else {
            best
        }
    })
}

/// Cluster `samples` into at most `k` colors with `iterations` rounds
/// of Lloyd's algorithm.  A centroid that loses all its samples stays
/// where it was.
pub fn kmeans(samples: &[Color], k: usize, iterations: usize) -> Vec<Color> {
    let k = k.min(samples.len());
    if k == 0 {
        return vec![];
    }
    let mut centroids: Vec<Color> = (0..k).map(|i| samples[i * samples.len() / k]).collect();
    let mut sums = vec![[0.0f32; 3]; k];
    let mut counts = vec![0usize; k];

    for _ in 0..iterations {
        sums.iter_mut().for_each(|s| *s = [0.0; 3]);
        counts.iter_mut().for_each(|c| *c = 0);
        for sample in samples {
            let c = nearest(sample, &centroids);
            counts[c] += 1;
            for (sum, channel) in sums[c].iter_mut().zip(sample) {
                *sum += channel;
            }
        }
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                *centroid = [
                    sum[0] / count as f32,
                    sum[1] / count as f32,
                    sum[2] / count as f32,
                ];
            }
        }
    }
    centroids
}

/// A fixed palette with a memo of the colors already mapped onto it.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<[u8; 3]>,
    clustered: Vec<Color>,
    size: usize,
    cache: HashMap<[u8; 3], u8>,
}

impl Palette {
    /// Build a palette of `size` entries (at most 256, at least three)
    /// from the colors of `pixels`.
    pub fn build(
        pixels: &PixelBuffer,
        size: usize,
        iterations: usize,
        sample_count: usize,
        seam_color: [u8; 3],
    ) -> Self {
        debug_assert!(size > RESERVED_ENTRIES && size <= 256);
        let samples = sample_colors(pixels, sample_count);
        let centroids = kmeans(&samples, size - RESERVED_ENTRIES, iterations);
        let mut entries = vec![[0, 0, 0], seam_color];
        entries.extend(centroids.iter().map(|c| {
            let channel = |v: f32| v.round().max(0.0).min(255.0) as u8;
            [channel(c[0]), channel(c[1]), channel(c[2])]
        }));
        // Match against the colors actually written to the file.
        let clustered = entries[RESERVED_ENTRIES..].iter().map(to_color).collect();
        Palette {
            entries,
            clustered,
            size,
            cache: HashMap::new(),
        }
    }

    /// The palette index of the clustered color closest to `rgb`.
    pub fn index_of(&mut self, rgb: [u8; 3]) -> u8 {
        if let Some(&index) = self.cache.get(&rgb) {
            return index;
        }
        let index = if self.clustered.is_empty() {
            BACKGROUND_INDEX
        } else {
            (nearest(&to_color(&rgb), &self.clustered) + RESERVED_ENTRIES) as u8
        };
        self.cache.insert(rgb, index);
        index
    }

    pub fn entry(&self, index: u8) -> Option<[u8; 3]> {
        self.entries.get(index as usize).copied()
    }

    /// Flattened RGB triples, padded with black to the full size.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.entries.iter().flat_map(|e| e.iter().copied()).collect();
        bytes.resize(self.size * 3, 0);
        bytes
    }
}
