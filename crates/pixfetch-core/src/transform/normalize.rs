//! Z-score re-normalization of 8-bit color samples.
//!
//! Samples are mapped to `[0, 1]`, standardized with the image's own mean and
//! standard deviation, squeezed back with `x * 0.5 + 0.5`, clamped to `[0, 1]`
//! and rounded to the nearest `u8`. Only the first three channels (R, G, B)
//! take part; an alpha channel is left as is.

use image::{ImageBuffer, Pixel};

use crate::config::NormalizationMode;

/// Channels that take part in normalization.
const COLOR_CHANNELS: usize = 3;

/// Mean and standard deviation of one sample population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationStats {
    pub mean: f64,
    /// Never zero: a flat population reports 1 so the z-score stays finite.
    pub stddev: f64,
}

impl NormalizationStats {
    /// Derives stats from running sums over `count` samples in `[0, 1]`.
    pub fn from_sums(sum: f64, sum_squares: f64, count: u64) -> Self {
        if count == 0 {
            return Self {
                mean: 0.0,
                stddev: 1.0,
            };
        }
        let n = count as f64;
        let mean = sum / n;
        let variance = sum_squares / n - mean * mean;
        let stddev = variance.max(0.0).sqrt();
        Self {
            mean,
            stddev: if stddev == 0.0 { 1.0 } else { stddev },
        }
    }

    /// Normalizes one 8-bit sample.
    pub fn apply(&self, sample: u8) -> u8 {
        let v = sample as f64 / 255.0;
        let z = (v - self.mean) / self.stddev;
        ((z * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    sum_squares: f64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, sample: u8) {
        let v = sample as f64 / 255.0;
        self.sum += v;
        self.sum_squares += v * v;
        self.count += 1;
    }

    fn merge(self, other: Accumulator) -> Accumulator {
        Accumulator {
            sum: self.sum + other.sum,
            sum_squares: self.sum_squares + other.sum_squares,
            count: self.count + other.count,
        }
    }

    fn stats(&self) -> NormalizationStats {
        NormalizationStats::from_sums(self.sum, self.sum_squares, self.count)
    }
}

/// First pass: per-channel accumulators for R, G and B.
fn accumulate<P>(img: &ImageBuffer<P, Vec<u8>>) -> [Accumulator; COLOR_CHANNELS]
where
    P: Pixel<Subpixel = u8>,
{
    let mut acc = [Accumulator::default(); COLOR_CHANNELS];
    for pixel in img.pixels() {
        for (a, &sample) in acc.iter_mut().zip(pixel.channels()) {
            a.add(sample);
        }
    }
    acc
}

/// Statistics per color channel, in R, G, B order, for the given mode.
/// In pooled mode all three entries are the same pooled statistics.
pub fn channel_stats<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    mode: NormalizationMode,
) -> [NormalizationStats; COLOR_CHANNELS]
where
    P: Pixel<Subpixel = u8>,
{
    let acc = accumulate(img);
    match mode {
        NormalizationMode::Pooled => {
            let pooled = acc[0].merge(acc[1]).merge(acc[2]).stats();
            [pooled; COLOR_CHANNELS]
        }
        NormalizationMode::PerChannel => [acc[0].stats(), acc[1].stats(), acc[2].stats()],
    }
}

/// Normalizes `img` in place. Requires at least three channels per pixel
/// (RGB or RGBA); anything after the third channel passes through unchanged.
pub fn normalize<P>(img: &mut ImageBuffer<P, Vec<u8>>, mode: NormalizationMode)
where
    P: Pixel<Subpixel = u8>,
{
    debug_assert!(P::CHANNEL_COUNT as usize >= COLOR_CHANNELS);
    let stats = channel_stats(img, mode);
    for pixel in img.pixels_mut() {
        for (sample, s) in pixel.channels_mut().iter_mut().zip(stats.iter()) {
            *sample = s.apply(*sample);
        }
    }
}
