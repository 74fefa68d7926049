//! Per-channel color histograms and their correlation.
//!
//! The boundary detector is a pure function over histograms so it can be
//! unit-tested on synthetic distributions without real video.

use image::RgbImage;

/// Buckets per color channel.
pub const BUCKETS_PER_CHANNEL: usize = 16;

/// Total bins across the three RGB channels.
pub const TOTAL_BINS: usize = BUCKETS_PER_CHANNEL * 3;

/// A normalized per-channel color histogram (probability distribution over
/// 48 bins: 16 per RGB channel).
#[derive(Debug, Clone, PartialEq)]
pub struct ColorHistogram {
    bins: [f64; TOTAL_BINS],
}

impl ColorHistogram {
    /// Build a histogram directly from bin counts (for tests and synthetic
    /// inputs). Counts are normalized to sum to 1 per whole histogram.
    pub fn from_counts(counts: [f64; TOTAL_BINS]) -> Self {
        let total: f64 = counts.iter().sum();
        let mut bins = counts;
        if total > 0.0 {
            for bin in bins.iter_mut() {
                *bin /= total;
            }
        }
        Self { bins }
    }

    /// Compute the histogram of an image.
    pub fn from_image(image: &RgbImage) -> Self {
        let mut counts = [0.0f64; TOTAL_BINS];
        let bucket_width = 256 / BUCKETS_PER_CHANNEL;

        for pixel in image.pixels() {
            for (channel, &value) in pixel.0.iter().enumerate() {
                let bucket = value as usize / bucket_width;
                counts[channel * BUCKETS_PER_CHANNEL + bucket] += 1.0;
            }
        }

        Self::from_counts(counts)
    }

    /// Pearson correlation coefficient between two histograms.
    ///
    /// 1.0 for identical distributions, near zero or negative for visually
    /// unrelated frames. A constant histogram (zero variance) correlates at
    /// 0.0 with anything, which keeps degenerate frames from dividing by
    /// zero.
    pub fn correlation(&self, other: &ColorHistogram) -> f64 {
        let n = TOTAL_BINS as f64;
        let mean_a: f64 = self.bins.iter().sum::<f64>() / n;
        let mean_b: f64 = other.bins.iter().sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for i in 0..TOTAL_BINS {
            let da = self.bins[i] - mean_a;
            let db = other.bins[i] - mean_b;
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }

        if var_a == 0.0 || var_b == 0.0 {
            return 0.0;
        }
        cov / (var_a * var_b).sqrt()
    }

    /// Access the normalized bins.
    pub fn bins(&self) -> &[f64; TOTAL_BINS] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_image(color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb(color))
    }

    #[test]
    fn test_identical_histograms_correlate_fully() {
        let a = ColorHistogram::from_image(&solid_image([200, 40, 90]));
        let b = ColorHistogram::from_image(&solid_image([200, 40, 90]));
        assert!((a.correlation(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_histograms_correlate_low() {
        let a = ColorHistogram::from_image(&solid_image([10, 10, 10]));
        let b = ColorHistogram::from_image(&solid_image([250, 250, 250]));
        assert!(a.correlation(&b) < 0.5);
    }

    #[test]
    fn test_normalization_sums_to_one() {
        let hist = ColorHistogram::from_image(&solid_image([0, 128, 255]));
        let sum: f64 = hist.bins().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_synthetic_counts() {
        let mut counts_a = [0.0; TOTAL_BINS];
        let mut counts_b = [0.0; TOTAL_BINS];
        for i in 0..TOTAL_BINS {
            counts_a[i] = (i % 7) as f64;
            counts_b[i] = (i % 7) as f64 * 3.0;
        }
        // Proportional distributions are perfectly correlated
        let a = ColorHistogram::from_counts(counts_a);
        let b = ColorHistogram::from_counts(counts_b);
        assert!((a.correlation(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_is_zero_correlation() {
        let flat = ColorHistogram::from_counts([1.0; TOTAL_BINS]);
        let other = ColorHistogram::from_image(&solid_image([3, 200, 77]));
        assert_eq!(flat.correlation(&other), 0.0);
    }
}
