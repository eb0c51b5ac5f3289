//! Fixed-binning integer histogram, the in-memory form of the weight summary.

use serde::{Deserialize, Serialize};

/// A 1D histogram with uniform binning and integer contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// Lower edge of first bin.
    pub x_min: f64,
    /// Upper edge of last bin.
    pub x_max: f64,
    /// Bin contents (excluding under/overflow).
    pub bin_content: Vec<i64>,
    /// Content below `x_min`.
    pub underflow: i64,
    /// Content at or above `x_max`.
    pub overflow: i64,
    /// Number of fill calls.
    pub entries: u64,
}

impl Histogram {
    pub fn new(name: impl Into<String>, n_bins: usize, x_min: f64, x_max: f64) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            x_min,
            x_max,
            bin_content: vec![0; n_bins],
            underflow: 0,
            overflow: 0,
            entries: 0,
        }
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.x_max - self.x_min) / self.n_bins() as f64
    }

    /// Index of the bin containing `x`, or `None` for under/overflow and NaN.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.x_min && x < self.x_max) {
            return None;
        }
        let bin = ((x - self.x_min) / self.bin_width()) as usize;
        Some(bin.min(self.n_bins() - 1))
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.x_min + (bin as f64 + 0.5) * self.bin_width()
    }

    /// Adds `weight` to the bin containing `x`.
    pub fn fill(&mut self, x: f64, weight: i64) {
        self.entries += 1;
        match self.find_bin(x) {
            Some(bin) => self.bin_content[bin] += weight,
            None if x < self.x_min => self.underflow += weight,
            None => self.overflow += weight,
        }
    }

    /// Content of the bin containing `x`.
    pub fn content_at(&self, x: f64) -> Option<i64> {
        self.find_bin(x).map(|bin| self.bin_content[bin])
    }
}
