//! Distribution-fit score.
//!
//! Fits a Gaussian to the pooled drawn numbers (global mean and variance;
//! skew and kurtosis are computed for the diagnostics they give on how far
//! the pool is from normal, and damp the density term when the fit is poor)
//! and adds a frequency-deviation term boosting underrepresented numbers.

use super::{appearance_count, Indicator};
use crate::domain::{DrawRecord, ScoreMap, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct DistributionFit;

/// Pooled moments of all drawn numbers in the window.
#[derive(Debug, Clone, Copy)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub skew: f64,
    pub kurtosis: f64,
}

/// Mean, variance, skew, and excess kurtosis of a sample.
pub fn moments(values: &[f64]) -> Option<Moments> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if variance <= f64::EPSILON {
        return Some(Moments {
            mean,
            variance,
            skew: 0.0,
            kurtosis: 0.0,
        });
    }
    let std = variance.sqrt();
    let skew = values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n;
    let kurtosis = values.iter().map(|v| ((v - mean) / std).powi(4)).sum::<f64>() / n - 3.0;
    Some(Moments {
        mean,
        variance,
        skew,
        kurtosis,
    })
}

fn gaussian_pdf(x: f64, mean: f64, variance: f64) -> f64 {
    let norm = 1.0 / (2.0 * std::f64::consts::PI * variance).sqrt();
    norm * (-(x - mean).powi(2) / (2.0 * variance)).exp()
}

impl Indicator for DistributionFit {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let pooled: Vec<f64> = history
            .iter()
            .flat_map(|d| d.numbers.iter().map(|&n| n as f64))
            .collect();
        let Some(m) = moments(&pooled) else {
            return ScoreMap::zero();
        };
        if m.variance <= f64::EPSILON {
            return ScoreMap::zero();
        }

        // Non-normality damping: large |skew| or |excess kurtosis| means the
        // Gaussian density term is a worse model, so trust it less.
        let fit_quality = 1.0 / (1.0 + m.skew.abs() + m.kurtosis.abs());

        let expected = pooled.len() as f64 / MAX_NUMBER as f64;
        ScoreMap::from_fn(|n| {
            let density = gaussian_pdf(n as f64, m.mean, m.variance) * 1000.0 * fit_quality;
            let count = appearance_count(history, n) as f64;
            let deviation = (expected - count) / expected.max(1.0) * 10.0;
            density + deviation.max(0.0)
        })
    }
}
