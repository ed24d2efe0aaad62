//! Outlier-robust statistics helpers.
//!
//! Conventions: quantiles use linear interpolation between order
//! statistics; `mean`/`std` are population statistics over exactly the
//! values given (callers filter non-finite values first); an empty
//! input yields NaN rather than a panic.

/// Arithmetic mean. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. NaN for empty input.
pub fn std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Linear-interpolation quantile, `q` in [0, 1]. NaN for empty input.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    if low == high {
        return sorted[low];
    }
    let fraction = position - low as f64;
    sorted[low] + (sorted[high] - sorted[low]) * fraction
}

/// Median.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Interquartile range.
pub fn iqr(values: &[f64]) -> f64 {
    quantile(values, 0.75) - quantile(values, 0.25)
}

/// Iteratively trim outliers from a group of observations.
///
/// Each pass computes the median and IQR of the finite subset, finds the
/// single point most distant from the median, and removes it if that
/// distance exceeds 2 x IQR. Removing the worst point can shrink the IQR
/// enough to reclassify the next-worst, hence the iteration; a
/// single-pass filter would under-trim.
///
/// Non-finite values never enter the median/IQR computation, but remain
/// candidates for removal: an infinity has infinite distance and is
/// removed on the first pass, while NaN (whose distance is NaN) never
/// compares greatest and is never selected. Trimming needs at least two
/// finite points and stops once fewer remain.
pub fn trim_outliers(values: &[f64]) -> Vec<f64> {
    let mut values = values.to_vec();
    loop {
        let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.len() < 2 {
            return values;
        }
        let center = median(&finite);
        let spread = iqr(&finite);
        let mut worst: Option<(usize, f64)> = None;
        for (index, x) in values.iter().enumerate() {
            let distance = (x - center).abs();
            if distance.is_nan() {
                continue;
            }
            if worst.is_none_or(|(_, d)| distance > d) {
                worst = Some((index, distance));
            }
        }
        match worst {
            Some((index, distance)) if distance > 2.0 * spread => {
                values.remove(index);
            }
            _ => return values,
        }
    }
}
