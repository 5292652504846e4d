use itertools::{Itertools, MinMaxResult};

/// Median of the values
///
/// For the even amount of values the two middle values are averaged. The median of the empty
/// slice is defined as `0.0`, callers must check the emptiness themselves when zero is a valid value.
///
pub fn median(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    let sorted = vals
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect::<Vec<_>>();
    let size = sorted.len();
    if size % 2 == 0 {
        (sorted[size / 2 - 1] + sorted[size / 2]) / 2.0
    } else {
        sorted[size / 2]
    }
}

/// Arithmetic mean of the values, `0.0` for the empty slice
///
pub fn mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return 0.0;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

/// Mean and (population) standard deviation of a sample
///
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalDistribution {
    pub mean: f64,
    pub stddev: f64,
}

impl NormalDistribution {
    pub fn from_samples(vals: &[f64]) -> Self {
        if vals.is_empty() {
            return Self::default();
        }
        let mean = mean(vals);
        let sq_sum = vals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        Self {
            mean,
            stddev: (sq_sum / vals.len() as f64).sqrt(),
        }
    }

    /// How many standard deviations the value is away from the mean
    ///
    pub fn deviation(&self, val: f64) -> f64 {
        (val - self.mean).abs() / self.stddev
    }
}

/// Minimum and maximum of the values, `None` for the empty slice
///
pub fn min_max(vals: &[f64]) -> Option<(f64, f64)> {
    match vals.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::stats::{mean, median, min_max, NormalDistribution};
    use crate::EPS_F64;

    #[test]
    fn median_values() {
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn mean_values() {
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn normal_distribution() {
        let d = NormalDistribution::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((d.mean - 5.0).abs() < EPS_F64);
        assert!((d.stddev - 2.0).abs() < EPS_F64);
        assert!((d.deviation(9.0) - 2.0).abs() < EPS_F64);

        let d = NormalDistribution::from_samples(&[]);
        assert_eq!(d, NormalDistribution::default());
    }

    #[test]
    fn min_max_values() {
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[3.0]), Some((3.0, 3.0)));
        assert_eq!(min_max(&[3.0, -1.0, 8.0]), Some((-1.0, 8.0)));
    }
}
