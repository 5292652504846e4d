/// Image regions of interest
pub mod rect;

/// Median, mean and standard deviation of samples
pub mod stats;
