/// The single "unknown / not applicable" marker.
/// Every transform that cannot produce a real value writes this sentinel,
/// so narrow integer columns never need a separate missing-value encoding.
pub const UNKNOWN: i64 = -1;

/// Absolute tolerance used to recognize the sentinel in decimal fields.
/// A raw length within this distance of exactly `-1` is the sentinel
/// and must not be scaled.
pub const SENTINEL_TOLERANCE: f64 = 1e-4;

/// Width of one time-of-day bucket, in minutes.
pub const TIME_BUCKET_MINUTES: i64 = 12;

/// Default seed for every train/test split.
pub const DEFAULT_SEED: u64 = 42;

/// Default fraction of samples held out for testing.
pub const DEFAULT_TEST_RATIO: f64 = 0.3;
