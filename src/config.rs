use crate::error::QueueError;

/// Configuration for [`Queue`](crate::Queue).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Byte size used to size the data-region padding around the live slots.
    /// Must be a power of two. Default 64.
    pub cache_line_size: usize,
    /// Spaces each logical slot `2^sparse_shift` physical slots apart to
    /// reduce false sharing, at the cost of memory. Default 0 (packed).
    pub sparse_shift: u32,
    /// Enables the atomic counter bank in [`crate::metrics`]. Default false.
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration, validating `cache_line_size`.
    pub fn new(cache_line_size: usize, sparse_shift: u32, enable_metrics: bool) -> Result<Self, QueueError> {
        if !cache_line_size.is_power_of_two() {
            return Err(QueueError::NonPowerOfTwoCacheLine { size: cache_line_size });
        }
        Ok(Self {
            cache_line_size,
            sparse_shift,
            enable_metrics,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_line_size: 64,
            sparse_shift: 0,
            enable_metrics: false,
        }
    }
}
