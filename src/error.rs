use thiserror::Error;

/// Error types for queue construction and operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Requested capacity was zero (or negative before the unsigned cast).
    #[error("capacity must be positive")]
    NonPositiveCapacity,
    /// Configured cache line size was not a power of two.
    #[error("cache line size {size} is not a power of two")]
    NonPowerOfTwoCacheLine {
        /// The offending size, in bytes.
        size: usize,
    },
    /// `offer` was called with no element.
    #[error("offer does not accept a null element")]
    NullElement,
    /// The operation is intentionally not supported.
    #[error("operation is not supported")]
    Unsupported,
    /// `Queue::consumer` was called more than once on the same queue.
    #[error("a consumer handle has already been taken for this queue")]
    ConsumerAlreadyTaken,
}
