//! Debug assertion macros for the queue's core invariants.
//!
//! Only active in debug builds (`#[cfg(debug_assertions)]`), so there is zero
//! overhead in release builds.

/// Assert that occupancy never exceeds capacity.
///
/// **Invariant**: `0 ≤ producer_index - consumer_index ≤ capacity`
macro_rules! debug_assert_bounded_occupancy {
    ($producer_index:expr, $consumer_index:expr, $capacity:expr) => {
        debug_assert!(
            $producer_index.wrapping_sub($consumer_index) as usize <= $capacity,
            "occupancy {} exceeds capacity {}",
            $producer_index.wrapping_sub($consumer_index),
            $capacity
        )
    };
}

/// Assert that an index only increases.
///
/// **Invariant**: `new_value ≥ old_value`
macro_rules! debug_assert_index_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that the consumer never passes the producer.
///
/// **Invariant**: `consumer_index ≤ producer_index`
macro_rules! debug_assert_consumer_not_past_producer {
    ($consumer_index:expr, $producer_index:expr) => {
        debug_assert!(
            $consumer_index <= $producer_index,
            "consumer_index {} advanced past producer_index {}",
            $consumer_index,
            $producer_index
        )
    };
}

/// Assert that a slot about to be published was observed empty beforehand.
///
/// **Invariant**: a producer only stores into a slot it has exclusively
/// reserved via the `producer_index` CAS; the slot must not already hold a
/// live element.
macro_rules! debug_assert_slot_was_empty {
    ($was_null:expr) => {
        debug_assert!($was_null, "publishing into a slot that was not empty")
    };
}

pub(crate) use debug_assert_bounded_occupancy;
pub(crate) use debug_assert_consumer_not_past_producer;
pub(crate) use debug_assert_index_monotonic;
pub(crate) use debug_assert_slot_was_empty;
