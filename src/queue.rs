use crate::invariants::{
    debug_assert_bounded_occupancy, debug_assert_consumer_not_past_producer,
    debug_assert_index_monotonic, debug_assert_slot_was_empty,
};
use crate::{Backoff, Config, Metrics, MetricsSnapshot, QueueError};
use crossbeam_utils::CachePadded;
use std::mem::size_of;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This is a bounded MPSC (multi-producer, single-consumer) ring buffer. A
// single shared `producer_index` is contended by every producer via CAS;
// `consumer_index` is written by exactly one thread.
//
// ## Logical indices (ABA prevention)
//
// `producer_index` and `consumer_index` are unbounded u64 sequence numbers,
// not wrapped array offsets. The physical slot is `index & mask` (times the
// sparse stride). At any sane throughput, wrap-around is not a practical
// concern.
//
// ## Memory ordering protocol
//
// **Producer (`offer`):**
// 1. Acquire-load `producer_index`.
// 2. Acquire-load `consumer_index`; if the gap is `>= capacity`, return false.
// 3. CAS `producer_index` from the observed value to `value + 1`, with
//    Release on success (pairs with the consumer's Acquire below). On
//    failure, back off and retry from 1.
// 4. Having won the reservation, Release-store the element into the slot.
//    This publishes everything the producer did before this point to
//    whichever thread later Acquire-loads the same slot.
//
// **Consumer (`poll`/`peek`):**
// 1. Plain-load `consumer_index` (single writer: only the consumer).
// 2. Acquire-load the slot. A null value here does not distinguish "empty"
//    from "a producer has reserved this index but not yet published" — so:
// 3. Acquire-load `producer_index`. If it equals `consumer_index`, the queue
//    is genuinely empty. Otherwise back off and re-read the slot. `peek`
//    stops here and does not record a metrics event even when empty; `poll`
//    does.
// 4. Release-store null into the slot (frees it for reuse after wrap) and
//    Release-store `consumer_index + 1`.
//
// ## Consumer handle
//
// `poll`/`peek`/`clear` live on a separate `Consumer<T>` handle rather than
// on `Queue<T>` itself, and take `&mut self`. `peek`'s returned `&T` borrows
// the handle, so the borrow checker refuses to compile code that calls
// `poll` (which frees the slot `peek` pointed into) while that reference is
// still held — the one misuse the single-consumer assumption can't just
// assert away, since it doesn't require a second thread to trigger.
//
// =============================================================================

/// A bounded, lock-free, multi-producer / single-consumer queue.
///
/// Backed by a power-of-two circular array of slots. Any number of threads
/// may call [`offer`](Queue::offer) concurrently by sharing a `Queue<T>`
/// (typically via `Arc`). The consumer-only operations `poll`, `peek`, and
/// `clear` are not methods of `Queue` itself; call [`consumer`](Queue::consumer)
/// once to obtain a [`Consumer<T>`], which owns them.
pub struct Queue<T> {
    producer_index: CachePadded<AtomicU64>,
    consumer_index: CachePadded<AtomicU64>,
    buffer: Box<[AtomicPtr<T>]>,
    mask: u64,
    capacity: usize,
    /// Number of padding slots on each side of the live data region.
    padding: usize,
    config: Config,
    metrics: Metrics,
    consumer_taken: AtomicBool,
}

// Safety: slots are handed off between exactly one producer and the single
// consumer via the release/acquire protocol documented above.
unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Send> Sync for Queue<T> {}

impl<T> Queue<T> {
    /// Creates a new queue. `requested_capacity` is rounded up to the next
    /// power of two (capacities below 2 are rounded to 2).
    pub fn new(requested_capacity: usize, config: Config) -> Result<Self, QueueError> {
        if requested_capacity == 0 {
            return Err(QueueError::NonPositiveCapacity);
        }
        if !config.cache_line_size.is_power_of_two() {
            return Err(QueueError::NonPowerOfTwoCacheLine {
                size: config.cache_line_size,
            });
        }

        let capacity = requested_capacity.max(2).next_power_of_two();
        let mask = (capacity - 1) as u64;

        let padding = (config.cache_line_size * 2 / size_of::<AtomicPtr<T>>()).max(1);
        let live_slots = capacity << config.sparse_shift;
        let buffer_len = live_slots + 2 * padding;

        let mut buffer = Vec::with_capacity(buffer_len);
        buffer.resize_with(buffer_len, || AtomicPtr::new(ptr::null_mut()));

        Ok(Self {
            producer_index: CachePadded::new(AtomicU64::new(0)),
            consumer_index: CachePadded::new(AtomicU64::new(0)),
            buffer: buffer.into_boxed_slice(),
            mask,
            capacity,
            padding,
            config,
            metrics: Metrics::new(),
            consumer_taken: AtomicBool::new(false),
        })
    }

    #[inline]
    fn slot(&self, logical_index: u64) -> &AtomicPtr<T> {
        let physical = self.padding + (((logical_index & self.mask) as usize) << self.config.sparse_shift);
        &self.buffer[physical]
    }

    /// Returns the queue's capacity (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Loose snapshot of the current occupancy, always in `[0, capacity()]`.
    #[inline]
    pub fn size(&self) -> usize {
        let producer = self.producer_index.load(Ordering::Acquire);
        let consumer = self.consumer_index.load(Ordering::Acquire);
        producer.wrapping_sub(consumer).min(self.capacity as u64) as usize
    }

    /// Loose snapshot of emptiness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.producer_index.load(Ordering::Acquire) == self.consumer_index.load(Ordering::Acquire)
    }

    /// An immutable snapshot of the counter bank; all zero if metrics are
    /// disabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    /// Iteration is intentionally not supported.
    pub fn iter(&self) -> Result<std::iter::Empty<&T>, QueueError> {
        Err(QueueError::Unsupported)
    }

    /// Hands out the single consumer handle for this queue. May be called
    /// at most once; subsequent calls return
    /// [`QueueError::ConsumerAlreadyTaken`].
    pub fn consumer(self: &Arc<Self>) -> Result<Consumer<T>, QueueError> {
        if self.consumer_taken.swap(true, Ordering::AcqRel) {
            return Err(QueueError::ConsumerAlreadyTaken);
        }
        Ok(Consumer {
            queue: Arc::clone(self),
        })
    }

    /// Offers an element to the queue.
    ///
    /// Returns `Ok(false)` if the queue appeared full to this producer,
    /// `Ok(true)` on success. Fails fast with `QueueError::NullElement` if
    /// `element` is `None`, without modifying any state. Safe to call from
    /// any number of threads concurrently.
    pub fn offer(&self, element: Option<T>) -> Result<bool, QueueError> {
        let value = element.ok_or(QueueError::NullElement)?;
        let ptr = Box::into_raw(Box::new(value));

        let mut backoff = Backoff::new();
        loop {
            let current_producer = self.producer_index.load(Ordering::Acquire);
            let current_consumer = self.consumer_index.load(Ordering::Acquire);

            debug_assert_consumer_not_past_producer!(current_consumer, current_producer);

            if current_producer.wrapping_sub(current_consumer) >= self.capacity as u64 {
                if self.config.enable_metrics {
                    self.metrics.record_offer_rejected_full();
                }
                // Reclaim ownership: the reservation never happened.
                unsafe {
                    drop(Box::from_raw(ptr));
                }
                return Ok(false);
            }

            let next_producer = current_producer + 1;
            debug_assert_index_monotonic!("producer_index", current_producer, next_producer);
            debug_assert_bounded_occupancy!(next_producer, current_consumer, self.capacity);

            match self.producer_index.compare_exchange_weak(
                current_producer,
                next_producer,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    let slot = self.slot(current_producer);
                    debug_assert_slot_was_empty!(slot.load(Ordering::Relaxed).is_null());
                    slot.store(ptr, Ordering::Release);
                    if self.config.enable_metrics {
                        self.metrics.record_offer_success();
                    }
                    return Ok(true);
                }
                Err(_) => backoff.snooze(),
            }
        }
    }

    /// Spins until the slot at `consumer_index` is published, or returns
    /// `None` once `producer_index` proves the queue is genuinely empty.
    /// `record_empty` controls whether an empty observation is counted as a
    /// metrics event — `poll` wants it, `peek` does not.
    fn wait_for_slot(&self, consumer_index: u64, record_empty: bool) -> Option<*mut T> {
        let slot = self.slot(consumer_index);
        let mut backoff = Backoff::new();
        loop {
            let ptr = slot.load(Ordering::Acquire);
            if !ptr.is_null() {
                return Some(ptr);
            }

            let current_producer = self.producer_index.load(Ordering::Acquire);
            if current_producer == consumer_index {
                if record_empty && self.config.enable_metrics {
                    self.metrics.record_poll_empty();
                }
                return None;
            }
            // A producer has reserved this index but not yet published.
            backoff.snooze();
        }
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        let producer = *self.producer_index.get_mut();
        let consumer = *self.consumer_index.get_mut();
        let mut index = consumer;
        while index != producer {
            let slot = self.slot(index);
            let ptr = slot.load(Ordering::Relaxed);
            if !ptr.is_null() {
                unsafe {
                    drop(Box::from_raw(ptr));
                }
            }
            index += 1;
        }
    }
}

/// The single-consumer handle for a [`Queue`].
///
/// Obtained once via [`Queue::consumer`]. `poll`, `peek`, and `clear` all
/// take `&mut self` so the borrow checker enforces exclusivity between them:
/// a reference returned by `peek` borrows this handle, and cannot be held
/// across a later call to `poll` or `clear`, which would otherwise free or
/// reuse the slot it points into.
pub struct Consumer<T> {
    queue: Arc<Queue<T>>,
}

impl<T> Consumer<T> {
    /// Removes and returns the oldest element, or `None` if the queue is
    /// empty.
    pub fn poll(&mut self) -> Option<T> {
        let current_consumer = self.queue.consumer_index.load(Ordering::Relaxed);
        let ptr = self.queue.wait_for_slot(current_consumer, true)?;

        let slot = self.queue.slot(current_consumer);
        slot.store(ptr::null_mut(), Ordering::Release);

        let next_consumer = current_consumer + 1;
        debug_assert_index_monotonic!("consumer_index", current_consumer, next_consumer);
        self.queue.consumer_index.store(next_consumer, Ordering::Release);

        if self.queue.config.enable_metrics {
            self.queue.metrics.record_poll_success();
        }

        // Safety: `ptr` was published by `offer` via `Box::into_raw` and has
        // not been consumed since (the slot held it exclusively until the
        // store above cleared it).
        let boxed = unsafe { Box::from_raw(ptr) };
        Some(*boxed)
    }

    /// Returns a reference to the oldest element without removing it, or
    /// `None` if the queue is empty. Does not record a metrics event, even
    /// when empty. The returned reference borrows this handle, so it cannot
    /// outlive a subsequent `poll` or `clear` call.
    pub fn peek(&mut self) -> Option<&T> {
        let current_consumer = self.queue.consumer_index.load(Ordering::Relaxed);
        let ptr = self.queue.wait_for_slot(current_consumer, false)?;
        // Safety: this handle's exclusive borrow, reflected in the `&mut
        // self` signature above, prevents any call that would clear or
        // reuse this slot for as long as the returned reference is live.
        Some(unsafe { &*ptr })
    }

    /// Drains the queue. Specified only against a quiescent producer
    /// population; if producers are actively publishing, this may not
    /// terminate.
    pub fn clear(&mut self) {
        while self.poll().is_some() {}
    }

    /// Borrows the underlying queue, e.g. to call `offer`, `size`, or
    /// `metrics` from the consumer thread.
    pub fn queue(&self) -> &Arc<Queue<T>> {
        &self.queue
    }
}
