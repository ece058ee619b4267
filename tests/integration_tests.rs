use ringmpsc_rs::{Config, Queue};
use std::sync::Arc;
use std::thread;

#[test]
fn test_fifo_ordering_single_producer() {
    let q = Arc::new(Queue::<u64>::new(1024, Config::default()).unwrap());
    let mut c = q.consumer().unwrap();

    const N: u64 = 10_000;

    for i in 0..N {
        while !q.offer(Some(i)).unwrap() {
            thread::yield_now();
        }
        // Drain promptly to stay within capacity for a single producer.
        while let Some(v) = c.poll() {
            assert!(v < N);
        }
    }
}

#[test]
fn test_fifo_ordering_multi_producer() {
    const N_PRODUCERS: usize = 4;
    const ITEMS_PER_PRODUCER: u64 = 5_000;

    let q = Arc::new(Queue::<(usize, u64)>::new(1024, Config::default()).unwrap());
    let mut c = q.consumer().unwrap();
    let mut handles = vec![];

    for producer_id in 0..N_PRODUCERS {
        let q = Arc::clone(&q);
        let handle = thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                while !q.offer(Some((producer_id, i))).unwrap() {
                    thread::yield_now();
                }
            }
        });
        handles.push(handle);
    }

    let mut last_seen = vec![0u64; N_PRODUCERS];
    let mut consumed = 0usize;
    let total = N_PRODUCERS * ITEMS_PER_PRODUCER as usize;
    while consumed < total || handles.iter().any(|h| !h.is_finished()) {
        if let Some((producer_id, value)) = c.poll() {
            assert_eq!(
                value, last_seen[producer_id],
                "FIFO violation for producer {}: expected {}, got {}",
                producer_id, last_seen[producer_id], value
            );
            last_seen[producer_id] += 1;
            consumed += 1;
        } else {
            thread::yield_now();
        }
    }

    for handle in handles {
        handle.join().unwrap();
    }
    while let Some((producer_id, value)) = c.poll() {
        assert_eq!(value, last_seen[producer_id]);
        last_seen[producer_id] += 1;
        consumed += 1;
    }

    assert_eq!(consumed, total);
    for (id, &count) in last_seen.iter().enumerate() {
        assert_eq!(
            count, ITEMS_PER_PRODUCER,
            "producer {} sent {} items instead of {}",
            id, count, ITEMS_PER_PRODUCER
        );
    }
}

#[test]
fn test_concurrent_stress() {
    const N_PRODUCERS: usize = 8;
    const ITEMS_PER_PRODUCER: u64 = 50_000;

    let q = Arc::new(Queue::<u64>::new(4096, Config::default()).unwrap());
    let mut consumer = q.consumer().unwrap();
    let mut handles = vec![];

    for _ in 0..N_PRODUCERS {
        let q = Arc::clone(&q);
        let handle = thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                while !q.offer(Some(i)).unwrap() {
                    thread::yield_now();
                }
            }
        });
        handles.push(handle);
    }

    let total_expected = N_PRODUCERS * ITEMS_PER_PRODUCER as usize;
    let consumer_handle = thread::spawn(move || {
        let mut total = 0usize;
        let mut sum = 0u64;
        while total < total_expected {
            if let Some(v) = consumer.poll() {
                sum += v;
                total += 1;
            } else {
                thread::yield_now();
            }
        }
        (total, sum)
    });

    for handle in handles {
        handle.join().unwrap();
    }
    let (total, sum) = consumer_handle.join().unwrap();

    let expected_sum = (0..ITEMS_PER_PRODUCER).sum::<u64>() * N_PRODUCERS as u64;
    assert_eq!(total, total_expected);
    assert_eq!(sum, expected_sum);
}

#[test]
fn test_wrap_around() {
    let q = Arc::new(Queue::<u64>::new(16, Config::default()).unwrap());
    let mut c = q.consumer().unwrap();

    const N: usize = 10_000;
    let mut received = 0usize;

    for i in 0..N {
        while !q.offer(Some(i as u64)).unwrap() {
            while c.poll().is_some() {
                received += 1;
            }
        }
        if i % 3 == 0 {
            while c.poll().is_some() {
                received += 1;
            }
        }
    }
    while c.poll().is_some() {
        received += 1;
    }

    assert_eq!(received, N);
}

#[test]
fn test_fill_drain_refill() {
    let q = Arc::new(Queue::<u64>::new(1000, Config::default()).unwrap());
    let mut c = q.consumer().unwrap();

    for i in 0..1000 {
        assert!(q.offer(Some(i)).unwrap());
    }
    assert!(!q.offer(Some(1000)).unwrap());

    let mut total = 0usize;
    for _ in 0..10 {
        let mut chunk = 0;
        while chunk < 100 {
            if c.poll().is_some() {
                chunk += 1;
            } else {
                break;
            }
        }
        total += chunk;
    }

    assert_eq!(total, 1000);
    assert!(q.is_empty());
}
