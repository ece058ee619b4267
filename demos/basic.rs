use ringmpsc_rs::{Config, Queue};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("ringmpsc-rs Basic Example");
    println!("=========================\n");

    let queue = Arc::new(Queue::<u64>::new(1 << 16, Config::default()).unwrap());
    let mut consumer = queue.consumer().unwrap();

    const N_PRODUCERS: usize = 4;
    const ITEMS_PER_PRODUCER: usize = 1_000_000;

    println!("Configuration:");
    println!("  Producers: {}", N_PRODUCERS);
    println!("  Items per producer: {}", ITEMS_PER_PRODUCER);
    println!("  Total items: {}\n", N_PRODUCERS * ITEMS_PER_PRODUCER);

    let start = Instant::now();

    let mut handles = vec![];
    for id in 0..N_PRODUCERS {
        let queue = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                let value = (id * ITEMS_PER_PRODUCER + i) as u64;
                while !queue.offer(Some(value)).unwrap() {
                    thread::yield_now();
                }
            }
            println!("Producer {} finished", id);
        });
        handles.push(handle);
    }

    let total_expected = N_PRODUCERS * ITEMS_PER_PRODUCER;
    let consumer_handle = thread::spawn(move || {
        let mut total = 0usize;
        let mut sum = 0u64;

        while total < total_expected {
            match consumer.poll() {
                Some(item) => {
                    sum += item;
                    total += 1;
                }
                None => thread::yield_now(),
            }
        }

        (total, sum)
    });

    for handle in handles {
        handle.join().unwrap();
    }

    let (total, sum) = consumer_handle.join().unwrap();
    let duration = start.elapsed();

    println!("\nResults:");
    println!("  Items consumed: {}", total);
    println!("  Sum: {}", sum);
    println!("  Duration: {:.2?}", duration);
    println!(
        "  Throughput: {:.2} million items/sec",
        total as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
