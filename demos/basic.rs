//! Telemetry-flavored tour of the diode API: many producers shipping log
//! lines through a small ring, one consumer polling them out, drops
//! reported as they happen.
//!
//! Run with: `cargo run --example basic`

use diode_rs::{waiter, AlertFn, Builder, Config, Poller};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    // A ring far smaller than the burst, so drops are guaranteed.
    let (tx, rx) = Builder::<String>::new(Config::new(16).with_metrics())
        .drop_sink(AlertFn(|missed| {
            eprintln!("[drop-sink] consumer missed {missed} lines");
        }))
        .multi_producer();

    let mut producers = Vec::new();
    for worker in 0..4 {
        let tx = tx.clone();
        producers.push(thread::spawn(move || {
            for i in 0..100 {
                tx.publish(Arc::new(format!("worker-{worker} line-{i}")));
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    // Drain what survived the burst.
    let mut poller = Poller::new(rx).with_interval(Duration::from_millis(1));
    let mut delivered = 0u64;
    while let Some(line) = poller.try_next() {
        println!("consumed: {line}");
        delivered += 1;
    }

    println!("delivered {delivered} of 400 published lines");

    // The waiter variant blocks instead of polling: the producer side is
    // wrapped so every publish wakes the consumer.
    let (tx, rx) = diode_rs::spsc::<&str>(8);
    let (mut tx, mut rx) = waiter(tx, rx);

    let consumer = thread::spawn(move || {
        let value = rx.next().expect("not cancelled");
        println!("waiter woke for: {value}");
    });

    thread::sleep(Duration::from_millis(50));
    tx.publish(Arc::new("wake up"));
    consumer.join().unwrap();
}
