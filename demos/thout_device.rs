// In demos/thout_device.rs
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thout::{QueueError, SystemBuilder, RECORD_CAPACITY};

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let worker_count: i64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(2);
    let period_ms: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2000);

    thout::Core::logging::init_logging(Some("info"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    println!(
        "Device: starting {} worker(s), one activation every {} ms",
        worker_count, period_ms
    );

    let mut system = SystemBuilder::new()
        .with_worker_count(worker_count)
        .with_period_ms(period_ms)
        .with_read_timeout(Duration::from_millis(500))
        .start()?;
    let facade = system.facade();

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);

    // Handle Ctrl+C to stop the workers
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Device: reading records (press Ctrl+C to exit)...");

    let mut buf = [0u8; RECORD_CAPACITY];
    while running.load(Ordering::SeqCst) {
        match facade.read(&mut buf) {
            Ok(n) => print!("{}", String::from_utf8_lossy(&buf[..n])),
            Err(QueueError::TimedOut(_)) => continue,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    let report = system.stop();
    println!(
        "Device: stopped, {} worker(s) joined, {} record(s) read, {} discarded",
        report.workers_joined, report.stats.dequeued, report.records_discarded
    );

    Ok(())
}
