// In demos/echo_writer.rs
use std::io::{self, BufRead};
use std::thread;
use thout::{QueueError, SystemBuilder, RECORD_CAPACITY};

fn main() -> io::Result<()> {
    println!("Echo: type lines (at most {} bytes each), Ctrl+D to quit", RECORD_CAPACITY);

    // One slow worker so written lines and activations interleave visibly
    let mut system = SystemBuilder::new()
        .with_worker_count(1)
        .with_period_ms(5000)
        .start()?;
    let facade = system.facade();

    let reader_facade = facade.clone();
    let reader = thread::spawn(move || {
        let mut buf = [0u8; RECORD_CAPACITY];
        loop {
            match reader_facade.read(&mut buf) {
                Ok(n) => println!("< {}", String::from_utf8_lossy(&buf[..n]).trim_end()),
                Err(QueueError::Closed) => break,
                Err(e) => {
                    eprintln!("Reader error: {}", e);
                    break;
                }
            }
        }
    });

    for line in io::stdin().lock().lines() {
        let line = line?;
        match facade.write(line.as_bytes()) {
            Ok(n) => println!("> queued {} bytes", n),
            Err(e @ QueueError::OversizedWrite { .. }) => eprintln!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    system.stop();
    let _ = reader.join();
    Ok(())
}
