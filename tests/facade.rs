use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thout::{QueueError, QueueFacade, SharedQueue, RECORD_CAPACITY};

struct FailingSink;

impl io::Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "bad address"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct FailingSource;

impl io::Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "bad address"))
    }
}

fn facade() -> QueueFacade {
    QueueFacade::new(Arc::new(SharedQueue::new()))
}

#[test]
fn write_then_read_round_trips() {
    let facade = facade();
    assert_eq!(facade.write(b"hello").unwrap(), 5);

    let mut buf = [0u8; 5];
    assert_eq!(facade.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b"hello");
    assert_eq!(facade.pending(), 0);
}

#[test]
fn read_copies_at_most_the_requested_length() {
    let facade = facade();
    facade.write(b"abcdefgh").unwrap();

    let mut buf = [0u8; 3];
    assert_eq!(facade.read(&mut buf).unwrap(), 3);
    assert_eq!(&buf, b"abc");
    // The rest of the record is gone with it
    assert_eq!(facade.pending(), 0);
}

#[test]
fn read_never_copies_more_than_capacity() {
    let facade = facade();
    facade.write(&[b'z'; RECORD_CAPACITY]).unwrap();

    let mut buf = [0u8; RECORD_CAPACITY * 2];
    assert_eq!(facade.read(&mut buf).unwrap(), RECORD_CAPACITY);
}

#[test]
fn oversized_write_never_mutates_the_queue() {
    let facade = facade();
    facade.write(b"keep").unwrap();
    let before = facade.queue().stats();

    let err = facade.write(&[0u8; RECORD_CAPACITY + 1]).unwrap_err();
    assert!(matches!(err, QueueError::OversizedWrite { .. }));

    assert_eq!(facade.queue().stats(), before);
    assert_eq!(facade.pending(), 1);
}

#[test]
fn failed_write_copy_leaves_queue_untouched() {
    let facade = facade();
    let err = facade.write_from(FailingSource, 8).unwrap_err();
    assert!(matches!(err, QueueError::CopyFailure { .. }));
    assert_eq!(facade.pending(), 0);
    assert_eq!(facade.queue().stats().enqueued, 0);
}

#[test]
fn failed_read_copy_still_consumes_the_record() {
    let facade = facade();
    facade.write(b"stale").unwrap();
    facade.write(b"fresh").unwrap();

    let err = facade.read_into(FailingSink, 16).unwrap_err();
    assert!(matches!(err, QueueError::CopyFailure { .. }));
    assert_eq!(facade.pending(), 1);

    let mut out = Vec::new();
    assert_eq!(facade.read_into(&mut out, 16).unwrap(), 5);
    assert_eq!(out, b"fresh");
}

#[test]
fn try_read_reports_empty() {
    let facade = facade();
    let mut buf = [0u8; 8];
    assert!(matches!(facade.try_read(&mut buf), Err(QueueError::Empty)));

    facade.write(b"now").unwrap();
    assert_eq!(facade.try_read(&mut buf).unwrap(), 3);
}

#[test]
fn timed_reads_give_up() {
    let facade = facade().with_read_timeout(Some(Duration::from_millis(30)));
    let mut buf = [0u8; 8];
    assert!(matches!(facade.read(&mut buf), Err(QueueError::TimedOut(_))));
    assert!(matches!(
        facade.read_timeout(&mut buf, Duration::from_millis(10)),
        Err(QueueError::TimedOut(_))
    ));
}

#[test]
fn one_write_unblocks_exactly_one_reader() {
    let facade = facade();
    let delivered = Arc::new(AtomicUsize::new(0));

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let facade = facade.clone();
            let delivered = Arc::clone(&delivered);
            thread::spawn(move || {
                let mut buf = [0u8; RECORD_CAPACITY];
                let n = facade.read(&mut buf).unwrap();
                delivered.fetch_add(1, Ordering::SeqCst);
                buf[..n].to_vec()
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    assert_eq!(delivered.load(Ordering::SeqCst), 0);

    facade.write(b"one").unwrap();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(delivered.load(Ordering::SeqCst), 1);

    facade.write(b"two").unwrap();
    let mut payloads: Vec<Vec<u8>> = readers.into_iter().map(|r| r.join().unwrap()).collect();
    payloads.sort();
    assert_eq!(payloads, vec![b"one".to_vec(), b"two".to_vec()]);
}

#[test]
fn concurrent_writers_keep_their_own_order() {
    let facade = facade();
    let writers = 4;
    let per_writer = 200;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let facade = facade.clone();
            thread::spawn(move || {
                for i in 0..per_writer {
                    facade.write(format!("{w}:{i}").as_bytes()).unwrap();
                    if fastrand::u8(..) < 8 {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut next = vec![0usize; writers];
    let mut buf = [0u8; RECORD_CAPACITY];
    for _ in 0..writers * per_writer {
        let n = facade.try_read(&mut buf).unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();
        let (w, i) = text.split_once(':').unwrap();
        let (w, i): (usize, usize) = (w.parse().unwrap(), i.parse().unwrap());
        assert_eq!(i, next[w], "writer {} delivered out of order", w);
        next[w] += 1;
    }
    assert!(facade.try_read(&mut buf).is_err());
}

#[test]
fn errors_convert_to_io_errors() {
    let facade = facade();
    let err: io::Error = facade.write(&[0u8; RECORD_CAPACITY + 1]).unwrap_err().into();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

    let mut buf = [0u8; 1];
    let err = facade.try_read(&mut buf).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.errno(), libc::EAGAIN);
    let err: io::Error = err.into();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    assert!(!QueueError::Closed.is_transient());
}
