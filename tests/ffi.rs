use std::ptr;
use thout::ffi::{thout_pending, thout_read, thout_start, thout_stop, thout_try_read, thout_write};
use thout::RECORD_CAPACITY;

#[test]
fn device_round_trip() {
    let handle = thout_start(1, 30_000);
    assert!(!handle.is_null());

    unsafe {
        // Start-up activation first
        let mut buf = [0u8; RECORD_CAPACITY];
        let n = thout_read(handle, buf.as_mut_ptr(), buf.len());
        assert!(n > 0);
        assert!(buf[..n as usize].starts_with(b"Activation 0"));

        let msg = b"hello";
        assert_eq!(thout_write(handle, msg.as_ptr(), msg.len()), 5);
        assert_eq!(thout_pending(handle), 1);

        let mut out = [0u8; 5];
        assert_eq!(thout_read(handle, out.as_mut_ptr(), out.len()), 5);
        assert_eq!(&out, b"hello");

        assert_eq!(thout_try_read(handle, out.as_mut_ptr(), out.len()), -(libc::EAGAIN as isize));
        thout_stop(handle);
    }
}

#[test]
fn device_error_codes() {
    let handle = thout_start(0, 30_000);
    assert!(!handle.is_null());

    unsafe {
        let mut buf = [0u8; RECORD_CAPACITY];
        thout_read(handle, buf.as_mut_ptr(), buf.len());

        let big = [0u8; RECORD_CAPACITY + 1];
        assert_eq!(thout_write(handle, big.as_ptr(), big.len()), -(libc::EINVAL as isize));
        assert_eq!(thout_write(handle, ptr::null(), 4), -(libc::EFAULT as isize));
        assert_eq!(thout_pending(handle), 0);

        // A NULL destination still consumes the record
        let msg = b"lost";
        thout_write(handle, msg.as_ptr(), msg.len());
        assert_eq!(thout_read(handle, ptr::null_mut(), 4), -(libc::EFAULT as isize));
        assert_eq!(thout_pending(handle), 0);

        assert_eq!(thout_read(ptr::null_mut(), buf.as_mut_ptr(), 1), -(libc::EBADF as isize));
        assert_eq!(thout_pending(ptr::null()), -(libc::EBADF as isize));

        thout_stop(handle);
        thout_stop(ptr::null_mut());
    }
}
