// C endpoint: the byte-stream device surface a host registers and forwards
// read/write calls to. Every call returns a byte count or a negative errno.

use crate::Core::error::QueueError;
use crate::Queue::{QueueFacade, QueueSystem, SystemBuilder};
use libc::{c_int, c_uint, size_t, ssize_t};
use std::io;

/// Handle to a running system (opaque pointer)
pub struct SystemHandle {
    system: QueueSystem,
    facade: QueueFacade,
}

// Caller memory seen through io::Write / io::Read, so a NULL pointer surfaces
// as a copy failure. Any other invalid pointer is the caller's contract.
struct UserBufferMut {
    ptr: *mut u8,
    len: usize,
}

impl io::Write for UserBufferMut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.ptr.is_null() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "bad address"));
        }
        let n = buf.len().min(self.len);
        unsafe {
            std::ptr::copy_nonoverlapping(buf.as_ptr(), self.ptr, n);
            self.ptr = self.ptr.add(n);
        }
        self.len -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct UserBuffer {
    ptr: *const u8,
    len: usize,
}

impl io::Read for UserBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.ptr.is_null() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "bad address"));
        }
        let n = buf.len().min(self.len);
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr, buf.as_mut_ptr(), n);
            self.ptr = self.ptr.add(n);
        }
        self.len -= n;
        Ok(n)
    }
}

fn to_ssize(result: Result<usize, QueueError>) -> ssize_t {
    match result {
        Ok(n) => n as ssize_t,
        Err(e) => -(e.errno() as ssize_t),
    }
}

/// Start a system.
///
/// # Arguments
/// * `worker_count` - Number of worker threads. Values below 1 mean 1.
/// * `period_ms` - Milliseconds between two activations of one worker.
///
/// # Returns
/// * Pointer to `SystemHandle`, or NULL on failure.
#[no_mangle]
pub extern "C" fn thout_start(worker_count: c_int, period_ms: c_uint) -> *mut SystemHandle {
    match SystemBuilder::new()
        .with_worker_count(worker_count as i64)
        .with_period_ms(period_ms as u64)
        .start()
    {
        Ok(system) => {
            let facade = system.facade();
            Box::into_raw(Box::new(SystemHandle { system, facade }))
        }
        Err(e) => {
            log::error!("FFI Error: Failed to start system: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Read the oldest record, blocking until one is available.
///
/// # Arguments
/// * `handle` - Pointer to `SystemHandle`.
/// * `buf` - Destination buffer.
/// * `len` - Capacity of `buf`.
///
/// # Returns
/// * Number of bytes copied (at most `min(len, RECORD_CAPACITY)`).
/// * `-EFAULT` if `buf` is NULL; the record is consumed anyway.
/// * `-EPIPE` once the system has been stopped.
///
/// # Safety
/// `handle` must come from `thout_start` and not be stopped concurrently;
/// `buf`, if not NULL, must be valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn thout_read(handle: *mut SystemHandle, buf: *mut u8, len: size_t) -> ssize_t {
    if handle.is_null() {
        return -(libc::EBADF as ssize_t);
    }
    let facade = &(*handle).facade;
    to_ssize(facade.read_into(UserBufferMut { ptr: buf, len }, len))
}

/// Non-blocking read. Returns `-EAGAIN` when nothing is pending.
///
/// # Safety
/// Same contract as [`thout_read`].
#[no_mangle]
pub unsafe extern "C" fn thout_try_read(
    handle: *mut SystemHandle,
    buf: *mut u8,
    len: size_t,
) -> ssize_t {
    if handle.is_null() {
        return -(libc::EBADF as ssize_t);
    }
    if buf.is_null() {
        return -(libc::EFAULT as ssize_t);
    }
    let facade = &(*handle).facade;
    let dst = std::slice::from_raw_parts_mut(buf, len);
    to_ssize(facade.try_read(dst))
}

/// Queue `len` bytes from `buf` as a new record.
///
/// # Returns
/// * `len` on success.
/// * `-EINVAL` if `len` exceeds the record capacity.
/// * `-EFAULT` if `buf` is NULL; nothing is queued.
///
/// # Safety
/// `handle` must come from `thout_start`; `buf`, if not NULL, must be valid
/// for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn thout_write(
    handle: *mut SystemHandle,
    buf: *const u8,
    len: size_t,
) -> ssize_t {
    if handle.is_null() {
        return -(libc::EBADF as ssize_t);
    }
    let facade = &(*handle).facade;
    to_ssize(facade.write_from(UserBuffer { ptr: buf, len }, len))
}

/// Number of records waiting to be read, or `-EBADF`.
///
/// # Safety
/// `handle` must come from `thout_start`.
#[no_mangle]
pub unsafe extern "C" fn thout_pending(handle: *const SystemHandle) -> ssize_t {
    if handle.is_null() {
        return -(libc::EBADF as ssize_t);
    }
    (*handle).facade.pending() as ssize_t
}

/// Stop the workers, tear the queue down and free the handle.
///
/// # Safety
/// `handle` must come from `thout_start` and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn thout_stop(handle: *mut SystemHandle) {
    if !handle.is_null() {
        let mut handle = Box::from_raw(handle);
        handle.system.stop();
    }
}
