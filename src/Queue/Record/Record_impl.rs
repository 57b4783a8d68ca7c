use std::fmt;
use std::io::{self, Read, Write};

use super::layout::{Record, RECORD_CAPACITY};
use crate::Core::error::{QueueError, QueueResult};
use crate::Queue::Structs::Queue_Structs::Origin;

impl Record {
    /// Build the record a worker emits on each activation.
    /// Text longer than the capacity is truncated.
    pub fn from_worker(worker_id: u32, sequence: u64) -> Self {
        let mut payload = [0u8; RECORD_CAPACITY];
        let mut cursor = io::Cursor::new(&mut payload[..]);
        // A full cursor reports WriteZero after keeping the bytes that fit.
        let _ = writeln!(
            cursor,
            "Activation {} Written by Kthread No {}",
            sequence, worker_id
        );
        let len = cursor.position() as usize;

        Self {
            payload,
            len,
            origin: Origin::Worker(worker_id),
            sequence: Some(sequence),
        }
    }

    /// Build an external record from caller bytes.
    pub fn from_bytes(data: &[u8]) -> QueueResult<Self> {
        Self::from_reader(data, data.len())
    }

    /// Build an external record by reading exactly `len` bytes from `src`.
    ///
    /// # Returns
    /// * `Err(OversizedWrite)` if `len` exceeds the record capacity
    /// * `Err(CopyFailure)` if `src` cannot supply `len` bytes
    pub fn from_reader<R: Read>(mut src: R, len: usize) -> QueueResult<Self> {
        if len > RECORD_CAPACITY {
            return Err(QueueError::OversizedWrite {
                len,
                capacity: RECORD_CAPACITY,
            });
        }

        let mut payload = [0u8; RECORD_CAPACITY];
        src.read_exact(&mut payload[..len])
            .map_err(|source| QueueError::CopyFailure { len, source })?;

        Ok(Self {
            payload,
            len,
            origin: Origin::External,
            sequence: None,
        })
    }

    /// The valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Payload as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.payload())
    }

    /// Copy up to `max_len` payload bytes into `dst`.
    /// Returns the number of bytes copied.
    pub fn copy_to<W: Write>(&self, mut dst: W, max_len: usize) -> QueueResult<usize> {
        let n = max_len.min(self.len);
        dst.write_all(&self.payload[..n])
            .and_then(|_| dst.flush())
            .map_err(|source| QueueError::CopyFailure { len: n, source })?;
        Ok(n)
    }

    /// Copy as much of the payload as fits into `dst`.
    pub fn copy_to_slice(&self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.len);
        dst[..n].copy_from_slice(&self.payload[..n]);
        n
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_record(self, f)
    }
}
