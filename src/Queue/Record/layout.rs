// A single queued record: fixed inline payload plus the producer tag.

use crate::Queue::Structs::Queue_Structs::Origin;

/// The size of the inline payload per record, in bytes.
pub const RECORD_CAPACITY: usize = 50;

/// A fixed-capacity text record.
///
/// Records are immutable once built. Ownership moves into the queue on
/// insertion and back out to exactly one reader on removal.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    /// Inline payload storage. Only `payload[..len]` is meaningful.
    pub(crate) payload: [u8; RECORD_CAPACITY],

    /// Number of valid bytes in `payload`, at most `RECORD_CAPACITY`.
    pub(crate) len: usize,

    /// Who produced the record.
    pub(crate) origin: Origin,

    /// Worker records carry the sequence value they were assigned under the
    /// queue lock. Externally written records carry none.
    pub(crate) sequence: Option<u64>,
}
