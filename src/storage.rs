//! Persistent halt storage - block layout over a flat byte store.
//!
//! The store is treated as a byte array of `STORE_SIZE` bytes holding six
//! fixed blocks, one per (line, route):
//!
//! ```text
//!   offset  0 UP/Kalyan     offset 186 DOWN/Kalyan
//!   offset 62 UP/Kasara     offset 248 DOWN/Kasara
//!   offset 124 UP/Khopoli   offset 310 DOWN/Khopoli
//! ```
//!
//! Block format (62 bytes):
//!   - byte 0: halt count (byte 1 reserved, written as zero)
//!   - bytes 2..62: 30 little-endian `u16` station slots, unused slots zero
//!
//! Decoding is tolerant: an oversized count reads as an empty list and a
//! station outside the route reads as station 0.

use crate::catalog::StationRef;
use crate::config::{FLASH_RETRY_MS, HALT_BLOCK_SIZE, HALT_HEADER_SIZE, MAX_HALTS, STORE_SIZE};
use crate::error::Error;
use crate::halts::HaltList;
use crate::timer::{Countdown, Millis};

/// A flat, byte-addressable persistent store.
///
/// Writes may be buffered until [`ByteStore::commit`].
pub trait ByteStore {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), Error>;
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Error>;
    fn commit(&mut self) -> Result<(), Error>;
}

/// Serialize a halt list into its fixed-size block.
pub fn encode_block(list: &HaltList) -> [u8; HALT_BLOCK_SIZE] {
    let mut block = [0u8; HALT_BLOCK_SIZE];
    block[0] = list.len() as u8;
    for (slot, station) in list.as_slice().iter().enumerate() {
        let at = HALT_HEADER_SIZE + slot * 2;
        block[at..at + 2].copy_from_slice(&station.to_le_bytes());
    }
    block
}

/// Deserialize a block for a route with `station_count` stations.
pub fn decode_block(block: &[u8; HALT_BLOCK_SIZE], station_count: u16) -> HaltList {
    let mut list = HaltList::new();
    let count = usize::from(block[0]);
    if count > MAX_HALTS {
        warn!("halt block count {} out of range, treating as empty", count);
        return list;
    }

    for slot in 0..count {
        let at = HALT_HEADER_SIZE + slot * 2;
        let mut station = StationRef::from_le_bytes([block[at], block[at + 1]]);
        if station >= station_count {
            warn!("stored station {} outside route, using 0", station);
            station = 0;
        }
        list.push_raw(station);
    }
    list
}

/// RAM-backed store image.
///
/// Used directly by host tests, and by the board as the working copy that
/// is flushed to flash after a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemStore {
    image: [u8; STORE_SIZE],
    dirty: bool,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// A zero-filled image (every block decodes as an empty list).
    pub const fn new() -> Self {
        Self {
            image: [0u8; STORE_SIZE],
            dirty: false,
        }
    }

    pub const fn from_image(image: [u8; STORE_SIZE]) -> Self {
        Self {
            image,
            dirty: false,
        }
    }

    pub fn image(&self) -> &[u8; STORE_SIZE] {
        &self.image
    }

    /// True once after each commit, so the owner can flush the image.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// Flag the image for another flush, e.g. after a failed write-back.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn range(offset: usize, len: usize) -> Result<core::ops::Range<usize>, Error> {
        let end = offset.checked_add(len).ok_or(Error::OutOfRange)?;
        if end > STORE_SIZE {
            return Err(Error::OutOfRange);
        }
        Ok(offset..end)
    }
}

/// Paces write-backs of a [`MemStore`] to slower backing storage.
///
/// A failed flush leaves the image dirty and holds further attempts off
/// for [`FLASH_RETRY_MS`], so a persistent fault does not stall the
/// control loop on every pass.
#[derive(Debug)]
pub struct FlushRetry {
    backoff: Countdown,
}

impl Default for FlushRetry {
    fn default() -> Self {
        Self::new()
    }
}

impl FlushRetry {
    pub const fn new() -> Self {
        Self {
            backoff: Countdown::new(FLASH_RETRY_MS),
        }
    }

    /// True when the image should be written back now. Consumes the dirty
    /// flag; the caller must [`report`](Self::report) the outcome.
    pub fn due(&mut self, store: &mut MemStore, now: Millis) -> bool {
        if self.backoff.is_running() && !self.backoff.poll(now) {
            return false;
        }
        store.take_dirty()
    }

    /// Record the outcome of a flush started after [`due`](Self::due).
    pub fn report<E>(&mut self, store: &mut MemStore, result: &Result<(), E>, now: Millis) {
        match result {
            Ok(()) => self.backoff.cancel(),
            Err(_) => {
                store.mark_dirty();
                self.backoff.start(now);
            }
        }
    }

    /// A failed flush is waiting for its retry.
    pub fn is_backing_off(&self) -> bool {
        self.backoff.is_running()
    }
}

impl ByteStore for MemStore {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), Error> {
        let range = Self::range(offset, buf.len())?;
        buf.copy_from_slice(&self.image[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Error> {
        let range = Self::range(offset, data.len())?;
        self.image[range].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.dirty = true;
        Ok(())
    }
}
