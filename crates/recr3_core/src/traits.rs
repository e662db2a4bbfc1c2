//! The trait abstracting the raw byte stream the carver reads from.

use crate::error::Result;

/// A source of raw block data, typically a memory dump or disk image.
///
/// The carver never mutates the source. Positioned reads keep the trait
/// stateless with respect to a cursor, so the scanner and the resolver
/// can each track their own position on independently opened sources.
pub trait BlockSource {
    /// Reads up to `buffer.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes actually read. A short read is not an
    /// error; `0` means `offset` is at or past the end of the source.
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize>;

    /// Total size of the source in bytes.
    fn size(&self) -> u64;

    /// Reads at `offset` until `buffer` is full or the source is
    /// exhausted, returning the number of bytes read.
    fn read_fully(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            let n = self.read_chunk(offset + filled as u64, &mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}
