//! Shared fixtures for the unit tests.

use crate::error::Result;
use crate::traits::BlockSource;

/// In-memory block source.
pub struct MemSource(pub Vec<u8>);

impl BlockSource for MemSource {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        let start = offset as usize;
        if start >= self.0.len() {
            return Ok(0);
        }
        let end = (start + buffer.len()).min(self.0.len());
        buffer[..end - start].copy_from_slice(&self.0[start..end]);
        Ok(end - start)
    }

    fn size(&self) -> u64 {
        self.0.len() as u64
    }
}

/// Builds an atom with a short header: 4-byte big-endian size, 4-byte
/// name, payload padded to `total_size` bytes.
pub fn short_atom(name: &[u8; 4], total_size: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(total_size as usize);
    out.extend_from_slice(&total_size.to_be_bytes());
    out.extend_from_slice(name);
    out.resize(total_size as usize, 0xAB);
    out
}

/// Builds an atom with an extended header: the 32-bit size field holds
/// the escape value 1 and the real size follows the name as 8 bytes.
pub fn extended_atom(name: &[u8; 4], total_size: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(total_size as usize);
    out.extend_from_slice(&1u32.to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(&total_size.to_be_bytes());
    out.resize(total_size as usize, 0xCD);
    out
}
