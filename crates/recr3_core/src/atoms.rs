//! Box (atom) header decoding and sequential traversal.
//!
//! A CR3 file is a series of atoms. Each atom carries a 4-byte name and
//! a declared size spanning header plus payload. The header comes in two
//! encodings: a 4-byte big-endian size followed by the name, or the
//! escape value 1 in the size field followed by the name and an 8-byte
//! big-endian extended size. All integers are big-endian.

use crate::error::Result;
use crate::traits::BlockSource;

/// One atom of the container. `size` is the total span in bytes,
/// counted from `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    pub offset: u64,
    pub name: [u8; 4],
    pub size: u64,
}

/// Decodes a single atom header at `offset`.
///
/// Returns `Ok(None)` when fewer bytes than a full header remain. A
/// truncated stream is the normal end of a walk over a partial dump,
/// not an error.
pub fn read_atom<S: BlockSource>(source: &mut S, offset: u64) -> Result<Option<Atom>> {
    let mut header = [0u8; 8];
    if source.read_fully(offset, &mut header)? < header.len() {
        return Ok(None);
    }

    let short = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    let name = [header[4], header[5], header[6], header[7]];

    let size = if short == 1 {
        let mut extended = [0u8; 8];
        if source.read_fully(offset + 8, &mut extended)? < extended.len() {
            return Ok(None);
        }
        u64::from_be_bytes(extended)
    } else {
        u64::from(short)
    };

    Ok(Some(Atom { offset, name, size }))
}

/// Pull cursor yielding consecutive atoms from a starting offset.
///
/// After each atom the cursor advances by the atom's declared size. The
/// walk is single-pass and ends at end-of-stream. An atom declaring
/// `size == 0` cannot advance the cursor, so it is yielded once and then
/// the walk stops.
pub struct AtomWalker<'a, S> {
    source: &'a mut S,
    pos: u64,
    done: bool,
}

impl<'a, S: BlockSource> AtomWalker<'a, S> {
    pub fn new(source: &'a mut S, start: u64) -> Self {
        Self {
            source,
            pos: start,
            done: false,
        }
    }

    /// Returns the next atom, or `None` once the stream is exhausted.
    pub fn next_atom(&mut self) -> Result<Option<Atom>> {
        if self.done {
            return Ok(None);
        }

        match read_atom(self.source, self.pos)? {
            Some(atom) => {
                if atom.size == 0 {
                    self.done = true;
                } else {
                    self.pos = self.pos.saturating_add(atom.size);
                }
                Ok(Some(atom))
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}
