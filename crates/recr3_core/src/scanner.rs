//! Windowed signature scanning over a block source.

use log::debug;
use memchr::memmem::Finder;

use crate::error::Result;
use crate::traits::BlockSource;

/// Default scan window: 8 MiB.
pub const DEFAULT_WINDOW: usize = 8 * 1024 * 1024;

/// A two-stage file signature: a short magic prefix for the cheap
/// search, confirmed by a marker string at a fixed offset from the
/// start of the magic match.
#[derive(Debug, Clone)]
pub struct Signature {
    magic: Vec<u8>,
    marker: Vec<u8>,
    marker_offset: u64,
}

impl Signature {
    pub fn new(magic: &[u8], marker: &[u8], marker_offset: u64) -> Self {
        Self {
            magic: magic.to_vec(),
            marker: marker.to_vec(),
            marker_offset,
        }
    }

    /// Canon CR3: an ISO-box `ftyp` header declaring the `crx` brand,
    /// confirmed by "CanonCR3" at offset 64 (the same check Geeqie uses
    /// to identify CR3 files).
    pub fn cr3() -> Self {
        Self::new(b"\x00\x00\x00\x18ftypcrx", b"CanonCR3", 64)
    }

    pub fn magic_len(&self) -> usize {
        self.magic.len()
    }
}

/// Scans a block source window by window, yielding the absolute offsets
/// of confirmed signature matches.
///
/// When a window contains no magic hit, the next window starts
/// `2 * magic_len` bytes before the end of the current one, so a magic
/// sequence straddling the window boundary is re-read in full. After a
/// hit the scan resumes just past the magic, so adjacent signatures are
/// not lost either.
pub struct SignatureScanner<'a, S> {
    source: &'a mut S,
    signature: Signature,
    finder: Finder<'static>,
    window: usize,
    buf: Vec<u8>,
    pos: u64,
}

impl<'a, S: BlockSource> SignatureScanner<'a, S> {
    pub fn new(source: &'a mut S, signature: Signature) -> Self {
        Self::with_window(source, signature, DEFAULT_WINDOW)
    }

    pub fn with_window(source: &'a mut S, signature: Signature, window: usize) -> Self {
        debug_assert!(window > 2 * signature.magic.len());
        let finder = Finder::new(&signature.magic).into_owned();
        Self {
            source,
            finder,
            window,
            buf: vec![0u8; window],
            pos: 0,
            signature,
        }
    }

    /// Returns the next confirmed candidate offset, or `None` once the
    /// source is exhausted.
    pub fn next_candidate(&mut self) -> Result<Option<u64>> {
        let magic_len = self.signature.magic.len() as u64;

        loop {
            let pos = self.pos;
            debug!("read at {} B of {} B", pos, self.source.size());

            let got = self.source.read_fully(pos, &mut self.buf)?;
            if got == 0 {
                return Ok(None);
            }

            let Some(idx) = self.finder.find(&self.buf[..got]) else {
                self.pos = pos + self.window as u64 - 2 * magic_len;
                continue;
            };

            let hit = pos + idx as u64;
            // resume past the magic whether or not the marker confirms
            self.pos = hit + magic_len;

            let mut marker = vec![0u8; self.signature.marker.len()];
            let got = self
                .source
                .read_fully(hit + self.signature.marker_offset, &mut marker)?;
            if got == marker.len() && marker == self.signature.marker {
                return Ok(Some(hit));
            }
        }
    }
}
