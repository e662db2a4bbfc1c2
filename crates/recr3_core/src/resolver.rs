//! Candidate size resolution: walking atoms until the file is closed.

use log::debug;

use crate::atoms::AtomWalker;
use crate::error::Result;
use crate::traits::BlockSource;

/// Name required of the first atom of a real CR3 file.
pub const FIRST_ATOM: [u8; 4] = *b"ftyp";

/// Decides which atom is the last one of a candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// The first atom whose name equals the tag closes the file.
    ByName(Vec<u8>),
    /// The atom at zero-based index `n - 1` closes the file, regardless
    /// of its name.
    ByCount(u64),
}

impl ChunkPolicy {
    fn is_last(&self, index: u64, name: &[u8; 4]) -> bool {
        match self {
            ChunkPolicy::ByName(tag) => name[..] == tag[..],
            ChunkPolicy::ByCount(n) => index + 1 == *n,
        }
    }
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy::ByName(b"mdat".to_vec())
    }
}

/// Resolves the total byte size of the candidate file starting at
/// `offset` by accumulating atom sizes until the policy closes the file.
///
/// Returns 0 when the first atom is not `ftyp`: the candidate is a
/// signature false-positive or a corrupted header, not a file start. If
/// the stream ends before the policy fires, the partial total is
/// returned; a truncated tail is still worth carving.
pub fn resolve_size<S: BlockSource>(
    source: &mut S,
    offset: u64,
    policy: &ChunkPolicy,
) -> Result<u64> {
    let mut walker = AtomWalker::new(source, offset);
    let mut total: u64 = 0;
    let mut index: u64 = 0;

    while let Some(atom) = walker.next_atom()? {
        if index == 0 && atom.name != FIRST_ATOM {
            return Ok(0);
        }

        total = total.saturating_add(atom.size);
        debug!(
            "atom name = {}, size = {}",
            String::from_utf8_lossy(&atom.name),
            atom.size
        );

        if policy.is_last(index, &atom.name) {
            break;
        }
        index += 1;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{short_atom, MemSource};

    fn three_atom_stream() -> Vec<u8> {
        let mut data = short_atom(b"ftyp", 32);
        data.extend(short_atom(b"moov", 64));
        data.extend(short_atom(b"mdat", 1000));
        data
    }

    #[test]
    fn by_name_sums_through_the_named_atom() {
        let mut source = MemSource(three_atom_stream());
        let policy = ChunkPolicy::ByName(b"mdat".to_vec());

        assert_eq!(resolve_size(&mut source, 0, &policy).unwrap(), 1096);
    }

    #[test]
    fn by_count_ignores_names() {
        let mut source = MemSource(three_atom_stream());
        let policy = ChunkPolicy::ByCount(2);

        assert_eq!(resolve_size(&mut source, 0, &policy).unwrap(), 96);
    }

    #[test]
    fn wrong_first_atom_rejects_the_candidate() {
        let mut data = short_atom(b"moov", 32);
        data.extend(short_atom(b"mdat", 64));
        let mut source = MemSource(data);

        let size = resolve_size(&mut source, 0, &ChunkPolicy::default()).unwrap();
        assert_eq!(size, 0);
    }

    #[test]
    fn truncated_stream_returns_partial_total() {
        // mdat declares 1000 bytes but the dump ends after its header;
        // the declared sizes are still summed
        let mut data = short_atom(b"ftyp", 32);
        data.extend(short_atom(b"moov", 64));
        data.extend_from_slice(&1000u32.to_be_bytes());
        data.extend_from_slice(b"mdat");
        let mut source = MemSource(data);

        let policy = ChunkPolicy::ByName(b"mdat".to_vec());
        assert_eq!(resolve_size(&mut source, 0, &policy).unwrap(), 1096);
    }

    #[test]
    fn stream_ending_before_the_policy_keeps_the_accumulated_total() {
        let mut data = short_atom(b"ftyp", 32);
        data.extend(short_atom(b"moov", 64));
        let mut source = MemSource(data);

        let policy = ChunkPolicy::ByName(b"mdat".to_vec());
        assert_eq!(resolve_size(&mut source, 0, &policy).unwrap(), 96);
    }

    #[test]
    fn resolves_from_a_nonzero_candidate_offset() {
        let mut data = vec![0x11; 50];
        data.extend(three_atom_stream());
        let mut source = MemSource(data);

        let policy = ChunkPolicy::default();
        assert_eq!(resolve_size(&mut source, 50, &policy).unwrap(), 1096);
    }

    #[test]
    fn zero_sized_first_atom_resolves_to_zero() {
        let mut data = vec![];
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.extend(short_atom(b"mdat", 16));
        let mut source = MemSource(data);

        let size = resolve_size(&mut source, 0, &ChunkPolicy::default()).unwrap();
        assert_eq!(size, 0);
    }
}
