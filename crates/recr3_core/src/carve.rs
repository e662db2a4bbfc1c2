//! The carving pipeline: scan, resolve, extract.

use log::debug;

use crate::error::Result;
use crate::extract::Extractor;
use crate::resolver::{resolve_size, ChunkPolicy};
use crate::scanner::{Signature, SignatureScanner};
use crate::traits::BlockSource;

/// Drives one full carving pass.
///
/// Signatures are scanned on `scan_source` while sizes are resolved and
/// bytes copied from `carve_source`, so the scan position is never
/// disturbed by the resolver's seeks. Both sources are expected to be
/// independently opened views of the same input.
///
/// Returns the number of files recovered; skipped extractions (target
/// already present) are not counted. Zero is a valid outcome.
pub fn run_carve<A, B>(
    scan_source: &mut A,
    carve_source: &mut B,
    signature: Signature,
    policy: &ChunkPolicy,
    extractor: &mut Extractor,
) -> Result<usize>
where
    A: BlockSource,
    B: BlockSource,
{
    let mut scanner = SignatureScanner::new(scan_source, signature);
    let mut count = 0;

    while let Some(offset) = scanner.next_candidate()? {
        debug!("found CR3 header at offset {}", offset);

        let size = resolve_size(carve_source, offset, policy)?;
        if size == 0 {
            debug!("not a CR3 file");
            continue;
        }

        if extractor.extract(carve_source, offset, size)?.is_some() {
            count += 1;
        }
    }

    Ok(count)
}
