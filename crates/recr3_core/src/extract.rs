//! Writing carved regions out to sequentially named files.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::traits::BlockSource;

/// Copy buffer size: bounds peak memory regardless of carved file size.
const COPY_CHUNK: usize = 8 * 1024 * 1024;

/// Copies carved regions into `img<N>.<ext>` files.
///
/// `N` starts at 1 and is consumed once per extraction attempt, whether
/// the attempt writes a file or skips an existing one. An existing
/// target is never overwritten.
pub struct Extractor {
    out_dir: PathBuf,
    ext: String,
    width: usize,
    next_id: u64,
}

impl Extractor {
    /// `width` is the zero-padding width of the sequence number in the
    /// output name; 0 means no padding.
    pub fn new(out_dir: impl AsRef<Path>, ext: impl Into<String>, width: usize) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            ext: ext.into(),
            width,
            next_id: 1,
        }
    }

    fn next_path(&mut self) -> PathBuf {
        let id = self.next_id;
        self.next_id += 1;
        self.out_dir
            .join(format!("img{:0w$}.{}", id, self.ext, w = self.width))
    }

    /// Copies exactly `size` bytes starting at `offset` into the next
    /// output file. Returns the written path, or `None` when the target
    /// already existed and the extraction was skipped.
    pub fn extract<S: BlockSource>(
        &mut self,
        source: &mut S,
        offset: u64,
        size: u64,
    ) -> Result<Option<PathBuf>> {
        let path = self.next_path();
        if path.exists() {
            info!("{} already exists: skipping", path.display());
            return Ok(None);
        }

        info!("Saving {}, size {} B", path.display(), size);

        let mut out = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        let buf_len = COPY_CHUNK.min(usize::try_from(size).unwrap_or(COPY_CHUNK));
        let mut buf = vec![0u8; buf_len];
        let mut pos = offset;
        let mut remaining = size;

        while remaining > 0 {
            let want = remaining.min(buf.len() as u64) as usize;
            let got = source.read_fully(pos, &mut buf[..want])?;
            if got == 0 {
                // source ended inside the carved region; keep the partial file
                break;
            }
            out.write_all(&buf[..got])?;
            pos += got as u64;
            remaining -= got as u64;
        }

        Ok(Some(path))
    }
}
