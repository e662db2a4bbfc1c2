//! Block source adapters: positioned file reads and memory-mapped input.
//!
//! [`Reader::open`] prefers a memory map and falls back to plain file
//! reads when the input cannot be mapped (block devices, exotic
//! filesystems). The carver opens two independent readers on the same
//! input, one for scanning and one for size resolution and extraction.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;
use recr3_core::{BlockSource, CoreError, Result};

/// Reads a regular file or device with seek + read.
pub struct DiskReader {
    file: File,
    size: u64,
}

impl DiskReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        #[cfg(target_os = "linux")]
        {
            use rustix::fs::{fadvise, Advice};
            // one sequential sweep, no reason to keep pages cached
            let _ = fadvise(&file, 0, None, Advice::Sequential);
            let _ = fadvise(&file, 0, None, Advice::NoReuse);
        }

        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

impl BlockSource for DiskReader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(self.file.read(buffer)?)
    }

    #[inline]
    fn size(&self) -> u64 {
        self.size
    }
}

/// Serves reads out of a shared memory map of the input.
pub struct MmapReader {
    mmap: Mmap,
}

impl MmapReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        if file.metadata()?.len() == 0 {
            return Err(CoreError::InvalidFormat(
                "cannot mmap an empty input".into(),
            ));
        }

        let mmap = unsafe { Mmap::map(&file) }.map_err(CoreError::Io)?;
        if mmap.is_empty() {
            return Err(CoreError::InvalidFormat(
                "mmap returned an empty mapping".into(),
            ));
        }

        #[cfg(target_os = "linux")]
        {
            let _ = mmap.advise(memmap2::Advice::Sequential);
        }

        Ok(Self { mmap })
    }

    fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
        let start = offset as usize;
        if start >= self.mmap.len() {
            return None;
        }
        let end = start.saturating_add(len).min(self.mmap.len());
        Some(&self.mmap[start..end])
    }
}

impl BlockSource for MmapReader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        match self.slice(offset, buffer.len()) {
            Some(slice) => {
                buffer[..slice.len()].copy_from_slice(slice);
                Ok(slice.len())
            }
            None => Ok(0),
        }
    }

    #[inline]
    fn size(&self) -> u64 {
        self.mmap.len() as u64
    }
}

/// Input reader: memory map when possible, plain reads otherwise.
pub enum Reader {
    Mmap(MmapReader),
    Disk(DiskReader),
}

impl Reader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match MmapReader::open(path) {
            Ok(reader) => Ok(Reader::Mmap(reader)),
            Err(_) => Ok(Reader::Disk(DiskReader::open(path)?)),
        }
    }
}

impl BlockSource for Reader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        match self {
            Reader::Mmap(r) => r.read_chunk(offset, buffer),
            Reader::Disk(r) => r.read_chunk(offset, buffer),
        }
    }

    #[inline]
    fn size(&self) -> u64 {
        match self {
            Reader::Mmap(r) => r.size(),
            Reader::Disk(r) => r.size(),
        }
    }
}
