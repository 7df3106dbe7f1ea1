use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;

use crate::error::Error;

/// A parse input: the document as one contiguous byte range.
///
/// Either a read-only memory mapping of a file (owned; unmapped on drop) or
/// a borrowed byte buffer the caller keeps alive for the parse.
#[derive(Debug)]
pub enum Input<'a> {
    Mapped(MappedFile),
    Buffer(&'a [u8]),
}

impl<'a> Input<'a> {
    /// Memory-maps `path` read-only, prefaulting the pages where the
    /// platform supports it.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] carrying `path` when the open, stat, or mmap fails.
    pub fn map_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::Mapped(MappedFile::open(path.as_ref())?))
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::Buffer(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(mapped) => mapped.bytes(),
            Self::Buffer(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// A read-only mapping of a whole file.
///
/// The mapping is released when the value drops; the descriptor closes as
/// soon as the map is established. Zero-length files carry no mapping at all
/// (mapping zero bytes is not portable) and read as an empty buffer.
#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    map: Option<memmap2::Mmap>,
}

impl MappedFile {
    fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let len = file.metadata().map_err(|e| Error::io(path, e))?.len();
        if len == 0 {
            return Ok(Self {
                path: path.to_path_buf(),
                map: None,
            });
        }

        let mut options = MmapOptions::new();
        #[cfg(target_os = "linux")]
        options.populate();
        // SAFETY: the mapping is read-only and nothing else in this process
        // writes to the file while the parse runs.
        let map = unsafe { options.map(&file) }.map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %path.display(), len, "mapped input file");
        Ok(Self {
            path: path.to_path_buf(),
            map: Some(map),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
