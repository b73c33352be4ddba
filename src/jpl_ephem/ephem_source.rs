//! Byte sources backing an ephemeris handle.
//!
//! The decoder only needs two primitives from the outside world: *read up to N
//! bytes at offset O* and the total length, used to reject headers describing
//! records larger than the file. [`EphemerisSource`] captures that contract so the same
//! header decoder and block cache run on a file on disk ([`FileSource`]) or on
//! bytes already in memory ([`MemorySource`]).
use std::{
    fmt::{Debug, Display},
    fs::File,
    io::{self, Read, Seek, SeekFrom},
};

use camino::{Utf8Path, Utf8PathBuf};

/// Random-access, read-only byte source.
pub trait EphemerisSource: Debug + Display + Send + Sync {
    /// Read at most `len` bytes starting at `offset`.
    ///
    /// Fewer bytes are returned only when the end of the source is reached.
    fn read_up_to(&self, offset: u64, len: usize) -> io::Result<Vec<u8>>;

    /// Total length of the source in bytes.
    fn byte_len(&self) -> io::Result<u64>;

    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Return
    /// ----------
    /// * The bytes, or an [`io::ErrorKind::UnexpectedEof`] error on a short read.
    fn read_exact_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let bytes = self.read_up_to(offset, len)?;
        if bytes.len() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "short read in {self}: {} of {len} bytes at offset {offset}",
                    bytes.len()
                ),
            ));
        }
        Ok(bytes)
    }
}

/// A DE binary on disk.
///
/// No handle is kept open between reads: every call opens the file, seeks and
/// reads, and the handle is dropped on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: Utf8PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Display for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl EphemerisSource for FileSource {
    fn read_up_to(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = Vec::new();
        file.take(len as u64).read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

/// A DE binary already loaded in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        MemorySource {
            name: name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySource")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Display for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<memory:{}>", self.name)
    }
}

impl EphemerisSource for MemorySource {
    fn read_up_to(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.bytes.len());
        let end = start.saturating_add(len).min(self.bytes.len());
        Ok(self.bytes[start..end].to_vec())
    }

    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }
}
