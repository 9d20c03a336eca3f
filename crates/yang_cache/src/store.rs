//! The locked, checksummed cache file.
//!
//! A cache file holds one [`CacheRecord`]: a 4-byte little-endian header
//! length, a bincode header (magic bytes, format version, producing crate
//! version, XXH3-128 checksum of the payload), then the bincode payload.
//! Readers hold a shared advisory lock for the whole read and writers hold an
//! exclusive one for the whole truncate-and-write, so a reader sees either
//! the previous record or the next one, never a partial write.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use yang_modules::ModuleSet;

use crate::error::CacheError;
use crate::fingerprint::InputFingerprint;

/// Magic bytes identifying a YANG schema cache file.
const CACHE_MAGIC: [u8; 4] = *b"YSCH";

/// Current cache format version. Increment on breaking changes to the
/// header or payload format.
const CACHE_FORMAT_VERSION: u32 = 1;

/// Version of the crate that wrote a cache file.
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header prepended to the cache payload for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheHeader {
    magic: [u8; 4],
    format_version: u32,
    tool_version: String,
    checksum: u128,
}

/// A persisted compile result and the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Fingerprint of the inputs at compile time.
    pub fingerprint: InputFingerprint,
    /// The finalized module set.
    pub modules: ModuleSet,
}

fn checksum(data: &[u8]) -> u128 {
    xxhash_rust::xxh3::xxh3_128(data)
}

/// Encodes a record with its validation header.
pub fn encode_record(record: &CacheRecord) -> Result<Vec<u8>, CacheError> {
    let payload = bincode::serde::encode_to_vec(record, bincode::config::standard()).map_err(
        |e| CacheError::Serialization {
            reason: e.to_string(),
        },
    )?;

    let header = CacheHeader {
        magic: CACHE_MAGIC,
        format_version: CACHE_FORMAT_VERSION,
        tool_version: TOOL_VERSION.to_string(),
        checksum: checksum(&payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decodes and validates a record read from `path`.
pub fn decode_record(raw: &[u8], path: &Path) -> Result<CacheRecord, CacheError> {
    let invalid = |reason: &str| CacheError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let len_bytes: [u8; 4] = raw
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| invalid("file shorter than header length"))?;
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    let header_end = 4usize
        .checked_add(header_len)
        .filter(|end| *end <= raw.len())
        .ok_or_else(|| invalid("truncated header"))?;

    let (header, _): (CacheHeader, usize) =
        bincode::serde::decode_from_slice(&raw[4..header_end], bincode::config::standard())
            .map_err(|e| invalid(&e.to_string()))?;

    if header.magic != CACHE_MAGIC {
        return Err(invalid("bad magic bytes"));
    }
    if header.format_version != CACHE_FORMAT_VERSION {
        return Err(CacheError::VersionMismatch {
            path: path.to_path_buf(),
            expected: CACHE_FORMAT_VERSION,
            actual: header.format_version,
        });
    }
    if header.tool_version != TOOL_VERSION {
        return Err(invalid(&format!(
            "written by version {}, this is {TOOL_VERSION}",
            header.tool_version
        )));
    }

    let payload = &raw[header_end..];
    let actual = checksum(payload);
    if actual != header.checksum {
        return Err(CacheError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: format!("{:032x}", header.checksum),
            actual: format!("{actual:032x}"),
        });
    }

    let (record, _): (CacheRecord, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard()).map_err(|e| {
            CacheError::Serialization {
                reason: e.to_string(),
            }
        })?;
    Ok(record)
}

/// The cache file at one path, with its locking discipline.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Creates a store for the cache file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads the stored record under a shared lock.
    ///
    /// Returns `None` if the file does not exist or cannot be decoded. An
    /// undecodable file is a cache miss, not an error; it is overwritten by
    /// the next [`CacheStore::store`].
    pub fn load(&self) -> Result<Option<CacheRecord>, CacheError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file");
                return Ok(None);
            }
            Err(e) => return Err(self.io_err(e)),
        };
        FileExt::lock_shared(&file).map_err(|e| self.io_err(e))?;

        let mut raw = Vec::new();
        if let Err(e) = file.read_to_end(&mut raw) {
            warn!(path = %self.path.display(), error = %e, "unreadable cache file, ignoring");
            return Ok(None);
        }
        drop(file);

        match decode_record(&raw, &self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(error = %e, "discarding undecodable cache file");
                Ok(None)
            }
        }
    }

    /// Replaces the stored record under an exclusive lock.
    ///
    /// The record is encoded before the lock is taken. The file is truncated,
    /// written, and synced while the lock is held.
    pub fn store(&self, record: &CacheRecord) -> Result<(), CacheError> {
        let bytes = encode_record(record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_err(e))?;
        FileExt::lock_exclusive(&file).map_err(|e| self.io_err(e))?;

        file.set_len(0).map_err(|e| self.io_err(e))?;
        file.seek(SeekFrom::Start(0)).map_err(|e| self.io_err(e))?;
        file.write_all(&bytes).map_err(|e| self.io_err(e))?;
        file.flush().map_err(|e| self.io_err(e))?;
        file.sync_all().map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "cache written");
        Ok(())
    }

    /// Deletes the cache file under an exclusive lock. Returns `false` if
    /// there was nothing to delete.
    pub fn remove(&self) -> Result<bool, CacheError> {
        let file = match OpenOptions::new().write(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.io_err(e)),
        };
        FileExt::lock_exclusive(&file).map_err(|e| self.io_err(e))?;
        std::fs::remove_file(&self.path).map_err(|e| self.io_err(e))?;
        Ok(true)
    }
}
