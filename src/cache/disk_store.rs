use crate::cache::error::CacheError;
use crate::cache::store::ResponseStore;
use async_trait::async_trait;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();
const ENTRY_EXTENSION: &str = "bin";

/// What is written to disk for one cached response.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    stored_at: i64,
    body: Vec<u8>,
}

/// Persistent [`ResponseStore`] keeping one file per request in a directory.
///
/// File names are the hex SHA-256 of the key. Entries are written to a temporary
/// file and then persisted without clobbering, so a reader never sees a partial
/// entry and the first writer of a key wins.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir
            .join(format!("{}.{}", hex::encode(digest), ENTRY_EXTENSION))
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<CacheEntry, CacheError> {
        let (entry, _) = bincode::serde::decode_from_slice::<CacheEntry, _>(bytes, BINCODE_CONFIG)
            .map_err(|e| CacheError::CacheDecode(path.to_path_buf(), Box::new(e)))?;
        Ok(entry)
    }

    async fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Self::decode(path, &bytes).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::CacheRead(path.to_path_buf(), e)),
        }
    }

    /// Writes `encoded` to `path` through a temporary file. Without `replace`, an
    /// entry that appeared in the meantime is kept.
    fn write_entry(dir: &Path, path: &Path, encoded: &[u8], replace: bool) -> Result<(), CacheError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| CacheError::CacheDirCreation(dir.to_path_buf(), e))?;
        let mut temp_file =
            NamedTempFile::new_in(dir).map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e))?;
        temp_file
            .write_all(encoded)
            .and_then(|_| temp_file.flush())
            .map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e))?;

        let persisted = if replace {
            temp_file.persist(path)
        } else {
            temp_file.persist_noclobber(path)
        };
        match persisted {
            Ok(_) => Ok(()),
            Err(e) if !replace && e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("Cache entry {:?} already written, keeping it", path);
                Ok(())
            }
            Err(e) => Err(CacheError::CacheWrite(path.to_path_buf(), e.error)),
        }
    }
}

#[async_trait]
impl ResponseStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        match Self::read_entry(&path).await? {
            Some(entry) if entry.key == key => Ok(Some(entry.body)),
            Some(entry) => {
                warn!(
                    "Cache file {:?} holds a different request ({}), treating as a miss",
                    path, entry.key
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Keeps a valid entry for `key`. A missing entry is written; an unreadable one,
    /// or one holding a different request, is replaced.
    async fn put(&self, key: &str, body: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let replace = match Self::read_entry(&path).await {
            Ok(Some(entry)) if entry.key == key => return Ok(()),
            Ok(None) => false,
            Ok(Some(_)) => true,
            Err(e) => {
                warn!("Replacing unreadable cache entry: {}", e);
                true
            }
        };

        let entry = CacheEntry {
            key: key.to_string(),
            stored_at: Utc::now().timestamp(),
            body: body.to_vec(),
        };
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || {
            let encoded = bincode::serde::encode_to_vec(&entry, BINCODE_CONFIG)
                .map_err(|e| CacheError::CacheEncode(Box::new(e)))?;
            Self::write_entry(&dir, &path, &encoded, replace)
        })
        .await?
    }
}
