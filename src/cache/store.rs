use crate::cache::error::CacheError;
use async_trait::async_trait;

/// Key-value storage behind the cached transport.
///
/// Keys are fully formed request URLs. Entries never expire and are written at most
/// once: a `put` for a key that is already present leaves the stored body untouched.
/// An entry that cannot be read back for its key does not count as present.
/// Implementations must tolerate concurrent `get` and `put` calls.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Returns the stored body for `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `body` under `key` unless an entry already exists.
    async fn put(&self, key: &str, body: &[u8]) -> Result<(), CacheError>;
}
