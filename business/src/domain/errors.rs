/// Storage errors for the cache and history contracts.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The storage medium rejected a write. Non-fatal; callers log and
    /// continue.
    #[error("cache.write_failure")]
    WriteFailure,
    /// A stored payload could not be decoded. Treated as a miss; the
    /// entry is purged.
    #[error("cache.read_corrupt")]
    ReadCorrupt,
    /// The storage medium is out of quota. Callers evict and retry once.
    #[error("cache.quota_exceeded")]
    QuotaExceeded,
}
