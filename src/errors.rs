use thiserror::Error;

/// Error type that captures ledger storage and snapshot failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("snapshot schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("changes kept in memory but not saved after {attempts} attempt(s): {reason}")]
    PersistenceDeferred { attempts: u32, reason: String },
}

impl LedgerError {
    /// True when changes were kept in memory because the snapshot write failed.
    pub fn is_deferred_save(&self) -> bool {
        matches!(self, LedgerError::PersistenceDeferred { .. })
    }
}
