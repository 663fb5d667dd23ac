use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::{errors::LedgerError, ledger::FinanceState, utils::paths};

use super::StateStore;

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "state";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// A backup file of the finance state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}

/// Filesystem-backed JSON snapshot of the whole finance state.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    state_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStateStore {
    /// Store rooted at `base` (`state.json` plus a `backups/` directory).
    pub fn new(base: &Path, retention: Option<usize>) -> Result<Self, LedgerError> {
        fs::create_dir_all(base)?;
        let backups_dir = paths::backups_dir_in(base);
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            state_file: paths::state_file_in(base),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Writes a timestamped copy of `state` and prunes beyond the retention limit.
    pub fn backup(
        &self,
        state: &FinanceState,
        note: Option<&str>,
    ) -> Result<BackupInfo, LedgerError> {
        fs::create_dir_all(&self.backups_dir)?;
        let now = Utc::now();
        let mut stem = format!("{}_{}", BACKUP_PREFIX, now.format(BACKUP_TIMESTAMP_FORMAT));
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut name = format!("{}.{}", stem, SNAPSHOT_EXTENSION);
        let mut attempt = 2;
        while self.backups_dir.join(&name).exists() {
            name = format!("{}-{}.{}", stem, attempt, SNAPSHOT_EXTENSION);
            attempt += 1;
        }
        let path = self.backups_dir.join(&name);
        write_snapshot(state, &path)?;
        info!(backup = %name, "state backup written");
        self.prune_backups()?;
        Ok(BackupInfo {
            name,
            path,
            created_at: Some(now),
        })
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, LedgerError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            entries.push(BackupInfo {
                name: name.to_string(),
                created_at: parse_backup_timestamp(name),
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.name.clone())));
        Ok(entries)
    }

    /// Reads the backup called `name`. The current snapshot is left alone;
    /// callers hand the state to `FinanceManager::replace_state`, which checks
    /// it before writing.
    pub fn read_backup(&self, name: &str) -> Result<FinanceState, LedgerError> {
        let path = self.backups_dir.join(name);
        if !path.is_file() {
            return Err(LedgerError::Persistence(format!("backup `{}` not found", name)));
        }
        let state = read_snapshot(&path)?;
        debug!(backup = name, "backup read");
        Ok(state)
    }

    fn prune_backups(&self) -> Result<(), LedgerError> {
        let backups = self.list_backups()?;
        for stale in backups.iter().skip(self.retention) {
            debug!(backup = %stale.name, "pruning old backup");
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.name, error = %err, "failed to prune old backup");
            }
        }
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<FinanceState>, LedgerError> {
        if !self.state_file.exists() {
            return Ok(None);
        }
        read_snapshot(&self.state_file).map(Some)
    }

    fn save(&self, state: &FinanceState) -> Result<(), LedgerError> {
        write_snapshot(state, &self.state_file)?;
        debug!(path = %self.state_file.display(), "state snapshot written");
        Ok(())
    }
}

/// Serializes `state` to `path` through a sibling temp file and a rename, so a
/// failed write leaves the previous snapshot intact.
pub fn write_snapshot(state: &FinanceState, path: &Path) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<FinanceState, LedgerError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
        } else if !sanitized.is_empty() && !sanitized.ends_with('-') {
            sanitized.push('-');
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let raw = rest.get(..15)?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
