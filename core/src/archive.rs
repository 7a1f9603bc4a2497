use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::GameConfig;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Could not access stats file: {0}")]
    Io(#[from] io::Error),
    #[error("Stats file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOutcome {
    Win,
    Loss,
}

/// Persisted summary of one finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedRecord {
    pub outcome: RecordOutcome,
    pub duration_secs: u64,
    pub settings: GameConfig,
    pub timestamp: DateTime<Utc>,
}

impl ArchivedRecord {
    pub fn new(outcome: RecordOutcome, duration_secs: u64, settings: GameConfig) -> Self {
        Self {
            outcome,
            duration_secs,
            settings,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only store of finished games.
pub trait StatsArchive {
    fn append(&mut self, record: ArchivedRecord) -> Result<(), ArchiveError>;
    fn load_all(&self) -> Result<Vec<ArchivedRecord>, ArchiveError>;
}

impl<T: StatsArchive + ?Sized> StatsArchive for Box<T> {
    fn append(&mut self, record: ArchivedRecord) -> Result<(), ArchiveError> {
        (**self).append(record)
    }

    fn load_all(&self) -> Result<Vec<ArchivedRecord>, ArchiveError> {
        (**self).load_all()
    }
}

/// Keeps records for the lifetime of the process only.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    records: Vec<ArchivedRecord>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ArchivedRecord] {
        &self.records
    }
}

impl StatsArchive for MemoryArchive {
    fn append(&mut self, record: ArchivedRecord) -> Result<(), ArchiveError> {
        self.records.push(record);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ArchivedRecord>, ArchiveError> {
        Ok(self.records.clone())
    }
}

/// Stores all records as one JSON array. Every append rewrites the file through a temporary sibling.
#[derive(Debug)]
pub struct JsonFileArchive {
    path: PathBuf,
    records: Vec<ArchivedRecord>,
}

impl JsonFileArchive {
    /// Opens the archive at `path`, loading what is already there. A missing file is an empty archive.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let records = read_records(&path)?;
        log::debug!("Loaded {} archived games from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ArchivedRecord] {
        &self.records
    }

    fn write(&self, records: &[ArchivedRecord]) -> Result<(), ArchiveError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StatsArchive for JsonFileArchive {
    fn append(&mut self, record: ArchivedRecord) -> Result<(), ArchiveError> {
        let mut records = self.records.clone();
        records.push(record);
        self.write(&records)?;
        self.records = records;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ArchivedRecord>, ArchiveError> {
        read_records(&self.path)
    }
}

fn read_records(path: &Path) -> Result<Vec<ArchivedRecord>, ArchiveError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Aggregate numbers over archived games for one board configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub games: usize,
    pub wins: usize,
    pub best_secs: Option<u64>,
    pub total_secs: u64,
}

impl HistorySummary {
    pub fn for_settings(records: &[ArchivedRecord], settings: GameConfig) -> Self {
        records
            .iter()
            .filter(|record| record.settings == settings)
            .fold(Self::default(), |mut summary, record| {
                summary.games += 1;
                summary.total_secs += record.duration_secs;
                if record.outcome == RecordOutcome::Win {
                    summary.wins += 1;
                    summary.best_secs = Some(
                        summary
                            .best_secs
                            .map_or(record.duration_secs, |best| best.min(record.duration_secs)),
                    );
                }
                summary
            })
    }
}
