//! Session history log
//!
//! One summary per finished (not force-finished) session, appended in order
//! and persisted as CSV.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_EPS;
use crate::error::StoreError;
use crate::sim::{GameResult, SessionSettings};

/// Reduced, persistable record of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub target_radius_frac: f32,
    pub cursor_radius_frac: f32,
    pub target_lifetime_ms: u32,
    pub game_time_sec: u32,
    pub min_spawn_delay_ms: u32,
    pub max_spawn_delay_ms: u32,
    pub end_by_spawn_count: bool,
    pub max_spawn_count: u32,
    pub hits: u32,
    pub avg_reaction_time: f32,
    pub score: f32,
    /// Unix timestamp (seconds) when recorded
    pub timestamp: i64,
}

impl HistorySummary {
    pub fn from_result(result: &GameResult, timestamp: i64) -> Self {
        let s = &result.settings;
        Self {
            target_radius_frac: s.target_radius_frac,
            cursor_radius_frac: s.cursor_radius_frac,
            target_lifetime_ms: s.target_lifetime_ms,
            game_time_sec: s.game_time_sec,
            min_spawn_delay_ms: s.min_spawn_delay_ms,
            max_spawn_delay_ms: s.max_spawn_delay_ms,
            end_by_spawn_count: s.end_by_spawn_count,
            max_spawn_count: s.max_spawn_count,
            hits: result.hits,
            avg_reaction_time: result.average_reaction_time,
            score: result.score,
            timestamp,
        }
    }

    /// True if this session was played with the same drill settings.
    ///
    /// Max spawn count only matters for count-based sessions.
    pub fn matches(&self, s: &SessionSettings) -> bool {
        (self.target_radius_frac - s.target_radius_frac).abs() < SETTINGS_EPS
            && (self.cursor_radius_frac - s.cursor_radius_frac).abs() < SETTINGS_EPS
            && self.target_lifetime_ms == s.target_lifetime_ms
            && self.game_time_sec == s.game_time_sec
            && self.min_spawn_delay_ms == s.min_spawn_delay_ms
            && self.max_spawn_delay_ms == s.max_spawn_delay_ms
            && self.end_by_spawn_count == s.end_by_spawn_count
            && (!self.end_by_spawn_count || self.max_spawn_count == s.max_spawn_count)
    }
}

/// All summaries recorded so far, oldest first
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistorySummary>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistorySummary>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistorySummary] {
        &self.entries
    }

    pub fn push(&mut self, summary: HistorySummary) {
        self.entries.push(summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sessions played with the same drill settings, oldest first
    pub fn matching<'a>(&'a self, settings: &SessionSettings) -> Vec<&'a HistorySummary> {
        self.entries.iter().filter(|s| s.matches(settings)).collect()
    }

    /// Aggregates over the sessions matching `settings`
    pub fn stats_for(&self, settings: &SessionSettings) -> Option<HistoryStats> {
        HistoryStats::compute(&self.matching(settings), settings.end_by_spawn_count)
    }
}

/// Aggregates over a set of comparable sessions
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub games: usize,
    pub max_score: f32,
    pub min_score: f32,
    pub avg_score: f32,
    /// Min score for count-based sessions, max for timed ones
    pub best_score: f32,
    /// Over games whose average reaction is > 0
    pub avg_reaction: Option<f32>,
    pub min_reaction: Option<f32>,
    pub max_reaction: Option<f32>,
}

impl HistoryStats {
    /// `None` for an empty set
    pub fn compute(summaries: &[&HistorySummary], end_by_spawn_count: bool) -> Option<Self> {
        if summaries.is_empty() {
            return None;
        }

        let scores = summaries.iter().map(|s| s.score);
        let max_score = scores.clone().fold(f32::MIN, f32::max);
        let min_score = scores.clone().fold(f32::MAX, f32::min);
        let avg_score = scores.sum::<f32>() / summaries.len() as f32;

        let reactions: Vec<f32> = summaries
            .iter()
            .map(|s| s.avg_reaction_time)
            .filter(|&rt| rt > 0.0)
            .collect();
        let avg_reaction =
            (!reactions.is_empty()).then(|| reactions.iter().sum::<f32>() / reactions.len() as f32);

        Some(Self {
            games: summaries.len(),
            max_score,
            min_score,
            avg_score,
            best_score: if end_by_spawn_count { min_score } else { max_score },
            avg_reaction,
            min_reaction: reactions.iter().copied().reduce(f32::min),
            max_reaction: reactions.iter().copied().reduce(f32::max),
        })
    }
}

/// Where summaries live between runs
pub trait HistoryStore {
    /// Every stored summary, oldest first
    fn load_all(&self) -> Result<Vec<HistorySummary>, StoreError>;
    fn append(&mut self, summary: &HistorySummary) -> Result<(), StoreError>;
}

/// Summaries as a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub const FILE_NAME: &'static str = "game_summaries.csv";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/game_summaries.csv`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for CsvHistoryStore {
    fn load_all(&self) -> Result<Vec<HistorySummary>, StoreError> {
        if !self.path.exists() {
            log::info!("No session history found, starting fresh");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = Vec::new();
        for (line, record) in reader.deserialize::<HistorySummary>().enumerate() {
            match record {
                Ok(summary) => entries.push(summary),
                Err(err) => log::warn!("Skipping history row {}: {err}", line + 1),
            }
        }
        log::info!("Loaded {} session summaries", entries.len());
        Ok(entries)
    }

    fn append(&mut self, summary: &HistorySummary) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Header only for a fresh file
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(summary)?;
        writer.flush()?;
        Ok(())
    }
}

/// In-process store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    pub entries: Vec<HistorySummary>,
}

impl HistoryStore for MemoryHistoryStore {
    fn load_all(&self) -> Result<Vec<HistorySummary>, StoreError> {
        Ok(self.entries.clone())
    }

    fn append(&mut self, summary: &HistorySummary) -> Result<(), StoreError> {
        self.entries.push(summary.clone());
        Ok(())
    }
}

/// Format a unix timestamp relative to `now` ("3 mins ago", "Yesterday", ...)
pub fn format_age(timestamp: i64, now: i64) -> String {
    let diff_secs = (now - timestamp).max(0);
    let mins = diff_secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if days >= 1 {
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            chrono::DateTime::from_timestamp(timestamp, 0)
                .map(|d| d.format("%m/%d/%y").to_string())
                .unwrap_or_else(|| "N/A".to_string())
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
