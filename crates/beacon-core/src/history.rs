//! Capped trend history persisted as a JSON array.
//!
//! Appends drop the oldest entry once `cap` is reached, so the log always
//! holds the most recent `cap` entries in insertion order.

use crate::model::MetricName;
use crate::vitals::VitalsReport;
use anyhow::Context;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub run_id: String,
    /// Sample-weighted good% per metric.
    pub good_pct: BTreeMap<MetricName, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

impl HistoryEntry {
    pub fn from_vitals(report: &VitalsReport, quality_score: Option<f64>) -> Self {
        Self {
            date: report.meta.generated_on,
            run_id: report.meta.run_id.clone(),
            good_pct: report
                .aggregates
                .iter()
                .map(|a| (a.metric, a.good_pct))
                .collect(),
            quality_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog<T> {
    cap: usize,
    entries: VecDeque<T>,
}

impl<T> HistoryLog<T> {
    /// `cap` of zero is treated as one.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            entries: VecDeque::with_capacity(cap),
        }
    }

    pub fn push(&mut self, entry: T) {
        while self.entries.len() >= self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries.into()
    }
}

impl<T: Serialize + DeserializeOwned> HistoryLog<T> {
    /// Missing file yields an empty log. A file longer than `cap` keeps only
    /// its last `cap` entries.
    pub fn load(path: &Path, cap: usize) -> anyhow::Result<Self> {
        let mut log = Self::new(cap);
        if !path.exists() {
            return Ok(log);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history {}", path.display()))?;
        let entries: Vec<T> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid history JSON in {}", path.display()))?;
        if entries.len() > log.cap {
            tracing::warn!(
                path = %path.display(),
                stored = entries.len(),
                cap = log.cap,
                "history longer than cap; keeping most recent entries"
            );
        }
        for e in entries {
            log.push(e);
        }
        Ok(log)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history {}", path.display()))?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "saved history");
        Ok(())
    }
}

/// Load, append one entry, save. Returns the updated log.
pub fn append_entry(
    path: &Path,
    cap: usize,
    entry: HistoryEntry,
) -> anyhow::Result<HistoryLog<HistoryEntry>> {
    let mut log = HistoryLog::load(path, cap)?;
    log.push(entry);
    log.save(path)?;
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn entry(i: u32) -> HistoryEntry {
        HistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Days::new(i as u64),
            run_id: format!("run-{i}"),
            good_pct: BTreeMap::from([(MetricName::Lcp, 70.0 + i as f64 / 10.0)]),
            quality_score: None,
        }
    }

    #[test]
    fn keeps_most_recent_entries() {
        let mut log = HistoryLog::new(3);
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut log = HistoryLog::new(10);
        for i in 0..6 {
            log.push(i);
        }
        let tail: Vec<_> = log.recent(2).copied().collect();
        assert_eq!(tail, vec![4, 5]);
        assert_eq!(log.recent(100).count(), 6);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let log: HistoryLog<HistoryEntry> =
            HistoryLog::load(&dir.path().join("history.json"), 90).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn persisted_history_is_truncated_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let mut log = HistoryLog::new(10);
        for i in 0..10 {
            log.push(entry(i));
        }
        log.save(&path).unwrap();

        let reloaded: HistoryLog<HistoryEntry> = HistoryLog::load(&path, 4).unwrap();
        assert_eq!(reloaded.len(), 4);
        let ids: Vec<_> = reloaded.iter().map(|e| e.run_id.as_str()).collect();
        assert_eq!(ids, vec!["run-6", "run-7", "run-8", "run-9"]);
    }

    #[test]
    fn append_entry_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        for i in 0..3 {
            append_entry(&path, 2, entry(i)).unwrap();
        }
        let log: HistoryLog<HistoryEntry> = HistoryLog::load(&path, 2).unwrap();
        let ids: Vec<_> = log.iter().map(|e| e.run_id.clone()).collect();
        assert_eq!(ids, vec!["run-1", "run-2"]);
        assert_eq!(log.iter().last().unwrap(), &entry(2));
    }

    #[test]
    fn malformed_history_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = HistoryLog::<HistoryEntry>::load(&path, 5).unwrap_err();
        assert!(err.to_string().contains("invalid history JSON"));
    }

    proptest! {
        #[test]
        fn retention_holds_last_cap_entries(cap in 1usize..50, n in 0usize..200) {
            let mut log = HistoryLog::new(cap);
            for i in 0..n {
                log.push(i);
            }
            let expected: Vec<usize> = (n.saturating_sub(cap)..n).collect();
            prop_assert_eq!(log.len(), n.min(cap));
            prop_assert_eq!(log.into_vec(), expected);
        }
    }
}
