//! File-backed per-user state: counters, display names, last-use times and
//! cooldown anchors, each kept in its own JSON document.

pub mod json_map;
pub mod repair;

use std::{fs, path::PathBuf};

use chrono::{NaiveDateTime, TimeDelta};
use serde_json::Value;

use crate::{
    error::Result,
    util::{cooldown::CooldownTracker, timestamp::Timestamp},
};
use json_map::JsonMap;

pub const COUNT_FILE: &str = "emoji_count.json";
pub const USER_NAMES_FILE: &str = "user_names.json";
pub const LAST_TIME_FILE: &str = "last_time.json";
pub const COOLDOWN_FILE: &str = "cooldown.json";

#[derive(Debug)]
pub struct UsageStore {
    dir: PathBuf,
    counts: JsonMap<u64>,
    names: JsonMap<String>,
    last_used: JsonMap<String>,
    cooldowns: CooldownTracker,
}

impl UsageStore {
    /// Loads every mapping from `dir` and writes the repaired counters back
    /// before returning.
    pub fn open(dir: impl Into<PathBuf>, cooldown: TimeDelta) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let raw_counts: JsonMap<Value> = json_map::load_or_default(&dir.join(COUNT_FILE));
        let counts = repair::repair_counts(raw_counts);
        json_map::save(&counts, &dir.join(COUNT_FILE))?;

        let names = json_map::load_or_default(&dir.join(USER_NAMES_FILE));
        let last_used = repair::keep_text_entries(
            json_map::load_or_default(&dir.join(LAST_TIME_FILE)),
            LAST_TIME_FILE,
        );
        let anchors = repair::keep_timestamp_entries(
            json_map::load_or_default(&dir.join(COOLDOWN_FILE)),
            COOLDOWN_FILE,
        );

        tracing::info!(
            "Opened store at {} ({} counted users, {} known names)",
            dir.display(),
            counts.len(),
            names.len()
        );

        Ok(Self {
            dir,
            counts,
            names,
            last_used,
            cooldowns: CooldownTracker::with_anchors(anchors, cooldown),
        })
    }

    pub fn close(self) -> Result<()> {
        self.save_counts()?;
        self.save_names()?;
        self.save_last_used()?;
        self.save_cooldowns()?;
        tracing::info!("Closed store at {}", self.dir.display());
        Ok(())
    }

    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    pub fn remember_name(&mut self, user_id: &str, display_name: &str) -> Result<()> {
        self.names
            .insert(user_id.to_string(), display_name.to_string());
        self.save_names()
    }

    pub fn count(&self, user_id: &str) -> Option<u64> {
        self.counts.get(user_id).copied()
    }

    /// Counted users in first-seen order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .iter()
            .map(|(user_id, count)| (user_id.as_str(), *count))
    }

    /// Last-use time as stored, which may predate the current format.
    pub fn last_used(&self, user_id: &str) -> Option<&str> {
        self.last_used.get(user_id).map(String::as_str)
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Adds `occurrences` to the user's total, stamps the last-use time,
    /// opens a new cooldown window and persists all three mappings.
    pub fn record_usage(
        &mut self,
        user_id: &str,
        occurrences: u64,
        now: NaiveDateTime,
    ) -> Result<u64> {
        let total = self.counts.entry(user_id.to_string()).or_insert(0);
        *total = total.saturating_add(occurrences);
        let total = *total;

        self.last_used
            .insert(user_id.to_string(), Timestamp::at(now).to_string());
        self.cooldowns.start(user_id, now);

        self.save_counts()?;
        self.save_last_used()?;
        self.save_cooldowns()?;

        Ok(total)
    }

    fn save_counts(&self) -> Result<()> {
        json_map::save(&self.counts, &self.dir.join(COUNT_FILE))
    }

    fn save_names(&self) -> Result<()> {
        json_map::save(&self.names, &self.dir.join(USER_NAMES_FILE))
    }

    fn save_last_used(&self) -> Result<()> {
        json_map::save(&self.last_used, &self.dir.join(LAST_TIME_FILE))
    }

    fn save_cooldowns(&self) -> Result<()> {
        json_map::save(self.cooldowns.anchors(), &self.dir.join(COOLDOWN_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn open_repairs_counters_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(COUNT_FILE),
            r#"{"u1": "2025-02-28 09:15:00", "u2": 6, "u3": "many"}"#,
        )
        .unwrap();

        let store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        assert_eq!(store.count("u1"), Some(1));
        assert_eq!(store.count("u2"), Some(6));
        assert_eq!(store.count("u3"), Some(1));

        let on_disk: JsonMap<u64> = json_map::load(&dir.path().join(COUNT_FILE)).unwrap();
        assert_eq!(on_disk, store.counts);
    }

    #[test]
    fn corrupt_files_start_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(USER_NAMES_FILE), "not json").unwrap();
        fs::write(dir.path().join(COOLDOWN_FILE), r#"{"u1": "yesterday"}"#).unwrap();

        let store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        assert_eq!(store.display_name("u1"), None);
        assert!(!store.cooldowns().is_in_cooldown("u1", noon()));
    }

    #[test]
    fn record_usage_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();

        assert_eq!(store.record_usage("u1", 2, noon()).unwrap(), 2);
        assert_eq!(store.record_usage("u1", 1, noon()).unwrap(), 3);
        store.remember_name("u1", "小明").unwrap();

        let reopened = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        assert_eq!(reopened.count("u1"), Some(3));
        assert_eq!(reopened.display_name("u1"), Some("小明"));
        assert_eq!(reopened.last_used("u1"), Some("2025-03-01 12:00:00"));
        assert!(reopened.cooldowns().is_in_cooldown("u1", noon()));
    }

    #[test]
    fn one_bad_timestamp_keeps_other_users_history() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(COUNT_FILE), r#"{"u1": 3, "u2": 5}"#).unwrap();
        fs::write(
            dir.path().join(LAST_TIME_FILE),
            r#"{"u1": "2025-03-01 11:55:00", "u2": "2025/03/01 11:55"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(COOLDOWN_FILE),
            r#"{"u1": "2025-03-01 11:55:00", "u2": "2025/03/01 11:55"}"#,
        )
        .unwrap();

        let mut store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        assert_eq!(store.last_used("u1"), Some("2025-03-01 11:55:00"));
        assert_eq!(store.last_used("u2"), Some("2025/03/01 11:55"));
        assert!(store.cooldowns().is_in_cooldown("u1", noon()));
        assert!(!store.cooldowns().is_in_cooldown("u2", noon()));

        store.record_usage("u3", 1, noon()).unwrap();

        let last_on_disk: JsonMap<String> =
            json_map::load(&dir.path().join(LAST_TIME_FILE)).unwrap();
        assert_eq!(
            last_on_disk.keys().collect::<Vec<_>>(),
            vec!["u1", "u2", "u3"]
        );
        let anchors_on_disk: JsonMap<String> =
            json_map::load(&dir.path().join(COOLDOWN_FILE)).unwrap();
        assert_eq!(anchors_on_disk["u1"], "2025-03-01 11:55:00");
        assert!(anchors_on_disk.contains_key("u3"));
    }

    #[test]
    fn count_saturates_instead_of_overflowing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(COUNT_FILE),
            format!(r#"{{"u1": {}}}"#, u64::MAX - 1),
        )
        .unwrap();

        let mut store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        assert_eq!(store.record_usage("u1", 5, noon()).unwrap(), u64::MAX);
    }

    #[test]
    fn close_flushes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = UsageStore::open(dir.path(), TimeDelta::minutes(10)).unwrap();
        store.record_usage("u1", 1, noon()).unwrap();
        store.close().unwrap();

        for file in [COUNT_FILE, USER_NAMES_FILE, LAST_TIME_FILE, COOLDOWN_FILE] {
            assert!(dir.path().join(file).exists(), "{} missing", file);
        }
    }
}
