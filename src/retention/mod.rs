//! Retention policy: reclaims storage by age and count while protecting
//! pinned versions.

use crate::store::{SaveType, Version};
use chrono::{DateTime, Duration, Utc};

/// Age and count limits applied to one workflow's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Upper bound on surviving versions, pinned ones included in the count.
    pub max_versions: usize,
    /// Manual, checkpoint, and restore saves older than this many days are dropped.
    pub keep_manual_days: i64,
    /// Autosaves older than this many days are dropped.
    pub keep_autosave_days: i64,
}

impl RetentionPolicy {
    pub fn new(max_versions: usize, keep_manual_days: i64, keep_autosave_days: i64) -> Self {
        Self {
            max_versions,
            keep_manual_days,
            keep_autosave_days,
        }
    }

    /// Applies the policy to a version list and returns the survivors,
    /// newest first.
    ///
    /// Two passes. Age filter: pinned versions always survive; autosaves
    /// survive iff newer than the autosave cutoff; every other save type iff
    /// newer than the manual cutoff. Count filter: if more than
    /// `max_versions` survive, pinned versions are all kept and the
    /// `max_versions - pinned` most recent unpinned versions (by version
    /// number) fill the remainder. Pure: applying the same policy twice
    /// removes nothing the second time.
    pub fn apply(&self, versions: Vec<Version>, now: DateTime<Utc>) -> Vec<Version> {
        let manual_cutoff = now - Duration::days(self.keep_manual_days);
        let autosave_cutoff = now - Duration::days(self.keep_autosave_days);

        let mut survivors: Vec<Version> = versions
            .into_iter()
            .filter(|v| {
                if v.is_pinned {
                    return true;
                }
                match v.save_type {
                    SaveType::Autosave => v.created_at > autosave_cutoff,
                    _ => v.created_at > manual_cutoff,
                }
            })
            .collect();

        if survivors.len() > self.max_versions {
            let (pinned, mut unpinned): (Vec<Version>, Vec<Version>) =
                survivors.into_iter().partition(|v| v.is_pinned);
            unpinned.sort_by(|a, b| b.version_number.cmp(&a.version_number));
            unpinned.truncate(self.max_versions.saturating_sub(pinned.len()));
            survivors = pinned;
            survivors.extend(unpinned);
        }

        survivors.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        survivors
    }
}
