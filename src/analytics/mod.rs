//! Derived evolution analytics over a workflow's stored history.
//!
//! Everything in this module is read-only and side-effect-free: metrics are
//! folded out of the version list and the diff engine, never stored back.

use crate::diff::compute_diff;
use crate::graph::type_suffix;
use crate::store::{SaveType, Version};
use ahash::AHashMap;
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use itertools::Itertools;
use serde::Serialize;

/// Shape metrics for a single stored version.
#[derive(Debug, Clone, Serialize)]
pub struct VersionMetrics {
    pub version_number: u32,
    pub node_count: usize,
    pub edge_count: usize,
    /// `node_count + 2 * edge_count`.
    pub complexity: usize,
    pub timestamp: DateTime<Utc>,
    pub save_type: SaveType,
}

/// Whole-history summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionSummary {
    pub total_versions: usize,
    /// One less than the version count; the first save is not an edit.
    pub total_edits: usize,
    pub average_nodes_per_version: f64,
    /// Percentage growth from the first to the last version; 0 when the
    /// first version's count is 0.
    pub node_growth_rate: f64,
    pub edge_growth_rate: f64,
    pub complexity_growth_rate: f64,
    /// Seconds between the first and the last save.
    pub version_span_seconds: i64,
    pub save_type_counts: AHashMap<SaveType, usize>,
    /// Weekday with the most saves, or `"N/A"` for an empty history.
    pub most_productive_day: String,
}

/// One `(weekday, hour)` bucket of the save-time histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPatternBucket {
    pub day_of_week: String,
    pub hour_of_day: u32,
    pub count: usize,
}

/// Accumulated add/remove/modify counts for one node type.
///
/// Types are keyed by the last dot-segment of their namespace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeTypeChurn {
    pub node_type: String,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
}

impl NodeTypeChurn {
    pub fn total(&self) -> usize {
        self.added_count + self.removed_count + self.modified_count
    }
}

/// The version whose complexity moved furthest from its predecessor.
#[derive(Debug, Clone, Serialize)]
pub struct ComplexityDelta {
    pub version_number: u32,
    pub complexity: usize,
    pub delta_from_previous: i64,
}

/// The full derived analytics bundle for one workflow's history.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionReport {
    /// Metrics per version, ascending by version number.
    pub per_version: Vec<VersionMetrics>,
    pub summary: EvolutionSummary,
    /// Histogram buckets ordered by weekday then hour.
    pub edit_patterns: Vec<EditPatternBucket>,
    /// Per-type churn, descending by total churn.
    pub node_type_churn: Vec<NodeTypeChurn>,
    /// The version with the highest complexity (first such, on ties).
    pub peak_complexity: Option<VersionMetrics>,
    pub most_changed: Option<ComplexityDelta>,
}

/// Derives the full evolution report from a workflow's versions.
///
/// Input order does not matter; versions are sorted ascending by version
/// number before folding. The consecutive-pair churn analysis invokes the
/// diff engine once per adjacent pair.
pub fn analyze(versions: &[Version]) -> EvolutionReport {
    let mut ordered: Vec<&Version> = versions.iter().collect();
    ordered.sort_by_key(|v| v.version_number);

    let per_version: Vec<VersionMetrics> = ordered.iter().map(|v| version_metrics(v)).collect();

    EvolutionReport {
        summary: summarize(&per_version),
        edit_patterns: edit_patterns(&per_version),
        node_type_churn: node_type_churn(&ordered),
        peak_complexity: peak_complexity(&per_version),
        most_changed: most_changed(&per_version),
        per_version,
    }
}

/// Shape metrics of one version's snapshot.
pub fn version_metrics(version: &Version) -> VersionMetrics {
    let node_count = version.graph_snapshot.node_count();
    let edge_count = version.graph_snapshot.edge_count();
    VersionMetrics {
        version_number: version.version_number,
        node_count,
        edge_count,
        complexity: node_count + 2 * edge_count,
        timestamp: version.created_at,
        save_type: version.save_type,
    }
}

fn summarize(metrics: &[VersionMetrics]) -> EvolutionSummary {
    let total_versions = metrics.len();
    let total_edits = total_versions.saturating_sub(1);

    let average_nodes_per_version = if metrics.is_empty() {
        0.0
    } else {
        metrics.iter().map(|m| m.node_count as f64).sum::<f64>() / total_versions as f64
    };

    let (node_growth_rate, edge_growth_rate, complexity_growth_rate, version_span_seconds) =
        match (metrics.first(), metrics.last()) {
            (Some(first), Some(last)) => (
                growth_rate(first.node_count, last.node_count),
                growth_rate(first.edge_count, last.edge_count),
                growth_rate(first.complexity, last.complexity),
                (last.timestamp - first.timestamp).num_seconds(),
            ),
            _ => (0.0, 0.0, 0.0, 0),
        };

    let mut save_type_counts: AHashMap<SaveType, usize> = AHashMap::new();
    for m in metrics {
        *save_type_counts.entry(m.save_type).or_insert(0) += 1;
    }

    EvolutionSummary {
        total_versions,
        total_edits,
        average_nodes_per_version,
        node_growth_rate,
        edge_growth_rate,
        complexity_growth_rate,
        version_span_seconds,
        save_type_counts,
        most_productive_day: most_productive_day(metrics),
    }
}

/// `(last - first) / first * 100`, guarded against a zero denominator.
fn growth_rate(first: usize, last: usize) -> f64 {
    if first == 0 {
        0.0
    } else {
        (last as f64 - first as f64) / first as f64 * 100.0
    }
}

fn most_productive_day(metrics: &[VersionMetrics]) -> String {
    if metrics.is_empty() {
        return "N/A".to_string();
    }
    let mut counts: AHashMap<Weekday, usize> = AHashMap::new();
    for m in metrics {
        *counts.entry(m.timestamp.weekday()).or_insert(0) += 1;
    }
    // Fixed scan order makes the winner deterministic on ties.
    let mut best = (Weekday::Mon, 0usize);
    for day in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        let count = counts.get(&day).copied().unwrap_or(0);
        if count > best.1 {
            best = (day, count);
        }
    }
    weekday_name(best.0).to_string()
}

fn edit_patterns(metrics: &[VersionMetrics]) -> Vec<EditPatternBucket> {
    let mut buckets: AHashMap<(u32, u32), usize> = AHashMap::new();
    for m in metrics {
        let key = (m.timestamp.weekday().num_days_from_monday(), m.timestamp.hour());
        *buckets.entry(key).or_insert(0) += 1;
    }

    let mut out: Vec<((u32, u32), usize)> = buckets.into_iter().collect();
    out.sort_unstable_by_key(|(key, _)| *key);
    out.into_iter()
        .map(|((day, hour), count)| EditPatternBucket {
            day_of_week: weekday_name(weekday_from_monday_index(day)).to_string(),
            hour_of_day: hour,
            count,
        })
        .collect()
}

fn node_type_churn(ordered: &[&Version]) -> Vec<NodeTypeChurn> {
    let mut by_type: AHashMap<String, NodeTypeChurn> = AHashMap::new();

    for (previous, next) in ordered.iter().tuple_windows() {
        let diff = compute_diff(Some(&previous.graph_snapshot), Some(&next.graph_snapshot));
        for node in &diff.added_nodes {
            churn_entry(&mut by_type, &node.node_type).added_count += 1;
        }
        for node in &diff.removed_nodes {
            churn_entry(&mut by_type, &node.node_type).removed_count += 1;
        }
        for modification in &diff.modified_nodes {
            churn_entry(&mut by_type, &modification.node_type).modified_count += 1;
        }
    }

    let mut out: Vec<NodeTypeChurn> = by_type.into_values().collect();
    out.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| a.node_type.cmp(&b.node_type))
    });
    out
}

fn churn_entry<'a>(
    by_type: &'a mut AHashMap<String, NodeTypeChurn>,
    node_type: &str,
) -> &'a mut NodeTypeChurn {
    let key = type_suffix(node_type).to_string();
    by_type.entry(key.clone()).or_insert_with(|| NodeTypeChurn {
        node_type: key,
        ..NodeTypeChurn::default()
    })
}

fn peak_complexity(metrics: &[VersionMetrics]) -> Option<VersionMetrics> {
    let mut best: Option<&VersionMetrics> = None;
    for m in metrics {
        if best.is_none_or(|current| m.complexity > current.complexity) {
            best = Some(m);
        }
    }
    best.cloned()
}

fn most_changed(metrics: &[VersionMetrics]) -> Option<ComplexityDelta> {
    let mut best: Option<ComplexityDelta> = None;
    for (previous, current) in metrics.iter().tuple_windows() {
        let delta = current.complexity as i64 - previous.complexity as i64;
        if best
            .as_ref()
            .is_none_or(|b| delta.abs() > b.delta_from_previous.abs())
        {
            best = Some(ComplexityDelta {
                version_number: current.version_number,
                complexity: current.complexity,
                delta_from_previous: delta,
            });
        }
    }
    best
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_from_monday_index(index: u32) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
