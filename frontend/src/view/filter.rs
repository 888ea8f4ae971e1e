//! Status filter and free-text search over a snapshot.

use shared::{Snapshot, ToteRecord, ToteStatus};

/// Status chip selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ToteStatus),
}

impl StatusFilter {
    pub const CHOICES: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(ToteStatus::Normal),
        StatusFilter::Only(ToteStatus::Warning),
        StatusFilter::Only(ToteStatus::Critical),
    ];

    pub fn matches(&self, status: ToteStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

/// Ids of the records that pass both the status filter and the query, in
/// snapshot order.
///
/// The query is a case-insensitive substring match against the id, the
/// name and the location description; an empty query matches everything.
pub fn select(snapshot: &Snapshot, status: StatusFilter, query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    snapshot
        .iter()
        .filter(|record| status.matches(record.status))
        .filter(|record| needle.is_empty() || matches_query(record, &needle))
        .map(|record| record.id.clone())
        .collect()
}

fn matches_query(record: &ToteRecord, needle: &str) -> bool {
    let haystacks = [
        Some(record.id.as_str()),
        record.name.as_deref(),
        record.location.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tote(
        id: &str,
        status: ToteStatus,
        name: Option<&str>,
        location: Option<&str>,
    ) -> ToteRecord {
        let mut record = ToteRecord::new(id, status);
        record.name = name.map(str::to_string);
        record.location = location.map(str::to_string);
        record
    }

    fn fleet() -> Snapshot {
        Snapshot::from_records(vec![
            tote("TOTE001", ToteStatus::Normal, Some("Tote001"), Some("Warehouse A")),
            tote("TOTE002", ToteStatus::Warning, Some("Freezer"), Some("Dock 2")),
            tote("TOTE003", ToteStatus::Critical, None, None),
            tote("TOTE004", ToteStatus::Normal, Some("Tote004"), Some("Warehouse D")),
        ])
    }

    #[test]
    fn all_with_empty_query_keeps_snapshot_order() {
        assert_eq!(
            select(&fleet(), StatusFilter::All, ""),
            vec!["TOTE001", "TOTE002", "TOTE003", "TOTE004"]
        );
    }

    #[test]
    fn status_filter_narrows() {
        assert_eq!(
            select(&fleet(), StatusFilter::Only(ToteStatus::Normal), ""),
            vec!["TOTE001", "TOTE004"]
        );
        assert!(select(&Snapshot::empty(), StatusFilter::All, "").is_empty());
    }

    #[test]
    fn query_matches_location_case_insensitively() {
        assert_eq!(
            select(&fleet(), StatusFilter::All, "warehouse"),
            vec!["TOTE001", "TOTE004"]
        );
        assert_eq!(select(&fleet(), StatusFilter::All, "FREEZER"), vec!["TOTE002"]);
        assert_eq!(select(&fleet(), StatusFilter::All, "tote003"), vec!["TOTE003"]);
        assert!(select(&fleet(), StatusFilter::All, "zz").is_empty());
    }

    #[test]
    fn query_and_status_combine() {
        assert_eq!(
            select(&fleet(), StatusFilter::Only(ToteStatus::Warning), "warehouse"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let snapshot = fleet();
        let first = select(&snapshot, StatusFilter::All, "o");
        let second = select(&snapshot, StatusFilter::All, "o");
        assert_eq!(first, second);
    }
}
