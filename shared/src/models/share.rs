//! Shareable public report links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which list a shared report renders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Surat,
    Bayaran,
    Fail,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Surat => "surat",
            ReportKind::Bayaran => "bayaran",
            ReportKind::Fail => "fail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "surat" => Some(ReportKind::Surat),
            "bayaran" => Some(ReportKind::Bayaran),
            "fail" => Some(ReportKind::Fail),
            _ => None,
        }
    }
}

/// A public link freezing the control bundle of a list screen.
///
/// The link stores controls, not rows: opening it re-runs the query over the
/// records current at that moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: Uuid,
    pub kind: ReportKind,
    pub title: Option<String>,
    /// Serialized `ListControls` for `kind`
    pub controls: serde_json::Value,
    pub created_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_report_kind_round_names() {
        for kind in [ReportKind::Surat, ReportKind::Bayaran, ReportKind::Fail] {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReportKind::parse("pengguna"), None);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let link = ShareLink {
            id: Uuid::new_v4(),
            kind: ReportKind::Bayaran,
            title: None,
            controls: serde_json::json!({}),
            created_by: Uuid::new_v4(),
            expires_at: now + Duration::days(1),
            created_at: now,
        };
        assert!(!link.is_expired(now));
        assert!(link.is_expired(now + Duration::days(1)));
    }
}
