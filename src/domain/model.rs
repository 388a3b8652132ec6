use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `tblhosting.id`, which the panel stores as a server's `external_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub i64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SubscriptionId {
    /// Normalises a panel `external_id` (string, number or null).
    ///
    /// Strings must be ASCII digits only, without signs or surrounding
    /// whitespace. Null, empty and non-numeric values yield `None`: they can
    /// never match a billing subscription.
    pub fn from_external_id(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(SubscriptionId),
            serde_json::Value::String(s) => {
                if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                s.parse().ok().map(SubscriptionId)
            }
            _ => None,
        }
    }
}

/// `tblproductconfigoptionssub.id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub i64);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        option_id: OptionId,
        rows_affected: u64,
    },
    NoMatchingOption {
        label: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub subscriptions_in_scope: usize,
    pub servers_matched: usize,
    pub updated: usize,
    pub skipped_no_option: usize,
    pub missing_rows: usize,
    pub committed: bool,
}

impl SyncReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            subscriptions_in_scope: 0,
            servers_matched: 0,
            updated: 0,
            skipped_no_option: 0,
            missing_rows: 0,
            committed: false,
        }
    }

    pub fn record(&mut self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Updated { rows_affected, .. } => {
                self.updated += 1;
                if *rows_affected == 0 {
                    self.missing_rows += 1;
                }
            }
            UpdateOutcome::NoMatchingOption { .. } => self.skipped_no_option += 1,
        }
    }

    pub fn finish(&mut self, committed: bool) {
        self.committed = committed;
        self.finished_at = Some(Utc::now());
    }
}
