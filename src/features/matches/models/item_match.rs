use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a candidate pairing.
///
/// `pending` moves to `confirmed` or `rejected`; `confirmed` moves to
/// `resolved`. `rejected` and `resolved` are terminal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    Resolved,
}

impl MatchStatus {
    #[cfg(test)]
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Pending,
        MatchStatus::Confirmed,
        MatchStatus::Rejected,
        MatchStatus::Resolved,
    ];

    /// Whether a match may move from `self` to `next` in one step
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Pending, MatchStatus::Confirmed)
                | (MatchStatus::Pending, MatchStatus::Rejected)
                | (MatchStatus::Confirmed, MatchStatus::Resolved)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Rejected | MatchStatus::Resolved)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Confirmed => write!(f, "confirmed"),
            MatchStatus::Rejected => write!(f, "rejected"),
            MatchStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// One entry in a match's conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchMessage {
    pub sent_by: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for a candidate pairing of two items.
///
/// The pair is stored normalized so that `item_a_id < item_b_id`.
#[derive(Debug, Clone, FromRow)]
pub struct ItemMatch {
    pub id: Uuid,
    pub item_a_id: Uuid,
    pub item_b_id: Uuid,
    pub created_by: Uuid,
    pub status: MatchStatus,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub messages: Json<Vec<MatchMessage>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order a pair of item ids so the smaller comes first
pub fn normalize_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ItemMatch {
    /// A fresh `pending` match; the pair is normalized here
    pub fn new(item_x: Uuid, item_y: Uuid, created_by: Uuid, notes: Option<String>) -> Self {
        let (item_a_id, item_b_id) = normalize_pair(item_x, item_y);
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            item_a_id,
            item_b_id,
            created_by,
            status: MatchStatus::Pending,
            notes,
            admin_notes: None,
            resolved_by: None,
            resolved_at: None,
            messages: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item_ids(&self) -> [Uuid; 2] {
        [self.item_a_id, self.item_b_id]
    }

    pub fn references(&self, item_id: Uuid) -> bool {
        self.item_a_id == item_id || self.item_b_id == item_id
    }
}

/// A validated status update, ready to be written
#[derive(Debug, Clone)]
pub struct MatchStatusChange {
    pub status: MatchStatus,
    /// `None` keeps the current admin notes
    pub admin_notes: Option<String>,
    /// Set only when entering `resolved`
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl MatchStatusChange {
    pub fn apply(&self, m: &mut ItemMatch) {
        m.status = self.status;
        if let Some(ref notes) = self.admin_notes {
            m.admin_notes = Some(notes.clone());
        }
        if self.resolved_by.is_some() {
            m.resolved_by = self.resolved_by;
            m.resolved_at = self.resolved_at;
        }
        m.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use MatchStatus::*;

        let allowed = [(Pending, Confirmed), (Pending, Rejected), (Confirmed, Resolved)];
        for from in MatchStatus::ALL {
            for to in MatchStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_pending_never_jumps_to_resolved() {
        assert!(!MatchStatus::Pending.can_transition_to(MatchStatus::Resolved));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in MatchStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(MatchStatus::ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_new_match_normalizes_pair() {
        let x = Uuid::now_v7();
        let y = Uuid::now_v7();
        let creator = Uuid::now_v7();

        let forward = ItemMatch::new(x, y, creator, None);
        let backward = ItemMatch::new(y, x, creator, None);

        assert_eq!(forward.item_ids(), backward.item_ids());
        assert!(forward.item_a_id < forward.item_b_id);
        assert_eq!(forward.status, MatchStatus::Pending);
    }
}
