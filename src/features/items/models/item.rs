use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Whether a report describes something lost or something found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "item_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Lost => write!(f, "lost"),
            ItemKind::Found => write!(f, "found"),
        }
    }
}

/// Admin-controlled visibility gate; only approved items are publicly browsable
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            other => Err(format!("Invalid moderation status: {}", other)),
        }
    }
}

/// Database model for a lost or found report
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: ItemKind,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    pub image_base64: Option<String>,
    pub is_resolved: bool,
    pub moderation_status: ModerationStatus,
    pub moderation_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_public(&self) -> bool {
        self.moderation_status == ModerationStatus::Approved
    }
}

/// Partial update applied to an item; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub kind: Option<ItemKind>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub image_base64: Option<String>,
    pub is_resolved: Option<bool>,
}

impl ItemPatch {
    pub fn resolved(is_resolved: bool) -> Self {
        Self {
            is_resolved: Some(is_resolved),
            ..Default::default()
        }
    }

    pub fn apply(&self, item: &mut Item) {
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(ref name) = self.name {
            item.name = name.clone();
        }
        if let Some(ref category) = self.category {
            item.category = Some(category.clone());
        }
        if let Some(ref description) = self.description {
            item.description = Some(description.clone());
        }
        if let Some(ref location) = self.location {
            item.location = location.clone();
        }
        if let Some(date) = self.date {
            item.date = date;
        }
        if let Some(ref image) = self.image_base64 {
            item.image_base64 = Some(image.clone());
        }
        if let Some(is_resolved) = self.is_resolved {
            item.is_resolved = is_resolved;
        }
        item.updated_at = Utc::now();
    }
}

/// Query over the item collection. Every populated field must match.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub owner: Option<Uuid>,
    pub kind: Option<ItemKind>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    /// Case-insensitive substring of name, description or location
    pub search: Option<String>,
    pub moderation_status: Option<ModerationStatus>,
    pub is_resolved: Option<bool>,
    pub offset: i64,
    pub limit: i64,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if self.owner.is_some_and(|owner| owner != item.user_id) {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != item.kind) {
            return false;
        }
        if self
            .moderation_status
            .is_some_and(|status| status != item.moderation_status)
        {
            return false;
        }
        if self.is_resolved.is_some_and(|r| r != item.is_resolved) {
            return false;
        }
        if let Some(ref location) = self.location {
            if !contains_ci(&item.location, location) {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let hit = contains_ci(&item.name, search)
                || item
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, search))
                || contains_ci(&item.location, search);
            if !hit {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, location: &str) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            kind: ItemKind::Lost,
            name: name.to_string(),
            category: None,
            description: Some("Black leather, silver zip".to_string()),
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            image_base64: None,
            is_resolved: false,
            moderation_status: ModerationStatus::Approved,
            moderation_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_filter_search_spans_fields() {
        let wallet = item("Wallet", "Central Station");
        let by_name = ItemFilter {
            search: Some("wall".into()),
            ..Default::default()
        };
        let by_description = ItemFilter {
            search: Some("LEATHER".into()),
            ..Default::default()
        };
        let by_location = ItemFilter {
            search: Some("station".into()),
            ..Default::default()
        };
        let miss = ItemFilter {
            search: Some("umbrella".into()),
            ..Default::default()
        };

        assert!(by_name.matches(&wallet));
        assert!(by_description.matches(&wallet));
        assert!(by_location.matches(&wallet));
        assert!(!miss.matches(&wallet));
    }

    #[test]
    fn test_filter_kind_and_moderation() {
        let mut wallet = item("Wallet", "Library");
        let approved_found = ItemFilter {
            kind: Some(ItemKind::Found),
            moderation_status: Some(ModerationStatus::Approved),
            ..Default::default()
        };
        assert!(!approved_found.matches(&wallet));

        wallet.kind = ItemKind::Found;
        assert!(approved_found.matches(&wallet));

        wallet.moderation_status = ModerationStatus::Rejected;
        assert!(!approved_found.matches(&wallet));
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut wallet = item("Wallet", "Library");
        let patch = ItemPatch {
            location: Some("Cafeteria".into()),
            ..Default::default()
        };
        patch.apply(&mut wallet);

        assert_eq!(wallet.location, "Cafeteria");
        assert_eq!(wallet.name, "Wallet");
        assert!(!wallet.is_resolved);
    }

    #[test]
    fn test_moderation_status_parse() {
        assert_eq!(
            "rejected".parse::<ModerationStatus>(),
            Ok(ModerationStatus::Rejected)
        );
        assert!("archived".parse::<ModerationStatus>().is_err());
    }
}
