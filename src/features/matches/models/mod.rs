mod item_match;

pub use item_match::{normalize_pair, ItemMatch, MatchMessage, MatchStatus, MatchStatusChange};
