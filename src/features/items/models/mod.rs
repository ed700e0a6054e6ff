mod item;
mod trends;

pub use item::{Item, ItemFilter, ItemKind, ItemPatch, ModerationStatus};
pub use trends::{CategoryCount, ItemTrends, KindBucketCount, ResolutionBucket, TrendPeriod};
