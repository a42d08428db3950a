// Service exports
pub mod cache;
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod supabase;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CachedProfileStore};
pub use matching::{MatchError, MatchService};
pub use memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
pub use store::{merge_for_upsert, ProfileStore, StoreContext, StoreError, DEFAULT_POOL_LIMIT};
pub use supabase::SupabaseClient;
