use async_trait::async_trait;
use sqlx::PgPool;

use crate::{errors::StoreAccessError, models::posts::Post};

pub mod memory_repo;
pub mod posts_repo;

pub use memory_repo::MemoryRepo;

/// Remote operations the blog view depends on. Every call is a full round
/// trip; implementations keep no client-side cache.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// The complete current set of posts, in whatever order the store keeps them.
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, StoreAccessError>;

    /// Persists a new post. The store assigns `id` and `timestamp`; callers
    /// must fetch again to observe the result.
    async fn create_post(
        &self,
        title: &str,
        body: &str,
        author: &str,
    ) -> Result<(), StoreAccessError>;
}

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
