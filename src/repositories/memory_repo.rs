use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::{errors::StoreAccessError, models::posts::Post};

use super::PostStore;

/// In-process post store. Ids are assigned in increasing order and posts are
/// returned in creation order. Failures can be switched on to stand in for an
/// unreachable backend.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    posts: Vec<Post>,
    last_id: u128,
    fail_fetches: bool,
    fail_creates: bool,
    fetch_calls: usize,
    create_calls: usize,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing records; new ids continue after the largest one.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let last_id = posts.iter().map(|post| post.id).max().unwrap_or(0);
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                posts,
                last_id,
                ..Default::default()
            })),
        }
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.state().fail_fetches = fail;
    }

    pub fn fail_creates(&self, fail: bool) {
        self.state().fail_creates = fail;
    }

    pub fn fetch_calls(&self) -> usize {
        self.state().fetch_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PostStore for MemoryRepo {
    async fn fetch_all_posts(&self) -> Result<Vec<Post>, StoreAccessError> {
        let mut state = self.state();
        state.fetch_calls += 1;
        if state.fail_fetches {
            return Err(StoreAccessError::Unavailable("fetch disabled".into()));
        }
        Ok(state.posts.clone())
    }

    async fn create_post(
        &self,
        title: &str,
        body: &str,
        author: &str,
    ) -> Result<(), StoreAccessError> {
        let mut state = self.state();
        state.create_calls += 1;
        if state.fail_creates {
            return Err(StoreAccessError::Unavailable("create disabled".into()));
        }

        let timestamp = Utc::now()
            .timestamp_nanos_opt()
            .ok_or_else(|| StoreAccessError::Rejected("clock out of range".into()))?;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreAccessError::Rejected("post ids exhausted".into()))?;
        state.last_id = id;
        state.posts.push(Post {
            id,
            title: title.to_string(),
            body: body.to_string(),
            author: author.to_string(),
            timestamp: i128::from(timestamp),
        });
        debug!(id = %id, "stored post");

        Ok(())
    }
}
