use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Error;
use crate::types::{Challenge, ChallengePage};

/// Persistence seam for challenge records. The engine only needs lookup,
/// write-back, and a paginated listing; durable storage is the platform's
/// concern.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Challenge>, Error>;

    async fn save(&self, challenge: Challenge) -> Result<(), Error>;

    /// One page of challenges, newest first. `page` is 1-based.
    async fn list(&self, page: usize, limit: usize) -> Result<ChallengePage, Error>;
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<Uuid, Challenge>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Challenge>, Error> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn save(&self, challenge: Challenge) -> Result<(), Error> {
        self.inner.write().await.insert(challenge.id, challenge);
        Ok(())
    }

    async fn list(&self, page: usize, limit: usize) -> Result<ChallengePage, Error> {
        let page = page.max(1);
        let limit = limit.max(1);

        let inner = self.inner.read().await;
        let mut all: Vec<Challenge> = inner.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_challenges = all.len();
        let total_pages = total_challenges.div_ceil(limit);
        let challenges = all
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(ChallengePage {
            challenges,
            total_challenges,
            total_pages,
            current_page: page,
        })
    }
}
