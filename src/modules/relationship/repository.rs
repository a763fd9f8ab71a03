use std::sync::Arc;

use crate::{
    api::error,
    constants::{ALREADY_FRIENDS, PENDING_REQUEST_EXISTS, RELATIONSHIP_NOT_FOUND},
    modules::{
        account::schema::AccountId,
        relationship::{
            filter::Filter,
            schema::{
                NewRelationship, RelationshipEntity, RelationshipId, RelationshipStatus,
                RelationshipUpdate,
            },
            store::RelationshipStore,
        },
    },
};

/// Domain lookups and mutations for relationships on top of a [`RelationshipStore`].
pub struct RelationshipRepository<S>
where
    S: RelationshipStore + Send + Sync,
{
    store: Arc<S>,
    insert_retry_attempts: u32,
}

impl<S> Clone for RelationshipRepository<S>
where
    S: RelationshipStore + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), insert_retry_attempts: self.insert_retry_attempts }
    }
}

/// The conflict reported when `existing` already occupies the pair.
pub fn conflict_for(existing: RelationshipEntity) -> error::SystemError {
    let message = match existing.status {
        RelationshipStatus::Pending => PENDING_REQUEST_EXISTS,
        RelationshipStatus::Accepted => ALREADY_FRIENDS,
    };
    error::SystemError::conflict(message, existing)
}

impl<S> RelationshipRepository<S>
where
    S: RelationshipStore + Send + Sync,
{
    pub fn new(store: Arc<S>, insert_retry_attempts: u32) -> Self {
        RelationshipRepository { store, insert_retry_attempts }
    }

    pub async fn find_by_id(
        &self,
        id: RelationshipId,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        self.store.find_one(&Filter::id(id)).await
    }

    pub async fn find_active_between(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        self.store.find_one(&Filter::between(a, b)).await
    }

    pub async fn find_pending_from(
        &self,
        requester: AccountId,
        requested: AccountId,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let filter =
            Filter::directed(requester, requested).and(Filter::status(RelationshipStatus::Pending));
        self.store.find_one(&filter).await
    }

    pub async fn find_accepted_between(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let filter = Filter::between(a, b).and(Filter::status(RelationshipStatus::Accepted));
        self.store.find_one(&filter).await
    }

    pub async fn find_pending_between(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let filter = Filter::between(a, b).and(Filter::status(RelationshipStatus::Pending));
        self.store.find_one(&filter).await
    }

    pub async fn find_all_involving(
        &self,
        id: AccountId,
        status: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let filter = match status {
            Some(status) => Filter::involving(id).and(Filter::status(status)),
            None => Filter::involving(id),
        };
        self.store.find_many(&filter).await
    }

    /// Accepted relationships touching any of `ids`.
    pub async fn find_accepted_involving_any(
        &self,
        ids: &[AccountId],
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = Filter::involving_any(ids).and(Filter::status(RelationshipStatus::Accepted));
        self.store.find_many(&filter).await
    }

    pub async fn find_matching(
        &self,
        filter: &Filter,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        self.store.find_many(filter).await
    }

    /// Creates a pending request, or fails with a conflict carrying the record that owns the pair.
    pub async fn insert(
        &self,
        requester: AccountId,
        requested: AccountId,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let record = NewRelationship { requester_id: requester, requested_id: requested };
        let mut attempt = 0;

        loop {
            match self.store.insert(record).await {
                Ok(created) => return Ok(created),
                Err(error::SystemError::Duplicate(meta)) => {
                    tracing::warn!(
                        "Insert {} -> {} lost a uniqueness race (attempt {}): {:?}",
                        requester,
                        requested,
                        attempt + 1,
                        meta
                    );
                    if let Some(existing) = self.find_active_between(requester, requested).await? {
                        return Err(conflict_for(existing));
                    }
                    // the winner is already gone; try again
                    attempt += 1;
                    if attempt > self.insert_retry_attempts {
                        return Err(error::SystemError::DatabaseError(
                            format!(
                                "relationship insert {requester} -> {requested} kept conflicting"
                            )
                            .into(),
                        ));
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Pending → Accepted. `NotFound` if the record is gone or no longer pending.
    pub async fn mark_accepted(
        &self,
        id: RelationshipId,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let filter = Filter::id(id).and(Filter::status(RelationshipStatus::Pending));
        self.store
            .update_one(&filter, RelationshipUpdate::Accept { at: chrono::Utc::now() })
            .await?
            .ok_or_else(|| error::SystemError::not_found(RELATIONSHIP_NOT_FOUND))
    }

    pub async fn delete_matching(&self, filter: &Filter) -> Result<u64, error::SystemError> {
        self.store.delete_many(filter).await
    }
}
