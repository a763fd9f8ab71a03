use crate::{
    api::error,
    constants::{ACCEPT_MISSING_REQUEST, SELF_RELATIONSHIP},
    modules::{
        account::{
            repository::AccountResolver,
            schema::{AccountId, ToAccountId},
            service::AccountService,
        },
        relationship::{
            filter::Filter,
            model::RelationshipResponse,
            repository::{RelationshipRepository, conflict_for},
            schema::{RelationshipEntity, RelationshipStatus},
            store::RelationshipStore,
        },
    },
};

/// Request lifecycle: send, accept, cancel, deny, end.
pub struct RelationshipService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    repo: RelationshipRepository<S>,
    accounts: AccountService<A>,
}

impl<S, A> Clone for RelationshipService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), accounts: self.accounts.clone() }
    }
}

impl<S, A> RelationshipService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    pub fn with_dependencies(repo: RelationshipRepository<S>, accounts: AccountService<A>) -> Self {
        RelationshipService { repo, accounts }
    }

    pub async fn populate(
        &self,
        entity: RelationshipEntity,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let lookup = self.accounts.lookup(&[entity.requester_id, entity.requested_id]).await?;
        Ok(RelationshipResponse::from_entity(entity, &lookup))
    }

    pub async fn send_request(
        &self,
        requester: impl ToAccountId,
        requested: impl ToAccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let requester = requester.to_account_id()?;
        let requested = requested.to_account_id()?;

        if requester == requested {
            return Err(error::SystemError::bad_request(SELF_RELATIONSHIP));
        }

        if let Some(existing) = self.repo.find_active_between(requester, requested).await? {
            tracing::debug!(
                "Request {} -> {} rejected, {} relationship exists",
                requester,
                requested,
                existing.status
            );
            return Err(conflict_for(existing));
        }

        let created = self.repo.insert(requester, requested).await?;
        tracing::info!("Friend request {} sent: {} -> {}", created.id, requester, requested);

        self.populate(created).await
    }

    /// Accepts the request `requester` sent to `requested`.
    pub async fn accept_request(
        &self,
        requester: impl ToAccountId,
        requested: impl ToAccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let requester = requester.to_account_id()?;
        let requested = requested.to_account_id()?;
        self.accept_directed(requester, requested).await
    }

    /// Accepts, as `me`, the request that `requester` sent.
    pub async fn accept_request_from(
        &self,
        me: impl ToAccountId,
        requester: impl ToAccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let me = me.to_account_id()?;
        let requester = requester.to_account_id()?;
        self.accept_directed(requester, me).await
    }

    async fn accept_directed(
        &self,
        requester: AccountId,
        requested: AccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let pending = self
            .repo
            .find_pending_from(requester, requested)
            .await?
            .ok_or_else(|| error::SystemError::not_found(ACCEPT_MISSING_REQUEST))?;

        let accepted = self.repo.mark_accepted(pending.id).await.map_err(|err| match err {
            // cancelled or accepted between the lookup and the update
            error::SystemError::NotFound(_) => {
                error::SystemError::not_found(ACCEPT_MISSING_REQUEST)
            }
            other => other,
        })?;
        tracing::info!("Friend request {} accepted: {} <-> {}", accepted.id, requester, requested);

        self.populate(accepted).await
    }

    /// Withdraws a request. Returns the number of removed records.
    pub async fn cancel_request(
        &self,
        requester: impl ToAccountId,
        requested: impl ToAccountId,
    ) -> Result<u64, error::SystemError> {
        let requester = requester.to_account_id()?;
        let requested = requested.to_account_id()?;
        let removed = self.delete_pending(requester, requested).await?;
        tracing::info!(
            "Friend request {} -> {} cancelled ({} removed)",
            requester,
            requested,
            removed
        );
        Ok(removed)
    }

    /// Turns a request down. Same data effect as [`Self::cancel_request`].
    pub async fn deny_request(
        &self,
        requester: impl ToAccountId,
        requested: impl ToAccountId,
    ) -> Result<u64, error::SystemError> {
        let requester = requester.to_account_id()?;
        let requested = requested.to_account_id()?;
        let removed = self.delete_pending(requester, requested).await?;
        tracing::info!(
            "Friend request {} -> {} denied ({} removed)",
            requester,
            requested,
            removed
        );
        Ok(removed)
    }

    async fn delete_pending(
        &self,
        requester: AccountId,
        requested: AccountId,
    ) -> Result<u64, error::SystemError> {
        let filter =
            Filter::directed(requester, requested).and(Filter::status(RelationshipStatus::Pending));
        self.repo.delete_matching(&filter).await
    }

    pub async fn end_friendship(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<u64, error::SystemError> {
        let a = a.to_account_id()?;
        let b = b.to_account_id()?;
        let filter = Filter::between(a, b).and(Filter::status(RelationshipStatus::Accepted));
        let removed = self.repo.delete_matching(&filter).await?;
        tracing::info!("Friendship {} <-> {} ended ({} removed)", a, b, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ALREADY_FRIENDS, PENDING_REQUEST_EXISTS};
    use crate::test::Fixture;

    #[tokio::test]
    async fn test_send_request_then_duplicate_then_friends() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();

        let pending = lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();
        assert_eq!(pending.requester.id(), fx.jeff);
        assert_eq!(pending.requested.id(), fx.zane);
        assert_eq!(pending.status, RelationshipStatus::Pending);
        assert!(pending.date_accepted.is_none());
        assert_eq!(pending.requester.info().map(|a| a.username.as_str()), Some("Jeff"));

        let err = lifecycle.send_request(fx.jeff, fx.zane).await.unwrap_err();
        assert_eq!(err.to_string(), PENDING_REQUEST_EXISTS);
        let existing = err.existing_relationship().unwrap();
        assert_eq!(existing.id, pending.id);
        assert_eq!(existing.status, RelationshipStatus::Pending);
        assert_eq!(existing.date_sent, pending.date_sent);

        let accepted = lifecycle.accept_request(fx.jeff, fx.zane).await.unwrap();
        assert_eq!(accepted.id, pending.id);
        assert_eq!(accepted.requester.id(), fx.jeff);
        assert_eq!(accepted.status, RelationshipStatus::Accepted);
        assert!(accepted.date_accepted.unwrap() >= accepted.date_sent);

        let err = lifecycle.send_request(fx.jeff, fx.zane).await.unwrap_err();
        assert_eq!(err.to_string(), ALREADY_FRIENDS);
        assert_eq!(err.existing_relationship().map(|r| r.status), Some(RelationshipStatus::Accepted));
    }

    #[tokio::test]
    async fn test_reverse_request_conflicts_with_pending() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();

        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();
        let err = lifecycle.send_request(fx.zane, fx.jeff).await.unwrap_err();

        assert_eq!(err.to_string(), PENDING_REQUEST_EXISTS);
        assert_eq!(err.existing_relationship().map(|r| r.requester_id), Some(fx.jeff));
    }

    #[tokio::test]
    async fn test_send_request_rejects_malformed_ids() {
        let fx = Fixture::new().await;
        let err = fx.graph.relationships().send_request("abc", "def").await.unwrap_err();
        assert!(matches!(err, error::SystemError::InvalidIdentifier(_)));
        assert!(fx.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_send_request_rejects_self() {
        let fx = Fixture::new().await;
        let err = fx.graph.relationships().send_request(fx.jeff, fx.jeff).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_send_request_accepts_string_ids() {
        let fx = Fixture::new().await;
        let created = fx
            .graph
            .relationships()
            .send_request(fx.jeff.to_string(), fx.zane.to_string().as_str())
            .await
            .unwrap();
        assert_eq!(created.requested.id(), fx.zane);
    }

    #[tokio::test]
    async fn test_accept_is_direction_sensitive() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();
        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();

        let err = lifecycle.accept_request(fx.zane, fx.jeff).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
        assert_eq!(err.to_string(), ACCEPT_MISSING_REQUEST);

        let err = lifecycle.accept_request(fx.zane, fx.sam).await.unwrap_err();
        assert_eq!(err.to_string(), ACCEPT_MISSING_REQUEST);

        let err = lifecycle.accept_request("abc", "def").await.unwrap_err();
        assert!(matches!(err, error::SystemError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_accept_request_from_matches_request_order_shape() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();
        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();

        let accepted = lifecycle.accept_request_from(fx.zane, fx.jeff).await.unwrap();

        assert_eq!(accepted.requester.id(), fx.jeff);
        assert_eq!(accepted.requested.id(), fx.zane);
        assert_eq!(accepted.status, RelationshipStatus::Accepted);
    }

    #[tokio::test]
    async fn test_accept_twice_is_not_found() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();
        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();
        lifecycle.accept_request(fx.jeff, fx.zane).await.unwrap();

        let err = lifecycle.accept_request(fx.jeff, fx.zane).await.unwrap_err();
        assert_eq!(err.to_string(), ACCEPT_MISSING_REQUEST);
    }

    #[tokio::test]
    async fn test_cancel_and_deny_remove_pending_request() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();

        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();
        assert_eq!(lifecycle.cancel_request(fx.jeff, fx.zane).await.unwrap(), 1);
        assert_eq!(lifecycle.cancel_request(fx.jeff, fx.zane).await.unwrap(), 0);

        lifecycle.send_request(fx.jeff, fx.zane).await.unwrap();
        assert_eq!(lifecycle.deny_request(fx.jeff, fx.zane).await.unwrap(), 1);
        assert_eq!(lifecycle.deny_request(fx.jeff, fx.zane).await.unwrap(), 0);

        assert!(fx.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cancel_leaves_friendship_and_other_direction_alone() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();
        fx.befriend(fx.jeff, fx.zane).await;
        lifecycle.send_request(fx.sam, fx.jeff).await.unwrap();

        assert_eq!(lifecycle.cancel_request(fx.jeff, fx.zane).await.unwrap(), 0);
        assert_eq!(lifecycle.deny_request(fx.jeff, fx.sam).await.unwrap(), 0);
        assert_eq!(fx.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_end_friendship_either_direction() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships();
        fx.befriend(fx.jeff, fx.zane).await;

        assert_eq!(lifecycle.end_friendship(fx.zane, fx.jeff).await.unwrap(), 1);
        assert_eq!(lifecycle.end_friendship(fx.jeff, fx.zane).await.unwrap(), 0);

        // pending requests are not friendships
        lifecycle.send_request(fx.jeff, fx.sam).await.unwrap();
        assert_eq!(lifecycle.end_friendship(fx.jeff, fx.sam).await.unwrap(), 0);

        // the pair is free again
        lifecycle.send_request(fx.zane, fx.jeff).await.unwrap();
    }

    #[tokio::test]
    async fn test_unresolved_account_surfaces_as_bare_id() {
        let fx = Fixture::new().await;
        let ghost = AccountId::new();

        let created = fx.graph.relationships().send_request(fx.jeff, ghost).await.unwrap();

        assert!(created.requester.is_resolved());
        assert!(!created.requested.is_resolved());
        assert_eq!(created.requested.id(), ghost);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_send_request_creates_one_record() {
        let fx = Fixture::new().await;
        let lifecycle = fx.graph.relationships().clone();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let lifecycle = lifecycle.clone();
                let (from, to) = if i % 2 == 0 { (fx.jeff, fx.zane) } else { (fx.zane, fx.jeff) };
                tokio::spawn(async move { lifecycle.send_request(from, to).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert_eq!(err.to_string(), PENDING_REQUEST_EXISTS),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(fx.store.len().await, 1);
    }
}
