use std::collections::HashSet;

use crate::{
    api::error,
    constants::{GraphConfig, RELATIONSHIP_NOT_FOUND},
    modules::{
        account::{
            model::AccountRef,
            repository::AccountResolver,
            schema::{AccountId, ToAccountId},
            service::AccountService,
        },
        graph::model::{Classification, RequestsOverview},
        relationship::{
            filter::{Field, Filter},
            model::RelationshipResponse,
            repository::RelationshipRepository,
            schema::{RelationshipEntity, RelationshipStatus, ToRelationshipId},
            store::RelationshipStore,
        },
    },
    utils::dedup_stable,
};

/// Read-only queries over the relationship graph.
///
/// Every neighbor set is deduplicated, keeps first-seen order and never contains the
/// account it was computed for.
pub struct GraphService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    repo: RelationshipRepository<S>,
    accounts: AccountService<A>,
    config: GraphConfig,
}

impl<S, A> Clone for GraphService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            accounts: self.accounts.clone(),
            config: self.config.clone(),
        }
    }
}

fn other_parties(id: AccountId, records: &[RelationshipEntity]) -> Vec<AccountId> {
    dedup_stable(records.iter().filter_map(|r| r.other_party(id)).filter(|other| *other != id))
}

impl<S, A> GraphService<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    pub fn with_dependencies(
        repo: RelationshipRepository<S>,
        accounts: AccountService<A>,
        config: GraphConfig,
    ) -> Self {
        GraphService { repo, accounts, config }
    }

    // ---- neighbor sets as bare ids ----

    pub async fn friend_ids(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        self.friends_of(id.to_account_id()?).await
    }

    pub async fn pending_friend_ids(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        self.pending_friends_of(id.to_account_id()?).await
    }

    pub async fn sent_request_ids(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        self.sent_requests_of(id.to_account_id()?).await
    }

    pub async fn received_request_ids(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        self.received_requests_of(id.to_account_id()?).await
    }

    pub async fn friends_of_friends_ids(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        let id = id.to_account_id()?;
        let friends = self.friends_of(id).await?;
        self.friends_of_friends_given(id, &friends).await
    }

    async fn friends_of(&self, id: AccountId) -> Result<Vec<AccountId>, error::SystemError> {
        let records = self.repo.find_all_involving(id, Some(RelationshipStatus::Accepted)).await?;
        Ok(other_parties(id, &records))
    }

    async fn pending_friends_of(
        &self,
        id: AccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        let records = self.repo.find_all_involving(id, Some(RelationshipStatus::Pending)).await?;
        Ok(other_parties(id, &records))
    }

    async fn sent_requests_of(&self, id: AccountId) -> Result<Vec<AccountId>, error::SystemError> {
        let filter =
            Filter::eq(Field::Requester, id).and(Filter::status(RelationshipStatus::Pending));
        let records = self.repo.find_matching(&filter).await?;
        Ok(dedup_stable(records.iter().map(|r| r.requested_id)))
    }

    async fn received_requests_of(
        &self,
        id: AccountId,
    ) -> Result<Vec<AccountId>, error::SystemError> {
        let filter =
            Filter::eq(Field::Requested, id).and(Filter::status(RelationshipStatus::Pending));
        let records = self.repo.find_matching(&filter).await?;
        Ok(dedup_stable(records.iter().map(|r| r.requester_id)))
    }

    /// Union of the friends of every account in `friends`, minus `id` and `friends`.
    async fn friends_of_friends_given(
        &self,
        id: AccountId,
        friends: &[AccountId],
    ) -> Result<Vec<AccountId>, error::SystemError> {
        if friends.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.repo.find_accepted_involving_any(friends).await?;
        let direct: HashSet<AccountId> = friends.iter().copied().collect();
        let direct = &direct;

        let candidates = records.iter().flat_map(move |r| {
            [(r.requester_id, r.requested_id), (r.requested_id, r.requester_id)]
                .into_iter()
                .filter(move |(friend, _)| direct.contains(friend))
                .map(|(_, candidate)| candidate)
        });

        Ok(dedup_stable(
            candidates.filter(|candidate| *candidate != id && !direct.contains(candidate)),
        ))
    }

    // ---- populated neighbor sets ----

    pub async fn get_friends(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let ids = self.friends_of(id.to_account_id()?).await?;
        self.accounts.resolve_refs(&ids).await
    }

    pub async fn get_pending_friends(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let ids = self.pending_friends_of(id.to_account_id()?).await?;
        self.accounts.resolve_refs(&ids).await
    }

    pub async fn get_sent_requests(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let ids = self.sent_requests_of(id.to_account_id()?).await?;
        self.accounts.resolve_refs(&ids).await
    }

    pub async fn get_received_requests(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let ids = self.received_requests_of(id.to_account_id()?).await?;
        self.accounts.resolve_refs(&ids).await
    }

    pub async fn get_requests(
        &self,
        id: impl ToAccountId,
    ) -> Result<RequestsOverview, error::SystemError> {
        let id = id.to_account_id()?;
        let (sent, received) =
            tokio::try_join!(self.sent_requests_of(id), self.received_requests_of(id))?;

        let lookup = self.accounts.lookup(&[sent.as_slice(), received.as_slice()].concat()).await?;
        Ok(RequestsOverview {
            sent: sent.into_iter().map(|id| lookup.get(id)).collect(),
            received: received.into_iter().map(|id| lookup.get(id)).collect(),
        })
    }

    pub async fn get_friends_of_friends(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let ids = self.friends_of_friends_ids(id).await?;
        self.accounts.resolve_refs(&ids).await
    }

    /// Every known account that is neither `id`, a friend, nor a friend of a friend.
    ///
    /// Accounts with a pending request to or from `id` are kept unless
    /// [`GraphConfig::non_friends_exclude_pending`] is set.
    pub async fn get_non_friends(
        &self,
        id: impl ToAccountId,
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let id = id.to_account_id()?;
        let friends = self.friends_of(id).await?;
        let friends_of_friends = self.friends_of_friends_given(id, &friends).await?;

        let mut excluded = vec![id];
        excluded.extend(friends);
        excluded.extend(friends_of_friends);
        if self.config.non_friends_exclude_pending {
            excluded.extend(self.pending_friends_of(id).await?);
        }

        self.accounts.others(&dedup_stable(excluded)).await
    }

    // ---- pairwise predicates ----

    pub async fn are_friends(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        let (a, b) = (a.to_account_id()?, b.to_account_id()?);
        Ok(self.repo.find_accepted_between(a, b).await?.is_some())
    }

    pub async fn are_pending_friends(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        let (a, b) = (a.to_account_id()?, b.to_account_id()?);
        Ok(self.repo.find_pending_between(a, b).await?.is_some())
    }

    /// Whether `a` and `b` share at least one friend.
    pub async fn are_friends_of_friends(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        let (a, b) = (a.to_account_id()?, b.to_account_id()?);
        self.share_a_friend(a, b).await
    }

    async fn share_a_friend(&self, a: AccountId, b: AccountId) -> Result<bool, error::SystemError> {
        let (friends_a, friends_b) = tokio::try_join!(self.friends_of(a), self.friends_of(b))?;
        let friends_a: HashSet<AccountId> = friends_a.into_iter().collect();
        Ok(friends_b.iter().any(|friend| friends_a.contains(friend)))
    }

    pub async fn get_friendship(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<Option<RelationshipResponse>, error::SystemError> {
        let (a, b) = (a.to_account_id()?, b.to_account_id()?);
        let Some(entity) = self.repo.find_active_between(a, b).await? else {
            return Ok(None);
        };
        let lookup = self.accounts.lookup(&[entity.requester_id, entity.requested_id]).await?;
        Ok(Some(RelationshipResponse::from_entity(entity, &lookup)))
    }

    pub async fn get_relationship(
        &self,
        a: impl ToAccountId,
        b: impl ToAccountId,
    ) -> Result<Classification, error::SystemError> {
        let (a, b) = (a.to_account_id()?, b.to_account_id()?);

        if self.repo.find_accepted_between(a, b).await?.is_some() {
            return Ok(Classification::Friends);
        }
        if self.share_a_friend(a, b).await? {
            return Ok(Classification::FriendsOfFriends);
        }
        Ok(Classification::NotFriends)
    }

    pub async fn is_requester(
        &self,
        relationship_id: impl ToRelationshipId,
        account_id: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        let account_id = account_id.to_account_id()?;
        let entity = self.load(relationship_id).await?;
        Ok(entity.requester_id == account_id)
    }

    pub async fn is_requested(
        &self,
        relationship_id: impl ToRelationshipId,
        account_id: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        let account_id = account_id.to_account_id()?;
        let entity = self.load(relationship_id).await?;
        Ok(entity.requested_id == account_id)
    }

    async fn load(
        &self,
        relationship_id: impl ToRelationshipId,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let relationship_id = relationship_id.to_relationship_id()?;
        self.repo
            .find_by_id(relationship_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found(RELATIONSHIP_NOT_FOUND))
    }
}
