use crate::{
    api::error,
    modules::{
        account::{
            model::AccountRef,
            repository::AccountResolver,
            schema::{AccountId, ToAccountId},
        },
        friend_graph::FriendGraph,
        graph::model::{Classification, RequestsOverview},
        relationship::{
            model::RelationshipResponse, schema::ToRelationshipId, store::RelationshipStore,
        },
    },
};

/// A [`FriendGraph`] bound to one account, which plays "me" in every call.
pub struct AccountScope<'g, S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    graph: &'g FriendGraph<S, A>,
    me: AccountId,
}

impl<'g, S, A> AccountScope<'g, S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    pub(crate) fn new(graph: &'g FriendGraph<S, A>, me: AccountId) -> Self {
        AccountScope { graph, me }
    }

    pub fn id(&self) -> AccountId {
        self.me
    }

    pub async fn friend_request(
        &self,
        requested: impl ToAccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        self.graph.relationships().send_request(self.me, requested).await
    }

    /// Accepts the request `requester` sent to me.
    pub async fn accept_request(
        &self,
        requester: impl ToAccountId,
    ) -> Result<RelationshipResponse, error::SystemError> {
        self.graph.relationships().accept_request_from(self.me, requester).await
    }

    /// Withdraws the request I sent to `requested`.
    pub async fn cancel_request(
        &self,
        requested: impl ToAccountId,
    ) -> Result<u64, error::SystemError> {
        self.graph.relationships().cancel_request(self.me, requested).await
    }

    /// Turns down the request `requester` sent to me.
    pub async fn deny_request(
        &self,
        requester: impl ToAccountId,
    ) -> Result<u64, error::SystemError> {
        self.graph.relationships().deny_request(requester, self.me).await
    }

    pub async fn end_friendship(&self, other: impl ToAccountId) -> Result<u64, error::SystemError> {
        self.graph.relationships().end_friendship(self.me, other).await
    }

    pub async fn get_requests(&self) -> Result<RequestsOverview, error::SystemError> {
        self.graph.graph().get_requests(self.me).await
    }

    pub async fn get_sent_requests(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_sent_requests(self.me).await
    }

    pub async fn get_received_requests(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_received_requests(self.me).await
    }

    pub async fn get_friends(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_friends(self.me).await
    }

    pub async fn get_friends_of_friends(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_friends_of_friends(self.me).await
    }

    pub async fn get_pending_friends(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_pending_friends(self.me).await
    }

    pub async fn get_non_friends(&self) -> Result<Vec<AccountRef>, error::SystemError> {
        self.graph.graph().get_non_friends(self.me).await
    }

    pub async fn is_friend(&self, other: impl ToAccountId) -> Result<bool, error::SystemError> {
        self.graph.graph().are_friends(self.me, other).await
    }

    pub async fn is_friend_of_friends(
        &self,
        other: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        self.graph.graph().are_friends_of_friends(self.me, other).await
    }

    pub async fn is_pending_friend(
        &self,
        other: impl ToAccountId,
    ) -> Result<bool, error::SystemError> {
        self.graph.graph().are_pending_friends(self.me, other).await
    }

    pub async fn get_friendship(
        &self,
        other: impl ToAccountId,
    ) -> Result<Option<RelationshipResponse>, error::SystemError> {
        self.graph.graph().get_friendship(self.me, other).await
    }

    pub async fn get_relationship(
        &self,
        other: impl ToAccountId,
    ) -> Result<Classification, error::SystemError> {
        self.graph.graph().get_relationship(self.me, other).await
    }

    pub async fn is_requester(
        &self,
        relationship_id: impl ToRelationshipId,
    ) -> Result<bool, error::SystemError> {
        self.graph.graph().is_requester(relationship_id, self.me).await
    }

    pub async fn is_requested(
        &self,
        relationship_id: impl ToRelationshipId,
    ) -> Result<bool, error::SystemError> {
        self.graph.graph().is_requested(relationship_id, self.me).await
    }
}
