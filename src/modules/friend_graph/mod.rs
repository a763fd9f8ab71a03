pub mod scope;

use std::sync::Arc;

use crate::{
    api::error,
    constants::GraphConfig,
    modules::{
        account::{
            repository::AccountResolver,
            repository_pg::AccountResolverPg,
            schema::ToAccountId,
            service::AccountService,
        },
        friend_graph::scope::AccountScope,
        graph::service::GraphService,
        relationship::{
            repository::RelationshipRepository, service::RelationshipService,
            store::RelationshipStore, store_pg::RelationshipStorePg,
        },
    },
};

pub type PgFriendGraph = FriendGraph<RelationshipStorePg, AccountResolverPg>;

/// Entry point wiring the lifecycle engine and the query engine to one store and resolver.
pub struct FriendGraph<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    relationships: RelationshipService<S, A>,
    graph: GraphService<S, A>,
}

impl<S, A> Clone for FriendGraph<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { relationships: self.relationships.clone(), graph: self.graph.clone() }
    }
}

impl<S, A> FriendGraph<S, A>
where
    S: RelationshipStore + Send + Sync,
    A: AccountResolver + Send + Sync,
{
    pub fn with_dependencies(store: Arc<S>, resolver: Arc<A>, config: GraphConfig) -> Self {
        let repo = RelationshipRepository::new(store, config.insert_retry_attempts);
        let accounts = AccountService::with_dependencies(resolver);

        tracing::info!(
            "FriendGraph initialized (non_friends_exclude_pending = {}, insert_retry_attempts = {})",
            config.non_friends_exclude_pending,
            config.insert_retry_attempts
        );

        FriendGraph {
            relationships: RelationshipService::with_dependencies(repo.clone(), accounts.clone()),
            graph: GraphService::with_dependencies(repo, accounts, config),
        }
    }

    pub fn relationships(&self) -> &RelationshipService<S, A> {
        &self.relationships
    }

    pub fn graph(&self) -> &GraphService<S, A> {
        &self.graph
    }

    /// Operations seen from one account's side.
    pub fn account(
        &self,
        id: impl ToAccountId,
    ) -> Result<AccountScope<'_, S, A>, error::SystemError> {
        Ok(AccountScope::new(self, id.to_account_id()?))
    }
}

impl PgFriendGraph {
    pub fn from_pool(pool: sqlx::PgPool, config: GraphConfig) -> Self {
        FriendGraph::with_dependencies(
            Arc::new(RelationshipStorePg::new(pool.clone())),
            Arc::new(AccountResolverPg::new(pool)),
            config,
        )
    }
}
