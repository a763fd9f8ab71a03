use std::sync::Arc;

use crate::{
    constants::GraphConfig,
    modules::{
        account::{repository_memory::AccountResolverMemory, schema::AccountId},
        friend_graph::FriendGraph,
        relationship::{
            schema::{RelationshipEntity, RelationshipId, RelationshipStatus},
            store_memory::RelationshipStoreMemory,
        },
    },
};

/// Four registered accounts over in-memory adapters.
pub struct Fixture {
    pub graph: FriendGraph<RelationshipStoreMemory, AccountResolverMemory>,
    pub store: Arc<RelationshipStoreMemory>,
    pub jeff: AccountId,
    pub zane: AccountId,
    pub sam: AccountId,
    pub henry: AccountId,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(GraphConfig::default()).await
    }

    pub async fn with_config(config: GraphConfig) -> Self {
        let store = Arc::new(RelationshipStoreMemory::new());
        let resolver = Arc::new(AccountResolverMemory::new());

        let jeff = resolver.register("Jeff").await;
        let zane = resolver.register("Zane").await;
        let sam = resolver.register("Sam").await;
        let henry = resolver.register("Henry").await;

        let graph = FriendGraph::with_dependencies(store.clone(), resolver, config);
        Fixture { graph, store, jeff, zane, sam, henry }
    }

    /// Jeff - Zane - Sam are friends in a line, Henry knows nobody.
    pub async fn chain() -> Self {
        let fx = Self::new().await;
        fx.befriend(fx.jeff, fx.zane).await;
        fx.befriend(fx.zane, fx.sam).await;
        fx
    }

    pub async fn befriend(&self, requester: AccountId, requested: AccountId) {
        let relationships = self.graph.relationships();
        relationships.send_request(requester, requested).await.unwrap();
        relationships.accept_request(requester, requested).await.unwrap();
    }
}

pub fn pending_entity() -> RelationshipEntity {
    RelationshipEntity {
        id: RelationshipId::new(),
        requester_id: AccountId::new(),
        requested_id: AccountId::new(),
        status: RelationshipStatus::Pending,
        date_sent: chrono::Utc::now(),
        date_accepted: None,
    }
}
