use tokio::sync::RwLock;

use crate::{
    api::error,
    constants::SELF_RELATIONSHIP,
    modules::relationship::{
        filter::Filter,
        schema::{
            NewRelationship, RelationshipEntity, RelationshipId, RelationshipStatus,
            RelationshipUpdate,
        },
        store::RelationshipStore,
    },
    utils::ordered_pair,
};

/// In-process store. The pair check and the insert share one write lock.
#[derive(Default)]
pub struct RelationshipStoreMemory {
    records: RwLock<Vec<RelationshipEntity>>,
}

impl RelationshipStoreMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RelationshipStore for RelationshipStoreMemory {
    async fn insert(
        &self,
        record: NewRelationship,
    ) -> Result<RelationshipEntity, error::SystemError> {
        if record.requester_id == record.requested_id {
            return Err(error::SystemError::bad_request(SELF_RELATIONSHIP));
        }

        let pair = ordered_pair(record.requester_id, record.requested_id);
        let mut records = self.records.write().await;

        if records.iter().any(|r| ordered_pair(r.requester_id, r.requested_id) == pair) {
            return Err(error::SystemError::Duplicate(None));
        }

        let entity = RelationshipEntity {
            id: RelationshipId::new(),
            requester_id: record.requester_id,
            requested_id: record.requested_id,
            status: RelationshipStatus::Pending,
            date_sent: chrono::Utc::now(),
            date_accepted: None,
        };
        records.push(entity.clone());
        Ok(entity)
    }

    async fn find_one(
        &self,
        filter: &Filter,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn find_many(
        &self,
        filter: &Filter,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: RelationshipUpdate,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| filter.matches(r)) else {
            return Ok(None);
        };

        match update {
            RelationshipUpdate::Accept { at } => {
                record.status = RelationshipStatus::Accepted;
                record.date_accepted = Some(at.max(record.date_sent));
            }
        }
        Ok(Some(record.clone()))
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64, error::SystemError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !filter.matches(r));
        Ok((before - records.len()) as u64)
    }
}
