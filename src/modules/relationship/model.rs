use serde::Serialize;

use crate::modules::{
    account::model::{AccountLookup, AccountRef},
    relationship::schema::{RelationshipEntity, RelationshipId, RelationshipStatus},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipResponse {
    pub id: RelationshipId,
    pub requester: AccountRef,
    pub requested: AccountRef,
    pub status: RelationshipStatus,
    pub date_sent: chrono::DateTime<chrono::Utc>,
    pub date_accepted: Option<chrono::DateTime<chrono::Utc>>,
}

impl RelationshipResponse {
    pub fn from_entity(entity: RelationshipEntity, lookup: &AccountLookup) -> Self {
        RelationshipResponse {
            id: entity.id,
            requester: lookup.get(entity.requester_id),
            requested: lookup.get(entity.requested_id),
            status: entity.status,
            date_sent: entity.date_sent,
            date_accepted: entity.date_accepted,
        }
    }
}
