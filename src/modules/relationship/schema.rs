use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::{api::error, modules::account::schema::AccountId, utils::parse_uuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RelationshipId(pub Uuid);

impl RelationshipId {
    pub fn new() -> Self {
        RelationshipId(Uuid::now_v7())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for RelationshipId {
    fn from(id: Uuid) -> Self {
        RelationshipId(id)
    }
}

impl FromStr for RelationshipId {
    type Err = error::SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(RelationshipId)
    }
}

pub trait ToRelationshipId {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError>;
}

impl ToRelationshipId for RelationshipId {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError> {
        Ok(*self)
    }
}

impl ToRelationshipId for Uuid {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError> {
        Ok(RelationshipId(*self))
    }
}

impl ToRelationshipId for str {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError> {
        self.parse()
    }
}

impl ToRelationshipId for String {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError> {
        self.parse()
    }
}

impl<T: ToRelationshipId + ?Sized> ToRelationshipId for &T {
    fn to_relationship_id(&self) -> Result<RelationshipId, error::SystemError> {
        (**self).to_relationship_id()
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "relationship_status")]
pub enum RelationshipStatus {
    #[sqlx(rename = "Pending")]
    Pending,
    #[sqlx(rename = "Accepted")]
    Accepted,
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipStatus::Pending => f.write_str("Pending"),
            RelationshipStatus::Accepted => f.write_str("Accepted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RelationshipEntity {
    pub id: RelationshipId,
    pub requester_id: AccountId,
    pub requested_id: AccountId,
    pub status: RelationshipStatus,
    pub date_sent: chrono::DateTime<chrono::Utc>,
    pub date_accepted: Option<chrono::DateTime<chrono::Utc>>,
}

impl RelationshipEntity {
    /// The party on the other side of `id`, or `None` if `id` takes no part.
    pub fn other_party(&self, id: AccountId) -> Option<AccountId> {
        if self.requester_id == id {
            Some(self.requested_id)
        } else if self.requested_id == id {
            Some(self.requester_id)
        } else {
            None
        }
    }

    pub fn involves(&self, id: AccountId) -> bool {
        self.requester_id == id || self.requested_id == id
    }
}

/// Input for a store insert. The store assigns `id` and `date_sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRelationship {
    pub requester_id: AccountId,
    pub requested_id: AccountId,
}

/// The only in-place change a relationship ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipUpdate {
    /// Pending → Accepted. Stores stamp `max(at, date_sent)` as `date_accepted`.
    Accept { at: chrono::DateTime<chrono::Utc> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_party() {
        let entity = crate::test::pending_entity();
        let stranger = AccountId::new();

        assert_eq!(entity.other_party(entity.requester_id), Some(entity.requested_id));
        assert_eq!(entity.other_party(entity.requested_id), Some(entity.requester_id));
        assert_eq!(entity.other_party(stranger), None);
        assert!(entity.involves(entity.requested_id));
        assert!(!entity.involves(stranger));
    }

    #[test]
    fn test_relationship_id_parse() {
        assert!("not-an-id".parse::<RelationshipId>().is_err());
        let id = RelationshipId::new();
        assert_eq!(id.to_string().parse::<RelationshipId>().unwrap(), id);
    }

    #[test]
    fn test_status_serializes_as_label() {
        assert_eq!(serde_json::to_value(RelationshipStatus::Pending).unwrap(), "Pending");
        assert_eq!(serde_json::to_value(RelationshipStatus::Accepted).unwrap(), "Accepted");
        for status in [RelationshipStatus::Pending, RelationshipStatus::Accepted] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
    }
}
