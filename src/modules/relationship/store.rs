use crate::api::error;
use crate::modules::relationship::{
    filter::Filter,
    schema::{NewRelationship, RelationshipEntity, RelationshipUpdate},
};

/// Record-level access to wherever relationships are persisted.
///
/// Implementations must guarantee per-record atomicity and must reject a second record for
/// the same unordered account pair with [`error::SystemError::Duplicate`].
#[async_trait::async_trait]
pub trait RelationshipStore {
    async fn insert(&self, record: NewRelationship)
    -> Result<RelationshipEntity, error::SystemError>;

    async fn find_one(
        &self,
        filter: &Filter,
    ) -> Result<Option<RelationshipEntity>, error::SystemError>;

    /// Matches ordered by `date_sent`.
    async fn find_many(&self, filter: &Filter)
    -> Result<Vec<RelationshipEntity>, error::SystemError>;

    /// Applies `update` to the first match and returns it, or `None` if nothing matched.
    async fn update_one(
        &self,
        filter: &Filter,
        update: RelationshipUpdate,
    ) -> Result<Option<RelationshipEntity>, error::SystemError>;

    /// Returns how many records were removed.
    async fn delete_many(&self, filter: &Filter) -> Result<u64, error::SystemError>;
}
