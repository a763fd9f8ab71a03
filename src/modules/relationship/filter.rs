use uuid::Uuid;

use crate::modules::{
    account::schema::AccountId,
    relationship::schema::{RelationshipEntity, RelationshipId, RelationshipStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Requester,
    Requested,
    Status,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Requester => "requester_id",
            Field::Requested => "requested_id",
            Field::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Uuid(Uuid),
    Status(RelationshipStatus),
}

impl From<AccountId> for FieldValue {
    fn from(id: AccountId) -> Self {
        FieldValue::Uuid(id.0)
    }
}

impl From<RelationshipId> for FieldValue {
    fn from(id: RelationshipId) -> Self {
        FieldValue::Uuid(id.0)
    }
}

impl From<RelationshipStatus> for FieldValue {
    fn from(status: RelationshipStatus) -> Self {
        FieldValue::Status(status)
    }
}

/// Predicate over relationship records understood by every store adapter.
///
/// An empty `And` matches everything, an empty `Or` or `In` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(Field, FieldValue),
    In(Field, Vec<FieldValue>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: Field, value: impl Into<FieldValue>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn is_in<V, I>(field: Field, values: I) -> Self
    where
        V: Into<FieldValue>,
        I: IntoIterator<Item = V>,
    {
        Filter::In(field, values.into_iter().map(Into::into).collect())
    }

    pub fn id(id: RelationshipId) -> Self {
        Filter::eq(Field::Id, id)
    }

    pub fn status(status: RelationshipStatus) -> Self {
        Filter::eq(Field::Status, status)
    }

    /// `requester` sent the request to `requested`.
    pub fn directed(requester: AccountId, requested: AccountId) -> Self {
        Filter::And(vec![
            Filter::eq(Field::Requester, requester),
            Filter::eq(Field::Requested, requested),
        ])
    }

    /// Either direction between `a` and `b`.
    pub fn between(a: AccountId, b: AccountId) -> Self {
        Filter::Or(vec![Filter::directed(a, b), Filter::directed(b, a)])
    }

    /// `id` on either side.
    pub fn involving(id: AccountId) -> Self {
        Filter::Or(vec![Filter::eq(Field::Requester, id), Filter::eq(Field::Requested, id)])
    }

    /// Any of `ids` on either side.
    pub fn involving_any(ids: &[AccountId]) -> Self {
        Filter::Or(vec![
            Filter::is_in(Field::Requester, ids.iter().copied()),
            Filter::is_in(Field::Requested, ids.iter().copied()),
        ])
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut all) => {
                all.push(other);
                Filter::And(all)
            }
            filter => Filter::And(vec![filter, other]),
        }
    }

    pub fn matches(&self, record: &RelationshipEntity) -> bool {
        match self {
            Filter::Eq(field, value) => field_value(record, *field) == *value,
            Filter::In(field, values) => values.contains(&field_value(record, *field)),
            Filter::And(all) => all.iter().all(|f| f.matches(record)),
            Filter::Or(any) => any.iter().any(|f| f.matches(record)),
        }
    }
}

fn field_value(record: &RelationshipEntity, field: Field) -> FieldValue {
    match field {
        Field::Id => record.id.into(),
        Field::Requester => record.requester_id.into(),
        Field::Requested => record.requested_id.into(),
        Field::Status => record.status.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_matches_both_directions() {
        let record = crate::test::pending_entity();
        let filter = Filter::between(record.requested_id, record.requester_id);
        assert!(filter.matches(&record));
        assert!(Filter::between(record.requester_id, record.requested_id).matches(&record));
    }

    #[test]
    fn test_directed_is_direction_sensitive() {
        let record = crate::test::pending_entity();
        assert!(Filter::directed(record.requester_id, record.requested_id).matches(&record));
        assert!(!Filter::directed(record.requested_id, record.requester_id).matches(&record));
    }

    #[test]
    fn test_status_narrowing() {
        let record = crate::test::pending_entity();
        let involving = Filter::involving(record.requester_id);
        assert!(involving.clone().and(Filter::status(RelationshipStatus::Pending)).matches(&record));
        assert!(!involving.and(Filter::status(RelationshipStatus::Accepted)).matches(&record));
    }

    #[test]
    fn test_empty_sets() {
        let record = crate::test::pending_entity();
        assert!(!Filter::involving_any(&[]).matches(&record));
        assert!(Filter::And(vec![]).matches(&record));
        assert!(!Filter::Or(vec![]).matches(&record));
    }

    #[test]
    fn test_and_flattens() {
        let a = AccountId::new();
        let filter = Filter::directed(a, AccountId::new()).and(Filter::status(RelationshipStatus::Pending));
        match filter {
            Filter::And(all) => assert_eq!(all.len(), 3),
            other => panic!("Expected And, got {other:?}"),
        }
    }
}
