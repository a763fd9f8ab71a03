use sqlx::{Postgres, QueryBuilder};

use crate::{
    api::error,
    modules::relationship::{
        filter::{Filter, FieldValue},
        schema::{
            NewRelationship, RelationshipEntity, RelationshipId, RelationshipStatus,
            RelationshipUpdate,
        },
        store::RelationshipStore,
    },
};

#[derive(Clone)]
pub struct RelationshipStorePg {
    pool: sqlx::PgPool,
}

impl RelationshipStorePg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match *value {
        FieldValue::Uuid(id) => {
            qb.push_bind(id);
        }
        FieldValue::Status(status) => {
            qb.push_bind(status);
        }
    }
}

/// Appends `filter` as a SQL boolean expression with bound parameters.
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::Eq(field, value) => {
            qb.push(field.column()).push(" = ");
            push_value(qb, value);
        }
        Filter::In(_, values) if values.is_empty() => {
            qb.push("FALSE");
        }
        Filter::In(field, values) => {
            qb.push(field.column()).push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(qb, value);
            }
            qb.push(")");
        }
        Filter::And(all) if all.is_empty() => {
            qb.push("TRUE");
        }
        Filter::Or(any) if any.is_empty() => {
            qb.push("FALSE");
        }
        Filter::And(parts) | Filter::Or(parts) => {
            let joiner = if matches!(filter, Filter::And(_)) { " AND " } else { " OR " };
            qb.push("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(joiner);
                }
                push_filter(qb, part);
            }
            qb.push(")");
        }
    }
}

pub(crate) fn select_query(filter: &Filter, limit_one: bool) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM relationships WHERE ");
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY date_sent, id");
    if limit_one {
        qb.push(" LIMIT 1");
    }
    qb
}

#[async_trait::async_trait]
impl RelationshipStore for RelationshipStorePg {
    async fn insert(
        &self,
        record: NewRelationship,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            INSERT INTO relationships (id, requester_id, requested_id, status, date_sent)
            VALUES ($1, $2, $3, $4, now())
            RETURNING *
            "#,
        )
        .bind(RelationshipId::new())
        .bind(record.requester_id)
        .bind(record.requested_id)
        .bind(RelationshipStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn find_one(
        &self,
        filter: &Filter,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let entity = select_query(filter, true)
            .build_query_as::<RelationshipEntity>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(entity)
    }

    async fn find_many(
        &self,
        filter: &Filter,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let entities = select_query(filter, false)
            .build_query_as::<RelationshipEntity>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entities)
    }

    async fn update_one(
        &self,
        filter: &Filter,
        update: RelationshipUpdate,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE relationships SET ");
        match update {
            RelationshipUpdate::Accept { at } => {
                qb.push("status = ")
                    .push_bind(RelationshipStatus::Accepted)
                    .push(", date_accepted = GREATEST(")
                    .push_bind(at)
                    .push(", date_sent)");
            }
        }
        qb.push(" WHERE id = (SELECT id FROM relationships WHERE ");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY date_sent LIMIT 1 FOR UPDATE) RETURNING *");

        let entity =
            qb.build_query_as::<RelationshipEntity>().fetch_optional(&self.pool).await?;
        Ok(entity)
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64, error::SystemError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM relationships WHERE ");
        push_filter(&mut qb, filter);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
