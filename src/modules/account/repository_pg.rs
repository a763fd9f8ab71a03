use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    api::error,
    modules::account::{
        repository::AccountResolver,
        schema::{AccountEntity, AccountId},
    },
};

/// Resolves accounts from the host's `accounts` table (`id`, `username`, `display_name`).
#[derive(Clone)]
pub struct AccountResolverPg {
    pool: sqlx::PgPool,
}

impl AccountResolverPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn raw_ids(ids: &[AccountId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.0).collect()
}

#[async_trait::async_trait]
impl AccountResolver for AccountResolverPg {
    async fn resolve(
        &self,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, AccountEntity>, error::SystemError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let accounts = sqlx::query_as::<_, AccountEntity>(
            "SELECT id, username, display_name FROM accounts WHERE id = ANY($1)",
        )
        .bind(raw_ids(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts.into_iter().map(|account| (account.id, account)).collect())
    }

    async fn find_all_except(
        &self,
        excluded: &[AccountId],
    ) -> Result<Vec<AccountEntity>, error::SystemError> {
        let accounts = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, display_name
            FROM accounts
            WHERE id <> ALL($1)
            ORDER BY username
            "#,
        )
        .bind(raw_ids(excluded))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}
