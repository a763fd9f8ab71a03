use std::sync::Arc;

use crate::{
    api::error,
    modules::account::{
        model::{AccountLookup, AccountRef, AccountResponse},
        repository::AccountResolver,
        schema::AccountId,
    },
    utils::dedup_stable,
};

/// Turns bare account ids into [`AccountRef`]s through the injected resolver.
pub struct AccountService<A>
where
    A: AccountResolver + Send + Sync,
{
    resolver: Arc<A>,
}

impl<A> Clone for AccountService<A>
where
    A: AccountResolver + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { resolver: Arc::clone(&self.resolver) }
    }
}

impl<A> AccountService<A>
where
    A: AccountResolver + Send + Sync,
{
    pub fn with_dependencies(resolver: Arc<A>) -> Self {
        AccountService { resolver }
    }

    pub async fn lookup(&self, ids: &[AccountId]) -> Result<AccountLookup, error::SystemError> {
        let unique = dedup_stable(ids.iter().copied());
        let accounts = self.resolver.resolve(&unique).await?;
        if accounts.len() < unique.len() {
            tracing::debug!(
                "{} of {} account(s) could not be resolved",
                unique.len() - accounts.len(),
                unique.len()
            );
        }
        Ok(AccountLookup::new(accounts))
    }

    /// Resolves `ids` keeping their order.
    pub async fn resolve_refs(
        &self,
        ids: &[AccountId],
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let lookup = self.lookup(ids).await?;
        Ok(ids.iter().map(|id| lookup.get(*id)).collect())
    }

    /// Every known account outside `excluded`.
    pub async fn others(
        &self,
        excluded: &[AccountId],
    ) -> Result<Vec<AccountRef>, error::SystemError> {
        let accounts = self.resolver.find_all_except(excluded).await?;
        Ok(accounts.into_iter().map(|a| AccountRef::Info(AccountResponse::from(a))).collect())
    }
}
