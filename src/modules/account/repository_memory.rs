use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    api::error,
    modules::account::{
        repository::AccountResolver,
        schema::{AccountEntity, AccountId},
    },
};

/// In-process account directory. Accounts are listed in registration order.
#[derive(Default)]
pub struct AccountResolverMemory {
    accounts: RwLock<Vec<AccountEntity>>,
}

impl AccountResolverMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account and returns its id.
    pub async fn register(&self, username: impl Into<String>) -> AccountId {
        let account =
            AccountEntity { id: AccountId::new(), username: username.into(), display_name: None };
        let id = account.id;
        self.insert(account).await;
        id
    }

    /// Inserts or replaces an account.
    pub async fn insert(&self, account: AccountEntity) {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|existing| existing.id == account.id) {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
    }
}

#[async_trait::async_trait]
impl AccountResolver for AccountResolverMemory {
    async fn resolve(
        &self,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, AccountEntity>, error::SystemError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .filter(|account| ids.contains(&account.id))
            .map(|account| (account.id, account.clone()))
            .collect())
    }

    async fn find_all_except(
        &self,
        excluded: &[AccountId],
    ) -> Result<Vec<AccountEntity>, error::SystemError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().filter(|account| !excluded.contains(&account.id)).cloned().collect())
    }
}
