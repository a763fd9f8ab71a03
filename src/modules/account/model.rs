use std::collections::HashMap;

use serde::Serialize;

use crate::modules::account::schema::{AccountEntity, AccountId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub username: String,
    pub display_name: Option<String>,
}

impl From<AccountEntity> for AccountResponse {
    fn from(account: AccountEntity) -> Self {
        AccountResponse {
            id: account.id,
            username: account.username,
            display_name: account.display_name,
        }
    }
}

/// An account in a result. Falls back to the bare id when the resolver has no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AccountRef {
    Id(AccountId),
    Info(AccountResponse),
}

impl AccountRef {
    pub fn id(&self) -> AccountId {
        match self {
            AccountRef::Id(id) => *id,
            AccountRef::Info(info) => info.id,
        }
    }

    pub fn info(&self) -> Option<&AccountResponse> {
        match self {
            AccountRef::Id(_) => None,
            AccountRef::Info(info) => Some(info),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AccountRef::Info(_))
    }
}

/// Resolved accounts for one result, keyed by id.
#[derive(Debug, Default)]
pub struct AccountLookup {
    accounts: HashMap<AccountId, AccountEntity>,
}

impl AccountLookup {
    pub fn new(accounts: HashMap<AccountId, AccountEntity>) -> Self {
        Self { accounts }
    }

    pub fn get(&self, id: AccountId) -> AccountRef {
        match self.accounts.get(&id) {
            Some(account) => AccountRef::Info(AccountResponse::from(account.clone())),
            None => AccountRef::Id(id),
        }
    }
}
