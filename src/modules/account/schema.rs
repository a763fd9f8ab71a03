use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::{api::error, utils::parse_uuid};

/// Opaque reference to an account owned by the host identity system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        AccountId(Uuid::now_v7())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        AccountId(id)
    }
}

impl FromStr for AccountId {
    type Err = error::SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid(s).map(AccountId)
    }
}

/// Anything a caller may hand over as an account identifier.
///
/// Conversion happens before any store access, so a malformed string fails with
/// [`error::SystemError::InvalidIdentifier`] without touching the database.
pub trait ToAccountId {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError>;
}

impl ToAccountId for AccountId {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError> {
        Ok(*self)
    }
}

impl ToAccountId for Uuid {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError> {
        Ok(AccountId(*self))
    }
}

impl ToAccountId for str {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError> {
        self.parse()
    }
}

impl ToAccountId for String {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError> {
        self.parse()
    }
}

impl<T: ToAccountId + ?Sized> ToAccountId for &T {
    fn to_account_id(&self) -> Result<AccountId, error::SystemError> {
        (**self).to_account_id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AccountEntity {
    pub id: AccountId,
    pub username: String,
    pub display_name: Option<String>,
}
