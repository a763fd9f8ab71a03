use std::collections::HashMap;

use crate::api::error;
use crate::modules::account::schema::{AccountEntity, AccountId};

/// Read-only view of the host's account storage.
#[async_trait::async_trait]
pub trait AccountResolver {
    /// Looks up every id it can. Ids without an account are simply absent from the map.
    async fn resolve(
        &self,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, AccountEntity>, error::SystemError>;

    /// Every known account whose id is not in `excluded`.
    async fn find_all_except(
        &self,
        excluded: &[AccountId],
    ) -> Result<Vec<AccountEntity>, error::SystemError>;
}
