use serde::Serialize;

use crate::modules::account::model::AccountRef;

/// How two accounts relate, ordered from the weakest tie to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    NotFriends,
    FriendsOfFriends,
    Friends,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestsOverview {
    /// Accounts this account has asked.
    pub sent: Vec<AccountRef>,
    /// Accounts that have asked this account.
    pub received: Vec<AccountRef>,
}
