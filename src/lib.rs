//! Friend requests, friendships and friends-of-friends queries over a pluggable store.
//!
//! ```no_run
//! # async fn run() -> Result<(), friend_graph::api::error::SystemError> {
//! use friend_graph::{configs, constants::Env, modules::friend_graph::PgFriendGraph};
//!
//! let env = Env::from_env()?;
//! configs::init_tracing(&env);
//! let pool = configs::connect_database(&env).await?;
//! configs::run_migrations(&pool).await?;
//!
//! let graph = PgFriendGraph::from_pool(pool, env.graph.clone());
//! let jeff = "0190f5a4-1c2b-7d3e-8f40-5a6b7c8d9e0f";
//! let zane = "0190f5a4-1c2b-7d3e-8f40-5a6b7c8d9e10";
//! graph.relationships().send_request(jeff, zane).await?;
//! graph.account(zane)?.accept_request(jeff).await?;
//! assert!(graph.graph().are_friends(jeff, zane).await?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod configs;
pub mod constants;
pub mod modules;
pub mod utils;

#[cfg(test)]
mod test;

pub use api::error::SystemError;
pub use constants::GraphConfig;
pub use modules::{
    account::schema::{AccountId, ToAccountId},
    friend_graph::{FriendGraph, PgFriendGraph, scope::AccountScope},
    graph::model::Classification,
    relationship::schema::{RelationshipEntity, RelationshipId, RelationshipStatus},
};
