pub mod account;
pub mod friend_graph;
pub mod graph;
pub mod relationship;
