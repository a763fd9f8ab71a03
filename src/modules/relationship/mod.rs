pub mod filter;
pub mod model;
pub mod repository;
pub mod schema;
pub mod service;
pub mod store;
pub mod store_memory;
pub mod store_pg;
