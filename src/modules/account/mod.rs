pub mod model;
pub mod repository;
pub mod repository_memory;
pub mod repository_pg;
pub mod schema;
pub mod service;
