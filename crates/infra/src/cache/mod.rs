//! Read-through cache for backend queries

mod query_cache;

pub use query_cache::QueryCache;
