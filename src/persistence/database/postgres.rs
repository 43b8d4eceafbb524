pub mod repository;
mod schema;
mod statements_cache;
