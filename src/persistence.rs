pub mod database;
pub mod memory;
mod repository;

pub use repository::{Error, Lookup, Repository};
