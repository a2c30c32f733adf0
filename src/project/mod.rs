//! Recorded takes: schema, in-memory store, and persistence

pub mod bundle;
pub mod schema;
pub mod store;

pub use bundle::{read_or_default, read_store, write_store, StoreError};
pub use schema::{PlaybackDataFile, StoreMeta, Take};
pub use store::TakeStore;
