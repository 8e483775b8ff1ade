// Entity store backed by a single JSON document

pub mod data_store;
pub mod seed;

pub use data_store::{JsonDataStore, StoreDocument};
