pub mod config;
pub mod error;
pub mod memory;
pub mod remote;
pub mod rest;
pub mod sync;

pub use config::StoreConfig;
pub use error::{ConfigError, StoreError};
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use rest::RestStore;
pub use sync::{CollectionState, LoadStatus, Snapshot, SyncStore};
