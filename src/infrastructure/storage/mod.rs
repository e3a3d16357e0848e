//! Key/value store adapters for session state.

#[cfg(feature = "keyring")]
mod keyring_store;
#[cfg(not(feature = "keyring"))]
mod keyring_store_stub;
mod memory_store;

#[cfg(feature = "keyring")]
pub use keyring_store::KeyringStore;
#[cfg(not(feature = "keyring"))]
pub use keyring_store_stub::KeyringStore;
pub use memory_store::MemoryStore;
