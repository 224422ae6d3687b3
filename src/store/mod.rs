//! Persistence layer: key-value storage for user preferences.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlPreferenceStore;
pub use memory::InMemoryPreferenceStore;
pub use traits::PreferenceStore;
