pub mod disk_store;
pub mod error;
pub mod memory_store;
pub mod store;
