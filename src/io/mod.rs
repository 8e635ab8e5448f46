pub mod config_io;
pub mod file_store;
pub mod memory_store;
pub mod store;
pub mod watcher;
