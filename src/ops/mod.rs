pub mod cache;
pub mod classify;
pub mod context;
pub mod favicon;
pub mod init_guard;
pub mod navigation;
pub mod render;
pub mod root_index;
pub mod tabs;
