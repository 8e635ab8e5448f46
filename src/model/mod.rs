pub mod config;
pub mod node;
pub mod panel;

pub use config::*;
pub use node::*;
pub use panel::*;
