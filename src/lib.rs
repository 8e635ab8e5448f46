//! Browse a bookmark tree as drill-down panels.
//!
//! The core lives in [`ops`]: nodes from a [`io::store::BookmarkStore`] are
//! classified, indexed and rendered into panels, the render is cached in a
//! shared [`ops::context::BackgroundContext`] until the store reports a
//! mutation, and [`ops::navigation::NavigationController`] drills individual
//! panels into subfolders and back.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
