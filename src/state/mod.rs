//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WalkState`: where the pagination walk is (active on a page, or done)
//! - `StopReason`: why the walk ended

mod walk_state;

pub use walk_state::{StopReason, WalkState};
