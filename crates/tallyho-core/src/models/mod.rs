//! Data models for Tallyho

mod item;

pub use item::{TodoId, TodoItem};
