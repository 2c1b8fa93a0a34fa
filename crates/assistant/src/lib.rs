//! Pastoral helpers that each make one call to the generative model.
//!
//! Unlike passage lookups these are not cached and have no schema: the answer
//! is free text. Every task has a fixed fallback sentence which is returned
//! instead of an error, so callers can always show *something*.

mod assistant;
pub mod error;
mod task;

pub use crate::assistant::{Assistant, DEFAULT_QUICK_MODEL, DEFAULT_REASONING_MODEL};
pub use crate::task::{ModelTier, Task};
