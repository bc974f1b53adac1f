//! Log processing for droidtail
//!
//! This crate provides the bounded log buffer, the filter engine, and the
//! logcat producer tasks that feed the buffer.

mod buffer;
mod filter;
mod stream;

pub use buffer::{DEFAULT_CAPACITY, DRAIN_INTERVAL, LogBuffer};
pub use filter::{CompiledFilter, FilterEngine};
pub use stream::LogcatStream;

// Re-export types used in our public API
pub use droidtail_types::{FilterConfig, LogEntry, Severity};
