//! adb process integration for droidtail
//!
//! This crate owns the boundary to the Android platform tools: locating the
//! `adb` binary, enumerating devices, and spawning/clearing logcat.

mod client;

pub use client::{AdbClient, AdbError};

// Re-export types that are used in our public API
pub use droidtail_types::DeviceInfo;
