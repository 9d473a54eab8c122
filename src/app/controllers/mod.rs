//! Controllers layer - orchestration and coordination.
//!
//! - Tab management
//! - The document session
//! - Command dispatch

pub mod commands;
pub mod session;
pub mod tabs;
