//! Services layer - business operations and utilities.
//!
//! - Syntax highlighting
//! - LLM and Telegram clients
//! - Invoice formatting
//! - Text and file-dialog helpers

pub mod file_filters;
pub mod highlight;
pub mod invoice;
pub mod llm;
pub mod messaging;
pub mod text_ops;

#[cfg(test)]
mod loopback;
