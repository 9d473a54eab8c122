//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Settings, Messages)
//! - `controllers/` - Orchestration (Session, TabManager, command dispatch)
//! - `services/` - Business operations (highlighting, LLM, Telegram, invoices)
//! - `infrastructure/` - Error type and the text surface abstraction

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::commands::{Flow, InvoiceForm, Prompter, dispatch};
pub use controllers::session::{SaveOutcome, Session};
pub use domain::{AppSettings, Document, DocumentId, Message, SettingsStore};
pub use infrastructure::error::{AppError, Result};
