//! Infrastructure layer - error type and the editing surface seam.

pub mod error;
pub mod surface;

pub use error::{AppError, Result};
