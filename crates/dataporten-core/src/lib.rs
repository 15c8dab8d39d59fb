//! # Dataporten Core
//!
//! Core types shared by the Dataporten crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use dataporten_core::AppError;
//!
//! let error = AppError::bad_gateway(anyhow::anyhow!("Dataporten returned 500"));
//! ```

pub mod errors;

pub use errors::AppError;
