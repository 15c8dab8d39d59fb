//! # Dataporten Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`dataporten`]: Groups API location and response cache settings
//! - [`server`]: Bind address and seeded tokens for the example host
//!
//! # Example
//!
//! ```ignore
//! use dataporten_config::{DataportenConfig, ServerConfig};
//!
//! let dataporten = DataportenConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod dataporten;
pub mod server;

pub use dataporten::DataportenConfig;
pub use server::ServerConfig;
