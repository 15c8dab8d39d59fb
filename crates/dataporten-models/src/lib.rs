//! # Dataporten Models
//!
//! Plain data structures shared across the Dataporten crates.
//!
//! - [`groups`]: Group memberships as returned by the Dataporten groups API
//! - [`users`]: The host application's authenticated user record
//! - [`tokens`]: Linked Dataporten OAuth access tokens
//!
//! # Example
//!
//! ```ignore
//! use dataporten_models::{Group, GroupType};
//!
//! let groups: Vec<Group> = serde_json::from_str(body)?;
//! let courses: Vec<&Group> = groups.iter().filter(|g| g.is_course()).collect();
//! ```

pub mod groups;
pub mod tokens;
pub mod users;

pub use groups::{Affiliation, Group, GroupType, Membership, course_code};
pub use tokens::AccessToken;
pub use users::User;
