//! Middleware for request processing.
//!
//! - [`groups`]: Upgrades users with a linked Dataporten token so handlers can
//!   look up their group memberships
//! - [`remote_user`]: Header based authentication used by the example host
//!
//! # Flow
//!
//! 1. The host's authentication layer inserts a `RequestUser` extension
//! 2. `dataporten_groups` resolves the user's linked token through the
//!    configured `TokenResolver`
//! 3. Users with a valid token become `RequestUser::Dataporten`
//! 4. Handlers extract `RequestUser` or `DataportenUser` and fetch groups lazily

pub mod groups;
pub mod remote_user;
