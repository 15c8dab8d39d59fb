//! # Dataporten
//!
//! Group membership lookup from [Dataporten] for axum applications.
//!
//! Dataporten is the federated identity provider used by Norwegian
//! educational institutions. Its groups API lists the organisations, courses
//! and ad-hoc groups a user belongs to. This crate attaches that lookup to
//! users who have linked their Dataporten account.
//!
//! [Dataporten]: https://docs.dataporten.no/
//!
//! ## How it fits together
//!
//! ```text
//! host auth layer ──► RequestUser::{Anonymous, Authenticated}
//!        │
//!        ▼
//! dataporten_groups ──► TokenResolver ──► valid token?
//!        │                                   │ yes
//!        ▼                                   ▼
//!     handler ◄────────────── RequestUser::Dataporten(DataportenUser)
//!        │
//!        ▼ user.groups().await
//! DataportenApi ──► CachedHttpClient ──► SQLite cache / groups-api.dataporten.no
//! ```
//!
//! - The classifier never talks to Dataporten; groups are fetched when a
//!   handler asks for them.
//! - Successful responses are cached on disk for 15 minutes (configurable),
//!   keyed by URL and request headers, so each token gets its own entry.
//! - Any non-200 answer, transport failure or malformed body is an error for
//!   the caller. There is no retry.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{Router, middleware, routing::get};
//! use dataporten::{init_app_state, middleware::groups::dataporten_groups};
//! use dataporten::modules::users::{DataportenUser, TokenResolver};
//! use dataporten_config::DataportenConfig;
//!
//! async fn my_courses(user: DataportenUser) -> Result<String, dataporten_core::AppError> {
//!     let courses = user.courses().await.map_err(dataporten_core::AppError::bad_gateway)?;
//!     Ok(format!("{} courses", courses.len()))
//! }
//!
//! let state = init_app_state(DataportenConfig::from_env(), Arc::new(MyTokens)).await?;
//! let app = Router::new()
//!     .route("/courses", get(my_courses))
//!     .layer(middleware::from_fn_with_state(state.clone(), dataporten_groups))
//!     .layer(middleware::from_fn(my_session_auth))
//!     .with_state(state);
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATAPORTEN_CACHE_REQUESTS` | `true` |
//! | `DATAPORTEN_CACHE_PATH` | `tmp/` |
//! | `DATAPORTEN_CACHE_TTL_SECONDS` | `900` |
//! | `DATAPORTEN_API_URL` | `https://groups-api.dataporten.no` |

pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use modules::groups::{ApiError, DataportenApi};
pub use modules::users::{DataportenUser, InMemoryTokenStore, RequestUser, TokenResolver};
pub use state::{AppState, init_app_state};
