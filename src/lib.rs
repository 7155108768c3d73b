//! Client library for an election-management backend: typed access to its
//! REST API, and the lifecycle rules that decide what an election's status is
//! and when its results may be shown.

#[cfg(test)]
#[macro_use]
extern crate api_test;

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod session;

pub use api::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::{ElectionStatus, LifecycleEvaluator};
pub use session::{Session, SessionStore};
