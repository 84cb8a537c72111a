//! Shared test harness: a fresh server per test with well-known tokens
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use axum_test::TestServer;
use storefront::config::AppConfig;
use storefront::server::{build_router, AppState};

/// Token with the `admin` role
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Token with no roles
pub const USER_TOKEN: &str = "test-user-token";

/// Build a test server with in-memory stores, the two test tokens and no
/// rate limiting.
pub fn test_server() -> TestServer {
    test_server_with_config(AppConfig::default_config())
}

/// Build a test server from a custom configuration.
pub fn test_server_with_config(config: AppConfig) -> TestServer {
    let state = AppState::from_config(&config);
    TestServer::new(build_router(state))
}
