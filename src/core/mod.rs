//! Core module containing fundamental traits and types

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod rate_limit;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, NoAuthProvider, StaticTokenProvider};
pub use entity::{Entity, Record};
pub use error::ApiError;
pub use field::FieldValue;
pub use rate_limit::{FixedWindowLimiter, RateDecision, RateLimiter, Unlimited};
