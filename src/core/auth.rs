//! Token-based authorization collaborators
//!
//! Credential storage and token issuance live outside this service; callers
//! present opaque bearer tokens that an [`AuthProvider`] resolves into an
//! [`AuthContext`]. Handlers and middleware only ever consult the context
//! and a per-endpoint [`AuthPolicy`].

use async_trait::async_trait;
use std::collections::HashMap;

/// Authorization context resolved from a request's bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated caller
    Token { name: String, roles: Vec<String> },

    /// No (or unknown) credentials
    Anonymous,
}

impl AuthContext {
    /// Check if the context carries valid credentials
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthContext::Anonymous)
    }

    /// Check if the context carries a role
    pub fn has_role(&self, role: &str) -> bool {
        match self {
            AuthContext::Token { roles, .. } => roles.iter().any(|r| r == role),
            AuthContext::Anonymous => false,
        }
    }

    /// Caller name, if authenticated
    pub fn name(&self) -> Option<&str> {
        match self {
            AuthContext::Token { name, .. } => Some(name),
            AuthContext::Anonymous => None,
        }
    }
}

/// Authorization policy for an endpoint class
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated caller
    Authenticated,

    /// Caller must have one of these roles
    HasRole(Vec<String>),
}

impl AuthPolicy {
    /// Check if the context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => context.is_authenticated(),
            AuthPolicy::HasRole(required) => required.iter().any(|r| context.has_role(r)),
        }
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an optional bearer token into an auth context.
    ///
    /// Unknown tokens resolve to [`AuthContext::Anonymous`]; the policy
    /// check downstream decides whether that is acceptable.
    async fn resolve(&self, token: Option<&str>) -> AuthContext;
}

/// Auth provider that accepts every request as an authenticated admin.
/// For development only.
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn resolve(&self, _token: Option<&str>) -> AuthContext {
        AuthContext::Token {
            name: "anonymous-dev".to_string(),
            roles: vec!["admin".to_string()],
        }
    }
}

/// Auth provider backed by a fixed token table, typically loaded from
/// configuration at startup.
pub struct StaticTokenProvider {
    tokens: HashMap<String, (String, Vec<String>)>,
}

impl StaticTokenProvider {
    pub fn new(entries: impl IntoIterator<Item = (String, String, Vec<String>)>) -> Self {
        let tokens = entries
            .into_iter()
            .map(|(token, name, roles)| (token, (name, roles)))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn resolve(&self, token: Option<&str>) -> AuthContext {
        match token.and_then(|t| self.tokens.get(t)) {
            Some((name, roles)) => AuthContext::Token {
                name: name.clone(),
                roles: roles.clone(),
            },
            None => AuthContext::Anonymous,
        }
    }
}
