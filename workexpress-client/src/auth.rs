//! Session token handling
//!
//! The dashboard keeps its bearer token in the `workexpress_token` cookie.
//! [`AuthContext`] is built once and handed to the HTTP client, which
//! refuses to issue an authenticated request without it.

use crate::{ClientError, ClientResult};

/// Cookie that carries the session token
pub const TOKEN_COOKIE: &str = "workexpress_token";

/// Session object holding the bearer token
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    /// Context with no token; every authenticated call fails fast
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read the token from a `Cookie` header value (`a=1; workexpress_token=...`)
    pub fn from_cookie_header(header: &str) -> Self {
        let token = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == TOKEN_COOKIE)
            .map(|(_, value)| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self { token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value, or `NotAuthenticated`
    pub fn bearer(&self) -> ClientResult<String> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t))
            .ok_or(ClientError::NotAuthenticated)
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        *self = Self::new(token);
    }

    pub fn clear(&mut self) {
        self.token = None;
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cookie_header() {
        let auth = AuthContext::from_cookie_header("theme=dark; workexpress_token=abc.def; lang=es");
        assert_eq!(auth.token(), Some("abc.def"));
        assert_eq!(auth.bearer().unwrap(), "Bearer abc.def");
    }

    #[test]
    fn test_missing_cookie_fails_fast() {
        let auth = AuthContext::from_cookie_header("theme=dark; other_token=zzz");
        assert!(!auth.is_authenticated());
        assert!(matches!(auth.bearer(), Err(ClientError::NotAuthenticated)));

        let empty = AuthContext::from_cookie_header("workexpress_token=");
        assert!(!empty.is_authenticated());
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!AuthContext::new("   ").is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let auth = AuthContext::new("secret-token");
        assert!(!format!("{:?}", auth).contains("secret-token"));
    }

    #[test]
    fn test_clear() {
        let mut auth = AuthContext::new("t");
        auth.clear();
        assert!(auth.bearer().is_err());
        auth.set_token("u");
        assert_eq!(auth.token(), Some("u"));
    }
}
