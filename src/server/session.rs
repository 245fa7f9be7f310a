use std::collections::HashMap;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use parking_lot::RwLock;

use crate::store::repository::UserId;

pub const SESSION_COOKIE: &str = "session";

/// In-process session map: opaque 128-bit token -> user id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, UserId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fresh random token to `user` and return it.
    pub fn create(&self, user: UserId) -> String {
        let token = format!("{:032x}", rand::random::<u128>());
        self.sessions.write().insert(token.clone(), user);
        token
    }

    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.sessions.read().get(token).copied()
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}

/// Pull the session token out of the request's Cookie header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token)
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn create_resolve_revoke_round_trip() {
        let store = SessionStore::new();
        let token = store.create(UserId(7));
        assert_eq!(store.resolve(&token), Some(UserId(7)));
        store.revoke(&token);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn tokens_are_unique_per_session() {
        let store = SessionStore::new();
        assert_ne!(store.create(UserId(1)), store.create(UserId(1)));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
