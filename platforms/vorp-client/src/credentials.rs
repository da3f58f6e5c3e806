//! Credential store and its bridge into reqwest's cookie handling.

use std::collections::BTreeMap;
use std::sync::Arc;

use cookie::time::OffsetDateTime;
use cookie::Cookie;
use parking_lot::RwLock;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;

/// Named credentials (the session and CSRF cookies) shared with the HTTP client.
///
/// The client reads every stored credential into the `Cookie` header of each
/// request, writes `Set-Cookie` responses back, and echoes the CSRF credential
/// as a header on mutating requests.
pub trait CredentialStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
    fn clear(&self);
    /// All credentials in a stable order.
    fn entries(&self) -> Vec<(String, String)>;
}

/// Process-local credentials, dropped with the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentials {
    values: RwLock<BTreeMap<String, String>>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn CredentialStore> {
        Arc::new(Self::new())
    }
}

impl CredentialStore for InMemoryCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.values.write().insert(name.to_string(), value.to_string());
    }

    fn remove(&self, name: &str) {
        self.values.write().remove(name);
    }

    fn clear(&self) {
        self.values.write().clear();
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SetCookie {
    pub name: String,
    pub value: String,
    /// Empty value, `Max-Age<=0` or an `Expires` in the past: the server is
    /// deleting the cookie.
    pub expired: bool,
}

/// Parses a `Set-Cookie` header. Percent-encoded values are decoded.
pub(crate) fn parse_set_cookie(header: &str) -> Option<SetCookie> {
    let cookie = Cookie::parse_encoded(header)
        .or_else(|_| Cookie::parse(header))
        .ok()?;
    let value = cookie.value().trim_matches('"');

    let max_age_expired = cookie
        .max_age()
        .is_some_and(|age| age.is_zero() || age.is_negative());
    let expires_passed = cookie
        .expires_datetime()
        .is_some_and(|at| at <= OffsetDateTime::now_utc());

    Some(SetCookie {
        name: cookie.name().to_string(),
        value: value.to_string(),
        expired: value.is_empty() || max_age_expired || expires_passed,
    })
}

/// Adapts a [`CredentialStore`] to reqwest's cookie provider. A single
/// backend is assumed, so domains and paths are not tracked.
pub(crate) struct CookieBridge {
    store: Arc<dyn CredentialStore>,
}

impl CookieBridge {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

impl CookieStore for CookieBridge {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            let Some(cookie) = header.to_str().ok().and_then(parse_set_cookie) else {
                tracing::warn!(%url, "ignoring malformed Set-Cookie header");
                continue;
            };
            if cookie.expired {
                tracing::debug!(name = %cookie.name, "credential removed by server");
                self.store.remove(&cookie.name);
            } else {
                tracing::debug!(name = %cookie.name, "credential stored");
                self.store.set(&cookie.name, &cookie.value);
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let entries = self.store.entries();
        if entries.is_empty() {
            return None;
        }
        let joined = entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_cookie() {
        let cookie = parse_set_cookie("csrftoken=abc123; expires=Thu, 01 Jan 2099 00:00:00 GMT; Path=/; SameSite=Lax").unwrap();
        assert_eq!(cookie.name, "csrftoken");
        assert_eq!(cookie.value, "abc123");
        assert!(!cookie.expired);
    }

    #[test]
    fn test_parse_deletion() {
        let cookie = parse_set_cookie("sessionid=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/").unwrap();
        assert_eq!(cookie.name, "sessionid");
        assert!(cookie.expired);

        let cookie = parse_set_cookie("sessionid=xyz; max-age=0").unwrap();
        assert!(cookie.expired);
    }

    #[test]
    fn test_past_expires_deletes() {
        let cookie = parse_set_cookie("sessionid=xyz; expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/").unwrap();
        assert_eq!(cookie.value, "xyz");
        assert!(cookie.expired);
    }

    #[test]
    fn test_parse_quoted_and_encoded_values() {
        let cookie = parse_set_cookie("csrftoken=\"abc\"; Path=/").unwrap();
        assert_eq!(cookie.value, "abc");
        assert!(!cookie.expired);

        let cookie = parse_set_cookie("note=a%20b; Path=/").unwrap();
        assert_eq!(cookie.value, "a b");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_set_cookie("no-equals-sign").is_none());
        assert!(parse_set_cookie("=value").is_none());
    }

    #[test]
    fn test_bridge_round_trip() {
        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentials::new());
        let bridge = CookieBridge::new(store.clone());
        let url = Url::parse("http://127.0.0.1:8000/api/login/").unwrap();

        let headers = [
            HeaderValue::from_static("csrftoken=tok; Path=/"),
            HeaderValue::from_static("sessionid=s1; HttpOnly; Path=/"),
        ];
        bridge.set_cookies(&mut headers.iter(), &url);
        assert_eq!(store.get("sessionid").as_deref(), Some("s1"));

        let header = bridge.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "csrftoken=tok; sessionid=s1");

        let deletion = [HeaderValue::from_static("sessionid=\"\"; Max-Age=0; Path=/")];
        bridge.set_cookies(&mut deletion.iter(), &url);
        assert_eq!(store.get("sessionid"), None);
        assert_eq!(bridge.cookies(&url).unwrap().to_str().unwrap(), "csrftoken=tok");
    }
}
