//! Cookies the API sets on the client.
//!
//! The refresh credential is an HTTP-only cookie, so the jar belongs to the
//! session and is stored alongside it.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A cookie received in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Host or domain the cookie belongs to, lowercase.
    pub domain: String,
    /// Only sent to `domain` itself, not its subdomains.
    #[serde(default)]
    pub host_only: bool,
    /// Path prefix the cookie applies to.
    #[serde(default = "root_path")]
    pub path: String,
    /// Expiry; `None` for a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    /// Only sent over HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Hidden from scripts.
    #[serde(default)]
    pub http_only: bool,
}

fn root_path() -> String {
    "/".to_string()
}

impl Cookie {
    /// Parses a `Set-Cookie` header value received from `origin`.
    ///
    /// Returns `None` for a malformed header or one naming a domain the
    /// origin may not set cookies for.
    #[must_use]
    pub fn parse(header: &str, origin: &Url) -> Option<Self> {
        let host = origin.host_str()?.to_ascii_lowercase();
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            domain: host.clone(),
            host_only: true,
            path: default_path(origin),
            expires: None,
            secure: false,
            http_only: false,
        };

        let mut max_age = None;
        for part in parts {
            let (attr, val) = part
                .split_once('=')
                .map_or((part.trim(), ""), |(a, v)| (a.trim(), v.trim()));
            match attr.to_ascii_lowercase().as_str() {
                "domain" if !val.is_empty() => {
                    let domain = val.trim_start_matches('.').to_ascii_lowercase();
                    if !domain_matches(&domain, &host) {
                        return None;
                    }
                    cookie.domain = domain;
                    cookie.host_only = false;
                }
                "path" if val.starts_with('/') => cookie.path = val.to_string(),
                "expires" => {
                    if let Ok(at) = DateTime::parse_from_rfc2822(val) {
                        cookie.expires = Some(at.with_timezone(&Utc));
                    }
                }
                "max-age" => max_age = val.parse::<i64>().ok(),
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                _ => {}
            }
        }
        if let Some(seconds) = max_age {
            cookie.expires = Some(Utc::now() + Duration::seconds(seconds));
        }

        Some(cookie)
    }

    /// Returns true once the expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|at| at <= Utc::now())
    }

    /// Returns true if the cookie should be sent to `url`.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host_ok = if self.host_only {
            host == self.domain
        } else {
            domain_matches(&self.domain, &host)
        };
        host_ok && path_matches(&self.path, url.path()) && (!self.secure || url.scheme() == "https")
    }

    fn same_slot(&self, other: &Self) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

/// The cookies held for the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// Applies one `Set-Cookie` header from `origin`.
    ///
    /// A cookie replaces the one with the same name, domain and path; an
    /// already expired cookie only deletes. Returns true if the jar changed.
    pub fn store(&mut self, header: &str, origin: &Url) -> bool {
        let Some(cookie) = Cookie::parse(header, origin) else {
            return false;
        };

        let before = self.cookies.len();
        self.cookies.retain(|held| !held.same_slot(&cookie));
        let removed = self.cookies.len() != before;
        if cookie.is_expired() {
            return removed;
        }
        self.cookies.push(cookie);
        true
    }

    /// The `Cookie` header value for `url`, if any cookie applies.
    #[must_use]
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let mut applicable: Vec<&Cookie> = self
            .cookies
            .iter()
            .filter(|c| !c.is_expired() && c.matches(url))
            .collect();
        if applicable.is_empty() {
            return None;
        }
        // Longer paths first.
        applicable.sort_by_key(|c| Reverse(c.path.len()));
        let pairs: Vec<String> = applicable
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        Some(pairs.join("; "))
    }

    /// Drops expired cookies. Returns true if any were dropped.
    pub fn purge_expired(&mut self) -> bool {
        let before = self.cookies.len();
        self.cookies.retain(|c| !c.is_expired());
        self.cookies.len() != before
    }

    /// Looks up a cookie by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Number of cookies held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if no cookie is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Directory of the request path, the path a cookie gets without `Path`.
fn default_path(origin: &Url) -> String {
    let path = origin.path();
    match path.rfind('/') {
        Some(0) | None => root_path(),
        Some(end) => path[..end].to_string(),
    }
}

fn domain_matches(domain: &str, host: &str) -> bool {
    host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    request_path == cookie_path
        || (request_path.starts_with(cookie_path)
            && (cookie_path.ends_with('/')
                || request_path[cookie_path.len()..].starts_with('/')))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_refresh_cookie() {
        let cookie = Cookie::parse(
            "refresh_token=R1; Path=/api/auth/; HttpOnly; Secure; SameSite=Lax",
            &url("https://folio.example/api/auth/user/login/"),
        )
        .unwrap();

        assert_eq!(cookie.name, "refresh_token");
        assert_eq!(cookie.value, "R1");
        assert_eq!(cookie.domain, "folio.example");
        assert!(cookie.host_only);
        assert_eq!(cookie.path, "/api/auth/");
        assert!(cookie.http_only);
        assert!(cookie.secure);
        assert_eq!(cookie.expires, None);
    }

    #[test]
    fn test_default_path_is_request_directory() {
        let cookie = Cookie::parse(
            "a=1",
            &url("https://folio.example/api/auth/user/login/"),
        )
        .unwrap();
        assert_eq!(cookie.path, "/api/auth/user/login");

        let root = Cookie::parse("a=1", &url("https://folio.example/login")).unwrap();
        assert_eq!(root.path, "/");
    }

    #[test]
    fn test_foreign_domain_is_refused() {
        let origin = url("https://api.folio.example/");
        assert!(Cookie::parse("a=1; Domain=other.example", &origin).is_none());
        let parent = Cookie::parse("a=1; Domain=.folio.example", &origin).unwrap();
        assert_eq!(parent.domain, "folio.example");
        assert!(!parent.host_only);
        assert!(parent.matches(&url("https://www.folio.example/")));
    }

    #[test]
    fn test_matching_respects_path_host_and_scheme() {
        let cookie = Cookie::parse(
            "refresh_token=R1; Path=/api; Secure",
            &url("https://folio.example/api/auth/"),
        )
        .unwrap();

        assert!(cookie.matches(&url("https://folio.example/api/auth/user/token/refresh/")));
        assert!(cookie.matches(&url("https://folio.example/api")));
        assert!(!cookie.matches(&url("https://folio.example/apiary/")));
        assert!(!cookie.matches(&url("http://folio.example/api/")));
        assert!(!cookie.matches(&url("https://sub.folio.example/api/")));
    }

    #[test]
    fn test_store_replaces_same_cookie() {
        let origin = url("http://127.0.0.1:8080/api/auth/user/login/");
        let mut jar = CookieJar::new();

        assert!(jar.store("refresh_token=R1; Path=/", &origin));
        assert!(jar.store("refresh_token=R2; Path=/", &origin));

        assert_eq!(jar.len(), 1);
        assert_eq!(
            jar.header_for(&url("http://127.0.0.1:8080/api/workspaces/")).as_deref(),
            Some("refresh_token=R2")
        );
    }

    #[test]
    fn test_expired_cookie_deletes() {
        let origin = url("https://folio.example/api/auth/user/logout/");
        let mut jar = CookieJar::new();
        jar.store("refresh_token=R1; Path=/", &origin);

        assert!(jar.store("refresh_token=; Path=/; Max-Age=0", &origin));
        assert!(jar.is_empty());
        assert!(!jar.store(
            "refresh_token=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            &origin
        ));
    }

    #[test]
    fn test_header_orders_longer_paths_first() {
        let origin = url("https://folio.example/api/auth/");
        let mut jar = CookieJar::new();
        jar.store("csrftoken=C; Path=/", &origin);
        jar.store("refresh_token=R1; Path=/api/auth/", &origin);

        assert_eq!(
            jar.header_for(&url("https://folio.example/api/auth/user/token/refresh/"))
                .as_deref(),
            Some("refresh_token=R1; csrftoken=C")
        );
        assert_eq!(
            jar.header_for(&url("https://folio.example/api/workspaces/")).as_deref(),
            Some("csrftoken=C")
        );
    }

    #[test]
    fn test_jar_round_trips_through_json() {
        let mut jar = CookieJar::new();
        jar.store(
            "refresh_token=R1; Path=/; Max-Age=86400; HttpOnly",
            &url("https://folio.example/api/"),
        );

        let encoded = serde_json::to_string(&jar).unwrap();
        let decoded: CookieJar = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, jar);
        assert_eq!(decoded.get("refresh_token").unwrap().value, "R1");
    }
}
