//! Client identification for rate-limit bucketing.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

/// Deployment environment. Controls whether anonymous clients may be
/// fingerprinted by User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Test => "test",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Bucket used when nothing identifies the caller.
pub const UNKNOWN_CLIENT: &str = "unknown";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Derives the client identifier for a request.
///
/// Precedence: first `X-Forwarded-For` entry, then `X-Real-IP`, then (outside
/// production) a short SHA-256 fingerprint of the `User-Agent`, else
/// [`UNKNOWN_CLIENT`].
pub fn identify(headers: &HeaderMap, env: Environment) -> String {
    if let Some(first) = header(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    if !env.is_production() {
        if let Some(ua) = header(headers, "user-agent") {
            let digest = Sha256::digest(ua.as_bytes());
            return format!("ua-{}", &hex::encode(digest)[..16]);
        }
    }

    UNKNOWN_CLIENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_first_forwarded_entry_wins() {
        let h = headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "10.9.9.9"),
        ]);
        assert_eq!(identify(&h, Environment::Production), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let h = headers(&[("x-real-ip", "198.51.100.4")]);
        assert_eq!(identify(&h, Environment::Production), "198.51.100.4");
    }

    #[test]
    fn test_empty_forwarded_header_falls_through() {
        let h = headers(&[("x-forwarded-for", " , "), ("x-real-ip", "198.51.100.4")]);
        assert_eq!(identify(&h, Environment::Production), "198.51.100.4");
    }

    #[test]
    fn test_user_agent_fingerprint_outside_production() {
        let h = headers(&[("user-agent", "Mozilla/5.0 (X11; Linux x86_64)")]);

        let a = identify(&h, Environment::Development);
        let b = identify(&h, Environment::Test);

        assert!(a.starts_with("ua-"));
        assert_eq!(a.len(), 3 + 16);
        assert_eq!(a, b);

        let other = headers(&[("user-agent", "curl/8.5.0")]);
        assert_ne!(identify(&other, Environment::Development), a);
    }

    #[test]
    fn test_production_ignores_user_agent() {
        let h = headers(&[("user-agent", "curl/8.5.0")]);
        assert_eq!(identify(&h, Environment::Production), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_no_headers_is_unknown() {
        assert_eq!(identify(&HeaderMap::new(), Environment::Development), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Test));
        assert!("staging".parse::<Environment>().is_err());
    }
}
