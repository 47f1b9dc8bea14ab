//! PII redaction for log output.
//!
//! Emails keep their first character and domain; bearer tokens, API keys
//! and long opaque tokens are replaced outright.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";

/// Vetted literal patterns; construction cannot fail.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// `Authorization: Bearer <token>` values, any token shape.
    pub fn bearer() -> &'static Regex {
        static BEARER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9._~+/=-]+").unwrap()
        });
        &BEARER_REGEX
    }

    /// Raw API keys as issued by `/api-keys` (`ci_` + url-safe random).
    pub fn api_key() -> &'static Regex {
        static API_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\bci_[A-Za-z0-9_-]{8,}").unwrap()
        });
        &API_KEY_REGEX
    }

    pub fn base64_token() -> &'static Regex {
        static BASE64_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").unwrap()
        });
        &BASE64_TOKEN_REGEX
    }

    pub fn hex_token() -> &'static Regex {
        static HEX_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Fa-f0-9]{16,}\b").unwrap()
        });
        &HEX_TOKEN_REGEX
    }
}

fn mask_email(full: &str) -> String {
    match full.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("@{domain}"),
        },
        None => full.to_string(),
    }
}

/// Masks emails, bearer tokens, API keys and opaque tokens, in that order.
pub fn redact(input: &str) -> String {
    let out = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        mask_email(&caps[0])
    });
    let out = PiiRegexRegistry::bearer().replace_all(&out, "Bearer [REDACTED_TOKEN]");
    let out = PiiRegexRegistry::api_key().replace_all(&out, "ci_[REDACTED_KEY]");
    let out = PiiRegexRegistry::base64_token().replace_all(&out, REDACTED_TOKEN);
    PiiRegexRegistry::hex_token()
        .replace_all(&out, REDACTED_TOKEN)
        .into_owned()
}

/// Display wrapper that redacts on format, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
