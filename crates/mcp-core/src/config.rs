//! Environment helpers shared by provider configs
//!
//! Every `*Config::from_env` delegates to a `from_lookup` taking one of
//! these lookups, so configs can be built from a map in tests.

use std::time::Duration;

/// Upstream timeout used when `UPSTREAM_TIMEOUT_SECS` is unset or invalid
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Process environment lookup
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Value of `key`, treating blank values as unset
pub fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Timeout applied to every outbound HTTP request
pub fn upstream_timeout(lookup: &impl Fn(&str) -> Option<String>) -> Duration {
    let secs = non_empty(lookup, "UPSTREAM_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(upstream_timeout(&|_| None), Duration::from_secs(60));
        assert_eq!(upstream_timeout(&|_| Some("15".into())), Duration::from_secs(15));
        assert_eq!(upstream_timeout(&|_| Some("0".into())), Duration::from_secs(60));
        assert_eq!(upstream_timeout(&|_| Some("soon".into())), Duration::from_secs(60));
    }

    #[test]
    fn test_blank_is_unset() {
        assert_eq!(non_empty(&|_| Some("  ".into()), "KEY"), None);
        assert_eq!(non_empty(&|_| Some(" sk ".into()), "KEY").as_deref(), Some("sk"));
    }
}
