//! Key schema for the ownership store, plus the glob matcher used by
//! [`keys`](super::KvStore::keys) lookups.
//!
//! All keys are dot-delimited strings so the same schema works against both
//! the Redis backend and the in-memory fallback.

/// Cached container (category) channel id for a guild.
#[must_use]
pub fn container(guild_id: u64) -> String {
    format!("containerCached.{guild_id}")
}

/// Cached lobby channel id for a guild.
#[must_use]
pub fn lobby(guild_id: u64) -> String {
    format!("lobbyCached.{guild_id}")
}

/// Ownership record for a temporary voice channel. The value is the owner's
/// user id; an absent key or empty value means "not a temp channel".
#[must_use]
pub fn tvc(guild_id: u64, channel_id: u64) -> String {
    format!("tvc.{guild_id}.{channel_id}")
}

/// Pattern matching every ownership record of a guild.
#[must_use]
pub fn tvc_pattern(guild_id: u64) -> String {
    format!("tvc.{guild_id}.*")
}

/// Cached reusable invite URL for a temp channel.
#[must_use]
pub fn invite(guild_id: u64, channel_id: u64) -> String {
    format!("invite.{guild_id}.{channel_id}")
}

/// Pattern matching every cached invite URL of a guild.
#[must_use]
pub fn invite_pattern(guild_id: u64) -> String {
    format!("invite.{guild_id}.*")
}

/// Running bug-report counter.
pub const REPORT_COUNTER: &str = "reports.count";

/// Matches `key` against a Redis-style glob where `*` matches any run of
/// characters (including none) and `?` matches exactly one.
#[must_use]
pub fn glob_match(pattern: &str, key: &str) -> bool {
    fn matches(p: &[char], k: &[char]) -> bool {
        match (p.first(), k.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                // `*` either consumes nothing or one more key character.
                matches(&p[1..], k) || (!k.is_empty() && matches(p, &k[1..]))
            }
            (Some('?'), Some(_)) => matches(&p[1..], &k[1..]),
            (Some(pc), Some(kc)) if pc == kc => matches(&p[1..], &k[1..]),
            _ => false,
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let k: Vec<char> = key.chars().collect();
    matches(&p, &k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_schema_is_dot_delimited() {
        assert_eq!(container(1), "containerCached.1");
        assert_eq!(lobby(2), "lobbyCached.2");
        assert_eq!(tvc(3, 4), "tvc.3.4");
        assert_eq!(invite(3, 4), "invite.3.4");
    }

    #[test]
    fn glob_star_matches_any_run() {
        assert!(glob_match("tvc.42.*", "tvc.42.1001"));
        assert!(glob_match("tvc.42.*", "tvc.42."));
        assert!(!glob_match("tvc.42.*", "tvc.43.1001"));
        assert!(glob_match("*", "anything at all"));
    }

    #[test]
    fn glob_question_mark_matches_single_char() {
        assert!(glob_match("tvc.?.9", "tvc.1.9"));
        assert!(!glob_match("tvc.?.9", "tvc.12.9"));
        assert!(!glob_match("tvc.?.9", "tvc..9"));
    }

    #[test]
    fn glob_literal_requires_exact_match() {
        assert!(glob_match("reports.count", "reports.count"));
        assert!(!glob_match("reports.count", "reports.counter"));
    }

    #[test]
    fn glob_mixed_wildcards() {
        assert!(glob_match("t?c.*.100?", "tvc.55.1001"));
        assert!(!glob_match("t?c.*.100?", "tvc.55.10011"));
    }
}
