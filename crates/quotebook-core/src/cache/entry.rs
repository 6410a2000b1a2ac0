use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Consider cached collections stale after 5 minutes.
/// Balances pay-per-read billing on the remote store against staleness
/// risk for a low-concurrency internal tool.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// The uniform TTL applied when a caller passes no override.
pub fn default_ttl() -> Duration {
    Duration::minutes(DEFAULT_TTL_MINUTES)
}

/// A timestamped collection snapshot. Immutable once created: updates
/// always replace the entry wholesale rather than editing `data` in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            data,
            cached_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// Human-readable age for diagnostics: "just now", "3m ago", "2h ago".
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Negative ages mean clock skew; report them as fresh too
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_fresh() {
        let entry = CacheEntry::new(vec![1, 2, 3], default_ttl());
        assert!(!entry.is_expired());
        assert_eq!(entry.expires_at, entry.cached_at + default_ttl());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        // Back-date both timestamps so the TTL window has passed
        let mut entry = CacheEntry::new(vec![1], default_ttl());
        entry.cached_at = Utc::now() - Duration::minutes(DEFAULT_TTL_MINUTES + 1);
        entry.expires_at = entry.cached_at + default_ttl();
        assert!(entry.is_expired());
    }

    #[test]
    fn test_age_display() {
        let fresh = CacheEntry::new(vec![1], default_ttl());
        assert_eq!(fresh.age_display(), "just now");

        let mut old = CacheEntry::new(vec![1], default_ttl());
        old.cached_at = Utc::now() - Duration::minutes(3);
        assert_eq!(old.age_display(), "3m ago");

        let mut older = CacheEntry::new(vec![1], default_ttl());
        older.cached_at = Utc::now() - Duration::hours(5);
        assert_eq!(older.age_display(), "5h ago");
    }
}
