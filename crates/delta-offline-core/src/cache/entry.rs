use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached value plus the time it was stored.
///
/// The timestamp is informational only; entries are served regardless of age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    /// Short relative age ("just now", "5m ago", "2h ago", "3d ago"),
    /// rounded to the nearest unit
    pub fn age_display(&self) -> String {
        match self.age_minutes() {
            m if m < 1 => "just now".to_string(),
            m if m < MINUTES_PER_HOUR => format!("{}m ago", m),
            m if m < MINUTES_PER_DAY => format!("{}h ago", round_to(m, MINUTES_PER_HOUR)),
            m => format!("{}d ago", round_to(m, MINUTES_PER_DAY)),
        }
    }
}

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

fn round_to(minutes: i64, unit: i64) -> i64 {
    (minutes + unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn aged(minutes: i64) -> CachedData<()> {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() - Duration::minutes(minutes);
        cached
    }

    #[test]
    fn test_age_display_just_now() {
        assert_eq!(CachedData::new(()).age_display(), "just now");

        // Entry stamped in the future
        let mut skewed = CachedData::new(());
        skewed.cached_at = Utc::now() + Duration::minutes(5);
        assert_eq!(skewed.age_display(), "just now");
    }

    #[test]
    fn test_age_display_rounding() {
        assert_eq!(aged(5).age_display(), "5m ago");
        assert_eq!(aged(89).age_display(), "1h ago");
        assert_eq!(aged(95).age_display(), "2h ago");
        assert_eq!(aged(1440 + 60).age_display(), "1d ago");
        assert_eq!(aged(1440 + 13 * 60).age_display(), "2d ago");
    }
}
