//! Relative-age labels for post dates and comment timestamps.

use chrono::{DateTime, Utc};

/// Relative age label used on post listings.
///
/// "Today", "Yesterday", "N days ago", "N weeks ago", "N months ago",
/// else a short calendar date.
pub fn format_relative_date(date: DateTime<Utc>) -> String {
    let days = (Utc::now() - date).num_days();

    if days <= 0 {
        return "Today".to_owned();
    }
    if days == 1 {
        return "Yesterday".to_owned();
    }
    if days < 7 {
        return format!("{days} days ago");
    }
    if days < 30 {
        return format!("{} weeks ago", days / 7);
    }
    if days < 365 {
        return format!("{} months ago", days / 30);
    }

    date.format("%b %-d, %Y").to_string()
}

/// Finer-grained age label used on comments.
pub fn format_comment_timestamp(date: DateTime<Utc>) -> String {
    let delta = Utc::now() - date;

    if delta.num_seconds() < 60 {
        return "Just now".to_owned();
    }
    if delta.num_minutes() < 60 {
        return format!("{}m ago", delta.num_minutes());
    }
    if delta.num_hours() < 24 {
        return format!("{}h ago", delta.num_hours());
    }

    let days = delta.num_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    if days < 30 {
        return format!("{}w ago", days / 7);
    }
    if days > 365 {
        date.format("%b %-d, %Y").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn post_dates_scale_with_age() {
        let now = Utc::now();
        assert_eq!(format_relative_date(now), "Today");
        assert_eq!(format_relative_date(now - Duration::days(1)), "Yesterday");
        assert_eq!(format_relative_date(now - Duration::days(3)), "3 days ago");
        assert_eq!(format_relative_date(now - Duration::days(14)), "2 weeks ago");
        assert_eq!(format_relative_date(now - Duration::days(90)), "3 months ago");
    }

    #[test]
    fn old_post_dates_fall_back_to_calendar() {
        let old = Utc::now() - Duration::days(400);
        let label = format_relative_date(old);
        assert!(label.contains(&old.format("%Y").to_string()), "{label}");
    }

    #[test]
    fn comment_timestamps_scale_with_age() {
        let now = Utc::now();
        assert_eq!(format_comment_timestamp(now), "Just now");
        assert_eq!(
            format_comment_timestamp(now - Duration::minutes(5)),
            "5m ago"
        );
        assert_eq!(format_comment_timestamp(now - Duration::hours(3)), "3h ago");
        assert_eq!(format_comment_timestamp(now - Duration::days(2)), "2d ago");
        assert_eq!(format_comment_timestamp(now - Duration::days(21)), "3w ago");
    }
}
