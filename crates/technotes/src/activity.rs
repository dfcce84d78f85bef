//! Posting activity calendar.
//!
//! Aggregates post timestamps into a 12 week heatmap. Columns are Sunday to
//! Saturday weeks; the last column is the week containing today.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Number of week columns.
pub const WEEKS: usize = 12;

/// Days per column.
pub const DAYS_PER_WEEK: usize = 7;

/// Total days in the window.
pub const WINDOW_DAYS: usize = WEEKS * DAYS_PER_WEEK;

/// Heatmap bucket for a day's post count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// No posts.
    None,
    /// One post.
    Low,
    /// Two posts.
    Medium,
    /// Three or more posts.
    High,
}

impl Intensity {
    /// Bucket a count, saturating at [`Intensity::High`].
    #[must_use]
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    /// All buckets from least to most, for legends.
    #[must_use]
    pub fn scale() -> [Self; 4] {
        [Self::None, Self::Low, Self::Medium, Self::High]
    }
}

/// One cell of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Day {
    /// Calendar date.
    pub date: NaiveDate,
    /// Posts created on this date.
    pub count: usize,
    /// Bucketed count.
    pub intensity: Intensity,
    /// Whether this is the current day.
    pub is_today: bool,
}

/// Heatmap data plus the summary numbers shown beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCalendar {
    /// [`WEEKS`] columns of [`DAYS_PER_WEEK`] days, oldest first.
    pub weeks: Vec<Vec<Day>>,
    /// Number of posts supplied, in or out of the window.
    pub total_posts: usize,
    /// Distinct dates with at least one post, in or out of the window.
    pub active_days: usize,
}

impl ActivityCalendar {
    /// Build the calendar from post dates.
    #[must_use]
    pub fn build(today: NaiveDate, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
        let mut total_posts = 0;
        for date in dates {
            *counts.entry(date).or_default() += 1;
            total_posts += 1;
        }

        let start = window_start(today);
        let weeks = (0..WEEKS)
            .map(|week| {
                (0..DAYS_PER_WEEK)
                    .map(|weekday| {
                        let date = start + Days::new((week * DAYS_PER_WEEK + weekday) as u64);
                        let count = counts.get(&date).copied().unwrap_or(0);
                        Day {
                            date,
                            count,
                            intensity: Intensity::from_count(count),
                            is_today: date == today,
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            weeks,
            total_posts,
            active_days: counts.len(),
        }
    }

    /// Build the calendar from UTC timestamps, bucketing by date in `now`'s
    /// timezone.
    #[must_use]
    pub fn from_timestamps<Tz: TimeZone>(now: &DateTime<Tz>, timestamps: &[DateTime<Utc>]) -> Self {
        let tz = now.timezone();
        Self::build(
            now.date_naive(),
            timestamps.iter().map(|ts| ts.with_timezone(&tz).date_naive()),
        )
    }

    /// All days, oldest first.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flatten()
    }

    /// First date of the window.
    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.days().next().map(|d| d.date)
    }

    /// Last date of the window.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.days().last().map(|d| d.date)
    }
}

/// The Sunday that begins the oldest column.
fn window_start(today: NaiveDate) -> NaiveDate {
    let weekday = u64::from(today.weekday().num_days_from_sunday());
    today - Days::new((WINDOW_DAYS - DAYS_PER_WEEK) as u64 + weekday)
}
