//! Daily progress and the short trend shown on the dashboard.
//!
//! The trend is built by laying out the window's days first, each at zero,
//! and then overlaying whatever the grouped query returned. Days with no rows
//! keep their zero and the order never depends on the query.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::SqlitePool;
use time::{macros::format_description, Date, Duration};
use tracing::warn;
use uuid::Uuid;

use crate::workouts::repo;

pub const DAILY_GOAL: i64 = 2;
pub const TREND_DAYS: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub today_count: i64,
    pub total_count: i64,
    pub daily_goal: i64,
    pub progress_percent: i64,
    pub trend: Vec<TrendPoint>,
}

impl DashboardSummary {
    pub fn labels(&self) -> Vec<&str> {
        self.trend.iter().map(|p| p.day.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<i64> {
        self.trend.iter().map(|p| p.count).collect()
    }
}

/// Share of the daily goal reached, capped at 100.
pub fn progress_percent(today_count: i64, daily_goal: i64) -> i64 {
    if daily_goal <= 0 {
        return 100;
    }
    (today_count.max(0) * 100 / daily_goal).min(100)
}

/// The `days` calendar days ending with `today`, oldest first.
pub fn trend_window(today: Date, days: i64) -> Vec<Date> {
    (0..days)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// Overlay grouped counts onto the window. Rows for days outside it are dropped.
pub fn fill_trend<I>(window: &[Date], rows: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = (Date, i64)>,
{
    let mut by_day: BTreeMap<Date, i64> = window.iter().map(|d| (*d, 0)).collect();
    for (day, count) in rows {
        if let Some(slot) = by_day.get_mut(&day) {
            *slot = count;
        }
    }
    by_day
        .into_iter()
        .map(|(day, count)| TrendPoint {
            day: format_day(day),
            count,
        })
        .collect()
}

pub async fn summary(db: &SqlitePool, user_id: Uuid, today: Date) -> sqlx::Result<DashboardSummary> {
    let today_count = repo::count_on_day(db, user_id, today).await?;
    let total_count = repo::count_total(db, user_id).await?;

    let window = trend_window(today, TREND_DAYS);
    let rows = repo::daily_counts(db, user_id, window[0], today).await?;
    let parsed = rows.into_iter().filter_map(|(day, count)| match parse_day(&day) {
        Some(d) => Some((d, count)),
        None => {
            warn!(%day, "unparseable day in trend rows");
            None
        }
    });

    Ok(DashboardSummary {
        today_count,
        total_count,
        daily_goal: DAILY_GOAL,
        progress_percent: progress_percent(today_count, DAILY_GOAL),
        trend: fill_trend(&window, parsed),
    })
}

fn format_day(day: Date) -> String {
    day.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| day.to_string())
}

fn parse_day(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}
