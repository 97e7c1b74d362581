//! Budget pacing: per-month daily averages and the number of zero-spend
//! days needed to bring an overspent month back to the budget line.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::monthly::MonthlyExpenses;

/// Default daily budget line, in whole rupiah.
pub const DEFAULT_BUDGET_PER_DAY: i64 = 65_000;

/// Derived spending statistics for one month bucket.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthStats {
    /// Calendar length of the month (28-31).
    pub days_in_month: u32,
    /// Days the month is judged on: full length for a past month, elapsed
    /// day-of-month for the month containing `today`.
    pub effective_days: u32,
    /// The bucket's total, carried over so the two can never diverge.
    pub total_expenses: i64,
    pub daily_average: f64,
    pub budget_per_day: i64,
    /// Future zero-spend days required to get the average back under the
    /// budget line. Zero when spending is at or under budget.
    pub over_budget_days: u32,
}

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;

    // The day before the first of the next month is the last day of this one.
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)
        .expect("month is 1-12 by construction");
    first_day_next_month
        .pred_opt()
        .expect("date is never NaiveDate::MIN")
        .day()
}

/// Evaluate every bucket against a fixed daily budget.
///
/// `today` is injected rather than read from the system clock so the result
/// is a pure function of its inputs. A month in progress is judged only on
/// its elapsed days; otherwise a fresh month would always look under budget
/// simply because future days have not accrued spending yet.
///
/// `budget_per_day` must be positive; callers validate it at the boundary.
pub fn evaluate(
    monthly: &MonthlyExpenses,
    today: NaiveDate,
    budget_per_day: i64,
) -> BTreeMap<String, MonthStats> {
    monthly
        .buckets
        .iter()
        .filter_map(|(key, bucket)| {
            // Any member record carries the bucket's year+month; a bucket
            // only exists once it has at least one record.
            let date = bucket.expenses.first()?.date;
            let (year, month) = (date.year(), date.month());

            let days = days_in_month(year, month);
            let effective_days = if year == today.year() && month == today.month() {
                today.day()
            } else {
                days
            };

            // A budget line too large for i64 can never be exceeded.
            let over_budget_days = match budget_per_day.checked_mul(i64::from(effective_days)) {
                Some(budget_line) => {
                    let overshoot = (bucket.total - budget_line).max(0) as u64;
                    overshoot.div_ceil(budget_per_day as u64) as u32
                }
                None => 0,
            };

            Some((
                key.clone(),
                MonthStats {
                    days_in_month: days,
                    effective_days,
                    total_expenses: bucket.total,
                    daily_average: bucket.total as f64 / f64::from(effective_days),
                    budget_per_day,
                    over_budget_days,
                },
            ))
        })
        .collect()
}
