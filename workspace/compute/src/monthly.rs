//! Monthly aggregation: a flat, unordered list of expense records grouped
//! into per-month buckets with running totals.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::error::{ComputeError, Result};
use crate::record::{Expense, RawExpense};

/// Indonesian long month names, matching the labels the frontend renders.
const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// One calendar month's expenses with their running total.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthBucket {
    /// Display label, e.g. "Januari 2025". Derived, not authoritative.
    pub month_name: String,
    /// Sum of `amount` over all member records.
    pub total: i64,
    /// Member records, sorted descending by date (insertion order on ties).
    pub expenses: Vec<Expense>,
}

/// How the aggregator treats records that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Abort on the first invalid record; no partial aggregate is returned.
    #[default]
    Strict,
    /// Skip invalid records and report them in [`MonthlyExpenses::rejected`].
    Lenient,
}

/// A record the lenient policy refused, together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedExpense {
    pub record: RawExpense,
    pub reason: ComputeError,
}

/// Aggregation output: month buckets keyed by `"YYYY-MM"`.
///
/// The zero-padded key makes lexicographic order equal chronological order,
/// so the `BTreeMap` iterates oldest month first and [`newest_first`] simply
/// reverses it.
///
/// [`newest_first`]: MonthlyExpenses::newest_first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyExpenses {
    pub buckets: BTreeMap<String, MonthBucket>,
    /// Records skipped under [`ValidationPolicy::Lenient`]. Always empty
    /// under the strict policy and for pre-validated input.
    pub rejected: Vec<RejectedExpense>,
}

impl MonthlyExpenses {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MonthBucket> {
        self.buckets.get(key)
    }

    /// Iterate buckets newest month first, the order the presentation layer
    /// renders them in.
    pub fn newest_first(&self) -> impl Iterator<Item = (&str, &MonthBucket)> {
        self.buckets.iter().rev().map(|(key, bucket)| (key.as_str(), bucket))
    }
}

/// The `"YYYY-MM"` bucket key for a date. 1-based month, zero-padded, so
/// that string order equals chronological order.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// Group already-validated expenses into month buckets.
///
/// Bucket membership is a pure function of each record's year+month; input
/// order and duplicates are irrelevant. The bucket label is derived from the
/// first record encountered for that month, which is safe because all
/// members share year and month.
pub fn aggregate<I>(records: I) -> MonthlyExpenses
where
    I: IntoIterator<Item = Expense>,
{
    let mut buckets: BTreeMap<String, MonthBucket> = BTreeMap::new();

    for expense in records {
        let bucket = buckets
            .entry(month_key(expense.date))
            .or_insert_with(|| MonthBucket {
                month_name: month_label(expense.date),
                total: 0,
                expenses: Vec::new(),
            });
        bucket.total += expense.amount;
        bucket.expenses.push(expense);
    }

    // Stable sort keeps insertion order for records on the same day.
    for bucket in buckets.values_mut() {
        bucket.expenses.sort_by(|a, b| b.date.cmp(&a.date));
    }

    MonthlyExpenses {
        buckets,
        rejected: Vec::new(),
    }
}

/// Validate wire-shaped records and group them into month buckets.
///
/// Under [`ValidationPolicy::Strict`] the first invalid record aborts the
/// whole batch; under [`ValidationPolicy::Lenient`] invalid records are
/// skipped and collected on the output.
pub fn aggregate_raw(records: &[RawExpense], policy: ValidationPolicy) -> Result<MonthlyExpenses> {
    let mut parsed = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for raw in records {
        match raw.parse() {
            Ok(expense) => parsed.push(expense),
            Err(reason) => match policy {
                ValidationPolicy::Strict => return Err(reason),
                ValidationPolicy::Lenient => {
                    warn!(id = raw.id, %reason, "skipping invalid expense record");
                    rejected.push(RejectedExpense {
                        record: raw.clone(),
                        reason,
                    });
                }
            },
        }
    }

    let mut monthly = aggregate(parsed);
    monthly.rejected = rejected;
    Ok(monthly)
}
