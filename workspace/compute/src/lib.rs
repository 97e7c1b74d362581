//! Pure computation core for the expense ledger.
//!
//! Everything in this crate is a plain function over in-memory values: the
//! handlers fetch a snapshot of expense records, feed it through the monthly
//! aggregator and the budget evaluator, and serve the result. No I/O, no
//! shared state, and re-invocation is always a full recomputation.

pub mod budget;
pub mod error;
pub mod monthly;
pub mod record;

pub use budget::{days_in_month, evaluate, MonthStats, DEFAULT_BUDGET_PER_DAY};
pub use error::{ComputeError, Result};
pub use monthly::{aggregate, aggregate_raw, MonthBucket, MonthlyExpenses, ValidationPolicy};
pub use record::{Expense, RawExpense};
