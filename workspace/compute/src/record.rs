use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ComputeError, Result};

/// An expense record as delivered by the record source, before validation.
///
/// `date` stays a string and `amount` a raw JSON value so that a malformed
/// field can be reported per record instead of failing deserialization of
/// the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExpense {
    pub id: i64,
    pub date: String,
    pub amount: Value,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// A validated expense record, the unit the aggregation core works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    /// Amount in whole rupiah, never negative.
    pub amount: i64,
    pub description: String,
}

impl RawExpense {
    /// Validate this raw record into a typed [`Expense`].
    ///
    /// The amount is accepted as a JSON integer or a string holding one;
    /// floats, negative values and non-numeric text are rejected. An
    /// unparseable amount is an error, never a silent zero, so a bad record
    /// can never skew the monthly totals.
    pub fn parse(&self) -> Result<Expense> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            ComputeError::InvalidDate {
                id: self.id,
                value: self.date.clone(),
            }
        })?;

        let amount = match &self.amount {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .filter(|amount| *amount >= 0)
        .ok_or_else(|| ComputeError::InvalidAmount {
            id: self.id,
            value: self.amount.to_string(),
        })?;

        Ok(Expense {
            id: self.id,
            date,
            amount,
            description: self.description.clone(),
        })
    }
}

impl From<model::entities::expense::Model> for Expense {
    fn from(model: model::entities::expense::Model) -> Self {
        Self {
            id: i64::from(model.id),
            date: model.date,
            amount: model.amount,
            description: model.description,
        }
    }
}
