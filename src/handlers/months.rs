use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use compute::{Expense, MonthStats, DEFAULT_BUDGET_PER_DAY};
use model::entities::expense;
use sea_orm::EntityTrait;
use serde::Serialize;
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, BudgetQuery, ErrorResponse};

/// One month of expenses as rendered by the client: newest month first,
/// expenses within the month newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct MonthSummaryResponse {
    /// Sortable "YYYY-MM" bucket key
    pub key: String,
    /// Display label, e.g. "Januari 2025"
    pub month_name: String,
    /// Sum of all amounts in the month, in whole rupiah
    pub total: i64,
    pub expenses: Vec<Expense>,
}

/// Fetch the full expense snapshot the aggregation runs over.
///
/// The core is a pure function of this snapshot; there is no incremental
/// path, every request recomputes from scratch.
async fn fetch_expenses(state: &AppState) -> Result<Vec<Expense>, StatusCode> {
    match expense::Entity::find().all(&state.db).await {
        Ok(models) => {
            debug!("Fetched {} expense records for aggregation", models.len());
            Ok(models.into_iter().map(Expense::from).collect())
        }
        Err(db_error) => {
            error!("Failed to fetch expenses for aggregation: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get expenses grouped by calendar month
#[utoipa::path(
    get,
    path = "/api/v1/expenses/monthly",
    tag = "months",
    responses(
        (status = 200, description = "Monthly expense buckets, newest month first", body = ApiResponse<Vec<MonthSummaryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_monthly_expenses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthSummaryResponse>>>, StatusCode> {
    trace!("Entering get_monthly_expenses function");

    let records = fetch_expenses(&state).await?;
    let monthly = compute::aggregate(records);

    let summaries: Vec<MonthSummaryResponse> = monthly
        .newest_first()
        .map(|(key, bucket)| MonthSummaryResponse {
            key: key.to_string(),
            month_name: bucket.month_name.clone(),
            total: bucket.total,
            expenses: bucket.expenses.clone(),
        })
        .collect();

    info!("Aggregated expenses into {} month buckets", summaries.len());
    let response = ApiResponse {
        data: summaries,
        message: "Monthly expenses retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get budget statistics per calendar month
#[utoipa::path(
    get,
    path = "/api/v1/expenses/monthly/statistics",
    tag = "months",
    responses(
        (status = 200, description = "Budget statistics keyed by month", body = ApiResponse<BTreeMap<String, MonthStats>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_monthly_statistics(
    Query(query): Query<BudgetQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, MonthStats>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_monthly_statistics function");

    let budget_per_day = query.budget_per_day.unwrap_or(DEFAULT_BUDGET_PER_DAY);
    if budget_per_day <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("budget_per_day must be positive, got {}", budget_per_day),
                code: "INVALID_BUDGET".to_string(),
                success: false,
            }),
        ));
    }

    // "Today" is injected via the query so results are reproducible; only
    // the default reads the clock.
    let today = query
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    debug!(
        "Evaluating budget with today={} and budget_per_day={}",
        today, budget_per_day
    );

    let records = fetch_expenses(&state).await.map_err(|status| {
        (
            status,
            Json(ErrorResponse {
                error: "Failed to fetch expenses".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            }),
        )
    })?;

    let monthly = compute::aggregate(records);
    let stats = compute::evaluate(&monthly, today, budget_per_day);

    info!("Computed budget statistics for {} months", stats.len());
    let response = ApiResponse {
        data: stats,
        message: "Monthly statistics retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
