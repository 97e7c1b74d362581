use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Query parameters for the monthly statistics endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct BudgetQuery {
    /// The date treated as "today" (YYYY-MM-DD). Defaults to the current
    /// UTC date. Injected so the computation stays reproducible for clients
    /// and tests.
    pub today: Option<NaiveDate>,
    /// Daily budget line in whole rupiah. Defaults to 65000.
    pub budget_per_day: Option<i64>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::get_expenses,
        crate::handlers::expenses::get_expense,
        crate::handlers::expenses::update_expense,
        crate::handlers::expenses::delete_expense,
        crate::handlers::months::get_monthly_expenses,
        crate::handlers::months::get_monthly_statistics,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            BudgetQuery,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::expenses::CreateExpenseRequest,
            crate::handlers::expenses::UpdateExpenseRequest,
            crate::handlers::expenses::ExpenseResponse,
            crate::handlers::months::MonthSummaryResponse,
            compute::Expense,
            compute::MonthStats,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User CRUD endpoints"),
        (name = "expenses", description = "Expense CRUD endpoints"),
        (name = "months", description = "Monthly aggregation and budget statistics"),
    ),
    info(
        title = "KeuanganKu API",
        description = "Personal expense ledger - monthly spending records with budget pacing",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
