use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    expenses::{create_expense, delete_expense, get_expense, get_expenses, update_expense},
    health::health_check,
    months::{get_monthly_expenses, get_monthly_statistics},
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Expense CRUD routes
        .route("/api/v1/expenses", post(create_expense))
        .route("/api/v1/expenses", get(get_expenses))
        .route("/api/v1/expenses/:expense_id", get(get_expense))
        .route("/api/v1/expenses/:expense_id", put(update_expense))
        .route("/api/v1/expenses/:expense_id", delete(delete_expense))
        // Monthly aggregation and budget statistics
        .route("/api/v1/expenses/monthly", get(get_monthly_expenses))
        .route(
            "/api/v1/expenses/monthly/statistics",
            get(get_monthly_statistics),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
