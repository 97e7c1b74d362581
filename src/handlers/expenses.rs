use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::expense;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateExpenseRequest {
    /// Calendar date of the expense (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Amount in whole rupiah (must be non-negative)
    pub amount: i64,
    /// Expense description (must be non-empty)
    pub description: String,
    /// Owning user ID
    pub user_id: i32,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateExpenseRequest {
    /// Calendar date of the expense (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    /// Amount in whole rupiah (must be non-negative)
    pub amount: Option<i64>,
    /// Expense description (must be non-empty)
    pub description: Option<String>,
}

/// Expense response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub amount: i64,
    pub description: String,
    pub user_id: i32,
}

impl From<expense::Model> for ExpenseResponse {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            amount: model.amount,
            description: model.description,
            user_id: model.user_id,
        }
    }
}

/// Validate the fields shared by create and update requests.
///
/// Storage may still hold empty descriptions from older data, but new and
/// edited records must carry a description and a non-negative amount.
fn validate_fields(
    amount: Option<i64>,
    description: Option<&str>,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if let Some(amount) = amount {
        if amount < 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Amount must be non-negative, got {}", amount),
                    code: "NEGATIVE_AMOUNT".to_string(),
                    success: false,
                }),
            ));
        }
    }
    if let Some(description) = description {
        if description.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Description must not be empty".to_string(),
                    code: "EMPTY_DESCRIPTION".to_string(),
                    success: false,
                }),
            ));
        }
    }
    Ok(())
}

/// Create a new expense
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created successfully", body = ApiResponse<ExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_expense function");
    debug!(
        "Creating expense on {} of {} rupiah for user {}",
        request.date, request.amount, request.user_id
    );

    validate_fields(Some(request.amount), Some(&request.description))?;

    let new_expense = expense::ActiveModel {
        date: Set(request.date),
        amount: Set(request.amount),
        description: Set(request.description.trim().to_string()),
        user_id: Set(request.user_id),
        ..Default::default()
    };

    match new_expense.insert(&state.db).await {
        Ok(expense_model) => {
            info!(
                "Expense created successfully with ID: {}, amount: {}",
                expense_model.id, expense_model.amount
            );
            let response = ApiResponse {
                data: ExpenseResponse::from(expense_model),
                message: "Expense created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create expense for user {}: {}",
                request.user_id, db_error
            );

            let error_msg = db_error.to_string().to_lowercase();
            let (status, error_response) = if error_msg.contains("foreign key") {
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: format!("User {} does not exist", request.user_id),
                        code: "UNKNOWN_USER".to_string(),
                        success: false,
                    },
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Failed to create expense".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    },
                )
            };
            Err((status, Json(error_response)))
        }
    }
}

/// Get all expenses
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    tag = "expenses",
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = ApiResponse<Vec<ExpenseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_expenses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpenseResponse>>>, StatusCode> {
    trace!("Entering get_expenses function");

    match expense::Entity::find()
        .order_by_desc(expense::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(expenses) => {
            let expense_count = expenses.len();
            let expense_responses: Vec<ExpenseResponse> =
                expenses.into_iter().map(ExpenseResponse::from).collect();

            info!("Successfully retrieved {} expenses", expense_count);
            let response = ApiResponse {
                data: expense_responses,
                message: "Expenses retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve expenses from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific expense by ID
#[utoipa::path(
    get,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense retrieved successfully", body = ApiResponse<ExpenseResponse>),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExpenseResponse>>, StatusCode> {
    trace!("Entering get_expense function for expense_id: {}", expense_id);

    match expense::Entity::find_by_id(expense_id).one(&state.db).await {
        Ok(Some(expense_model)) => {
            info!("Successfully retrieved expense with ID: {}", expense_model.id);
            let response = ApiResponse {
                data: ExpenseResponse::from(expense_model),
                message: "Expense retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Expense with ID {} not found", expense_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve expense with ID {}: {}",
                expense_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an expense
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated successfully", body = ApiResponse<ExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<ApiResponse<ExpenseResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_expense function for expense_id: {}", expense_id);

    validate_fields(request.amount, request.description.as_deref())?;

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Expense {} not found", expense_id),
                code: "EXPENSE_NOT_FOUND".to_string(),
                success: false,
            }),
        )
    };

    let existing_expense = match expense::Entity::find_by_id(expense_id).one(&state.db).await {
        Ok(Some(expense_model)) => expense_model,
        Ok(None) => {
            warn!("Expense with ID {} not found for update", expense_id);
            return Err(not_found());
        }
        Err(db_error) => {
            error!(
                "Failed to lookup expense with ID {} for update: {}",
                expense_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update expense".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut expense_active: expense::ActiveModel = existing_expense.into();

    if let Some(date) = request.date {
        debug!("Updating expense date to: {}", date);
        expense_active.date = Set(date);
    }
    if let Some(amount) = request.amount {
        debug!("Updating expense amount to: {}", amount);
        expense_active.amount = Set(amount);
    }
    if let Some(description) = request.description {
        debug!("Updating expense description");
        expense_active.description = Set(description.trim().to_string());
    }

    match expense_active.update(&state.db).await {
        Ok(updated_expense) => {
            info!("Expense with ID {} updated successfully", expense_id);
            let response = ApiResponse {
                data: ExpenseResponse::from(updated_expense),
                message: "Expense updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to update expense with ID {}: {}",
                expense_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update expense".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_expense function for expense_id: {}", expense_id);

    match expense::Entity::delete_by_id(expense_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Expense with ID {} deleted successfully", expense_id);
                let response = ApiResponse {
                    data: format!("Expense {} deleted", expense_id),
                    message: "Expense deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Expense with ID {} not found for deletion", expense_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete expense with ID {}: {}",
                expense_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
