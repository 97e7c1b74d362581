#[cfg(test)]
mod integration_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::handlers::expenses::{CreateExpenseRequest, UpdateExpenseRequest};
    use crate::handlers::users::CreateUserRequest;
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;

    /// The user seeded by `setup_test_app_state`.
    const TEST_USER_ID: i32 = 1;

    async fn create_expense(
        server: &TestServer,
        date: &str,
        amount: i64,
        description: &str,
    ) -> serde_json::Value {
        let request = CreateExpenseRequest {
            date: date.parse().unwrap(),
            amount,
            description: description.to_string(),
            user_id: TEST_USER_ID,
        };

        let response = server.post("/api/v1/expenses").json(&request).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        body.data
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let create_request = CreateUserRequest {
            username: "budi".to_string(),
        };

        let response = server.post("/api/v1/users").json(&create_request).await;
        response.assert_status(StatusCode::CREATED);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data["username"], "budi");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let create_request = CreateUserRequest {
            // Seeded by setup_test_app_state
            username: "test_user".to_string(),
        };

        let response = server.post("/api/v1/users").json(&create_request).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "USERNAME_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_create_expense() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let data = create_expense(&server, "2025-01-05", 50000, "Makan siang").await;

        assert_eq!(data["date"], "2025-01-05");
        assert_eq!(data["amount"], 50000);
        assert_eq!(data["description"], "Makan siang");
        assert_eq!(data["user_id"], TEST_USER_ID);
        assert!(data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_expense_rejects_empty_description() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let request = CreateExpenseRequest {
            date: "2025-01-05".parse().unwrap(),
            amount: 50000,
            description: "   ".to_string(),
            user_id: TEST_USER_ID,
        };

        let response = server.post("/api/v1/expenses").json(&request).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "EMPTY_DESCRIPTION");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_expense_rejects_negative_amount() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let request = CreateExpenseRequest {
            date: "2025-01-05".parse().unwrap(),
            amount: -1,
            description: "Refund".to_string(),
            user_id: TEST_USER_ID,
        };

        let response = server.post("/api/v1/expenses").json(&request).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "NEGATIVE_AMOUNT");
    }

    #[tokio::test]
    async fn test_expense_lifecycle() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Create
        let created = create_expense(&server, "2025-01-05", 50000, "Makan siang").await;
        let expense_id = created["id"].as_i64().unwrap();

        // Read
        let response = server
            .get(&format!("/api/v1/expenses/{}", expense_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["amount"], 50000);

        // Update
        let update_request = UpdateExpenseRequest {
            date: None,
            amount: Some(55000),
            description: Some("Makan siang dan kopi".to_string()),
        };
        let response = server
            .put(&format!("/api/v1/expenses/{}", expense_id))
            .json(&update_request)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["amount"], 55000);
        assert_eq!(body.data["description"], "Makan siang dan kopi");
        assert_eq!(body.data["date"], "2025-01-05");

        // Delete
        let response = server
            .delete(&format!("/api/v1/expenses/{}", expense_id))
            .await;
        response.assert_status(StatusCode::OK);

        // Gone
        let response = server
            .get(&format!("/api/v1/expenses/{}", expense_id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_expense_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/expenses/9999").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.delete("/api/v1/expenses/9999").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_monthly_grouping() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_expense(&server, "2025-01-05", 50000, "Makan siang").await;
        create_expense(&server, "2025-01-20", 70000, "Belanja mingguan").await;
        create_expense(&server, "2025-02-01", 30000, "Bensin").await;

        let response = server.get("/api/v1/expenses/monthly").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 2);

        // Newest month first
        let february = &body.data[0];
        assert_eq!(february["key"], "2025-02");
        assert_eq!(february["month_name"], "Februari 2025");
        assert_eq!(february["total"], 30000);

        let january = &body.data[1];
        assert_eq!(january["key"], "2025-01");
        assert_eq!(january["month_name"], "Januari 2025");
        assert_eq!(january["total"], 120000);

        // Expenses within the month newest first
        let expenses = january["expenses"].as_array().unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0]["date"], "2025-01-20");
        assert_eq!(expenses[1]["date"], "2025-01-05");
    }

    #[tokio::test]
    async fn test_monthly_statistics() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_expense(&server, "2025-01-05", 50000, "Makan siang").await;
        create_expense(&server, "2025-01-20", 70000, "Belanja mingguan").await;
        create_expense(&server, "2025-02-01", 700000, "Servis motor").await;

        let response = server
            .get("/api/v1/expenses/monthly/statistics?today=2025-02-10")
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);

        // Past month judged on its full calendar length
        let january = &body.data["2025-01"];
        assert_eq!(january["days_in_month"], 31);
        assert_eq!(january["effective_days"], 31);
        assert_eq!(january["total_expenses"], 120000);
        assert_eq!(january["over_budget_days"], 0);

        // Current month judged on elapsed days: overshoot 50000 against a
        // 650000 budget line means one forced-savings day.
        let february = &body.data["2025-02"];
        assert_eq!(february["days_in_month"], 28);
        assert_eq!(february["effective_days"], 10);
        assert_eq!(february["total_expenses"], 700000);
        assert_eq!(february["budget_per_day"], 65000);
        assert_eq!(february["over_budget_days"], 1);
    }

    #[tokio::test]
    async fn test_monthly_statistics_custom_budget() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_expense(&server, "2025-02-01", 100000, "Servis motor").await;

        let response = server
            .get("/api/v1/expenses/monthly/statistics?today=2025-02-05&budget_per_day=10000")
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["2025-02"]["budget_per_day"], 10000);
        assert_eq!(body.data["2025-02"]["over_budget_days"], 5);
    }

    #[tokio::test]
    async fn test_monthly_statistics_huge_budget() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_expense(&server, "2025-01-05", 120000, "Makan siang").await;

        // A budget line beyond i64 can never be exceeded
        let response = server
            .get(&format!(
                "/api/v1/expenses/monthly/statistics?today=2025-03-01&budget_per_day={}",
                i64::MAX
            ))
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["2025-01"]["over_budget_days"], 0);
    }

    #[tokio::test]
    async fn test_monthly_statistics_rejects_bad_budget() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/v1/expenses/monthly/statistics?budget_per_day=0")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_BUDGET");
    }

    #[tokio::test]
    async fn test_empty_ledger_is_not_an_error() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/expenses/monthly").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert!(body.data.is_empty());

        let response = server
            .get("/api/v1/expenses/monthly/statistics?today=2025-02-10")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_get_all_expenses_sorted_by_date() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_expense(&server, "2025-01-05", 50000, "Makan siang").await;
        create_expense(&server, "2025-02-01", 30000, "Bensin").await;
        create_expense(&server, "2025-01-20", 70000, "Belanja mingguan").await;

        let response = server.get("/api/v1/expenses").await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 3);
        assert_eq!(body.data[0]["date"], "2025-02-01");
        assert_eq!(body.data[1]["date"], "2025-01-20");
        assert_eq!(body.data[2]["date"], "2025-01-05");
    }
}
