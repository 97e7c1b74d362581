#[cfg(test)]
pub mod test_utils {
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

    use crate::router::create_router;
    use crate::schemas::AppState;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, with one user the expense tests can own
    /// records under.
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        let test_user = model::entities::user::ActiveModel {
            username: Set("test_user".to_string()),
            ..Default::default()
        };
        test_user
            .insert(&db)
            .await
            .expect("Failed to create test user");

        AppState { db }
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let state = setup_test_app_state().await;
        create_router(state)
    }
}
