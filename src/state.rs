use sqlx::SqlitePool;

/// Shared by every handler. The pool is the only connection to the observation store.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}
