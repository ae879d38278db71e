use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{error, info};

use crate::models::{normalize_ticker, Observation, PricePoint};

const SAMPLE_DATA: &[(&str, &str, f64)] = &[
    ("AAPL", "2024-10-01", 150.25),
    ("AAPL", "2024-10-02", 152.30),
    ("AAPL", "2024-10-03", 148.75),
    ("AAPL", "2024-10-04", 151.20),
    ("GOOGL", "2024-10-01", 2750.50),
    ("GOOGL", "2024-10-02", 2780.25),
    ("GOOGL", "2024-10-03", 2765.75),
    ("GOOGL", "2024-10-04", 2790.30),
    ("TSLA", "2024-10-01", 245.80),
    ("TSLA", "2024-10-02", 248.90),
    ("TSLA", "2024-10-03", 242.15),
    ("TSLA", "2024-10-04", 250.45),
];

pub fn sample_observations() -> Vec<Observation> {
    SAMPLE_DATA
        .iter()
        .map(|&(ticker, date, price)| Observation::new(ticker, date, price))
        .collect()
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stock_prices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ticker TEXT NOT NULL,
            date TEXT NOT NULL,
            price REAL NOT NULL,
            UNIQUE(ticker, date)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Loads the sample set in one transaction without touching rows that already exist.
/// Returns how many rows were actually inserted.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for obs in sample_observations() {
        if upsert_if_absent(&mut *tx, &obs.ticker, &obs.date, obs.price).await? {
            inserted += 1;
        }
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit sample data: {}", e);
        e
    })?;

    info!("Seeded {} sample observations", inserted);
    Ok(inserted)
}

/// Inserts the observation unless (ticker, date) is already stored. Returns whether a row
/// was written.
pub async fn upsert_if_absent<'e, E>(
    executor: E,
    ticker: &str,
    date: &str,
    price: f64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO stock_prices (ticker, date, price)
        VALUES (?, ?, ?)
        ON CONFLICT (ticker, date) DO NOTHING
        "#,
    )
    .bind(normalize_ticker(ticker))
    .bind(date)
    .bind(price)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Inserts the observation, or replaces the stored price for an existing (ticker, date).
/// The row keeps its id.
pub async fn upsert_replace(
    pool: &SqlitePool,
    ticker: &str,
    date: &str,
    price: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO stock_prices (ticker, date, price)
        VALUES (?, ?, ?)
        ON CONFLICT (ticker, date) DO UPDATE SET price = excluded.price
        "#,
    )
    .bind(normalize_ticker(ticker))
    .bind(date)
    .bind(price)
    .execute(pool)
    .await?;
    Ok(())
}

/// Up to `limit` prices for a ticker, most recent first. Unknown tickers yield an empty list.
pub async fn fetch_recent_prices(
    pool: &SqlitePool,
    ticker: &str,
    limit: u32,
) -> Result<Vec<f64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT price
        FROM stock_prices
        WHERE ticker = ?
        ORDER BY date DESC
        LIMIT ?
        "#,
    )
    .bind(normalize_ticker(ticker))
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
}

/// Same as [`fetch_recent_prices`] but keeps the dates. A negative `limit` returns every
/// stored row (SQLite treats a negative LIMIT as unbounded).
pub async fn fetch_recent_with_dates(
    pool: &SqlitePool,
    ticker: &str,
    limit: i64,
) -> Result<Vec<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT date, price
        FROM stock_prices
        WHERE ticker = ?
        ORDER BY date DESC
        LIMIT ?
        "#,
    )
    .bind(normalize_ticker(ticker))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn fetch_tickers(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT ticker FROM stock_prices ORDER BY ticker ASC")
        .fetch_all(pool)
        .await
}
