//! SQLite Backend Tests
//!
//! The engine over sqlx/SQLite:
//! - Live schema introspection per request
//! - Same results as the in-memory store for the same data and request
//! - Configuration file driving resources and ownership rules

use std::io::Write;
use std::sync::Arc;

use recordgate::auth::CallerIdentity;
use recordgate::config::AppConfig;
use recordgate::engine::{EngineSettings, QueryEngine, Severity};
use recordgate::filter::{FieldType, FilterDescriptor, FilterOperator};
use recordgate::planner::{QueryRequest, SortSpec};
use recordgate::storage::{MemoryStore, SqliteStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Helper Functions
// =============================================================================

const SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1
    );
    CREATE TABLE invoices (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL,
        invoice_number TEXT NOT NULL,
        invoice_date TEXT NOT NULL,
        zip_code TEXT,
        amount REAL NOT NULL,
        status TEXT NOT NULL,
        issued_at TEXT,
        is_paid BOOLEAN NOT NULL
    );
";

fn invoice_rows() -> Vec<Value> {
    let dates = ["2023-01-01", "2023-02-15", "2023-03-10"];
    let zips = ["", "12345", "10 000", "500"];
    let issued = [
        "2023-02-15T01:00:00+02:00",
        "2023-02-14T23:30:00-05:00",
        "2023-02-15 12:00:00",
        "2023-02-16T00:00:00Z",
        "soon",
    ];
    (1..=15)
        .map(|id: i64| {
            json!({
                "id": id,
                "user_id": id % 2 + 1,
                "invoice_number": format!("INV-{:03}", 16 - id),
                "invoice_date": dates[(id % 3) as usize],
                "zip_code": if id == 15 { Value::Null } else { json!(zips[(id % 4) as usize]) },
                "amount": id as f64 * 12.5,
                "status": if id % 4 == 0 { "paid" } else { "pending" },
                "issued_at": issued[(id % 5) as usize],
                "is_paid": id % 4 == 0,
            })
        })
        .collect()
}

async fn seed(store: &SqliteStore) {
    sqlx::raw_sql(SCHEMA).execute(store.pool()).await.unwrap();

    for (id, name) in [(1, "Ana"), (2, "Bor"), (3, "Cene")] {
        sqlx::query("INSERT INTO users (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(store.pool())
            .await
            .unwrap();
    }

    for row in invoice_rows() {
        sqlx::query(
            "INSERT INTO invoices
             (id, user_id, invoice_number, invoice_date, zip_code, amount, status, issued_at, is_paid)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(row["id"].as_i64())
        .bind(row["user_id"].as_i64())
        .bind(row["invoice_number"].as_str())
        .bind(row["invoice_date"].as_str())
        .bind(row["zip_code"].as_str())
        .bind(row["amount"].as_f64())
        .bind(row["status"].as_str())
        .bind(row["issued_at"].as_str())
        .bind(row["is_paid"].as_bool())
        .execute(store.pool())
        .await
        .unwrap();
    }
}

async fn sqlite_engine() -> (QueryEngine, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::connect("sqlite::memory:", 1).await.unwrap());
    seed(&store).await;

    let config = AppConfig::new("sqlite::memory:");
    let engine = QueryEngine::with_store(
        store.clone(),
        Arc::new(config.access_policy()),
        EngineSettings::default(),
    );
    (engine, store)
}

fn memory_engine() -> QueryEngine {
    let store = MemoryStore::new();
    store.create_table(
        "invoices",
        [
            "id",
            "user_id",
            "invoice_number",
            "invoice_date",
            "zip_code",
            "amount",
            "status",
            "issued_at",
            "is_paid",
        ],
    );
    store.insert_many("invoices", invoice_rows()).unwrap();

    let config = AppConfig::new("sqlite::memory:");
    QueryEngine::with_store(
        Arc::new(store),
        Arc::new(config.access_policy()),
        EngineSettings::default(),
    )
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|row| row["id"].as_i64().unwrap()).collect()
}

fn filtered(filter: FilterDescriptor) -> QueryRequest {
    QueryRequest::new().with_filter(filter).with_limit(100)
}

// =============================================================================
// Engine over SQLite
// =============================================================================

#[tokio::test]
async fn test_sorted_first_page() {
    let (engine, _store) = sqlite_engine().await;
    let request = QueryRequest::new()
        .sorted_by(SortSpec::asc("invoice_number"))
        .with_limit(5);

    let page = engine
        .list(&CallerIdentity::admin(1), "invoices", request, &CancellationToken::new())
        .await
        .unwrap();

    let numbers: Vec<_> = page
        .data
        .iter()
        .map(|row| row["invoice_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, ["INV-001", "INV-002", "INV-003", "INV-004", "INV-005"]);
    assert_eq!(page.total, 15);
    assert_eq!(page.last_page, 3);
}

#[tokio::test]
async fn test_user_lists_only_themselves() {
    let (engine, _store) = sqlite_engine().await;

    let page = engine
        .list(&CallerIdentity::user(2), "users", QueryRequest::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0]["name"], "Bor");
}

#[tokio::test]
async fn test_boolean_filter_against_integer_column() {
    let (engine, store) = sqlite_engine().await;
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = 3")
        .execute(store.pool())
        .await
        .unwrap();

    let request = filtered(
        FilterDescriptor::new("is_active", FieldType::Boolean, FilterOperator::Equals)
            .with_value("yes"),
    );
    let page = engine
        .list(&CallerIdentity::admin(1), "users", request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&page.data), [1, 2]);
}

#[tokio::test]
async fn test_number_filter_on_text_column() {
    let (engine, _store) = sqlite_engine().await;
    let request = filtered(
        FilterDescriptor::new("zip_code", FieldType::Number, FilterOperator::GreaterThan)
            .with_value(9999),
    );

    let page = engine
        .list(&CallerIdentity::admin(1), "invoices", request, &CancellationToken::new())
        .await
        .unwrap();

    // '500' is numerically smaller; '10 000' and '' are not numbers
    assert_eq!(ids(&page.data), [1, 5, 9, 13]);
}

#[tokio::test]
async fn test_offset_timestamp_matches_written_day() {
    let (engine, _store) = sqlite_engine().await;
    let request = filtered(
        FilterDescriptor::new("issued_at", FieldType::Date, FilterOperator::Equals)
            .with_value("2023-02-15"),
    );

    let page = engine
        .list(&CallerIdentity::admin(1), "invoices", request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(ids(&page.data), [2, 5, 7, 10, 12, 15]);
}

#[tokio::test]
async fn test_schema_change_seen_on_next_request() {
    let (engine, store) = sqlite_engine().await;
    let request = || {
        filtered(
            FilterDescriptor::new("country", FieldType::Text, FilterOperator::Equals)
                .with_value("SI"),
        )
    };

    let err = engine
        .list(&CallerIdentity::admin(1), "invoices", request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RG_INVALID_FILTER_FIELD");

    sqlx::query("ALTER TABLE invoices ADD COLUMN country TEXT")
        .execute(store.pool())
        .await
        .unwrap();

    let page = engine
        .list(&CallerIdentity::admin(1), "invoices", request(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_unknown_table_is_configuration_error() {
    let (engine, _store) = sqlite_engine().await;

    let err = engine
        .list(&CallerIdentity::admin(1), "tax_profiles", QueryRequest::new(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.severity(), Severity::Fatal);
}

// =============================================================================
// Backend Agreement
// =============================================================================

/// Both backends return the same rows in the same order.
#[tokio::test]
async fn test_backends_agree() {
    let (sqlite, _store) = sqlite_engine().await;
    let memory = memory_engine();

    let requests = vec![
        filtered(
            FilterDescriptor::new("invoice_date", FieldType::Date, FilterOperator::InRange)
                .with_value("2023-01-15")
                .with_range_value("2023-03-01"),
        ),
        filtered(FilterDescriptor::new("zip_code", FieldType::Text, FilterOperator::NotBlank)),
        filtered(FilterDescriptor::new("zip_code", FieldType::Text, FilterOperator::Blank)),
        filtered(
            FilterDescriptor::new("zip_code", FieldType::Text, FilterOperator::NotContains)
                .with_value("23"),
        ),
        filtered(
            FilterDescriptor::new("invoice_number", FieldType::Text, FilterOperator::StartsWith)
                .with_value("INV-01"),
        ),
        filtered(
            FilterDescriptor::new("amount", FieldType::Number, FilterOperator::GreaterThan)
                .with_value("100"),
        ),
        filtered(
            FilterDescriptor::new("status", FieldType::Set, FilterOperator::Contains)
                .with_value(json!(["paid"])),
        ),
        filtered(
            FilterDescriptor::new("status", FieldType::Set, FilterOperator::Equals)
                .with_value("paid"),
        ),
        filtered(
            FilterDescriptor::new("zip_code", FieldType::Number, FilterOperator::GreaterThan)
                .with_value(9999),
        ),
        filtered(
            FilterDescriptor::new("zip_code", FieldType::Number, FilterOperator::InRange)
                .with_value(400)
                .with_range_value(20000),
        ),
        filtered(
            FilterDescriptor::new("amount", FieldType::Number, FilterOperator::InRange)
                .with_value(50)
                .with_range_value("137.5"),
        ),
        filtered(
            FilterDescriptor::new("issued_at", FieldType::Date, FilterOperator::Equals)
                .with_value("2023-02-15"),
        ),
        filtered(
            FilterDescriptor::new("issued_at", FieldType::Date, FilterOperator::InRange)
                .with_value("2023-02-14")
                .with_range_value("2023-02-15"),
        ),
        filtered(
            FilterDescriptor::new("is_paid", FieldType::Boolean, FilterOperator::NotEqual)
                .with_value(false),
        ),
        QueryRequest::new()
            .sorted_by(SortSpec::desc("status"))
            .with_limit(4)
            .with_page(2),
        QueryRequest::new()
            .sorted_by(SortSpec::asc("is_paid"))
            .with_limit(100),
    ];

    for caller in [CallerIdentity::admin(9), CallerIdentity::user(1)] {
        for request in &requests {
            let cancel = CancellationToken::new();
            let expected = memory
                .list(&caller, "invoices", request.clone(), &cancel)
                .await
                .unwrap();
            let actual = sqlite
                .list(&caller, "invoices", request.clone(), &cancel)
                .await
                .unwrap();

            assert_eq!(ids(&actual.data), ids(&expected.data), "{request:?}");
            assert_eq!(actual.total, expected.total, "{request:?}");
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn test_engine_from_config_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("records.db");
    let config_path = dir.path().join("recordgate.json");

    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        "{}",
        json!({
            "database": { "url": format!("sqlite://{}?mode=rwc", db_path.display()) },
            "query": { "default_limit": 2, "max_limit": 5 },
            "resources": [
                { "name": "invoice", "table": "invoices" },
                { "name": "directory", "table": "users", "access": { "type": "shared" } }
            ]
        })
    )
    .unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    let store = Arc::new(
        SqliteStore::connect(&config.database.url, config.database.max_connections)
            .await
            .unwrap(),
    );
    seed(&store).await;

    let engine = QueryEngine::with_store(
        store,
        Arc::new(config.access_policy()),
        config.engine_settings(),
    );
    let cancel = CancellationToken::new();

    let invoices = engine
        .list(&CallerIdentity::user(1), "invoices", QueryRequest::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(invoices.per_page, 2);
    assert!(invoices.data.iter().all(|row| row["user_id"] == 1));

    let directory = engine
        .list(&CallerIdentity::user(1), "users", QueryRequest::new().with_limit(5), &cancel)
        .await
        .unwrap();
    assert_eq!(directory.total, 3);

    let err = engine
        .list(&CallerIdentity::user(1), "users", QueryRequest::new().with_limit(6), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RG_LIMIT_EXCEEDED");
}
