use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use custodia_api::{
    build_router,
    config::AppConfig,
    db,
    entities::register,
    events::{self, EventSender},
    models::RegisterKind,
    AppState,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Test harness backed by a throwaway SQLite database file.
///
/// The pool is capped at one connection so that operations from concurrent
/// tasks serialize at the pool; the invariants must hold regardless of
/// interleaving.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    db_file: std::path::PathBuf,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_file = std::env::temp_dir().join(format!("custodia_test_{}.db", Uuid::new_v4()));
        let database_url = format!("sqlite://{}?mode=rwc", db_file.display());

        let cfg = test_config(database_url);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations");

        let (tx, rx) = mpsc::channel(64);
        let event_task = tokio::spawn(events::process_events(rx));

        let state = AppState::new(Arc::new(pool), cfg, Arc::new(EventSender::new(tx)));
        let router = build_router(state.clone());

        Self {
            router,
            state,
            db_file,
            _event_task: event_task,
        }
    }

    /// Inserts an active register and returns its id.
    pub async fn seed_register(&self, name: &str, kind: RegisterKind) -> Uuid {
        let id = Uuid::new_v4();
        register::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            kind: Set(kind),
            active: Set(true),
            location: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed register");
        id
    }

    /// Sends a JSON request through the router and returns status and body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}

fn test_config(database_url: String) -> AppConfig {
    // Built through the config crate so AppConfig needs no test-only
    // constructor.
    config::Config::builder()
        .set_default("database_url", database_url)
        .unwrap()
        .set_default("host", "127.0.0.1")
        .unwrap()
        .set_default("port", 0)
        .unwrap()
        .set_default("environment", "test")
        .unwrap()
        .set_default("log_level", "debug")
        .unwrap()
        .set_default("db_max_connections", 1)
        .unwrap()
        .set_default("db_min_connections", 1)
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .expect("test config")
}
