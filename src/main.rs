use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod error;
mod handlers;
mod insights;
mod models;
mod store;

use config::Config;
use store::{FileEntryStore, JournalStore, MemoryEntryStore, PgEntryStore, PromptBook};

#[derive(Clone)]
pub struct AppState {
    pub store: JournalStore,
    pub prompts: PromptBook,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Entry store ready");

    let state = AppState {
        store,
        prompts: PromptBook::new(),
    };

    let app = build_router(state).layer(cors_layer(&config)?);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<JournalStore> {
    if let Some(url) = &config.database_url {
        let pool = db::create_pool(url, config.database_max_connections)
            .await
            .context("failed to create database pool")?;
        db::run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;
        tracing::info!("Database migrations applied");
        return Ok(JournalStore::Postgres(PgEntryStore::new(pool)));
    }

    if let Some(path) = &config.journal_file {
        tracing::info!(path = %path.display(), "Using journal file");
        return Ok(JournalStore::File(FileEntryStore::new(path.clone())));
    }

    tracing::warn!("Neither DATABASE_URL nor JOURNAL_FILE is set; entries are kept in memory only");
    Ok(JournalStore::Memory(MemoryEntryStore::new()))
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config
        .allowed_origins()
        .into_iter()
        .map(|o| {
            o.parse::<axum::http::HeaderValue>()
                .with_context(|| format!("invalid CORS origin {o:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Entries
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::create_entry),
        )
        .route("/api/entries/export", get(handlers::entries::export_entries))
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        .route(
            "/api/entries/:id/favorite",
            post(handlers::entries::toggle_favorite),
        )
        // Insights
        .route("/api/insights/mood", get(handlers::insights::get_mood_insights))
        .route("/api/insights/weekly", get(handlers::insights::get_weekly_summary))
        // Prompts
        .route(
            "/api/prompts",
            get(handlers::prompts::list_prompts).post(handlers::prompts::create_prompt),
        )
        .route("/api/prompts/daily", get(handlers::prompts::get_daily_prompt))
        .route(
            "/api/prompts/:id",
            axum::routing::put(handlers::prompts::update_prompt)
                .delete(handlers::prompts::delete_prompt),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:8081".into(),
            extra_origins: vec![],
            database_url: None,
            database_max_connections: 1,
            journal_file: None,
        }
    }

    fn setup_test_app_with(store: JournalStore) -> Router {
        build_router(AppState {
            store,
            prompts: PromptBook::new(),
        })
    }

    fn setup_test_app() -> Router {
        setup_test_app_with(JournalStore::Memory(MemoryEntryStore::new()))
    }

    async fn get_body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let response = app
            .clone()
            .oneshot(send_json("POST", "/api/entries", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        get_body_json(response).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = setup_test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "mindlog-api");
    }

    #[tokio::test]
    async fn test_readyz_reports_backend() {
        let response = setup_test_app().oneshot(get("/readyz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_body_json(response).await;
        assert_eq!(json["checks"]["backend"], "memory");
    }

    #[tokio::test]
    async fn test_mood_insights_empty_store() {
        let response = setup_test_app()
            .oneshot(get("/api/insights/mood?period=week"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_body_json(response).await;
        assert_eq!(json["timePeriod"], 7);
        assert_eq!(json["mostCommonMood"], json!({"name": "N/A", "count": 0}));
        assert!(json["summaryMessage"]
            .as_str()
            .unwrap()
            .starts_with("No entries in the last 7 days"));
        assert_eq!(json["moodTrendData"], json!([]));
    }

    #[tokio::test]
    async fn test_period_maps_to_days() {
        let app = setup_test_app();
        for (query, days) in [("month", 30), ("week", 7), ("decade", 7)] {
            let response = app
                .clone()
                .oneshot(get(&format!("/api/insights/mood?period={query}")))
                .await
                .unwrap();
            let json = get_body_json(response).await;
            assert_eq!(json["timePeriod"], days, "period={query}");
        }

        let response = app.oneshot(get("/api/insights/mood")).await.unwrap();
        assert_eq!(get_body_json(response).await["timePeriod"], 7);
    }

    #[tokio::test]
    async fn test_logged_entries_drive_insights() {
        let app = setup_test_app();
        create(&app, json!({"text": "Run", "mood": "rad", "tags": ["Exercise"]})).await;
        create(
            &app,
            json!({"text": "Gym", "mood": {"name": "good", "label": "Good"}, "tags": ["Exercise"]}),
        )
        .await;
        let old = (Utc::now() - Duration::days(10)).to_rfc3339();
        create(&app, json!({"mood": "awful", "tags": ["Work"], "date": old})).await;

        let response = app.oneshot(get("/api/insights/mood")).await.unwrap();
        let json = get_body_json(response).await;

        assert_eq!(json["mostCommonTag"], json!({"name": "Exercise", "count": 2}));
        assert_eq!(json["correlation"]["bestTag"], "Exercise");
        assert_eq!(json["moodTrendData"].as_array().unwrap().len(), 2);
        assert!(json["summaryMessage"]
            .as_str()
            .unwrap()
            .starts_with("You've been doing great!"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_intensity() {
        let response = setup_test_app()
            .oneshot(send_json(
                "POST",
                "/api/entries",
                json!({"mood": "good", "intensity": 12}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = get_body_json(response).await;
        assert_eq!(json["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let app = setup_test_app();
        let created = create(&app, json!({"text": "Quiet day", "mood": "meh"})).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["intensity"], 5);
        assert_eq!(created["favorite"], false);

        let response = app
            .clone()
            .oneshot(send_json(
                "PUT",
                &format!("/api/entries/{id}"),
                json!({"mood": "Good", "tags": ["Family"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = get_body_json(response).await;
        assert_eq!(updated["mood"], "good");
        assert_eq!(updated["tags"], json!(["Family"]));
        assert_eq!(updated["text"], "Quiet day");

        let response = app
            .clone()
            .oneshot(send_json("POST", &format!("/api/entries/{id}/favorite"), json!({})))
            .await
            .unwrap();
        assert_eq!(get_body_json(response).await["favorite"], true);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/entries/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(get_body_json(response).await["message"], "Entry deleted");

        let response = app
            .oneshot(get(&format!("/api/entries/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_is_an_attachment() {
        let app = setup_test_app();
        create(&app, json!({"mood": "rad"})).await;

        let response = app.oneshot(get("/api/entries/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("mindlog_export.json"));
        assert_eq!(get_body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_weekly_summary() {
        let app = setup_test_app();
        create(&app, json!({"mood": "good", "intensity": 8, "energy": 6, "tags": ["Sleep"], "favorite": true})).await;
        create(&app, json!({"intensity": 4, "energy": 2})).await;

        let response = app.oneshot(get("/api/insights/weekly")).await.unwrap();
        let json = get_body_json(response).await;
        assert_eq!(json["totalEntries"], 2);
        assert_eq!(json["averageIntensity"], 6.0);
        assert_eq!(json["averageEnergy"], 4.0);
        assert_eq!(json["moodDistribution"], json!({"good": 1, "unknown": 1}));
        assert_eq!(json["topTags"], json!(["Sleep"]));
        assert_eq!(json["favoriteEntries"], 1);
        assert_eq!(
            json["insights"][0],
            "Your mood has been relatively stable this week."
        );
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_daily_prompt_falls_back_to_builtin_list() {
        let response = setup_test_app()
            .oneshot(get("/api/prompts/daily"))
            .await
            .unwrap();
        let json = get_body_json(response).await;
        let text = json["text"].as_str().unwrap();
        assert!(insights::prompts::DAILY_PROMPTS.iter().any(|p| *p == text));
        assert!(json.get("id").is_none());
    }

    #[tokio::test]
    async fn test_daily_prompt_uses_active_custom_prompt() {
        let app = setup_test_app();
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/prompts",
                json!({"text": "What are you looking forward to?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = get_body_json(response).await;
        assert_eq!(created["category"], "general");
        assert_eq!(created["isActive"], true);

        let response = app.oneshot(get("/api/prompts/daily")).await.unwrap();
        let json = get_body_json(response).await;
        assert_eq!(json["text"], "What are you looking forward to?");
        assert_eq!(json["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_unreadable_journal_file_is_503() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "not json").unwrap();
        let app = setup_test_app_with(JournalStore::File(FileEntryStore::new(path)));

        let response = app.oneshot(get("/api/insights/mood")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = get_body_json(response).await;
        assert_eq!(json["error"]["code"], 503);
    }

    #[tokio::test]
    async fn test_cors_layer_accepts_configured_origins() {
        let mut config = test_config();
        config.extra_origins = vec!["http://10.0.0.5:8081".into()];
        assert!(cors_layer(&config).is_ok());

        config.frontend_url = "bad\norigin".into();
        assert!(cors_layer(&config).is_err());
    }
}
