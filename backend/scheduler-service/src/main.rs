use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use scheduler_service::config::StorageMode;
use scheduler_service::db::{MemoryContentStore, PostgresContentStore, StoreHandle};
use scheduler_service::storage::{MediaStorageHandle, MemoryMediaStorage, S3MediaStorage};
use scheduler_service::{handlers, metrics, middleware};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    store: StoreHandle,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.store.health_check().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "scheduler-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("Store connection failed: {}", e),
            "service": "scheduler-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let store_result = state.store.health_check().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);
    let ready = store_result.is_ok();
    let store_check = match store_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Store connection successful".to_string(),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: format!("Store connection failed: {}", e),
            latency_ms,
        },
    };
    checks.insert("store".to_string(), store_check);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Scheduler Service
///
/// Backend for the post-scheduling dashboard.
///
/// # Routes
///
/// - `/api/v1/posts/*` - Compose, queue listing, deletion
/// - `/api/v1/calendar/*` - Day buckets and month summaries
/// - `/api/v1/social-accounts/*` - Connect, list, toggle, disconnect
/// - `/api/v1/media/*` - Upload, library listing, deletion
///
/// Runs on port 8086 (configurable via SCHEDULER_SERVICE_PORT).
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match scheduler_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting scheduler-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Build the content store and media storage for the configured mode
    let (store, media_storage): (StoreHandle, MediaStorageHandle) = match config.storage.mode {
        StorageMode::Postgres => {
            let pool = match PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
            {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!("Database pool creation failed: {}", e);
                    eprintln!("ERROR: Failed to create database pool: {}", e);
                    std::process::exit(1);
                }
            };

            let store = PostgresContentStore::new(pool);
            if let Err(e) = store.migrate().await {
                tracing::error!("Database migration failed: {:#}", e);
                eprintln!("ERROR: Failed to run migrations: {}", e);
                std::process::exit(1);
            }
            tracing::info!("Connected to PostgreSQL, migrations applied");

            let aws_cfg =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let s3_client = aws_sdk_s3::Client::new(&aws_cfg);
            let media = S3MediaStorage::new(
                s3_client,
                config.media.bucket.clone(),
                config.media.public_base_url.clone(),
            );
            tracing::info!(bucket = %config.media.bucket, "S3 media storage ready");

            (Arc::new(store), Arc::new(media))
        }
        StorageMode::Memory => {
            tracing::warn!("STORAGE_MODE=memory: state is process-local and not persisted");
            (
                Arc::new(MemoryContentStore::new()),
                Arc::new(MemoryMediaStorage::new()),
            )
        }
    };

    let health_state = web::Data::new(HealthState {
        store: store.clone(),
    });
    let store_data = web::Data::new(store);
    let media_storage_data = web::Data::new(media_storage);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let jwt_secret = config.auth.jwt_secret.clone();
    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(store_data.clone())
            .app_data(media_storage_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(middleware::JwtAuthMiddleware::new(&jwt_secret))
                    .wrap(middleware::MetricsMiddleware)
                    .configure(handlers::configure),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
