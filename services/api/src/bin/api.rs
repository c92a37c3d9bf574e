//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{CashfreeGateway, DbAdapter, DiskFileStore},
    config::Config,
    error::ApiError,
    web::{
        add_product_handler, checkout_handler, list_products_handler, login_handler,
        register_handler, remove_product_handler, state::AppState, update_product_handler,
        verify_handler, verify_payment_handler, ApiDoc,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Content Store & Payment Gateway ---
    let file_store = Arc::new(DiskFileStore::new(config.uploads_dir.clone()));
    file_store.ensure_root().await?;

    let gateway = Arc::new(CashfreeGateway::new(
        config.cashfree_base_url.clone(),
        config.cashfree_app_id.clone(),
        config.cashfree_secret_key.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        files: file_store,
        gateway,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let auth_routes = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/verify", post(verify_handler));

    let catalog_routes = Router::new()
        .route("/pdf/get-pdfs", get(list_products_handler))
        .route("/pdf/add-products", post(add_product_handler))
        .route("/pdf/update-product/{id}", put(update_product_handler))
        .route("/pdf/remove-product/{id}", get(remove_product_handler));

    let payment_routes = Router::new()
        .route("/payment/checkout", post(checkout_handler))
        .route("/payment/verify", post(verify_payment_handler));

    let api_router = Router::new()
        .merge(auth_routes)
        .merge(catalog_routes)
        .merge(payment_routes)
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Uploaded content is served statically, keyed by stored filename.
    let app = Router::new()
        .merge(api_router)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
