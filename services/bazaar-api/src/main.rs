//! Bazaar API
//!
//! HTTP backend for the Bazaar storefront.
//!
//! ## Auth Endpoints
//!
//! - `POST /api/auth/signup` - Create an account and start a session
//! - `POST /api/auth/login` - Start a session
//! - `POST /api/auth/logout` - End the session and clear cookies
//! - `POST /api/auth/refresh-access-token` - Mint a new access token
//!
//! ## Catalog, Cart and Coupons
//!
//! - `/api/products` - Public listings plus admin-only management
//! - `/api/cart` - The caller's cart (authenticated)
//! - `/api/coupons` - The caller's coupon and code validation (authenticated)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check
//! - `GET /metrics` - Prometheus metrics

use std::net::SocketAddr;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use axum::Router;
use bazaar_axum::{authenticate, require_admin};
use bazaar_db::pg::Repositories;
use bazaar_db::RedisCache;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use bazaar_api::config::Config;
use bazaar_api::handlers::{self, health, ready};
use bazaar_api::state::{AppState, AuthServiceImpl};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("bazaar_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bazaar API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        secure_cookies = config.auth.secure_cookies,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and apply migrations
    let pool = bazaar_db::create_pool(&config.database_url).await?;
    bazaar_db::run_migrations(&pool).await?;
    tracing::info!("Database pool created");

    // Connect to the cache
    let cache = RedisCache::connect(&config.redis_url).await?;
    tracing::info!("Redis cache connected");

    // Create repositories and application state
    let repos = Repositories::new(pool.clone());
    let state = AppState::new(repos, cache, pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();
    let authenticated = from_fn_with_state(state.auth.clone(), authenticate::<AuthServiceImpl>);

    // Auth routes (cookie based, no identity stage)
    let auth_routes = handlers::auth_router(state.auth_state());

    // Admin product routes: authenticate, then admin gate
    let admin_product_routes = Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/{id}",
            delete(handlers::delete_product).patch(handlers::toggle_featured),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(authenticated.clone());

    let product_routes = Router::new()
        .route("/featured", get(handlers::featured_products))
        .route("/recommendations", get(handlers::recommended_products))
        .route("/category/{category}", get(handlers::products_by_category))
        .merge(admin_product_routes);

    let cart_routes = Router::new()
        .route(
            "/",
            get(handlers::get_cart_products)
                .post(handlers::add_to_cart)
                .delete(handlers::remove_from_cart),
        )
        .route("/{id}", put(handlers::update_quantity))
        .route_layer(authenticated.clone());

    let coupon_routes = Router::new()
        .route("/", get(handlers::get_coupon))
        .route("/validate", post(handlers::validate_coupon))
        .route_layer(authenticated);

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/products", product_routes)
        .nest("/api/cart", cart_routes)
        .nest("/api/coupons", coupon_routes)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!("auth_signups_total", "Total accounts created");
    metrics::describe_counter!("auth_logins_total", "Total login attempts by outcome");
    metrics::describe_counter!(
        "auth_refreshes_total",
        "Total access token refresh attempts by outcome"
    );
    metrics::describe_counter!("auth_logouts_total", "Total logouts");

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
