//! REST API router configuration.
//!
//! This module contains route definitions and server startup logic.
//! All handler implementations are in their respective submodules.

mod auth;
mod comments;
mod feed;
mod files;
mod health;
mod posts;
mod settings;
mod tags;

use std::net::SocketAddr;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::bootstrap::config::Config;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use errors::AppError;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the REST API router with all routes.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);
    let uploads = ServeDir::new(app_state.blog.uploads.root());
    let api = "/api";
    let admin = "/api/admin";

    Router::new()
        // Health
        .route("/health", get(health::check))
        // Auth
        .route(&format!("{api}/auth/login"), post(auth::login))
        // Posts
        .route(
            &format!("{api}/posts"),
            get(posts::list_public).post(posts::create),
        )
        .route(
            &format!("{api}/posts/{{id}}"),
            get(posts::get_public)
                .put(posts::update)
                .delete(posts::delete),
        )
        .route(
            &format!("{api}/posts/{{id}}/comments"),
            get(comments::list_for_post),
        )
        .route(&format!("{admin}/posts"), get(posts::list_admin))
        .route(&format!("{admin}/posts/{{id}}"), get(posts::get_admin))
        // Tags
        .route(&format!("{api}/tags"), get(tags::list).post(tags::create))
        .route(
            &format!("{api}/tags/with-counts"),
            get(tags::list_with_counts),
        )
        .route(
            &format!("{api}/tags/{{id}}"),
            get(tags::get).put(tags::update).delete(tags::delete),
        )
        .route(&format!("{api}/tags/{{id}}/posts"), get(tags::posts))
        // Comments
        .route(&format!("{api}/comments"), post(comments::create))
        .route(&format!("{admin}/comments"), get(comments::list_admin))
        .route(&format!("{admin}/comments/stats"), get(comments::stats))
        .route(
            &format!("{admin}/comments/{{id}}"),
            get(comments::get_admin).delete(comments::delete),
        )
        .route(
            &format!("{admin}/comments/{{id}}/status"),
            put(comments::update_status),
        )
        // Files
        .route(
            &format!("{api}/files"),
            get(files::list)
                .post(files::upload)
                .layer(DefaultBodyLimit::max(config.uploads.max_bytes)),
        )
        .route(
            &format!("{api}/files/{{id}}"),
            get(files::get).put(files::update).delete(files::delete),
        )
        .nest_service("/uploads", uploads)
        // Settings
        .route(&format!("{api}/config"), get(settings::get_config))
        .route(
            &format!("{api}/settings/config"),
            put(settings::update_config),
        )
        .route(
            &format!("{api}/settings/password"),
            put(settings::update_password),
        )
        .route(
            &format!("{api}/settings/footer-links"),
            put(settings::update_footer_links),
        )
        // Feed
        .route("/rss", get(feed::rss))
        .route("/rss.xml", get(feed::rss))
        .route("/feed", get(feed::rss))
        .route("/feed.xml", get(feed::rss))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if config.cors.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

/// Parse a numeric path segment, e.g. `parse_id(&raw, "post")`.
fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::validation(format!("Invalid {} ID", what)))
}

/// Start the REST server.
pub async fn start(app_state: &AppState, config: &Config) -> Result<(), AppError> {
    let app = build_router(app_state.clone(), config);
    let bind_addr = config.bind_addr();

    info!("Starting REST server on {}", &bind_addr);
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
