use axum::{
    BoxError, Router, serve,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post}
};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use std::{
    fs,
    io,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer
};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod core;
mod db;
mod errors;
mod extractors;
mod gate;
mod handlers;
mod hs256;
mod jwt;
mod model;
mod prod_core;
mod sqlite;
mod token;

use crate::{
    app::AppState,
    config::{Config, VerifierKind},
    core::CoreArc,
    errors::AppError,
    gate::Gate,
    hs256::HmacVerifier,
    jwt::{JwtIssuer, JwtVerifier},
    prod_core::{ProdCore, unix_now},
    sqlite::SqlxDatabaseClient,
    token::Verifier
};

impl From<&AppError> for StatusCode {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AppError::InsufficientRole => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
struct HttpError {
    error: String
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        HttpError { error: format!("{}", err) }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = StatusCode::from(&self);
        let body = Json(HttpError::from(self));
        (code, body).into_response()
    }
}

fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::root_get)
        )
        .route(
            "/api/auth/login",
            post(handlers::login_post)
        )
        .route(
            "/api/auth/logout",
            post(handlers::logout_post)
        )
        .route(
            "/api/admin/me",
            get(handlers::me_get)
        )
        .route(
            "/api/admin/users",
            get(handlers::users_get)
            .post(handlers::users_post)
        )
        .route(
            "/api/admin/users/{id}",
            get(handlers::users_id_get)
        )
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::very_permissive())
        )
}

// The gate wraps the whole router, so unrouted paths under the protected
// namespaces are still gated.
fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn_with_state(state.clone(), gate::intercept))
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("{0}")]
    AddrParseError(#[from] std::net::AddrParseError),
    #[error("{0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("{0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("{0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("{0}")]
    IOError(#[from] io::Error)
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let (writer, _guard) = tracing_appender::non_blocking(io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    let config: Config = toml::from_str(&fs::read_to_string("config.toml")?)?;

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{}", &config.db_path))
        .await?;

    sqlx::migrate!().run(&db_pool).await?;

    let key = config.jwt_key.as_bytes();

    let verifier: Arc<dyn Verifier> = match config.verifier {
        VerifierKind::Jsonwebtoken => Arc::new(JwtVerifier::new(key)),
        VerifierKind::Hmac => Arc::new(HmacVerifier::new(key))
    };

    let core = ProdCore {
        db: SqlxDatabaseClient(db_pool),
        issuer: JwtIssuer::new(key),
        token_ttl: config.token_ttl_secs,
        now: unix_now
    };

    let state = AppState {
        core: Arc::new(core) as CoreArc,
        gate: Arc::new(Gate::new(&config.gate, verifier))
    };

    tracing::info!(
        ip = %config.listen_ip,
        port = config.listen_port,
        verifier = ?config.verifier,
        "starting shoex admin gate"
    );

    let app = app(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new().layer(
                HandleErrorLayer::new(|err: BoxError| async move {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled error: {}", err)
                    )
                })
            )
            .buffer(1024)
            .rate_limit(5, Duration::from_secs(1))
        );

    let ip: IpAddr = config.listen_ip.parse()?;
    let addr = SocketAddr::from((ip, config.listen_port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app).await?;

    Ok(())
}
