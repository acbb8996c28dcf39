//! In-memory mock of the schema registry REST API (v3), served under
//! [`API_PREFIX`]. Used by the client's integration tests.

use std::sync::Arc;

use axum::Router;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

mod error;
mod model;
mod routes;
mod store;

pub use error::Problem;
pub use routes::ARTIFACT_TYPE_HEADER;
pub use store::{content_hash, Registry, LATEST};

pub const API_PREFIX: &str = "/apis/registry/v3";

pub type Db = Arc<RwLock<Registry>>;

/// Server behaviour switches.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// When false, deleting artifacts or versions answers 405.
    pub deletion_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            deletion_enabled: true,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub options: Options,
}

impl AppState {
    fn check_deletion(&self) -> Result<(), Problem> {
        if self.options.deletion_enabled {
            Ok(())
        } else {
            Err(Problem::method_not_allowed("Artifact deletion operation is not enabled."))
        }
    }
}

pub fn app() -> Router {
    app_with(Options::default())
}

pub fn app_with(options: Options) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Registry::default())),
        options,
    };
    Router::new()
        .nest(API_PREFIX, routes::api())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Options::default()).await
}

pub async fn run_with(listener: TcpListener, options: Options) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}
