use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    response::Html,
    routing::{MethodRouter, get},
};
use miette::Result;
use tokio::{
    net::TcpListener,
    signal::unix::{SignalKind, signal},
};
use tower::ServiceBuilder;
use tracing::{debug, error, info};

use crate::{
    config::{Config, PageCopy},
    o11y,
    page::{self, PageRequest},
};

#[derive(Clone)]
struct WebState {
    copy: Arc<PageCopy>,
}

async fn handle_page(State(state): State<WebState>, request: PageRequest) -> Html<String> {
    debug!(
        method = %request.method,
        submitted = request.submitted_name().is_some(),
        "Rendering page"
    );

    Html(page::render(&request, &state.copy))
}

/// Build the application router
///
/// With `web.page_path` set the page lives on that path alone. Otherwise every
/// path serves the page, and the form posts back to whichever path was asked for.
#[must_use]
pub fn router(config: &Config) -> Router {
    let state = WebState {
        copy: Arc::new(config.page.clone()),
    };

    let page: MethodRouter<WebState> = get(handle_page).post(handle_page);

    let routes = match &config.web.page_path {
        Some(path) => Router::new().route(path, page),
        None => Router::new()
            .route("/", page.clone())
            .route("/{*path}", page),
    };

    routes.with_state(state).layer(
        ServiceBuilder::new()
            .layer(o11y::request_trace_layer())
            .layer(DefaultBodyLimit::max(config.web.max_form_bytes)),
    )
}

/// Start the web server and run until `shutdown` resolves
///
/// # Errors
/// Returns an error if the listen address is invalid, binding fails or the server stops unexpectedly
pub async fn start<F>(config: Arc<Config>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let http_addr = config.http_addr()?;

    let listener = TcpListener::bind(http_addr)
        .await
        .map_err(|e| miette::miette!("Failed to bind HTTP socket on {http_addr}: {e}"))?;

    serve(listener, &config, shutdown).await
}

/// Serve on an already bound listener
///
/// # Errors
/// Returns an error if the server stops unexpectedly
pub async fn serve<F>(listener: TcpListener, config: &Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(config);

    match listener.local_addr() {
        Ok(addr) => info!("HTTP server listening on {addr}"),
        Err(e) => error!("Failed to read local address: {e}"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| miette::miette!("HTTP server error: {e}"))?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves once SIGINT or SIGTERM is received
///
/// # Errors
/// Returns an error if the signal handlers cannot be installed
pub fn shutdown_signal() -> Result<impl Future<Output = ()> + Send + 'static> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| miette::miette!("Failed to setup SIGTERM handler: {e}"))?;

    Ok(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Received SIGINT, shutting down..."),
                    Err(e) => error!("Failed to listen for ctrl+c: {e}"),
                }
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
            }
        }
    })
}
