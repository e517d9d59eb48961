//! HTTP server setup and dispatch delegation.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all gateway handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Consult the dispatch router once per request
//! - Forward delegated requests to the lane's upstream
//! - Answer disallowed viewer paths inline (404, path rewritten to /404)
//! - Apply configuration reloads by atomic state swap
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::uri::{Authority, PathAndQuery, Scheme},
    http::{header, HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::GatewayConfig;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::path::is_excluded_path;
use crate::routing::{Dispatcher, RoutingDecision};

/// One immutable snapshot of configuration-derived state. Reloads replace
/// the whole snapshot; requests in flight keep the one they loaded.
pub struct InnerState {
    pub config: GatewayConfig,
    pub dispatcher: Dispatcher,
}

impl InnerState {
    fn from_config(config: GatewayConfig) -> Self {
        let dispatcher = Dispatcher::from_config(&config);
        Self { config, dispatcher }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let inner = Arc::new(ArcSwap::from_pointee(InnerState::from_config(
            config.clone(),
        )));

        // Initialize HTTP Client
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { inner, client };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates arriving on `config_updates` are applied by
    /// atomically swapping the state snapshot; readers never observe a
    /// partially updated allowlist.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            allowlist = self.state.inner.load().dispatcher.allowlist().len(),
            "HTTP server starting"
        );

        // Apply config reloads by copy-on-write swap.
        let reload_inner = self.state.inner.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                let snapshot = InnerState::from_config(new_config);
                tracing::info!(
                    mode = ?snapshot.config.mode,
                    allowlist = snapshot.dispatcher.allowlist().len(),
                    "Configuration reloaded"
                );
                reload_inner.store(Arc::new(snapshot));
            }
        });

        // Admin API on its own listener.
        if self.config.admin.enabled {
            spawn_admin_server(&self.config, self.state.clone());
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn spawn_admin_server(config: &GatewayConfig, state: AppState) {
    let bind_address = config.admin.bind_address.clone();
    tokio::spawn(async move {
        let router = admin::setup_admin_router(state);
        match TcpListener::bind(&bind_address).await {
            Ok(listener) => {
                tracing::info!(address = %bind_address, "Admin API listening");
                if let Err(e) = axum::serve(listener, router).await {
                    tracing::error!(error = %e, "Admin API server error");
                }
            }
            Err(e) => {
                tracing::error!(address = %bind_address, error = %e, "Failed to bind admin listener");
            }
        }
    });
}

/// Main gateway handler.
/// Classifies the request once and acts on the resulting lane.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let inner = state.inner.load_full();
    let path = request.uri().path().to_string();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Framework internals and static assets are outside the dispatcher's
    // jurisdiction: straight to the app origin.
    if is_excluded_path(&path) {
        let response =
            forward(&state.client, request, &inner.config.upstreams.app, &request_id).await;
        metrics::record_dispatch("excluded", response.status().as_u16(), start_time);
        return response;
    }

    let decision = inner.dispatcher.dispatch(&host, &path);

    tracing::debug!(
        request_id = %request_id,
        host = %host,
        path = %path,
        lane = decision.lane(),
        "Dispatching request"
    );

    match decision {
        RoutingDecision::RewriteNotFound => {
            tracing::debug!(
                request_id = %request_id,
                rewritten = %rewritten_not_found_target(request.uri()),
                "Disallowed viewer path"
            );
            metrics::record_dispatch(decision.lane(), 404, start_time);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        delegated => {
            let upstream = lane_upstream(&inner.config, delegated);
            let response = forward(&state.client, request, upstream, &request_id).await;
            metrics::record_dispatch(delegated.lane(), response.status().as_u16(), start_time);
            response
        }
    }
}

/// Upstream address for a delegated lane. Pass-through traffic goes to the
/// app origin unmodified.
fn lane_upstream(config: &GatewayConfig, decision: RoutingDecision) -> &str {
    match decision {
        RoutingDecision::DelegateAnalytics => &config.upstreams.analytics,
        RoutingDecision::DelegateWebhook => &config.upstreams.webhooks,
        RoutingDecision::DelegateCustomDomain => &config.upstreams.domains,
        RoutingDecision::DelegateApp
        | RoutingDecision::PassThrough
        | RoutingDecision::RewriteNotFound => &config.upstreams.app,
    }
}

/// The not-found rewrite target, query preserved.
fn rewritten_not_found_target(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("/404?{query}"),
        None => "/404".to_string(),
    }
}

/// Forward a request to an upstream, rewriting scheme and authority and
/// propagating the request ID. Path, query, method, headers, and body pass
/// through untouched.
async fn forward(
    client: &Client<HttpConnector, Body>,
    request: Request<Body>,
    upstream: &str,
    request_id: &str,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = match Authority::from_str(upstream) {
        Ok(authority) => Some(authority),
        Err(_) => {
            tracing::error!(upstream = %upstream, "Invalid upstream address");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream address").into_response();
        }
    };
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    if let Ok(value) = HeaderValue::from_str(request_id) {
        parts.headers.insert(X_REQUEST_ID, value);
    }

    let req = Request::from_parts(parts, body);
    match client.request(req).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream request failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
