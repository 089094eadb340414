// HTTP boundary for the setlist agent
//
// Thin axum layer over the turn API: request validation, optional
// bearer-token auth, CORS, and library pre-fetch. All decision logic
// lives in the agent.

pub mod routes;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::agent::SetlistAgent;
use crate::library_client::LibraryClient;

/// Library endpoint the boundary fetches from when the caller sends no
/// `libraryTracks` of its own.
pub struct LibraryEndpoint {
    pub client: LibraryClient,
    pub auth_token: Option<String>,
}

/// Shared state for the agent server
pub struct AppState {
    pub agent: SetlistAgent,
    pub library: Option<LibraryEndpoint>,
    /// When set, API requests must carry this token as `Bearer <token>`
    pub auth_token: Option<String>,
}

/// Auth middleware - validates the Bearer token on API requests.
/// The health endpoint stays open; with no token configured, so does
/// everything else.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.auth_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            if &header[7..] == expected {
                Ok(next.run(request).await)
            } else {
                Err(StatusCode::UNAUTHORIZED)
            }
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS is not a security layer here; the auth middleware is.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/setlist/generate", post(routes::generate_setlist))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .with_state(state)
}
