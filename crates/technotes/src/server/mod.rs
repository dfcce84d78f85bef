//! HTTP server for technotes.
//!
//! Serves the post list to everyone and the authoring pages in development
//! mode. Authoring routes check write capability before anything else, so
//! outside development they answer 403 regardless of input.

pub mod error;
mod handlers;

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, RunMode};
use crate::error::Result;
use crate::render::Views;
use crate::store::{MutableStore, PostReader, StoreHandle};

pub use error::HttpError;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The post collection.
    pub store: Arc<StoreHandle>,
    /// Compiled templates.
    pub views: Arc<Views>,
    /// Posts per home page.
    pub page_size: usize,
    /// Runtime mode, for messages.
    pub mode: RunMode,
}

impl AppState {
    /// Build state around an opened store.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates fail to parse.
    pub fn new(store: StoreHandle, mode: RunMode, page_size: usize) -> Result<Self> {
        Ok(Self {
            store: Arc::new(store),
            views: Arc::new(Views::new(mode)?),
            page_size,
            mode,
        })
    }

    /// Open the configured store and templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the posts document or the templates fail to load.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = StoreHandle::open(config)?;
        Self::new(store, config.mode, config.server.page_size)
    }

    /// Write access, or 403.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Forbidden`] when the store is read-only.
    pub fn writable(&self) -> std::result::Result<&MutableStore, HttpError> {
        self.store.writable().ok_or_else(|| {
            HttpError::Forbidden(format!("Posting is not allowed in {} mode", self.mode))
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/admin",
            get(handlers::admin_page).post(handlers::create_post),
        )
        .route(
            "/admin/edit/{id}",
            get(handlers::edit_page).post(handlers::edit_post),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(middleware::map_response_with_state(
            state.clone(),
            error::render_error_page,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the store or templates fail to load, or the address
/// cannot be bound.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        "technotes listening on http://{} ({} mode, {} posts)",
        listener.local_addr()?,
        config.mode,
        state.store.len()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::post::{Post, PostDraft};
    use crate::store::{snapshot, ReadOnlyStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn post(content: &str) -> Post {
        Post::new(PostDraft::new(content, "rust").unwrap())
    }

    fn state(mode: RunMode, posts: Vec<Post>) -> AppState {
        init_test_logging();
        let store = if mode.allows_writes() {
            StoreHandle::from(MutableStore::from_posts(posts))
        } else {
            StoreHandle::from(ReadOnlyStore::from_posts(posts))
        };
        AppState::new(store, mode, 20).unwrap()
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        router(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(state: &AppState, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let state = state(RunMode::Production, vec![]);
        let response = get(&state, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_home_lists_posts() {
        let state = state(RunMode::Production, vec![post("hello from `axum`")]);
        let response = get(&state, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<code>axum</code>"));
        assert!(html.contains("Activity"));
    }

    #[tokio::test]
    async fn test_home_bad_page_falls_back() {
        let state = state(RunMode::Production, vec![post("only")]);
        for uri in ["/?page=0", "/?page=abc", "/?page=-1"] {
            let response = get(&state, uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("only"));
        }
    }

    #[tokio::test]
    async fn test_home_paginates() {
        let posts = (0..25).map(|i| post(&format!("note {i}"))).collect();
        let state = state(RunMode::Production, posts);

        let html = body_text(get(&state, "/").await).await;
        assert!(html.contains("?page=2"));

        let html = body_text(get(&state, "/?page=2").await).await;
        assert_eq!(html.matches("<article").count(), 5);
    }

    #[tokio::test]
    async fn test_admin_disabled_outside_development() {
        for mode in [RunMode::Production, RunMode::Test] {
            let state = state(mode, vec![]);
            let response = get(&state, "/admin").await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("Posting is disabled"));
        }
    }

    #[tokio::test]
    async fn test_writes_forbidden_outside_development() {
        let existing = post("keep");
        let id = existing.id.clone();
        let state = state(RunMode::Production, vec![existing]);

        let response = post_form(&state, "/admin", "content=hi&techIcon=rust").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = get(&state, &format!("/admin/edit/{id}")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // 403 comes before the id lookup
        let response = get(&state, "/admin/edit/missing").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = post_form(&state, &format!("/admin/edit/{id}"), "intent=delete").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.store.len(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_without_form_body() {
        let state = state(RunMode::Production, vec![]);
        let response = router(state.clone())
            .oneshot(Request::post("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_redirects() {
        let state = state(RunMode::Development, vec![]);
        let response = post_form(&state, "/admin", "content=++new+note++&techIcon=go").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let page = state.store.list(20, 0);
        assert_eq!(page.total, 1);
        assert_eq!(page.posts[0].content, "new note");
        assert_eq!(page.posts[0].tech_icon, "go");
    }

    #[tokio::test]
    async fn test_create_validation_rerenders_form() {
        let state = state(RunMode::Development, vec![]);

        let response = post_form(&state, "/admin", "content=+++&techIcon=go").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Content is required"));

        let response = post_form(&state, "/admin", "content=hi&techIcon=cobol").await;
        assert!(body_text(response).await.contains("Invalid category selected"));

        let long = "x".repeat(201);
        let response = post_form(&state, "/admin", &format!("content={long}&techIcon=go")).await;
        let html = body_text(response).await;
        assert!(html.contains("Content must be 200 characters or less"));
        assert!(html.contains(&long));

        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn test_edit_page_and_unknown_id() {
        let existing = post("editable");
        let id = existing.id.clone();
        let state = state(RunMode::Development, vec![existing]);

        let response = get(&state, &format!("/admin/edit/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("editable"));

        let response = get(&state, "/admin/edit/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Post not found"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let existing = post("before");
        let id = existing.id.clone();
        let state = state(RunMode::Development, vec![existing]);
        let uri = format!("/admin/edit/{id}");

        let response = post_form(&state, &uri, "intent=update&content=after&techIcon=python").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let updated = state.store.get(&id).unwrap();
        assert_eq!(updated.content, "after");
        assert_eq!(updated.tech_icon, "python");

        let response = post_form(&state, &uri, "intent=update&content=&techIcon=python").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Content is required"));
        assert_eq!(state.store.get(&id).unwrap().content, "after");

        let response = post_form(&state, &uri, "intent=delete").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.store.is_empty());

        let response = post_form(&state, &uri, "intent=delete").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let state = state(RunMode::Development, vec![]);
        let response = post_form(&state, "/admin/edit/missing", "content=x&techIcon=go").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_flush_failure_is_500() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        snapshot::write(&path, &[]).unwrap();
        std::fs::create_dir(snapshot::temp_path(&path)).unwrap();

        let store = MutableStore::open(&path).unwrap();
        let state = AppState::new(store.into(), RunMode::Development, 20).unwrap();

        let response = post_form(&state, "/admin", "content=hi&techIcon=go").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.store.is_empty());
        assert!(ReadOnlyStore::open(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_writes_reach_the_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        snapshot::write(&path, &[]).unwrap();

        let state = AppState::new(
            MutableStore::open(&path).unwrap().into(),
            RunMode::Development,
            20,
        )
        .unwrap();

        // Another writer on the same document, like `technotes post new`
        let other = MutableStore::open(&path).unwrap();
        let other_id = other.create(PostDraft::new("from the cli", "git").unwrap()).unwrap();

        let response = post_form(&state, "/admin", "content=from+the+browser&techIcon=go").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let on_disk = ReadOnlyStore::open(&path).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert!(on_disk.get(&other_id).is_some());
        assert!(state.store.get(&other_id).is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_renders_error_page() {
        let state = state(RunMode::Production, vec![]);
        let response = get(&state, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = body_text(response).await;
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("404 Not Found"));
    }
}
