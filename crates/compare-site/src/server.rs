/// HTTP server for the generated site.
///
/// Stored pages are served from the output directory. A comparison route with no stored
/// page is resolved against the current data, rendered on a blocking task, persisted and
/// returned, so pairs added after the last build appear on first request.
use std::path::{Component, Path as FsPath};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::catalog::CatalogQuery;
use crate::error::AppError;
use crate::generate::{OnDemand, SiteGenerator};

#[derive(Clone)]
pub struct AppState {
    generator: Arc<SiteGenerator>,
}

pub fn router(generator: Arc<SiteGenerator>) -> Router {
    Router::new()
        .route("/compare", get(compare_index))
        .route("/compare/{*route}", get(comparison))
        .with_state(AppState { generator })
}

pub async fn serve(generator: Arc<SiteGenerator>, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "site server ready");
    axum::serve(listener, router(generator)).await?;
    Ok(())
}

/// GET /compare?q=&category=&sort=
async fn compare_index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let generator = Arc::clone(&state.generator);
    let html = tokio::task::spawn_blocking(move || generator.render_catalog(&query))
        .await
        .map_err(|e| AppError::Render(format!("spawn_blocking join error: {e}")))?;
    Ok(Html(html))
}

/// GET /compare/{a}/vs/{b} and /compare/{a}-vs-{b}; `/compare/index.html` is the index.
async fn comparison(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Response, AppError> {
    if is_index_route(&route) {
        let page = compare_index(State(state), Query(CatalogQuery::default())).await?;
        return Ok(page.into_response());
    }

    let generator = Arc::clone(&state.generator);
    let outcome = tokio::task::spawn_blocking(move || -> Result<OnDemand, AppError> {
        if let Some(html) = stored_page(&generator.config().out_dir(), &route)? {
            debug!(route = %route, "serving stored page");
            return Ok(OnDemand::Rendered(html));
        }
        generator.render_route(&route)
    })
    .await
    .map_err(|e| AppError::Render(format!("spawn_blocking join error: {e}")))??;

    Ok(match outcome {
        OnDemand::Rendered(html) => Html(html).into_response(),
        OnDemand::NotFound(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
    })
}

fn is_index_route(route: &str) -> bool {
    matches!(route.trim_matches('/'), "" | "index.html")
}

/// Pre-rendered page for a route, if one exists. Routes that step outside the output
/// tree never match a file.
fn stored_page(out_dir: &FsPath, route: &str) -> Result<Option<String>, AppError> {
    let route = route.trim_matches('/').trim_end_matches("index.html").trim_end_matches('/');
    if route.is_empty()
        || FsPath::new(route)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Ok(None);
    }

    let path = out_dir.join("compare").join(route).join("index.html");
    match std::fs::read_to_string(&path) {
        Ok(html) => Ok(Some(html)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn setup() -> (tempfile::TempDir, tempfile::TempDir, Arc<SiteGenerator>) {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(
            data.path().join("aiToolsData.json"),
            r#"[
                {"id": "chatgpt", "name": "ChatGPT", "slug": "chatgpt", "category": "Chat"},
                {"id": "jasper-ai", "name": "Jasper AI", "slug": "jasper-ai", "category": "Writing"}
            ]"#,
        )
        .unwrap();
        std::fs::write(data.path().join("faqData.json"), "{}").unwrap();
        let out = tempfile::tempdir().unwrap();
        let config = Config::with_dirs(
            data.path().to_string_lossy(),
            out.path().to_string_lossy(),
        );
        (data, out, Arc::new(SiteGenerator::new(config)))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn state(generator: &Arc<SiteGenerator>) -> State<AppState> {
        State(AppState {
            generator: Arc::clone(generator),
        })
    }

    #[tokio::test]
    async fn renders_and_persists_unknown_pair() {
        let (_data, out, generator) = setup();

        let response = comparison(state(&generator), Path("chatgpt/vs/jasper-ai".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("ChatGPT vs Jasper AI"));

        let stored = out.path().join("compare/chatgpt/vs/jasper-ai/index.html");
        assert!(stored.is_file());

        std::fs::write(&stored, "<p>stored copy</p>").unwrap();
        let response = comparison(state(&generator), Path("chatgpt/vs/jasper-ai/".to_string()))
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "<p>stored copy</p>");
    }

    #[tokio::test]
    async fn unknown_tool_is_404() {
        let (_data, _out, generator) = setup();
        let response = comparison(state(&generator), Path("chatgpt-vs-nothing".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Tools not found"));

        let response = comparison(state(&generator), Path("../../etc/passwd".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn index_honors_query() {
        let (_data, _out, generator) = setup();
        let query = CatalogQuery {
            category: Some("Writing".to_string()),
            ..Default::default()
        };
        let Html(html) = compare_index(state(&generator), Query(query)).await.unwrap();
        assert!(html.contains("Jasper AI"));
        assert!(html.contains("Showing 1 of 2 AI tools"));
    }

    #[tokio::test]
    async fn index_html_serves_the_index() {
        let (_data, _out, generator) = setup();
        for route in ["index.html", "/index.html", "/"] {
            let response = comparison(state(&generator), Path(route.to_string()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{route}");
            let html = body_text(response).await;
            assert!(html.contains("<h1>Compare AI Tools</h1>"), "{route}");
            assert!(html.contains("Showing 2 of 2 AI tools"));
        }
    }

    #[test]
    fn stored_page_rejects_escaping_routes() {
        let out = tempfile::tempdir().unwrap();
        assert!(stored_page(out.path(), "../secret").unwrap().is_none());
        assert!(stored_page(out.path(), "/").unwrap().is_none());
        assert!(stored_page(out.path(), "a/vs/b").unwrap().is_none());
    }
}
