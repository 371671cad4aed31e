use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde_json::json;
use tracing::debug;

use promo_shared::types::ErrorResponse;

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, deliver_error_json, deliver_serialized_json};
use crate::handlers::http::{checkout, promo};

type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send>>;

type RouteHandler<B> = Box<dyn Fn(Request<B>, AppState) -> HandlerFuture + Send + Sync>;

struct Route<B> {
    method: Method,
    path: String,
    handler: RouteHandler<B>,
}

/// Method + exact-path dispatch table. Generic over the request body so the
/// same routes serve `hyper::body::Incoming` in production and in-memory
/// bodies in tests.
pub struct Router<B> {
    routes: Vec<Route<B>>,
}

impl<B> std::fmt::Debug for Router<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl<B> Default for Router<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Router<B> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    fn add<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(move |req, state| Box::pin(handler(req, state))),
        });
        self
    }

    /// Dispatch to the first route whose method and path match; anything
    /// else is a JSON 404.
    pub async fn route(&self, req: Request<B>, state: AppState) -> Result<HttpResponse> {
        let matched = self.routes.iter().find(|route| {
            route.method == req.method() && Self::path_matches(&route.path, req.uri().path())
        });

        match matched {
            Some(route) => (route.handler)(req, state).await,
            None => {
                debug!("No route for {} {}", req.method(), req.uri().path());
                deliver_error_json(&ErrorResponse::not_found(), StatusCode::NOT_FOUND)
            }
        }
    }

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path == clean
    }
}

/// `GET /health`
pub async fn handle_health<B>(_req: Request<B>, _state: AppState) -> Result<HttpResponse> {
    deliver_serialized_json(&json!({ "status": "success", "health": "ok" }), StatusCode::OK)
}

/// Every endpoint the promo service exposes.
pub fn build_router<B>() -> Router<B>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Router::new()
        .get("/health", handle_health::<B>)
        .post("/api/promo/mint", promo::handle_mint::<B>)
        .post("/api/promo/verify", promo::handle_verify::<B>)
        .get("/api/promo/verify", promo::handle_verify_query::<B>)
        .get("/api/promo/stats", promo::handle_stats::<B>)
        .post("/api/checkout/quote", checkout::handle_quote::<B>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use http_body_util::{BodyExt, Full};

    type TestRouter = Router<Full<Bytes>>;

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn exact_path_matches() {
        assert!(TestRouter::path_matches("/api/promo/verify", "/api/promo/verify"));
    }

    #[test]
    fn different_paths_do_not_match() {
        assert!(!TestRouter::path_matches("/api/promo/verify", "/api/promo/mint"));
    }

    #[test]
    fn trailing_slash_does_not_match_without_slash() {
        assert!(!TestRouter::path_matches("/health", "/health/"));
    }

    #[test]
    fn query_string_stripped_before_match() {
        assert!(TestRouter::path_matches(
            "/api/promo/verify",
            "/api/promo/verify?token=a.b&productId=P1"
        ));
    }

    #[test]
    fn router_new_has_no_routes() {
        assert!(TestRouter::new().routes.is_empty());
    }

    #[test]
    fn build_router_registers_every_endpoint() {
        assert_eq!(build_router::<Full<Bytes>>().routes.len(), 6);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let router = build_router();
        let resp = router
            .route(request(Method::GET, "/health", ""), test_state().await)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({ "status": "success", "health": "ok" })
        );
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let router = build_router();
        let resp = router
            .route(request(Method::GET, "/nope", ""), test_state().await)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn wrong_method_is_404() {
        let router = build_router();
        let resp = router
            .route(request(Method::GET, "/api/promo/mint", ""), test_state().await)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_dispatches_for_post() {
        let router = build_router();
        let resp = router
            .route(
                request(
                    Method::POST,
                    "/api/promo/verify",
                    r#"{"token":"x.y","productId":"P1"}"#,
                ),
                test_state().await,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["valid"], false);
    }
}
