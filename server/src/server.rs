use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tower::Layer;
use tracing::{debug, error, info};

use crate::AppState;
use crate::handlers::http::utils::internal_error;
use crate::handlers::http::{Router, build_router};
use crate::tower_middle::{HyperToTowerAdapter, TimeoutLayer};

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Each connection runs on its own task: router behind the timeout layer,
/// served over HTTP/1.1. A handler error becomes a JSON 500.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let router: Arc<Router<Incoming>> = Arc::new(build_router());
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    info!("Listening on http://{}", listener.local_addr()?);

    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received, no longer accepting connections");
                break;
            }
        };

        debug!("Accepted connection from {}", peer);

        let io = TokioIo::new(stream);
        let router = router.clone();
        let state = state.clone();

        let handler = service_fn(move |req: Request<Incoming>| {
            let router = router.clone();
            let state = state.clone();
            async move {
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                match router.route(req, state).await {
                    Ok(response) => Ok::<_, Infallible>(response),
                    Err(e) => {
                        error!("Handler for {} {} failed: {:#}", method, path, e);
                        Ok(internal_error())
                    }
                }
            }
        });

        let svc = TimeoutLayer::new(timeout).layer(HyperToTowerAdapter::new(handler));

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, TowerToHyperService::new(svc))
                .await
            {
                debug!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }

    Ok(())
}
