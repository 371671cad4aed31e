use anyhow::Result;
use hyper::{Request, StatusCode};

use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, deliver_serialized_json};

/// `GET /api/promo/stats`
pub async fn handle_stats<B>(_req: Request<B>, state: AppState) -> Result<HttpResponse> {
    deliver_serialized_json(&state.metrics.snapshot(), StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Empty};
    use promo_shared::promo::PromoError;

    #[tokio::test]
    async fn stats_reflect_recorded_events() {
        let state = test_state().await;
        state.metrics.record_minted();
        state.metrics.record_rejection(PromoError::Malformed);

        let resp = handle_stats(Request::new(Empty::<Bytes>::new()), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["minted"], 1);
        assert_eq!(json["rejected"]["malformed"], 1);
    }
}
