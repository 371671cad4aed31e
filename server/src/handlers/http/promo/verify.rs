use anyhow::Result;
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, StatusCode};
use tracing::{debug, info, warn};

use promo_shared::promo::now_ms;
use promo_shared::types::{VerifyRequest, VerifyResponse};

use super::record_rejection;
use crate::AppState;
use crate::handlers::http::utils::{HttpResponse, deliver_serialized_json, read_json, read_query};

/// `POST /api/promo/verify`
///
/// Always answers 200. Any failure, including an unreadable body, is
/// `{"valid": false, "pct": 0}`.
pub async fn handle_verify<B>(req: Request<B>, state: AppState) -> Result<HttpResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request: VerifyRequest = match read_json(req).await {
        Ok(request) => request,
        Err(e) => {
            debug!("Verify body unreadable: {:#}", e);
            VerifyRequest::default()
        }
    };

    let response = verify_claim(&state, &request, now_ms());
    deliver_serialized_json(&response, StatusCode::OK)
}

/// `GET /api/promo/verify?token=..&productId=..`
pub async fn handle_verify_query<B>(req: Request<B>, state: AppState) -> Result<HttpResponse> {
    let request: VerifyRequest = read_query(&req).unwrap_or_default();

    let response = verify_claim(&state, &request, now_ms());
    deliver_serialized_json(&response, StatusCode::OK)
}

/// Authenticate the token at `now` and check it was issued for the
/// requested product. The percent returned is clamped to `[0, 100]`.
pub fn verify_claim(state: &AppState, request: &VerifyRequest, now: i64) -> VerifyResponse {
    let Some((token, product_id)) = request.parts() else {
        debug!("Verify request missing token or productId");
        return VerifyResponse::rejected();
    };

    let claims = match state.codec.authenticate_at(token, now) {
        Ok(claims) => claims,
        Err(err) => {
            record_rejection(state, err, "verify");
            return VerifyResponse::rejected();
        }
    };

    if !claims.applies_to(product_id) {
        warn!(
            "Promo token for {} presented against {}",
            claims.product_id(),
            product_id
        );
        state.metrics.record_product_mismatch();
        return VerifyResponse::rejected();
    }

    state.metrics.record_verified();
    info!("Promo token verified: {}", claims);

    VerifyResponse::accepted(claims.clamped_percent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TEST_SECRET, test_state};
    use http_body_util::{BodyExt, Empty, Full};
    use promo_shared::promo::{PromoClaims, mint};

    const NOW: i64 = 1_750_000_000_000;

    fn token_for(product: &str, pct: f64, exp: i64) -> String {
        mint(&PromoClaims::new(product, pct, exp, NOW), TEST_SECRET).unwrap()
    }

    fn request(token: &str, product: &str) -> VerifyRequest {
        VerifyRequest {
            token: Some(token.into()),
            product_id: Some(product.into()),
        }
    }

    #[tokio::test]
    async fn valid_token_for_product_is_accepted() {
        let state = test_state().await;
        let token = token_for("P1", 10.0, NOW + 1_000);

        let resp = verify_claim(&state, &request(&token, "P1"), NOW);
        assert_eq!(resp, VerifyResponse::accepted(10.0));
        assert_eq!(state.metrics.snapshot().verified, 1);
    }

    #[tokio::test]
    async fn token_for_other_product_is_rejected() {
        let state = test_state().await;
        let token = token_for("P1", 10.0, NOW + 1_000);

        let resp = verify_claim(&state, &request(&token, "P2"), NOW);
        assert_eq!(resp, VerifyResponse::rejected());
        assert_eq!(state.metrics.snapshot().product_mismatch, 1);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_counted() {
        let state = test_state().await;
        let token = token_for("P1", 10.0, NOW - 1);

        let resp = verify_claim(&state, &request(&token, "P1"), NOW);
        assert_eq!(resp, VerifyResponse::rejected());
        assert_eq!(state.metrics.snapshot().rejected.expired, 1);
    }

    #[tokio::test]
    async fn forged_token_is_rejected_as_bad_signature() {
        let state = test_state().await;
        let forged = mint(
            &PromoClaims::new("P1", 90.0, NOW + 1_000, NOW),
            "some-other-secret-some-other-secret",
        )
        .unwrap();

        let resp = verify_claim(&state, &request(&forged, "P1"), NOW);
        assert_eq!(resp, VerifyResponse::rejected());
        assert_eq!(state.metrics.snapshot().rejected.bad_signature, 1);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_without_counting() {
        let state = test_state().await;

        let resp = verify_claim(&state, &VerifyRequest::default(), NOW);
        assert_eq!(resp, VerifyResponse::rejected());
        assert_eq!(state.metrics.snapshot().rejected.total(), 0);
    }

    #[tokio::test]
    async fn oversized_percent_is_clamped_in_response() {
        let state = test_state().await;
        let token = token_for("P1", 300.0, NOW + 1_000);

        let resp = verify_claim(&state, &request(&token, "P1"), NOW);
        assert_eq!(resp, VerifyResponse::accepted(100.0));
    }

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn http_post_with_garbage_body_is_200_invalid() {
        let state = test_state().await;

        let resp = handle_verify(Request::new(Full::new(Bytes::from("{{{"))), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["pct"], 0.0);
    }

    #[tokio::test]
    async fn http_get_reads_query_parameters() {
        let state = test_state().await;
        let token = token_for("P1", 15.0, now_ms() + 60_000);
        let uri = format!("/api/promo/verify?token={}&productId=P1", token);

        let req = Request::builder()
            .uri(uri)
            .body(Empty::<Bytes>::new())
            .unwrap();
        let json = body_json(handle_verify_query(req, state).await.unwrap()).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["pct"], 15.0);
    }
}
